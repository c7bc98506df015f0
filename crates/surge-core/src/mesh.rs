//! Lock-free display meshes.
//!
//! A [`Mesh`] is a fixed set of rows (time axis + value series) shared between
//! the audio thread and a UI consumer. The empty flag is the only
//! synchronization:
//!
//! - the producer writes rows only while the mesh is empty, then publishes
//!   with [`Mesh::commit`] (release);
//! - the consumer sees a published mesh (acquire), reads it, and hands it back
//!   with [`Mesh::mark_empty`].
//!
//! An unread mesh is never overwritten, so a slow consumer drops snapshots
//! instead of blocking the audio thread. Values are f32 bit-cast into
//! `AtomicU32` so both sides stay in safe code.

#[cfg(not(feature = "std"))]
use alloc::vec::Vec;

use core::sync::atomic::{AtomicBool, AtomicU32, AtomicUsize, Ordering};

/// Fixed-capacity, single-producer single-consumer snapshot buffer.
#[derive(Debug)]
pub struct Mesh {
    rows: usize,
    len: usize,
    data: Vec<AtomicU32>,
    empty: AtomicBool,
    /// Rows and row length of the published snapshot.
    published_rows: AtomicUsize,
    published_len: AtomicUsize,
}

impl Mesh {
    /// Allocate an empty mesh of `rows` rows of `len` values.
    pub fn new(rows: usize, len: usize) -> Self {
        Self {
            rows,
            len,
            data: (0..rows * len).map(|_| AtomicU32::new(0)).collect(),
            empty: AtomicBool::new(true),
            published_rows: AtomicUsize::new(0),
            published_len: AtomicUsize::new(0),
        }
    }

    /// Declared row count.
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Declared row length.
    pub fn row_len(&self) -> usize {
        self.len
    }

    /// Whether the producer may write.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.empty.load(Ordering::Acquire)
    }

    fn row(&self, row: usize) -> &[AtomicU32] {
        &self.data[row * self.len..(row + 1) * self.len]
    }

    /// Producer: copy `values` into `row`. Ignored past the declared shape.
    pub fn write_row(&self, row: usize, values: &[f32]) {
        if row >= self.rows {
            return;
        }
        for (slot, v) in self.row(row).iter().zip(values) {
            slot.store(v.to_bits(), Ordering::Relaxed);
        }
    }

    /// Producer: zero-fill `row`.
    pub fn fill_row_zero(&self, row: usize) {
        if row >= self.rows {
            return;
        }
        for slot in self.row(row) {
            slot.store(0, Ordering::Relaxed);
        }
    }

    /// Producer: publish `rows` rows of `len` values and mark the mesh non-empty.
    pub fn commit(&self, rows: usize, len: usize) {
        self.published_rows.store(rows.min(self.rows), Ordering::Relaxed);
        self.published_len.store(len.min(self.len), Ordering::Relaxed);
        self.empty.store(false, Ordering::Release);
    }

    /// Consumer: published shape, or `None` while empty.
    pub fn published(&self) -> Option<(usize, usize)> {
        if self.is_empty() {
            return None;
        }
        Some((
            self.published_rows.load(Ordering::Relaxed),
            self.published_len.load(Ordering::Relaxed),
        ))
    }

    /// Consumer: copy one published row into `dst`. Returns values copied.
    pub fn read_row(&self, row: usize, dst: &mut [f32]) -> usize {
        let Some((rows, len)) = self.published() else {
            return 0;
        };
        if row >= rows {
            return 0;
        }
        let mut copied = 0;
        for (d, slot) in dst.iter_mut().zip(&self.row(row)[..len]) {
            *d = f32::from_bits(slot.load(Ordering::Relaxed));
            copied += 1;
        }
        copied
    }

    /// Consumer: release the mesh back to the producer.
    pub fn mark_empty(&self) {
        self.empty.store(true, Ordering::Release);
    }

    /// Consumer: copy out the published snapshot and release the mesh.
    pub fn take(&self) -> Option<MeshSnapshot> {
        let (rows, len) = self.published()?;
        let data = (0..rows)
            .map(|r| {
                self.row(r)[..len]
                    .iter()
                    .map(|slot| f32::from_bits(slot.load(Ordering::Relaxed)))
                    .collect()
            })
            .collect();
        self.mark_empty();
        Some(MeshSnapshot { rows: data })
    }
}

/// Owned copy of a published mesh. Row 0 is the time axis.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct MeshSnapshot {
    /// Published rows.
    pub rows: Vec<Vec<f32>>,
}

impl MeshSnapshot {
    /// Time axis row.
    pub fn time(&self) -> &[f32] {
        self.rows.first().map_or(&[][..], Vec::as_slice)
    }

    /// Value series (every row after the time axis).
    pub fn series(&self) -> &[Vec<f32>] {
        self.rows.get(1..).unwrap_or(&[])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_mesh_is_empty() {
        let mesh = Mesh::new(3, 4);
        assert!(mesh.is_empty());
        assert!(mesh.published().is_none());
        assert!(mesh.take().is_none());
    }

    #[test]
    fn commit_then_take() {
        let mesh = Mesh::new(3, 4);
        mesh.write_row(0, &[3.0, 2.0, 1.0, 0.0]);
        mesh.fill_row_zero(1);
        mesh.write_row(2, &[0.5, 0.25, 0.125, 0.0625]);
        mesh.commit(3, 4);

        assert!(!mesh.is_empty());
        let snap = mesh.take().unwrap();
        assert_eq!(snap.time(), &[3.0, 2.0, 1.0, 0.0]);
        assert_eq!(snap.series()[0], vec![0.0; 4]);
        assert_eq!(snap.series()[1], vec![0.5, 0.25, 0.125, 0.0625]);
        assert!(mesh.is_empty());
    }

    #[test]
    fn read_row_respects_published_shape() {
        let mesh = Mesh::new(2, 4);
        mesh.write_row(1, &[1.0, 2.0, 3.0, 4.0]);
        mesh.commit(2, 2);

        let mut dst = [0.0; 4];
        assert_eq!(mesh.read_row(1, &mut dst), 2);
        assert_eq!(dst, [1.0, 2.0, 0.0, 0.0]);
        assert_eq!(mesh.read_row(5, &mut dst), 0);
        assert!(!mesh.is_empty(), "reading does not release");
        mesh.mark_empty();
        assert_eq!(mesh.read_row(1, &mut dst), 0);
    }

    #[test]
    fn out_of_shape_writes_are_ignored() {
        let mesh = Mesh::new(1, 2);
        mesh.write_row(4, &[1.0, 1.0]);
        mesh.fill_row_zero(9);
        mesh.write_row(0, &[7.0, 8.0, 9.0]);
        mesh.commit(10, 10);
        assert_eq!(mesh.published(), Some((1, 2)));
        assert_eq!(mesh.take().unwrap().rows, vec![vec![7.0, 8.0]]);
    }
}
