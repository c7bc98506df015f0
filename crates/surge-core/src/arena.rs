//! Single-allocation working memory for the pipeline.
//!
//! All chunk-sized scratch buffers and the display time axis are carved out
//! of one `Vec<f32>` reserved at construction. Reservation is fallible: on
//! failure the pipeline stays inert instead of aborting the host.
//!
//! Layout, in order:
//!
//! | Region | Length |
//! |--------|--------|
//! | control | `chunk` |
//! | envelope | `chunk` |
//! | time axis | `points` |
//! | channel buffers | `channels * chunk` |

#[cfg(not(feature = "std"))]
use alloc::vec::Vec;

use crate::error::SurgeError;

/// Zeroed buffer of `len` samples, or [`SurgeError::Allocation`] instead of
/// aborting when the memory is not there.
pub(crate) fn try_zeroed(len: usize) -> Result<Vec<f32>, SurgeError> {
    let mut buf = Vec::new();
    buf.try_reserve_exact(len)
        .map_err(|_| SurgeError::Allocation(len))?;
    buf.resize(len, 0.0);
    Ok(buf)
}

/// Borrowed view of every arena region at once.
pub struct ArenaParts<'a> {
    /// Control signal, then gain-control after the gate.
    pub control: &'a mut [f32],
    /// Gate envelope.
    pub envelope: &'a mut [f32],
    /// Display time axis.
    pub time_points: &'a mut [f32],
    /// Per-channel private buffers, `chunk` samples each, back to back.
    pub channels: &'a mut [f32],
}

/// Owner of the pipeline's working memory.
#[derive(Debug)]
pub struct BufferArena {
    storage: Vec<f32>,
    chunk: usize,
    points: usize,
    channels: usize,
}

impl BufferArena {
    /// Reserve and zero the arena.
    pub fn try_new(channels: usize, chunk: usize, points: usize) -> Result<Self, SurgeError> {
        let total = channels
            .checked_add(2)
            .and_then(|n| n.checked_mul(chunk))
            .and_then(|n| n.checked_add(points))
            .ok_or(SurgeError::Allocation(usize::MAX))?;

        Ok(Self {
            storage: try_zeroed(total)?,
            chunk,
            points,
            channels,
        })
    }

    /// Samples per chunk region.
    pub fn chunk(&self) -> usize {
        self.chunk
    }

    /// Number of channel buffers.
    pub fn channels(&self) -> usize {
        self.channels
    }

    /// Total samples held.
    pub fn len(&self) -> usize {
        self.storage.len()
    }

    /// Whether the arena holds no samples.
    pub fn is_empty(&self) -> bool {
        self.storage.is_empty()
    }

    /// Display time axis.
    pub fn time_points(&self) -> &[f32] {
        let start = 2 * self.chunk;
        &self.storage[start..start + self.points]
    }

    /// Split the arena into its regions.
    pub fn parts(&mut self) -> ArenaParts<'_> {
        let (control, rest) = self.storage.split_at_mut(self.chunk);
        let (envelope, rest) = rest.split_at_mut(self.chunk);
        let (time_points, channels) = rest.split_at_mut(self.points);
        ArenaParts {
            control,
            envelope,
            time_points,
            channels,
        }
    }
}
