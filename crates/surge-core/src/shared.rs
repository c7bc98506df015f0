//! Thread-safe state shared between the audio thread and its observers.
//!
//! [`SurgeShared`] is created with the filter and lives as long as anyone
//! holds a clone. The audio thread writes meters, latency, the redraw request
//! and the four display meshes; UI or host code reads them without locks.
//! Meter values are f32 bit-cast into `AtomicU32`.

#[cfg(not(feature = "std"))]
use alloc::sync::Arc;
#[cfg(not(feature = "std"))]
use alloc::vec::Vec;
#[cfg(feature = "std")]
use std::sync::Arc;

use core::sync::atomic::{AtomicBool, AtomicU32, AtomicUsize, Ordering};

use crate::mesh::Mesh;
use crate::pipeline::MESH_POINTS;

/// Which display mesh.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MeshKind {
    /// Gain-control history: time axis + 1 series.
    Gain,
    /// Envelope history: time axis + 1 series.
    Envelope,
    /// Input histories: time axis + 1 series per channel.
    Input,
    /// Output histories: time axis + 1 series per channel.
    Output,
}

impl MeshKind {
    /// All meshes in publish order.
    pub const ALL: [MeshKind; 4] = [
        MeshKind::Gain,
        MeshKind::Envelope,
        MeshKind::Input,
        MeshKind::Output,
    ];
}

struct SurgeSharedData {
    channels: usize,
    input_meters: Vec<AtomicU32>,
    output_meters: Vec<AtomicU32>,
    gain_meter: AtomicU32,
    envelope_meter: AtomicU32,
    activity: AtomicU32,
    latency: AtomicUsize,
    bypassing: AtomicBool,
    redraw: AtomicBool,
    gain_mesh: Mesh,
    envelope_mesh: Mesh,
    input_mesh: Mesh,
    output_mesh: Mesh,
}

/// Shared meters, meshes and notifications for one filter instance.
///
/// Cheap to clone; every clone refers to the same state.
#[derive(Clone)]
pub struct SurgeShared {
    inner: Arc<SurgeSharedData>,
}

impl core::fmt::Debug for SurgeShared {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("SurgeShared")
            .field("channels", &self.inner.channels)
            .field("latency", &self.latency())
            .field("gain_meter", &self.gain_meter())
            .finish_non_exhaustive()
    }
}

fn load_f32(a: &AtomicU32) -> f32 {
    f32::from_bits(a.load(Ordering::Acquire))
}

fn store_f32(a: &AtomicU32, value: f32) {
    a.store(value.to_bits(), Ordering::Release);
}

impl SurgeShared {
    /// Allocate meters and meshes for `channels` channels.
    pub fn new(channels: usize) -> Self {
        let meters = || (0..channels).map(|_| AtomicU32::new(0)).collect();
        Self {
            inner: Arc::new(SurgeSharedData {
                channels,
                input_meters: meters(),
                output_meters: meters(),
                gain_meter: AtomicU32::new(0),
                envelope_meter: AtomicU32::new(0),
                activity: AtomicU32::new(0),
                latency: AtomicUsize::new(0),
                bypassing: AtomicBool::new(false),
                redraw: AtomicBool::new(false),
                gain_mesh: Mesh::new(2, MESH_POINTS),
                envelope_mesh: Mesh::new(2, MESH_POINTS),
                input_mesh: Mesh::new(channels + 1, MESH_POINTS),
                output_mesh: Mesh::new(channels + 1, MESH_POINTS),
            }),
        }
    }

    /// Channel count the state was sized for.
    pub fn channels(&self) -> usize {
        self.inner.channels
    }

    /// Peak absolute input of `channel` over the last chunk (after input gain).
    pub fn input_meter(&self, channel: usize) -> f32 {
        self.inner.input_meters.get(channel).map_or(0.0, load_f32)
    }

    /// Peak absolute output of `channel` over the last chunk.
    pub fn output_meter(&self, channel: usize) -> f32 {
        self.inner.output_meters.get(channel).map_or(0.0, load_f32)
    }

    /// Smallest gain-control value of the last chunk.
    pub fn gain_meter(&self) -> f32 {
        load_f32(&self.inner.gain_meter)
    }

    /// Largest envelope value of the last chunk.
    pub fn envelope_meter(&self) -> f32 {
        load_f32(&self.inner.envelope_meter)
    }

    /// Activity indicator, `1.0` while lit.
    pub fn activity(&self) -> f32 {
        load_f32(&self.inner.activity)
    }

    /// Latency in samples last reported by the filter.
    pub fn latency(&self) -> usize {
        self.inner.latency.load(Ordering::Acquire)
    }

    /// Bypass target last applied by the filter.
    pub fn is_bypassing(&self) -> bool {
        self.inner.bypassing.load(Ordering::Acquire)
    }

    /// Display mesh of the given kind.
    pub fn mesh(&self, kind: MeshKind) -> &Mesh {
        match kind {
            MeshKind::Gain => &self.inner.gain_mesh,
            MeshKind::Envelope => &self.inner.envelope_mesh,
            MeshKind::Input => &self.inner.input_mesh,
            MeshKind::Output => &self.inner.output_mesh,
        }
    }

    /// Consume a pending redraw request.
    pub fn take_redraw_request(&self) -> bool {
        self.inner.redraw.swap(false, Ordering::AcqRel)
    }

    pub(crate) fn set_input_meter(&self, channel: usize, value: f32) {
        if let Some(a) = self.inner.input_meters.get(channel) {
            store_f32(a, value);
        }
    }

    pub(crate) fn set_output_meter(&self, channel: usize, value: f32) {
        if let Some(a) = self.inner.output_meters.get(channel) {
            store_f32(a, value);
        }
    }

    pub(crate) fn set_gain_meter(&self, value: f32) {
        store_f32(&self.inner.gain_meter, value);
    }

    pub(crate) fn set_envelope_meter(&self, value: f32) {
        store_f32(&self.inner.envelope_meter, value);
    }

    pub(crate) fn set_activity(&self, value: f32) {
        store_f32(&self.inner.activity, value);
    }

    pub(crate) fn set_latency(&self, samples: usize) {
        self.inner.latency.store(samples, Ordering::Release);
    }

    pub(crate) fn set_bypassing(&self, bypassing: bool) {
        self.inner.bypassing.store(bypassing, Ordering::Release);
    }

    pub(crate) fn request_redraw(&self) {
        self.inner.redraw.store(true, Ordering::Release);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn meshes_have_declared_shapes() {
        let shared = SurgeShared::new(2);
        assert_eq!(shared.mesh(MeshKind::Gain).rows(), 2);
        assert_eq!(shared.mesh(MeshKind::Envelope).rows(), 2);
        assert_eq!(shared.mesh(MeshKind::Input).rows(), 3);
        assert_eq!(shared.mesh(MeshKind::Output).rows(), 3);
        for kind in MeshKind::ALL {
            assert_eq!(shared.mesh(kind).row_len(), MESH_POINTS);
            assert!(shared.mesh(kind).is_empty());
        }
    }

    #[test]
    fn clones_share_state() {
        let a = SurgeShared::new(1);
        let b = a.clone();
        a.set_input_meter(0, 0.5);
        a.set_latency(42);
        assert_eq!(b.input_meter(0), 0.5);
        assert_eq!(b.latency(), 42);
        assert_eq!(b.input_meter(7), 0.0);
    }

    #[test]
    fn redraw_request_is_consumed_once() {
        let shared = SurgeShared::new(1);
        assert!(!shared.take_redraw_request());
        shared.request_redraw();
        shared.request_redraw();
        assert!(shared.take_redraw_request());
        assert!(!shared.take_redraw_request());
    }
}
