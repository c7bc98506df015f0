//! Fade/gate decision engine contract.
//!
//! The pipeline never looks inside the gate. It hands over one control chunk
//! at a time and reads back a gain-control chunk plus the envelope used to
//! reach that decision. Alternative algorithms plug in by implementing
//! [`SurgeGate`]; [`Depopper`] is the default.
//!
//! # Lifecycle
//!
//! 1. [`SurgeGate::set_sample_rate`] - allocate state for the worst-case
//!    configuration; the only call allowed to allocate
//! 2. [`SurgeGate::configure`] + [`SurgeGate::reconfigure`] - on every
//!    settings update
//! 3. [`SurgeGate::latency`] - read back after each reconfiguration and
//!    mirrored on both delay lines of every channel
//! 4. [`SurgeGate::process`] - once per chunk on the audio thread

mod depopper;

use crate::error::SurgeError;

pub use depopper::{Depopper, FADE_IN_MAX_MS, FADE_OUT_MAX_MS, PAUSE_MAX_MS, RMS_MAX_MS, RMS_MIN_MS};

/// Shape of a fade curve.
///
/// Every curve maps `0.0..=1.0` progress onto `0.0..=1.0` gain, starting at
/// 0 and ending at 1. Fade-outs run the same curve backwards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
pub enum FadeMode {
    /// Straight line.
    Linear,
    /// Cubic smoothstep, flat at both ends.
    Cubic,
    /// Quarter sine.
    Sine,
    /// Rising half of a normalized Gaussian bell.
    #[default]
    Gaussian,
    /// Square law, slow start.
    Parabolic,
}

impl FadeMode {
    /// All modes in index order.
    pub const ALL: [FadeMode; 5] = [
        FadeMode::Linear,
        FadeMode::Cubic,
        FadeMode::Sine,
        FadeMode::Gaussian,
        FadeMode::Parabolic,
    ];

    /// Display names in index order.
    pub const NAMES: &'static [&'static str] = &["Linear", "Cubic", "Sine", "Gaussian", "Parabolic"];

    /// Mode for a stored index. Out-of-range indices clamp to the last mode.
    pub fn from_index(index: usize) -> Self {
        Self::ALL[index.min(Self::ALL.len() - 1)]
    }

    /// Stored index of this mode.
    pub fn index(self) -> usize {
        self as usize
    }

    /// Display name.
    pub fn name(self) -> &'static str {
        Self::NAMES[self.index()]
    }

    /// Gain for fade progress `x`, clamped to `0.0..=1.0`.
    #[inline]
    pub fn curve(self, x: f32) -> f32 {
        // Bell sharpness: sigma = 0.25 of the fade.
        const GAUSS_K: f32 = 8.0;

        let x = x.clamp(0.0, 1.0);
        match self {
            Self::Linear => x,
            Self::Cubic => x * x * (3.0 - 2.0 * x),
            Self::Sine => libm::sinf(core::f32::consts::FRAC_PI_2 * x),
            Self::Gaussian => {
                let floor = libm::expf(-GAUSS_K);
                let d = 1.0 - x;
                (libm::expf(-GAUSS_K * d * d) - floor) / (1.0 - floor)
            }
            Self::Parabolic => x * x,
        }
    }
}

/// One direction of fading: when it triggers, how long it takes, and how
/// long it must run before the opposite transition may cancel it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FadeConfig {
    /// Curve shape.
    pub mode: FadeMode,
    /// Envelope threshold, linear amplitude.
    pub threshold: f32,
    /// Fade duration in milliseconds.
    pub time_ms: f32,
    /// Cancel delay in milliseconds.
    pub delay_ms: f32,
}

/// Complete gate configuration.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GateConfig {
    /// Silence-to-signal transition.
    pub fade_in: FadeConfig,
    /// Signal-to-silence transition.
    pub fade_out: FadeConfig,
    /// RMS estimation window in milliseconds.
    pub rms_ms: f32,
}

impl Default for GateConfig {
    fn default() -> Self {
        let threshold = crate::db_to_linear(-72.0);
        Self {
            fade_in: FadeConfig {
                mode: FadeMode::Gaussian,
                threshold,
                time_ms: 100.0,
                delay_ms: 10.0,
            },
            fade_out: FadeConfig {
                mode: FadeMode::Gaussian,
                threshold,
                time_ms: 0.0,
                delay_ms: 10.0,
            },
            rms_ms: 10.0,
        }
    }
}

/// Envelope → gain-control transform with a fixed reported latency.
///
/// `process` must be real-time safe: no allocation, no locking, no blocking.
/// Output must depend only on the sample sequence, never on how it was split
/// into chunks.
pub trait SurgeGate {
    /// Prepare for `sample_rate`, sizing buffers for the worst-case configuration.
    ///
    /// # Errors
    ///
    /// [`SurgeError::Allocation`] when those buffers cannot be reserved. The
    /// pipeline then stops using the gate.
    fn set_sample_rate(&mut self, sample_rate: f32) -> Result<(), SurgeError>;

    /// Store a new configuration. Takes effect at [`reconfigure`](Self::reconfigure).
    fn configure(&mut self, config: &GateConfig);

    /// Recompute internal coefficients and the latency from the stored configuration.
    fn reconfigure(&mut self);

    /// Added latency in samples. Never exceeds [`max_latency`](Self::max_latency).
    fn latency(&self) -> usize;

    /// Largest latency any configuration can report at the current sample rate.
    fn max_latency(&self) -> usize;

    /// Turn `control` into gain-control values in place and write the envelope.
    ///
    /// Both slices have the same length.
    fn process(&mut self, envelope: &mut [f32], control: &mut [f32]);

    /// Return to the closed state with empty history.
    fn reset(&mut self);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn curves_span_zero_to_one() {
        for mode in FadeMode::ALL {
            assert!(mode.curve(0.0).abs() < 1e-6, "{mode:?} at 0");
            assert!((mode.curve(1.0) - 1.0).abs() < 1e-6, "{mode:?} at 1");
        }
    }

    #[test]
    fn curves_are_monotonic() {
        for mode in FadeMode::ALL {
            let mut prev = mode.curve(0.0);
            for i in 1..=100 {
                let y = mode.curve(i as f32 / 100.0);
                assert!(y >= prev, "{mode:?} decreased at step {i}");
                prev = y;
            }
        }
    }

    #[test]
    fn curve_clamps_progress() {
        assert_eq!(FadeMode::Linear.curve(-1.0), 0.0);
        assert_eq!(FadeMode::Linear.curve(2.0), 1.0);
    }

    #[test]
    fn mode_indices() {
        assert_eq!(FadeMode::default().index(), 3);
        assert_eq!(FadeMode::from_index(1), FadeMode::Cubic);
        assert_eq!(FadeMode::from_index(99), FadeMode::Parabolic);
        assert_eq!(FadeMode::Sine.name(), "Sine");
    }
}
