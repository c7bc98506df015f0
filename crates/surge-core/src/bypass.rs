//! Click-free bypass crossfader.
//!
//! [`BypassCrossfader`] blends a dry signal and a processed (wet) signal with a
//! linear ramp. Toggling bypass never jumps: a new ramp starts from wherever
//! the blend currently is and lands on the new target after at most
//! [`BYPASS_RAMP_MS`] milliseconds.

use crate::math::millis_to_samples;

/// Length of a full dry/wet ramp in milliseconds.
pub const BYPASS_RAMP_MS: f32 = 5.0;

/// Dry/wet crossfader driven by a binary bypass target.
///
/// The blend position is `1.0` when fully processing and `0.0` when fully
/// bypassed. Once a ramp completes, output equals the selected input exactly.
///
/// # Example
///
/// ```rust
/// use surge_core::BypassCrossfader;
///
/// let mut bypass = BypassCrossfader::new(48000.0);
/// bypass.set_bypass(true);
///
/// let dry = [1.0; 480];
/// let wet = [0.0; 480];
/// let mut out = [0.0; 480];
/// bypass.process(&mut out, &dry, &wet);
/// assert!(bypass.bypassing());
/// assert_eq!(out[479], 1.0);
/// ```
#[derive(Debug, Clone)]
pub struct BypassCrossfader {
    /// Current blend position (0 = dry, 1 = wet)
    position: f32,
    /// Per-sample increment of the active ramp
    increment: f32,
    /// Samples left in the active ramp
    remaining: u32,
    /// Length of a full 0→1 ramp in samples
    ramp_samples: u32,
    /// Bypass target
    bypass: bool,
}

impl BypassCrossfader {
    /// Create a crossfader in the processing state.
    pub fn new(sample_rate: f32) -> Self {
        let mut fader = Self {
            position: 1.0,
            increment: 0.0,
            remaining: 0,
            ramp_samples: 0,
            bypass: false,
        };
        fader.set_sample_rate(sample_rate);
        fader
    }

    /// Recompute the ramp length. Any ramp in flight lands on its target.
    pub fn set_sample_rate(&mut self, sample_rate: f32) {
        self.ramp_samples = millis_to_samples(sample_rate, BYPASS_RAMP_MS) as u32;
        self.snap_to_target();
    }

    /// Select the bypass target.
    ///
    /// The ramp toward the new target starts from the current position and
    /// takes at most one full ramp length.
    pub fn set_bypass(&mut self, bypass: bool) {
        if bypass == self.bypass {
            return;
        }
        self.bypass = bypass;

        let target = self.target();
        if self.ramp_samples == 0 {
            self.snap_to_target();
            return;
        }
        let remaining = (libm::fabsf(target - self.position) * self.ramp_samples as f32) as u32;
        if remaining == 0 {
            self.snap_to_target();
        } else {
            self.increment = (target - self.position) / remaining as f32;
            self.remaining = remaining;
        }
    }

    /// Whether the bypass target is engaged (the ramp may still be running).
    #[inline]
    pub fn bypassing(&self) -> bool {
        self.bypass
    }

    /// Whether the blend has reached its target.
    #[inline]
    pub fn is_settled(&self) -> bool {
        self.remaining == 0
    }

    /// Current blend position (0 = dry, 1 = wet).
    #[inline]
    pub fn position(&self) -> f32 {
        self.position
    }

    /// Jump to the target immediately.
    pub fn snap_to_target(&mut self) {
        self.position = self.target();
        self.increment = 0.0;
        self.remaining = 0;
    }

    #[inline]
    fn target(&self) -> f32 {
        if self.bypass { 0.0 } else { 1.0 }
    }

    #[inline]
    fn advance(&mut self) -> f32 {
        if self.remaining > 0 {
            self.position += self.increment;
            self.remaining -= 1;
            if self.remaining == 0 {
                self.position = self.target();
            }
        }
        self.position
    }

    /// Blend `dry` and `wet` into `dst`.
    ///
    /// Processes `min` of the three lengths.
    pub fn process(&mut self, dst: &mut [f32], dry: &[f32], wet: &[f32]) {
        let n = dst.len().min(dry.len()).min(wet.len());
        dst[..n].copy_from_slice(&dry[..n]);
        self.process_inplace(&mut dst[..n], &wet[..n]);
    }

    /// Blend in place: `io` holds the dry signal on entry and the result on exit.
    pub fn process_inplace(&mut self, io: &mut [f32], wet: &[f32]) {
        let n = io.len().min(wet.len());
        if self.remaining == 0 {
            if !self.bypass {
                io[..n].copy_from_slice(&wet[..n]);
            }
            return;
        }
        for (out, &w) in io[..n].iter_mut().zip(wet) {
            let g = self.advance();
            *out = *out * (1.0 - g) + w * g;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SR: f32 = 48000.0;

    #[test]
    fn processing_state_passes_wet_exactly() {
        let mut fader = BypassCrossfader::new(SR);
        let mut io = [0.3, 0.3, 0.3];
        fader.process_inplace(&mut io, &[0.1, -0.2, 0.7]);
        assert_eq!(io, [0.1, -0.2, 0.7]);
    }

    #[test]
    fn bypass_converges_within_one_ramp() {
        let mut fader = BypassCrossfader::new(SR);
        fader.set_bypass(true);
        let ramp = millis_to_samples(SR, BYPASS_RAMP_MS);
        let dry = vec![0.5; ramp];
        let wet = vec![-0.5; ramp];
        let mut out = vec![0.0; ramp];
        fader.process(&mut out, &dry, &wet);
        assert!(fader.is_settled());
        assert_eq!(out[ramp - 1], 0.5);
        // Midway through the ramp the blend is between the two inputs.
        assert!(out[ramp / 2].abs() < 0.05, "got {}", out[ramp / 2]);
    }

    #[test]
    fn reversal_starts_from_current_position() {
        let mut fader = BypassCrossfader::new(SR);
        fader.set_bypass(true);
        let mut io = vec![0.0; 60];
        fader.process_inplace(&mut io, &[1.0; 60]);
        let mid = fader.position();
        assert!(mid > 0.0 && mid < 1.0);

        fader.set_bypass(false);
        let mut io = [0.0; 1];
        fader.process_inplace(&mut io, &[1.0]);
        assert!(fader.position() > mid, "ramp reversed from {mid}");
        assert!((fader.position() - mid) < 0.01, "no jump");
    }

    #[test]
    fn toggle_without_audio_is_a_no_op() {
        let mut fader = BypassCrossfader::new(SR);
        fader.set_bypass(true);
        fader.set_bypass(false);
        assert!(fader.is_settled());
        assert_eq!(fader.position(), 1.0);
    }
}
