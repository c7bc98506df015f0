//! Activity indicator with hold time.

use crate::math::millis_to_samples;

/// How long the indicator stays lit after the last trigger.
pub const BLINK_HOLD_MS: f32 = 100.0;

/// Activity indicator that stays lit for a hold time after each trigger.
///
/// The audio path calls [`blink`](Self::blink) whenever the gate passes
/// signal and [`advance`](Self::advance) once per chunk; UIs read
/// [`value`](Self::value).
#[derive(Debug, Clone, Default)]
pub struct Blink {
    hold: usize,
    counter: usize,
}

impl Blink {
    /// Create an unlit indicator with the hold time derived from `sample_rate`.
    pub fn new(sample_rate: f32) -> Self {
        Self {
            hold: millis_to_samples(sample_rate, BLINK_HOLD_MS),
            counter: 0,
        }
    }

    /// Recompute the hold time and turn the indicator off.
    pub fn set_sample_rate(&mut self, sample_rate: f32) {
        self.hold = millis_to_samples(sample_rate, BLINK_HOLD_MS);
        self.counter = 0;
    }

    /// Light the indicator for a full hold period.
    #[inline]
    pub fn blink(&mut self) {
        self.counter = self.hold;
    }

    /// Count `samples` of elapsed time.
    #[inline]
    pub fn advance(&mut self, samples: usize) {
        self.counter = self.counter.saturating_sub(samples);
    }

    /// `1.0` while lit, `0.0` otherwise.
    #[inline]
    pub fn value(&self) -> f32 {
        if self.counter > 0 { 1.0 } else { 0.0 }
    }
}
