//! Latency-compensation delay line.
//!
//! [`DelayLine`] is a fixed-capacity circular buffer whose length can be
//! changed at configuration time without reallocating. Each channel of the
//! surge filter owns two of them, one on the processed (wet) path and one on
//! the bypass (dry) path, both set to the gate latency.
//!
//! # Memory
//!
//! Storage is allocated once by [`DelayLine::new`] or, without aborting on
//! failure, by [`DelayLine::try_new`]. Processing and
//! [`set_delay`](DelayLine::set_delay) never allocate.

#[cfg(not(feature = "std"))]
use alloc::vec;
#[cfg(not(feature = "std"))]
use alloc::vec::Vec;

use crate::arena::try_zeroed;
use crate::error::SurgeError;

/// Single-tap integer delay with a fixed maximum length.
///
/// Samples leave the line in exactly the order they entered (FIFO), `delay`
/// samples later. A delay of zero passes samples straight through.
///
/// # Example
///
/// ```rust
/// use surge_core::DelayLine;
///
/// let mut line = DelayLine::new(4);
/// line.set_delay(2);
///
/// let mut out = [0.0; 4];
/// line.process(&mut out, &[1.0, 2.0, 3.0, 4.0]);
/// assert_eq!(out, [0.0, 0.0, 1.0, 2.0]);
/// ```
#[derive(Debug, Clone)]
pub struct DelayLine {
    /// Ring storage, one slot longer than the capacity so the longest delay
    /// can be read after the incoming sample is written.
    buffer: Vec<f32>,
    /// Next write position.
    head: usize,
    /// Current delay in samples, `<= capacity`.
    delay: usize,
}

impl DelayLine {
    /// Create a delay line able to hold up to `capacity` samples of delay.
    pub fn new(capacity: usize) -> Self {
        Self {
            buffer: vec![0.0; capacity + 1],
            head: 0,
            delay: 0,
        }
    }

    /// Like [`new`](Self::new), but reports a failed allocation instead of
    /// aborting.
    ///
    /// ```rust
    /// use surge_core::{DelayLine, SurgeError};
    ///
    /// assert_eq!(DelayLine::try_new(480).unwrap().capacity(), 480);
    /// assert!(matches!(DelayLine::try_new(usize::MAX), Err(SurgeError::Allocation(_))));
    /// ```
    pub fn try_new(capacity: usize) -> Result<Self, SurgeError> {
        let len = capacity
            .checked_add(1)
            .ok_or(SurgeError::Allocation(usize::MAX))?;
        Ok(Self {
            buffer: try_zeroed(len)?,
            head: 0,
            delay: 0,
        })
    }

    /// Maximum delay in samples.
    pub fn capacity(&self) -> usize {
        self.buffer.len() - 1
    }

    /// Current delay in samples.
    pub fn delay(&self) -> usize {
        self.delay
    }

    /// Set the delay length, clamped to [`capacity`](Self::capacity).
    ///
    /// Configuration-time operation: call between blocks, never mid-chunk.
    pub fn set_delay(&mut self, delay: usize) {
        self.delay = delay.min(self.capacity());
    }

    /// Push one sample and return the sample that entered `delay` pushes ago.
    #[inline]
    pub fn process_sample(&mut self, input: f32) -> f32 {
        let len = self.buffer.len();
        self.buffer[self.head] = input;
        let tap = (self.head + len - self.delay) % len;
        let out = self.buffer[tap];
        self.head = (self.head + 1) % len;
        out
    }

    /// Delay `src` into `dst`. Processes `min(dst.len(), src.len())` samples.
    #[inline]
    pub fn process(&mut self, dst: &mut [f32], src: &[f32]) {
        for (out, &input) in dst.iter_mut().zip(src) {
            *out = self.process_sample(input);
        }
    }

    /// Delay `buf` in place.
    #[inline]
    pub fn process_inplace(&mut self, buf: &mut [f32]) {
        for sample in buf.iter_mut() {
            *sample = self.process_sample(*sample);
        }
    }

    /// Clear stored history to silence. The delay length is kept.
    pub fn clear(&mut self) {
        self.buffer.fill(0.0);
        self.head = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_delay_is_identity() {
        let mut line = DelayLine::new(8);
        let mut buf = [0.1, -0.2, 0.3];
        line.process_inplace(&mut buf);
        assert_eq!(buf, [0.1, -0.2, 0.3]);
    }

    #[test]
    fn full_capacity_delay() {
        let mut line = DelayLine::new(3);
        line.set_delay(3);
        let mut out = [0.0; 6];
        line.process(&mut out, &[1.0, 2.0, 3.0, 4.0, 5.0, 6.0]);
        assert_eq!(out, [0.0, 0.0, 0.0, 1.0, 2.0, 3.0]);
    }

    #[test]
    fn delay_is_clamped_to_capacity() {
        let mut line = DelayLine::new(5);
        line.set_delay(100);
        assert_eq!(line.delay(), 5);
        assert_eq!(line.capacity(), 5);
    }

    #[test]
    fn split_calls_match_single_call() {
        let input: Vec<f32> = (0..50).map(|i| i as f32).collect();

        let mut whole = DelayLine::new(16);
        whole.set_delay(7);
        let mut expected = vec![0.0; input.len()];
        whole.process(&mut expected, &input);

        let mut split = DelayLine::new(16);
        split.set_delay(7);
        let mut actual = input.clone();
        let (a, b) = actual.split_at_mut(13);
        split.process_inplace(a);
        split.process_inplace(b);

        assert_eq!(actual, expected);
    }

    #[test]
    fn clear_silences_history() {
        let mut line = DelayLine::new(4);
        line.set_delay(2);
        line.process_inplace(&mut [1.0, 1.0, 1.0]);
        line.clear();
        let mut buf = [0.0; 2];
        line.process_inplace(&mut buf);
        assert_eq!(buf, [0.0, 0.0]);
    }

    #[test]
    fn try_new_reports_oversized_capacity() {
        assert!(matches!(
            DelayLine::try_new(usize::MAX / 16),
            Err(SurgeError::Allocation(_))
        ));
        let mut line = DelayLine::try_new(2).unwrap();
        line.set_delay(2);
        let mut out = [0.0; 3];
        line.process(&mut out, &[1.0, 2.0, 3.0]);
        assert_eq!(out, [0.0, 0.0, 1.0]);
    }
}
