//! Rolling history of per-dot signal summaries.
//!
//! A [`MeterGraph`] turns a continuous sample stream into a fixed-length
//! series of "dots". Every `samples_per_dot` samples are reduced to one value
//! with a [`MeterMethod`], and the oldest dot drops off the front.
//!
//! The history lives in a buffer twice the point count long: each committed
//! dot is written to two mirrored slots, so [`MeterGraph::data`] is always one
//! contiguous oldest-to-newest slice and never needs a copy.

#[cfg(not(feature = "std"))]
use alloc::vec;
#[cfg(not(feature = "std"))]
use alloc::vec::Vec;

use crate::arena::try_zeroed;
use crate::error::SurgeError;

/// Reduction applied to the samples of one dot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MeterMethod {
    /// Largest signed value.
    Maximum,
    /// Smallest signed value.
    Minimum,
    /// Largest absolute value.
    #[default]
    AbsMaximum,
    /// Smallest absolute value.
    AbsMinimum,
}

impl MeterMethod {
    #[inline]
    fn reduce(self, acc: f32, x: f32) -> f32 {
        match self {
            Self::Maximum => acc.max(x),
            Self::Minimum => acc.min(x),
            Self::AbsMaximum => acc.max(x.abs()),
            Self::AbsMinimum => acc.min(x.abs()),
        }
    }

    #[inline]
    fn seed(self, x: f32) -> f32 {
        match self {
            Self::Maximum | Self::Minimum => x,
            Self::AbsMaximum | Self::AbsMinimum => x.abs(),
        }
    }
}

/// Fixed-length rolling history, one summary value per dot.
///
/// # Example
///
/// ```rust
/// use surge_core::{MeterGraph, MeterMethod};
///
/// let mut graph = MeterGraph::new(MeterMethod::AbsMaximum);
/// graph.init(4, 2);
/// graph.process(&[0.1, -0.5, 0.2, 0.3, 0.9]);
///
/// // Two dots committed, the fifth sample is still accumulating.
/// assert_eq!(graph.data(), &[0.0, 0.0, 0.5, 0.3]);
/// ```
#[derive(Debug, Clone)]
pub struct MeterGraph {
    method: MeterMethod,
    /// Mirrored ring, `2 * points` long.
    history: Vec<f32>,
    points: usize,
    /// Ring index of the oldest dot.
    head: usize,
    samples_per_dot: usize,
    /// Samples folded into the current dot so far.
    count: usize,
    /// Running reduction of the current dot.
    current: f32,
}

impl MeterGraph {
    /// Create an empty graph. Call [`init`](Self::init) before processing.
    pub fn new(method: MeterMethod) -> Self {
        Self {
            method,
            history: Vec::new(),
            points: 0,
            head: 0,
            samples_per_dot: 1,
            count: 0,
            current: 0.0,
        }
    }

    /// Allocate the history and fix both dimensions. The history starts at zero.
    ///
    /// `samples_per_dot` of zero is treated as one.
    pub fn init(&mut self, points: usize, samples_per_dot: usize) {
        self.reset_dims(vec![0.0; points * 2], points, samples_per_dot);
    }

    /// Like [`init`](Self::init), but reports a failed allocation instead of
    /// aborting. On error the graph keeps its previous history.
    pub fn try_init(&mut self, points: usize, samples_per_dot: usize) -> Result<(), SurgeError> {
        let len = points
            .checked_mul(2)
            .ok_or(SurgeError::Allocation(usize::MAX))?;
        self.reset_dims(try_zeroed(len)?, points, samples_per_dot);
        Ok(())
    }

    fn reset_dims(&mut self, history: Vec<f32>, points: usize, samples_per_dot: usize) {
        self.history = history;
        self.points = points;
        self.head = 0;
        self.samples_per_dot = samples_per_dot.max(1);
        self.count = 0;
        self.current = 0.0;
    }

    /// Change the reduction. Takes effect from the next dot.
    pub fn set_method(&mut self, method: MeterMethod) {
        self.method = method;
    }

    /// Current reduction.
    pub fn method(&self) -> MeterMethod {
        self.method
    }

    /// Number of dots in the history.
    pub fn points(&self) -> usize {
        self.points
    }

    /// Samples reduced into each dot.
    pub fn samples_per_dot(&self) -> usize {
        self.samples_per_dot
    }

    /// Fold `buf` into the history, committing a dot every `samples_per_dot` samples.
    ///
    /// A partially filled dot carries over to the next call.
    pub fn process(&mut self, buf: &[f32]) {
        if self.points == 0 {
            return;
        }
        let mut rest = buf;
        while !rest.is_empty() {
            let take = (self.samples_per_dot - self.count).min(rest.len());
            let (now, later) = rest.split_at(take);
            for &x in now {
                self.current = if self.count == 0 {
                    self.method.seed(x)
                } else {
                    self.method.reduce(self.current, x)
                };
                self.count += 1;
            }
            if self.count == self.samples_per_dot {
                self.commit();
            }
            rest = later;
        }
    }

    fn commit(&mut self) {
        let value = self.current;
        self.history[self.head] = value;
        self.history[self.head + self.points] = value;
        self.head = (self.head + 1) % self.points;
        self.count = 0;
    }

    /// Ordered history, oldest dot first, newest last.
    #[inline]
    pub fn data(&self) -> &[f32] {
        &self.history[self.head..self.head + self.points]
    }

    /// Zero the history and drop the partial dot.
    pub fn clear(&mut self) {
        self.history.fill(0.0);
        self.head = 0;
        self.count = 0;
        self.current = 0.0;
    }
}
