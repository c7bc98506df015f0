//! Level, time and block-reduction helpers.
//!
//! All functions are allocation-free and `no_std` compatible.
//!
//! # Level Conversions
//!
//! - [`db_to_linear`] / [`linear_to_db`] - Convert between dB and linear gain
//! - [`GAIN_AMP_M_144_DB`] / [`GAIN_AMP_P_24_DB`] - Display bounds of the amplitude axis
//!
//! # Time Conversions
//!
//! - [`millis_to_samples`] / [`seconds_to_samples`] - Truncating conversions used
//!   for delay capacities and dot sizes
//!
//! # Block Reductions
//!
//! - [`abs_max`] / [`abs_min`] - Peak and worst-case attenuation of a chunk

use libm::{expf, logf};

/// Linear amplitude of -144 dB, the floor of the display axis.
pub const GAIN_AMP_M_144_DB: f32 = 6.309_573e-8;

/// Linear amplitude of +24 dB, the ceiling of the display axis and of the gain controls.
pub const GAIN_AMP_P_24_DB: f32 = 15.848_932;

/// Convert decibels to linear gain.
///
/// # Example
/// ```rust
/// use surge_core::db_to_linear;
///
/// assert!((db_to_linear(0.0) - 1.0).abs() < 0.001);
/// assert!((db_to_linear(-6.02) - 0.5).abs() < 0.01);
/// ```
#[inline]
pub fn db_to_linear(db: f32) -> f32 {
    const FACTOR: f32 = core::f32::consts::LN_10 / 20.0;
    expf(db * FACTOR)
}

/// Convert linear gain to decibels.
///
/// Values at or below `1e-10` are floored to keep the result finite.
///
/// # Example
/// ```rust
/// use surge_core::linear_to_db;
///
/// assert!((linear_to_db(1.0) - 0.0).abs() < 0.001);
/// assert!((linear_to_db(0.5) - (-6.02)).abs() < 0.01);
/// ```
#[inline]
pub fn linear_to_db(linear: f32) -> f32 {
    const FACTOR: f32 = 20.0 / core::f32::consts::LN_10;
    logf(linear.max(1e-10)) * FACTOR
}

/// Number of whole samples covering `ms` milliseconds at `sample_rate`.
///
/// Truncates toward zero; negative or non-finite inputs yield 0.
#[inline]
pub fn millis_to_samples(sample_rate: f32, ms: f32) -> usize {
    let samples = sample_rate * ms / 1000.0;
    if samples.is_finite() && samples > 0.0 {
        samples as usize
    } else {
        0
    }
}

/// Number of whole samples covering `seconds` at `sample_rate`.
///
/// Truncates toward zero; negative or non-finite inputs yield 0.
#[inline]
pub fn seconds_to_samples(sample_rate: f32, seconds: f32) -> usize {
    let samples = sample_rate * seconds;
    if samples.is_finite() && samples > 0.0 {
        samples as usize
    } else {
        0
    }
}

/// Largest absolute sample value in `buf`, or 0 for an empty slice.
#[inline]
pub fn abs_max(buf: &[f32]) -> f32 {
    buf.iter().fold(0.0_f32, |acc, &x| acc.max(x.abs()))
}

/// Smallest absolute sample value in `buf`, or 0 for an empty slice.
#[inline]
pub fn abs_min(buf: &[f32]) -> f32 {
    buf.iter()
        .map(|x| x.abs())
        .reduce(f32::min)
        .unwrap_or(0.0)
}
