//! Control-signal derivation.
//!
//! The gate's envelope detector is fed one control signal per chunk, built
//! from the gained channel buffers:
//!
//! | Channels | `control[i]` |
//! |----------|--------------|
//! | 1 | `x[i] * x[i]` |
//! | 2+ | the channel sample with the largest magnitude, sign kept |
//!
//! On equal magnitudes the earlier channel wins.

/// Build the control signal from `channels` into `control`.
///
/// Processes `control.len()` samples; every channel must be at least that
/// long. An empty channel set leaves `control` zeroed.
///
/// # Example
///
/// ```rust
/// use surge_core::derive_control;
///
/// let mut control = [0.0; 3];
/// derive_control(&mut control, [&[0.5_f32, -0.25, 0.0][..]]);
/// assert_eq!(control, [0.25, 0.0625, 0.0]);
///
/// derive_control(&mut control, [&[0.5_f32, -0.3, 0.2][..], &[-0.5, 0.1, -0.4][..]]);
/// assert_eq!(control, [0.5, -0.3, -0.4]);
/// ```
pub fn derive_control<'a, I>(control: &mut [f32], channels: I)
where
    I: IntoIterator<Item = &'a [f32]>,
    I::IntoIter: ExactSizeIterator,
{
    let mut channels = channels.into_iter();
    let count = channels.len();
    let Some(first) = channels.next() else {
        control.fill(0.0);
        return;
    };

    let n = control.len();
    if count == 1 {
        for (c, &x) in control.iter_mut().zip(&first[..n]) {
            *c = x * x;
        }
        return;
    }

    control.copy_from_slice(&first[..n]);
    for channel in channels {
        for (c, &x) in control.iter_mut().zip(&channel[..n]) {
            if x.abs() > c.abs() {
                *c = x;
            }
        }
    }
}
