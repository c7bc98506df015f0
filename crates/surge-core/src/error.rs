//! Construction errors for the surge filter.
//!
//! Block processing has no error path. The only failures happen while a
//! [`SurgeFilter`](crate::SurgeFilter) is being built: an unsupported channel
//! count, or the shared working buffers could not be reserved.

/// Errors raised while constructing a surge filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SurgeError {
    /// The channel count is outside `1..=MAX_CHANNELS`.
    UnsupportedChannels(usize),
    /// The working buffers could not be reserved (requested sample count).
    Allocation(usize),
}

impl core::fmt::Display for SurgeError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::UnsupportedChannels(n) => write!(
                f,
                "unsupported channel count {n} (expected 1..={})",
                crate::MAX_CHANNELS
            ),
            Self::Allocation(n) => write!(f, "failed to reserve {n} samples of working memory"),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for SurgeError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[cfg(not(feature = "std"))]
    use alloc::string::ToString;

    #[test]
    fn display_names_the_bad_channel_count() {
        let msg = SurgeError::UnsupportedChannels(3).to_string();
        assert!(msg.contains("unsupported channel count 3"), "got: {msg}");
        assert!(msg.contains("1..=2"), "got: {msg}");
    }

    #[test]
    fn display_reports_requested_size() {
        let msg = SurgeError::Allocation(16384).to_string();
        assert_eq!(msg, "failed to reserve 16384 samples of working memory");
    }
}
