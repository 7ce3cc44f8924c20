//! Frame geometry at the fixed processing rate.

use std::num::NonZeroU16;

/// Processing sample rate in Hz. Not configurable.
pub const SAMPLE_RATE_HZ: u32 = 48_000;
/// Frame duration in milliseconds. Not configurable.
pub const FRAME_MS: u32 = 10;
/// Samples per channel in one frame.
pub const SAMPLES_PER_FRAME: usize = (SAMPLE_RATE_HZ * FRAME_MS / 1000) as usize;

/// Number of interleaved samples in one frame of `num_channels` channels.
#[inline]
pub const fn frame_len(num_channels: usize) -> usize {
    num_channels * SAMPLES_PER_FRAME
}

/// Error returned when creating a [`StreamConfig`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StreamConfigError {
    /// A stream must carry at least one channel.
    ZeroChannels,
}

impl std::fmt::Display for StreamConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::ZeroChannels => write!(f, "a stream needs at least one channel"),
        }
    }
}

impl std::error::Error for StreamConfigError {}

/// Validated stream format: a non-zero channel count at [`SAMPLE_RATE_HZ`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StreamConfig {
    num_channels: NonZeroU16,
}

impl StreamConfig {
    /// Create a stream configuration with a known non-zero channel count.
    pub const fn new(num_channels: NonZeroU16) -> Self {
        Self { num_channels }
    }

    /// Create a stream configuration, rejecting zero channels.
    pub fn from_channels(num_channels: u16) -> Result<Self, StreamConfigError> {
        NonZeroU16::new(num_channels)
            .map(Self::new)
            .ok_or(StreamConfigError::ZeroChannels)
    }

    /// The sampling rate in Hz.
    #[inline]
    pub const fn sample_rate_hz(&self) -> u32 {
        SAMPLE_RATE_HZ
    }

    /// The number of channels.
    #[inline]
    pub const fn num_channels(&self) -> usize {
        self.num_channels.get() as usize
    }

    /// The number of samples per channel in one frame.
    #[inline]
    pub const fn num_frames(&self) -> usize {
        SAMPLES_PER_FRAME
    }

    /// Total number of interleaved samples (channels × frames).
    #[inline]
    pub const fn num_samples(&self) -> usize {
        frame_len(self.num_channels())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fixed_parameters() {
        assert_eq!(SAMPLE_RATE_HZ, 48_000);
        assert_eq!(FRAME_MS, 10);
        assert_eq!(SAMPLES_PER_FRAME, 480);
        assert_eq!(frame_len(2), 960);
    }

    #[test]
    fn rejects_zero_channels() {
        assert_eq!(
            StreamConfig::from_channels(0),
            Err(StreamConfigError::ZeroChannels)
        );
    }

    #[test]
    fn accepts_valid_values() {
        let stream = StreamConfig::from_channels(2).unwrap();
        assert_eq!(stream.sample_rate_hz(), 48_000);
        assert_eq!(stream.num_channels(), 2);
        assert_eq!(stream.num_frames(), 480);
        assert_eq!(stream.num_samples(), 960);
    }
}
