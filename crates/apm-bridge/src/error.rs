//! Error taxonomy shared by the handle, the processor, and the C API.

/// Signed status codes used at the C boundary.
///
/// `0` is success, negative values are failures. Engine-reported codes that
/// are not listed here are passed through unchanged.
pub mod code {
    /// Operation succeeded.
    pub const OK: i32 = 0;
    /// Null or closed handle.
    pub const CLOSED: i32 = -1;
    /// Internal error (panic caught at the FFI boundary).
    pub const INTERNAL: i32 = -2;
    /// Bad number of channels, at construction or on a frame call.
    pub const BAD_NUMBER_CHANNELS: i32 = -4;
    /// Frame buffer length does not match the channel count.
    pub const BAD_DATA_LENGTH: i32 = -6;
}

/// A non-zero status reported by the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EngineError {
    code: i32,
}

impl EngineError {
    /// Wrap a raw engine status code.
    pub const fn new(code: i32) -> Self {
        Self { code }
    }

    /// The raw engine status code.
    pub const fn code(self) -> i32 {
        self.code
    }
}

impl std::fmt::Display for EngineError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "engine error code {}", self.code)
    }
}

impl std::error::Error for EngineError {}

/// Errors returned by [`Handle`](crate::Handle) and
/// [`Processor`](crate::Processor) operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// A channel count given at construction was zero.
    InvalidChannels { capture: u16, render: u16 },
    /// The engine refused to construct or initialize with the configuration.
    Create { code: i32 },
    /// The handle has been destroyed.
    Closed,
    /// The frame buffer does not hold exactly `channels × 480` samples.
    LengthMismatch { expected: usize, actual: usize },
    /// The declared channel count differs from the one fixed at construction.
    ChannelMismatch { expected: usize, actual: usize },
    /// The engine reported a failure while processing a frame, applying a
    /// configuration or re-initializing.
    Engine { code: i32 },
}

impl Error {
    /// The signed status code for this error at the C boundary.
    pub fn code(&self) -> i32 {
        match *self {
            Self::InvalidChannels { .. } | Self::ChannelMismatch { .. } => {
                code::BAD_NUMBER_CHANNELS
            }
            Self::Create { code } | Self::Engine { code } => code,
            Self::Closed => code::CLOSED,
            Self::LengthMismatch { .. } => code::BAD_DATA_LENGTH,
        }
    }
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match *self {
            Self::InvalidChannels { capture, render } => write!(
                f,
                "channel counts must be positive (capture {capture}, render {render})"
            ),
            Self::Create { code } => {
                write!(f, "failed to create audio processor: error code {code}")
            }
            Self::Closed => write!(f, "processor is closed"),
            Self::LengthMismatch { expected, actual } => {
                write!(f, "expected {expected} samples, got {actual}")
            }
            Self::ChannelMismatch { expected, actual } => {
                write!(f, "expected {expected} channels, got {actual}")
            }
            Self::Engine { code } => write!(f, "engine error: code {code}"),
        }
    }
}

impl std::error::Error for Error {}

impl From<EngineError> for Error {
    fn from(err: EngineError) -> Self {
        Self::Engine { code: err.code() }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codes_are_negative() {
        let errors = [
            Error::InvalidChannels {
                capture: 0,
                render: 1,
            },
            Error::Create { code: -3 },
            Error::Closed,
            Error::LengthMismatch {
                expected: 480,
                actual: 479,
            },
            Error::ChannelMismatch {
                expected: 1,
                actual: 2,
            },
            Error::Engine { code: -5 },
        ];
        for err in errors {
            assert!(err.code() < code::OK, "{err} has code {}", err.code());
        }
    }

    #[test]
    fn engine_codes_pass_through() {
        assert_eq!(Error::from(EngineError::new(-11)).code(), -11);
        assert_eq!(Error::Create { code: -9 }.code(), -9);
    }

    #[test]
    fn display_names_the_mismatch() {
        let msg = Error::LengthMismatch {
            expected: 960,
            actual: 480,
        }
        .to_string();
        assert_eq!(msg, "expected 960 samples, got 480");
    }
}
