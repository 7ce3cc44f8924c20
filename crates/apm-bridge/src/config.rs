//! Processing configuration.
//!
//! A [`Config`] is an immutable, fully enumerated record. Applying a new
//! configuration replaces the previous one as a whole; there is no patching
//! of individual fields.

/// Top-level configuration for a processing instance.
///
/// All components are disabled (`None`) by default. Setting a component to
/// `Some(...)` enables it with the given parameters. The channel counts are
/// fixed at construction; later calls to `apply_config` ignore them.
///
/// # Example
///
/// ```
/// use apm_bridge::Config;
/// use apm_bridge::config::{EchoCanceller, NoiseSuppression, NoiseSuppressionLevel, StreamDelay};
///
/// let config = Config {
///     echo_canceller: Some(EchoCanceller {
///         stream_delay: StreamDelay::Fixed { ms: 50 },
///         ..Default::default()
///     }),
///     noise_suppression: Some(NoiseSuppression {
///         level: NoiseSuppressionLevel::High,
///     }),
///     ..Default::default()
/// };
/// assert_eq!(config.capture_channels, 1);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// Echo canceller settings. Set to `Some(...)` to enable.
    pub echo_canceller: Option<EchoCanceller>,
    /// Gain controller settings. Set to `Some(...)` to enable.
    pub gain_controller: Option<GainController>,
    /// Noise suppression settings. Set to `Some(...)` to enable.
    pub noise_suppression: Option<NoiseSuppression>,
    /// High-pass filter settings. Set to `Some(...)` to enable.
    pub high_pass_filter: Option<HighPassFilter>,
    /// Capture level adjustment settings. Set to `Some(...)` to enable.
    pub capture_level_adjustment: Option<CaptureLevelAdjustment>,
    /// Number of interleaved channels on the capture (near-end) path.
    pub capture_channels: u16,
    /// Number of interleaved channels on the render (far-end) path.
    pub render_channels: u16,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            echo_canceller: None,
            gain_controller: None,
            noise_suppression: None,
            high_pass_filter: None,
            capture_level_adjustment: None,
            capture_channels: 1,
            render_channels: 1,
        }
    }
}

/// Latency between the render and capture paths, as told to the echo
/// canceller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StreamDelay {
    /// Let the engine estimate the delay on its own.
    #[default]
    Agnostic,
    /// A fixed delay hint in milliseconds.
    Fixed { ms: i32 },
}

impl StreamDelay {
    /// The value forwarded to the engine's stream delay setter.
    ///
    /// Delay-agnostic mode is expressed as a zero hint.
    pub fn as_ms(self) -> i32 {
        match self {
            Self::Agnostic => 0,
            Self::Fixed { ms } => ms,
        }
    }
}

/// Echo canceller settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct EchoCanceller {
    /// Use the low-complexity mobile echo canceller.
    pub mobile_mode: bool,
    /// Initial render-to-capture delay hint.
    pub stream_delay: StreamDelay,
}

/// Gain controller settings.
///
/// Combines an adaptive digital gain, bounded by `headroom_db` and
/// `max_gain_db`, with a fixed digital gain applied before the limiter.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GainController {
    /// Enable the input volume controller, which recommends analog levels
    /// through `recommended_stream_analog_level`.
    pub input_volume_controller: bool,
    /// Headroom in dB (default: 5.0).
    pub headroom_db: f32,
    /// Maximum adaptive gain in dB (default: 50.0).
    pub max_gain_db: f32,
    /// Fixed digital gain in dB (default: 0.0).
    pub fixed_gain_db: f32,
}

impl Default for GainController {
    fn default() -> Self {
        Self {
            input_volume_controller: false,
            headroom_db: 5.0,
            max_gain_db: 50.0,
            fixed_gain_db: 0.0,
        }
    }
}

/// Background noise suppression settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct NoiseSuppression {
    /// Aggressiveness level (default: `Moderate`).
    pub level: NoiseSuppressionLevel,
}

/// Noise suppression aggressiveness level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NoiseSuppressionLevel {
    /// Low suppression (~6 dB).
    Low,
    /// Moderate suppression (~12 dB, default).
    #[default]
    Moderate,
    /// High suppression (~18 dB).
    High,
    /// Very high suppression (~21 dB).
    VeryHigh,
}

impl NoiseSuppressionLevel {
    /// Wire value shared by the engine and the C API (`0..=3`).
    pub fn as_i32(self) -> i32 {
        match self {
            Self::Low => 0,
            Self::Moderate => 1,
            Self::High => 2,
            Self::VeryHigh => 3,
        }
    }

    /// Parses a wire value, returning `None` outside `0..=3`.
    pub fn from_i32(value: i32) -> Option<Self> {
        match value {
            0 => Some(Self::Low),
            1 => Some(Self::Moderate),
            2 => Some(Self::High),
            3 => Some(Self::VeryHigh),
            _ => None,
        }
    }
}

/// High-pass filter settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HighPassFilter {
    /// When true, the filter operates on the full-band signal rather than
    /// only the split band (default: true).
    pub apply_in_full_band: bool,
}

impl Default for HighPassFilter {
    fn default() -> Self {
        Self {
            apply_in_full_band: true,
        }
    }
}

/// General level adjustment in the capture pipeline.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CaptureLevelAdjustment {
    /// Linear gain factor applied before any processing (default: 1.0).
    pub pre_gain_factor: f32,
    /// Linear gain factor applied after all processing (default: 1.0).
    pub post_gain_factor: f32,
    /// Analog mic gain emulation settings. Set to `Some(...)` to enable.
    pub analog_mic_gain_emulation: Option<AnalogMicGainEmulation>,
}

impl Default for CaptureLevelAdjustment {
    fn default() -> Self {
        Self {
            pre_gain_factor: 1.0,
            post_gain_factor: 1.0,
            analog_mic_gain_emulation: None,
        }
    }
}

/// Analog microphone gain emulation settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AnalogMicGainEmulation {
    /// Initial emulated analog gain level (default: 255).
    pub initial_level: u8,
}

impl Default for AnalogMicGainEmulation {
    fn default() -> Self {
        Self { initial_level: 255 }
    }
}
