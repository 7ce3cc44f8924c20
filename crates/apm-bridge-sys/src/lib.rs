//! Raw bindings to the `wap_*` C ABI of a native audio processing engine.
//!
//! The engine library (`libwap_audio_processing`) provides echo cancellation,
//! noise suppression, gain control and high-pass filtering behind an opaque
//! handle. Nothing here is safe to call directly; use the `apm-bridge` crate.
//!
//! # Status codes
//!
//! Every fallible entry point returns a [`WapStatus`]: `0` on success and a
//! negative value on failure. The named codes below are the ones the engine
//! documents; it may return others.

use std::ffi::{c_char, c_int};
use std::fmt;
use std::marker::{PhantomData, PhantomPinned};

/// Signed status code returned by engine entry points.
pub type WapStatus = c_int;

/// Operation succeeded.
pub const WAP_OK: WapStatus = 0;
/// Null pointer passed to a function that requires non-null.
pub const WAP_ERROR_NULL_POINTER: WapStatus = -1;
/// Internal engine error.
pub const WAP_ERROR_INTERNAL: WapStatus = -2;
/// Unsupported sample rate.
pub const WAP_ERROR_BAD_SAMPLE_RATE: WapStatus = -3;
/// Unsupported or mismatched number of channels.
pub const WAP_ERROR_BAD_NUMBER_CHANNELS: WapStatus = -4;
/// A stream parameter was out of range and was clamped.
pub const WAP_ERROR_BAD_STREAM_PARAMETER: WapStatus = -5;
/// Sample buffer length does not match the stream configuration.
pub const WAP_ERROR_BAD_DATA_LENGTH: WapStatus = -6;

/// Opaque engine instance.
#[repr(C)]
pub struct WapAudioProcessing {
    _data: [u8; 0],
    _marker: PhantomData<(*mut u8, PhantomPinned)>,
}

impl fmt::Debug for WapAudioProcessing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WapAudioProcessing").finish_non_exhaustive()
    }
}

/// Noise suppression aggressiveness level.
#[repr(i32)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WapNoiseSuppressionLevel {
    Low = 0,
    Moderate = 1,
    High = 2,
    VeryHigh = 3,
}

/// Flat engine configuration.
///
/// Disabled groups still carry their parameter fields; the engine ignores
/// them.
#[repr(C)]
#[derive(Debug, Clone, Copy)]
pub struct WapConfig {
    // -- Capture level adjustment --
    pub capture_level_adjustment_enabled: bool,
    pub capture_level_adjustment_pre_gain_factor: f32,
    pub capture_level_adjustment_post_gain_factor: f32,
    pub analog_mic_gain_emulation_enabled: bool,
    pub analog_mic_gain_emulation_initial_level: c_int,

    // -- High-pass filter --
    pub high_pass_filter_enabled: bool,
    pub high_pass_filter_apply_in_full_band: bool,

    // -- Echo canceller --
    pub echo_canceller_enabled: bool,
    pub echo_canceller_mobile_mode: bool,
    pub echo_canceller_enforce_high_pass_filtering: bool,

    // -- Noise suppression --
    pub noise_suppression_enabled: bool,
    pub noise_suppression_level: WapNoiseSuppressionLevel,

    // -- Gain controller 2 --
    pub gain_controller2_enabled: bool,
    pub gain_controller2_input_volume_controller_enabled: bool,
    pub gain_controller2_adaptive_digital_enabled: bool,
    pub gain_controller2_adaptive_digital_headroom_db: f32,
    pub gain_controller2_adaptive_digital_max_gain_db: f32,
    pub gain_controller2_fixed_digital_gain_db: f32,
}

/// Audio stream format (sample rate and channel count).
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WapStreamConfig {
    pub sample_rate_hz: c_int,
    pub num_channels: c_int,
}

/// Engine statistics.
///
/// Each statistic has a `has_*` flag. When the flag is `false` the value
/// field is meaningless.
#[repr(C)]
#[derive(Debug, Clone, Copy, Default)]
pub struct WapStats {
    pub has_echo_return_loss: bool,
    pub echo_return_loss: f64,

    pub has_echo_return_loss_enhancement: bool,
    pub echo_return_loss_enhancement: f64,

    pub has_divergent_filter_fraction: bool,
    pub divergent_filter_fraction: f64,

    pub has_delay_median_ms: bool,
    pub delay_median_ms: c_int,

    pub has_delay_standard_deviation_ms: bool,
    pub delay_standard_deviation_ms: c_int,

    pub has_residual_echo_likelihood: bool,
    pub residual_echo_likelihood: f64,

    pub has_residual_echo_likelihood_recent_max: bool,
    pub residual_echo_likelihood_recent_max: f64,

    pub has_delay_ms: bool,
    pub delay_ms: c_int,
}

unsafe extern "C" {
    /// Returns a static NUL-terminated version string.
    pub fn wap_version() -> *const c_char;

    /// Creates an engine instance. Returns null if the engine rejects the
    /// configuration or allocation fails.
    pub fn wap_create_with_config(config: WapConfig) -> *mut WapAudioProcessing;

    /// Destroys an engine instance. Null is a no-op.
    pub fn wap_destroy(apm: *mut WapAudioProcessing);

    /// (Re)initializes processing for the given capture and render formats,
    /// resetting adaptive state while keeping the configuration.
    pub fn wap_initialize(
        apm: *mut WapAudioProcessing,
        capture: WapStreamConfig,
        render: WapStreamConfig,
    ) -> WapStatus;

    /// Replaces the engine configuration.
    pub fn wap_apply_config(apm: *mut WapAudioProcessing, config: WapConfig) -> WapStatus;

    /// Processes one 10 ms capture frame given as per-channel pointers.
    /// `src` and `dest` may point at the same channel buffers.
    pub fn wap_process_stream_f32(
        apm: *mut WapAudioProcessing,
        src: *const *const f32,
        input_config: WapStreamConfig,
        output_config: WapStreamConfig,
        dest: *const *mut f32,
    ) -> WapStatus;

    /// Processes one 10 ms interleaved int16 capture frame.
    /// `src` and `dest` may be the same buffer.
    pub fn wap_process_stream_i16(
        apm: *mut WapAudioProcessing,
        src: *const i16,
        src_len: c_int,
        input_config: WapStreamConfig,
        output_config: WapStreamConfig,
        dest: *mut i16,
        dest_len: c_int,
    ) -> WapStatus;

    /// Processes one 10 ms render frame given as per-channel pointers.
    pub fn wap_process_reverse_stream_f32(
        apm: *mut WapAudioProcessing,
        src: *const *const f32,
        input_config: WapStreamConfig,
        output_config: WapStreamConfig,
        dest: *const *mut f32,
    ) -> WapStatus;

    /// Processes one 10 ms interleaved int16 render frame.
    pub fn wap_process_reverse_stream_i16(
        apm: *mut WapAudioProcessing,
        src: *const i16,
        src_len: c_int,
        input_config: WapStreamConfig,
        output_config: WapStreamConfig,
        dest: *mut i16,
        dest_len: c_int,
    ) -> WapStatus;

    /// Writes the current statistics into `stats_out`.
    pub fn wap_get_statistics(apm: *mut WapAudioProcessing, stats_out: *mut WapStats)
    -> WapStatus;

    pub fn wap_set_stream_delay_ms(apm: *mut WapAudioProcessing, delay_ms: c_int) -> WapStatus;

    pub fn wap_stream_delay_ms(apm: *const WapAudioProcessing) -> c_int;

    pub fn wap_set_stream_analog_level(apm: *mut WapAudioProcessing, level: c_int) -> WapStatus;

    pub fn wap_recommended_stream_analog_level(apm: *const WapAudioProcessing) -> c_int;

    pub fn wap_set_output_will_be_muted(apm: *mut WapAudioProcessing, muted: bool);

    pub fn wap_set_stream_key_pressed(apm: *mut WapAudioProcessing, key_pressed: bool);
}

#[cfg(test)]
mod tests {
    use std::mem::{align_of, size_of};

    use super::*;

    #[test]
    fn stream_config_is_two_c_ints() {
        assert_eq!(size_of::<WapStreamConfig>(), 2 * size_of::<c_int>());
        assert_eq!(align_of::<WapStreamConfig>(), align_of::<c_int>());
    }

    #[test]
    fn noise_suppression_level_discriminants() {
        assert_eq!(WapNoiseSuppressionLevel::Low as i32, 0);
        assert_eq!(WapNoiseSuppressionLevel::Moderate as i32, 1);
        assert_eq!(WapNoiseSuppressionLevel::High as i32, 2);
        assert_eq!(WapNoiseSuppressionLevel::VeryHigh as i32, 3);
    }

    #[test]
    fn default_stats_report_nothing() {
        let stats = WapStats::default();
        assert!(!stats.has_echo_return_loss);
        assert!(!stats.has_echo_return_loss_enhancement);
        assert!(!stats.has_delay_ms);
    }
}
