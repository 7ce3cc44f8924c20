//! `#[repr(C)]` records of the C API.

use apm_bridge::{DefaultEngine, Handle};

// ---------------------------------------------------------------------------
// Status codes
// ---------------------------------------------------------------------------

/// Operation succeeded.
pub const APMB_OK: i32 = apm_bridge::error::code::OK;
/// Null or destroyed handle.
pub const APMB_ERROR_CLOSED: i32 = apm_bridge::error::code::CLOSED;
/// A panic was caught at the boundary.
pub const APMB_ERROR_INTERNAL: i32 = apm_bridge::error::code::INTERNAL;
/// Channel count is zero, negative, or differs from the one the handle was
/// created with.
pub const APMB_ERROR_BAD_NUMBER_CHANNELS: i32 = apm_bridge::error::code::BAD_NUMBER_CHANNELS;
/// Frame length is not `channels * 480`.
pub const APMB_ERROR_BAD_DATA_LENGTH: i32 = apm_bridge::error::code::BAD_DATA_LENGTH;

// ---------------------------------------------------------------------------
// Configuration
// ---------------------------------------------------------------------------

/// Echo canceller group.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ApmbEchoCanceller {
    pub enabled: bool,
    pub mobile_mode: bool,
    /// Fixed render-to-capture delay in milliseconds. Negative selects
    /// delay-agnostic mode.
    pub stream_delay_ms: i32,
}

/// Gain controller group.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ApmbGainController {
    pub enabled: bool,
    pub input_volume_controller: bool,
    pub headroom_db: f32,
    pub max_gain_db: f32,
    pub fixed_gain_db: f32,
}

/// Noise suppression group.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ApmbNoiseSuppression {
    pub enabled: bool,
    /// `0` low, `1` moderate, `2` high, `3` very high. Other values select
    /// moderate.
    pub level: i32,
}

/// High-pass filter group.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ApmbHighPassFilter {
    pub enabled: bool,
    pub apply_in_full_band: bool,
}

/// Capture level adjustment group.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ApmbCaptureLevelAdjustment {
    pub enabled: bool,
    pub pre_gain_factor: f32,
    pub post_gain_factor: f32,
    pub analog_mic_gain_emulation_enabled: bool,
    /// Clamped to `0..=255`.
    pub analog_mic_gain_emulation_initial_level: i32,
}

/// Full processing configuration.
///
/// Obtain a default-initialized instance with `apmb_config_default()`.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ApmbConfig {
    pub echo_canceller: ApmbEchoCanceller,
    pub gain_controller: ApmbGainController,
    pub noise_suppression: ApmbNoiseSuppression,
    pub high_pass_filter: ApmbHighPassFilter,
    pub capture_level_adjustment: ApmbCaptureLevelAdjustment,
    pub capture_channels: i32,
    pub render_channels: i32,
}

// ---------------------------------------------------------------------------
// Statistics
// ---------------------------------------------------------------------------

/// Statistics snapshot from the latest capture frame. Unavailable values are
/// zero.
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ApmbStats {
    pub echo_return_loss: f64,
    pub echo_return_loss_enhancement: f64,
    pub divergent_filter_fraction: f64,
    pub residual_echo_likelihood: f64,
    pub delay_median_ms: i32,
    pub delay_std_ms: i32,
    pub delay_ms: i32,
}

// ---------------------------------------------------------------------------
// Opaque handle
// ---------------------------------------------------------------------------

/// Opaque processing handle.
///
/// Created with `apmb_create()` and released with `apmb_destroy()`.
///
/// **Not thread-safe**: calls on one handle must be serialized by the caller.
#[derive(Debug)]
pub struct ApmbHandle {
    pub(crate) inner: Handle<DefaultEngine>,
}
