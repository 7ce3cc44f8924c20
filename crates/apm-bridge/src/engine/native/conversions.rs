//! Conversions between the Rust records and the engine's flat C types.

use std::ffi::c_int;

use apm_bridge_sys::{WapConfig, WapNoiseSuppressionLevel, WapStats, WapStreamConfig};

use crate::config::{Config, NoiseSuppressionLevel};
use crate::stats::EngineStats;
use crate::stream_config::StreamConfig;

// ---------------------------------------------------------------------------
// Config -> WapConfig
// ---------------------------------------------------------------------------

fn to_wap_level(level: NoiseSuppressionLevel) -> WapNoiseSuppressionLevel {
    match level {
        NoiseSuppressionLevel::Low => WapNoiseSuppressionLevel::Low,
        NoiseSuppressionLevel::Moderate => WapNoiseSuppressionLevel::Moderate,
        NoiseSuppressionLevel::High => WapNoiseSuppressionLevel::High,
        NoiseSuppressionLevel::VeryHigh => WapNoiseSuppressionLevel::VeryHigh,
    }
}

/// Flatten a [`Config`] into the engine's representation.
///
/// Disabled groups carry their default parameters. Echo cancellation only
/// enforces high-pass filtering while the high-pass filter is enabled.
pub(super) fn to_wap_config(config: &Config) -> WapConfig {
    let cla = config.capture_level_adjustment.unwrap_or_default();
    let amge = cla.analog_mic_gain_emulation.unwrap_or_default();
    let hpf = config.high_pass_filter.unwrap_or_default();
    let ec = config.echo_canceller.unwrap_or_default();
    let ns = config.noise_suppression.unwrap_or_default();
    let gc = config.gain_controller.unwrap_or_default();

    WapConfig {
        capture_level_adjustment_enabled: config.capture_level_adjustment.is_some(),
        capture_level_adjustment_pre_gain_factor: cla.pre_gain_factor,
        capture_level_adjustment_post_gain_factor: cla.post_gain_factor,
        analog_mic_gain_emulation_enabled: config
            .capture_level_adjustment
            .is_some_and(|c| c.analog_mic_gain_emulation.is_some()),
        analog_mic_gain_emulation_initial_level: c_int::from(amge.initial_level),

        high_pass_filter_enabled: config.high_pass_filter.is_some(),
        high_pass_filter_apply_in_full_band: hpf.apply_in_full_band,

        echo_canceller_enabled: config.echo_canceller.is_some(),
        echo_canceller_mobile_mode: ec.mobile_mode,
        echo_canceller_enforce_high_pass_filtering: config.high_pass_filter.is_some(),

        noise_suppression_enabled: config.noise_suppression.is_some(),
        noise_suppression_level: to_wap_level(ns.level),

        gain_controller2_enabled: config.gain_controller.is_some(),
        gain_controller2_input_volume_controller_enabled: gc.input_volume_controller,
        gain_controller2_adaptive_digital_enabled: config.gain_controller.is_some(),
        gain_controller2_adaptive_digital_headroom_db: gc.headroom_db,
        gain_controller2_adaptive_digital_max_gain_db: gc.max_gain_db,
        gain_controller2_fixed_digital_gain_db: gc.fixed_gain_db,
    }
}

// ---------------------------------------------------------------------------
// StreamConfig -> WapStreamConfig
// ---------------------------------------------------------------------------

pub(super) fn to_wap_stream(stream: StreamConfig) -> WapStreamConfig {
    WapStreamConfig {
        sample_rate_hz: stream.sample_rate_hz() as c_int,
        num_channels: stream.num_channels() as c_int,
    }
}

// ---------------------------------------------------------------------------
// WapStats -> EngineStats
// ---------------------------------------------------------------------------

pub(super) fn from_wap_stats(stats: &WapStats) -> EngineStats {
    fn pick<T>(has: bool, value: T) -> Option<T> {
        has.then_some(value)
    }

    EngineStats {
        echo_return_loss: pick(stats.has_echo_return_loss, stats.echo_return_loss),
        echo_return_loss_enhancement: pick(
            stats.has_echo_return_loss_enhancement,
            stats.echo_return_loss_enhancement,
        ),
        divergent_filter_fraction: pick(
            stats.has_divergent_filter_fraction,
            stats.divergent_filter_fraction,
        ),
        delay_median_ms: pick(stats.has_delay_median_ms, stats.delay_median_ms),
        delay_standard_deviation_ms: pick(
            stats.has_delay_standard_deviation_ms,
            stats.delay_standard_deviation_ms,
        ),
        residual_echo_likelihood: pick(
            stats.has_residual_echo_likelihood,
            stats.residual_echo_likelihood,
        ),
        residual_echo_likelihood_recent_max: pick(
            stats.has_residual_echo_likelihood_recent_max,
            stats.residual_echo_likelihood_recent_max,
        ),
        delay_ms: pick(stats.has_delay_ms, stats.delay_ms),
    }
}
