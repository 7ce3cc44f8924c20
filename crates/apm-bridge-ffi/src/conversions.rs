//! Conversions between the C records and the Rust records.

use apm_bridge::config::{
    AnalogMicGainEmulation, CaptureLevelAdjustment, EchoCanceller, GainController,
    HighPassFilter, NoiseSuppression, NoiseSuppressionLevel, StreamDelay,
};
use apm_bridge::{Config, Statistics};

use crate::types::{
    ApmbCaptureLevelAdjustment, ApmbConfig, ApmbEchoCanceller, ApmbGainController,
    ApmbHighPassFilter, ApmbNoiseSuppression, ApmbStats,
};

// ---------------------------------------------------------------------------
// ApmbConfig <-> Config
// ---------------------------------------------------------------------------

/// A negative delay at the C boundary selects delay-agnostic mode.
pub(crate) fn stream_delay_from_ms(ms: i32) -> StreamDelay {
    if ms < 0 {
        StreamDelay::Agnostic
    } else {
        StreamDelay::Fixed { ms }
    }
}

impl ApmbConfig {
    /// Convert to the nested Rust [`Config`].
    ///
    /// Channel counts outside `0..=65535` become zero, which the handle
    /// rejects at creation.
    pub(crate) fn to_rust(self) -> Config {
        let ec = self.echo_canceller;
        let gc = self.gain_controller;
        let ns = self.noise_suppression;
        let hpf = self.high_pass_filter;
        let cla = self.capture_level_adjustment;

        Config {
            echo_canceller: ec.enabled.then(|| EchoCanceller {
                mobile_mode: ec.mobile_mode,
                stream_delay: stream_delay_from_ms(ec.stream_delay_ms),
            }),
            gain_controller: gc.enabled.then_some(GainController {
                input_volume_controller: gc.input_volume_controller,
                headroom_db: gc.headroom_db,
                max_gain_db: gc.max_gain_db,
                fixed_gain_db: gc.fixed_gain_db,
            }),
            noise_suppression: ns.enabled.then(|| NoiseSuppression {
                level: NoiseSuppressionLevel::from_i32(ns.level).unwrap_or_default(),
            }),
            high_pass_filter: hpf.enabled.then_some(HighPassFilter {
                apply_in_full_band: hpf.apply_in_full_band,
            }),
            capture_level_adjustment: cla.enabled.then(|| CaptureLevelAdjustment {
                pre_gain_factor: cla.pre_gain_factor,
                post_gain_factor: cla.post_gain_factor,
                analog_mic_gain_emulation: cla.analog_mic_gain_emulation_enabled.then(|| {
                    AnalogMicGainEmulation {
                        initial_level: cla.analog_mic_gain_emulation_initial_level.clamp(0, 255)
                            as u8,
                    }
                }),
            }),
            capture_channels: u16::try_from(self.capture_channels).unwrap_or(0),
            render_channels: u16::try_from(self.render_channels).unwrap_or(0),
        }
    }

    /// Convert from the nested Rust [`Config`]. Disabled groups carry their
    /// default parameters.
    pub(crate) fn from_rust(config: &Config) -> Self {
        let ec = config.echo_canceller.unwrap_or_default();
        let gc = config.gain_controller.unwrap_or_default();
        let ns = config.noise_suppression.unwrap_or_default();
        let hpf = config.high_pass_filter.unwrap_or_default();
        let cla = config.capture_level_adjustment.unwrap_or_default();
        let amge = cla.analog_mic_gain_emulation.unwrap_or_default();

        Self {
            echo_canceller: ApmbEchoCanceller {
                enabled: config.echo_canceller.is_some(),
                mobile_mode: ec.mobile_mode,
                stream_delay_ms: match ec.stream_delay {
                    StreamDelay::Agnostic => -1,
                    StreamDelay::Fixed { ms } => ms,
                },
            },
            gain_controller: ApmbGainController {
                enabled: config.gain_controller.is_some(),
                input_volume_controller: gc.input_volume_controller,
                headroom_db: gc.headroom_db,
                max_gain_db: gc.max_gain_db,
                fixed_gain_db: gc.fixed_gain_db,
            },
            noise_suppression: ApmbNoiseSuppression {
                enabled: config.noise_suppression.is_some(),
                level: ns.level.as_i32(),
            },
            high_pass_filter: ApmbHighPassFilter {
                enabled: config.high_pass_filter.is_some(),
                apply_in_full_band: hpf.apply_in_full_band,
            },
            capture_level_adjustment: ApmbCaptureLevelAdjustment {
                enabled: config.capture_level_adjustment.is_some(),
                pre_gain_factor: cla.pre_gain_factor,
                post_gain_factor: cla.post_gain_factor,
                analog_mic_gain_emulation_enabled: cla.analog_mic_gain_emulation.is_some(),
                analog_mic_gain_emulation_initial_level: i32::from(amge.initial_level),
            },
            capture_channels: i32::from(config.capture_channels),
            render_channels: i32::from(config.render_channels),
        }
    }
}

// ---------------------------------------------------------------------------
// Statistics -> ApmbStats
// ---------------------------------------------------------------------------

impl From<Statistics> for ApmbStats {
    fn from(stats: Statistics) -> Self {
        Self {
            echo_return_loss: stats.echo_return_loss,
            echo_return_loss_enhancement: stats.echo_return_loss_enhancement,
            divergent_filter_fraction: stats.divergent_filter_fraction,
            residual_echo_likelihood: stats.residual_echo_likelihood,
            delay_median_ms: stats.delay_median_ms,
            delay_std_ms: stats.delay_std_ms,
            delay_ms: stats.delay_ms,
        }
    }
}
