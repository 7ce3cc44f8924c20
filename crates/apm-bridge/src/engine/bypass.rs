//! An engine that forwards audio untouched.
//!
//! Useful on hosts without the native library: the whole binding (frame
//! validation, channel layout, statistics snapshots, hints) runs against it.
//! It measures the time-domain echo return loss of the latest render/capture
//! pair so the statistics path carries real numbers.

use crate::config::Config;
use crate::error::{EngineError, code};
use crate::sample::s16_to_f32;
use crate::stats::EngineStats;
use crate::stream_config::{SAMPLES_PER_FRAME, StreamConfig};

use super::Engine;

/// Largest delay hint the engine accepts; larger values are clamped.
const MAX_STREAM_DELAY_MS: i32 = 500;
/// Largest analog level.
const MAX_ANALOG_LEVEL: i32 = 255;
/// Frames below this mean power are treated as silence.
const SILENCE_POWER: f64 = 1e-10;

/// Pass-through engine.
#[derive(Debug, Clone)]
pub struct BypassEngine {
    config: Config,
    capture: StreamConfig,
    render: StreamConfig,
    stream_delay_ms: i32,
    analog_level: i32,
    output_will_be_muted: bool,
    key_pressed: bool,
    render_power: Option<f64>,
    stats: EngineStats,
}

impl BypassEngine {
    /// The configuration most recently applied.
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Whether the output-will-be-muted hint is set.
    pub fn output_will_be_muted(&self) -> bool {
        self.output_will_be_muted
    }

    /// Whether the key-pressed hint is set.
    pub fn key_pressed(&self) -> bool {
        self.key_pressed
    }

    fn check_channels(stream: StreamConfig, channels: &[Vec<f32>]) -> Result<(), EngineError> {
        if channels.len() != stream.num_channels() {
            return Err(EngineError::new(code::BAD_NUMBER_CHANNELS));
        }
        if channels.iter().any(|ch| ch.len() != SAMPLES_PER_FRAME) {
            return Err(EngineError::new(code::BAD_DATA_LENGTH));
        }
        Ok(())
    }

    fn check_interleaved(stream: StreamConfig, samples: &[i16]) -> Result<(), EngineError> {
        if samples.len() != stream.num_samples() {
            return Err(EngineError::new(code::BAD_DATA_LENGTH));
        }
        Ok(())
    }

    fn update_capture_stats(&mut self, capture_power: f64) {
        if self.config.echo_canceller.is_none() {
            self.stats = EngineStats::default();
            return;
        }
        let echo_return_loss = match self.render_power {
            Some(render) if render > SILENCE_POWER && capture_power > SILENCE_POWER => {
                Some(10.0 * (render / capture_power).log10())
            }
            _ => None,
        };
        self.stats = EngineStats {
            echo_return_loss,
            // Nothing is removed, so the output carries all of the echo.
            echo_return_loss_enhancement: Some(0.0),
            delay_median_ms: Some(self.stream_delay_ms),
            delay_standard_deviation_ms: Some(0),
            delay_ms: Some(self.stream_delay_ms),
            ..EngineStats::default()
        };
    }
}

fn mean_power(samples: impl ExactSizeIterator<Item = f32>) -> f64 {
    let n = samples.len();
    if n == 0 {
        return 0.0;
    }
    samples.map(|s| f64::from(s) * f64::from(s)).sum::<f64>() / n as f64
}

fn channels_power(channels: &[Vec<f32>]) -> f64 {
    let n: usize = channels.iter().map(Vec::len).sum();
    if n == 0 {
        return 0.0;
    }
    channels
        .iter()
        .map(|ch| mean_power(ch.iter().copied()) * ch.len() as f64)
        .sum::<f64>()
        / n as f64
}

impl Engine for BypassEngine {
    fn create(
        config: &Config,
        capture: StreamConfig,
        render: StreamConfig,
    ) -> Result<Self, EngineError> {
        Ok(Self {
            config: config.clone(),
            capture,
            render,
            stream_delay_ms: 0,
            analog_level: MAX_ANALOG_LEVEL,
            output_will_be_muted: false,
            key_pressed: false,
            render_power: None,
            stats: EngineStats::default(),
        })
    }

    fn initialize(&mut self) -> Result<(), EngineError> {
        self.render_power = None;
        self.stats = EngineStats::default();
        Ok(())
    }

    fn apply_config(&mut self, config: &Config) -> Result<(), EngineError> {
        self.config = config.clone();
        Ok(())
    }

    fn process_stream_f32(&mut self, channels: &mut [Vec<f32>]) -> Result<(), EngineError> {
        Self::check_channels(self.capture, channels)?;
        let power = channels_power(channels);
        self.update_capture_stats(power);
        Ok(())
    }

    fn process_stream_i16(&mut self, samples: &mut [i16]) -> Result<(), EngineError> {
        Self::check_interleaved(self.capture, samples)?;
        let power = mean_power(samples.iter().copied().map(s16_to_f32));
        self.update_capture_stats(power);
        Ok(())
    }

    fn process_reverse_stream_f32(
        &mut self,
        channels: &mut [Vec<f32>],
    ) -> Result<(), EngineError> {
        Self::check_channels(self.render, channels)?;
        self.render_power = Some(channels_power(channels));
        Ok(())
    }

    fn process_reverse_stream_i16(&mut self, samples: &mut [i16]) -> Result<(), EngineError> {
        Self::check_interleaved(self.render, samples)?;
        self.render_power = Some(mean_power(samples.iter().copied().map(s16_to_f32)));
        Ok(())
    }

    fn statistics(&mut self) -> EngineStats {
        self.stats
    }

    fn set_stream_delay_ms(&mut self, delay_ms: i32) {
        self.stream_delay_ms = delay_ms.clamp(0, MAX_STREAM_DELAY_MS);
    }

    fn stream_delay_ms(&self) -> i32 {
        self.stream_delay_ms
    }

    fn set_stream_analog_level(&mut self, level: i32) {
        self.analog_level = level.clamp(0, MAX_ANALOG_LEVEL);
    }

    fn recommended_stream_analog_level(&self) -> i32 {
        self.analog_level
    }

    fn set_output_will_be_muted(&mut self, muted: bool) {
        self.output_will_be_muted = muted;
    }

    fn set_stream_key_pressed(&mut self, key_pressed: bool) {
        self.key_pressed = key_pressed;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::EchoCanceller;

    fn mono() -> StreamConfig {
        StreamConfig::from_channels(1).unwrap()
    }

    fn engine(config: &Config) -> BypassEngine {
        BypassEngine::create(config, mono(), mono()).unwrap()
    }

    fn aec_config() -> Config {
        Config {
            echo_canceller: Some(EchoCanceller::default()),
            ..Default::default()
        }
    }

    #[test]
    fn audio_is_untouched() {
        let mut apm = engine(&aec_config());
        let frame: Vec<f32> = (0..SAMPLES_PER_FRAME).map(|i| (i as f32 / 40.0).sin()).collect();
        let mut channels = vec![frame.clone()];
        apm.process_reverse_stream_f32(&mut channels).unwrap();
        apm.process_stream_f32(&mut channels).unwrap();
        assert_eq!(channels[0], frame);
    }

    #[test]
    fn echo_return_loss_follows_level_ratio() {
        let mut apm = engine(&aec_config());
        let render: Vec<f32> = (0..SAMPLES_PER_FRAME)
            .map(|i| (i as f32 / 10.0).sin() * 0.5)
            .collect();
        let capture: Vec<f32> = render.iter().map(|s| s * 0.1).collect();
        apm.process_reverse_stream_f32(&mut [render]).unwrap();
        apm.process_stream_f32(&mut [capture]).unwrap();

        let stats = apm.statistics();
        let erl = stats.echo_return_loss.unwrap();
        assert!((erl - 20.0).abs() < 1e-3, "erl = {erl}");
        assert_eq!(stats.echo_return_loss_enhancement, Some(0.0));
    }

    #[test]
    fn no_echo_stats_without_echo_canceller() {
        let mut apm = engine(&Config::default());
        apm.process_reverse_stream_f32(&mut [vec![0.5; SAMPLES_PER_FRAME]])
            .unwrap();
        apm.process_stream_f32(&mut [vec![0.1; SAMPLES_PER_FRAME]])
            .unwrap();
        assert_eq!(apm.statistics(), EngineStats::default());
    }

    #[test]
    fn silent_capture_has_no_echo_return_loss() {
        let mut apm = engine(&aec_config());
        apm.process_reverse_stream_f32(&mut [vec![0.5; SAMPLES_PER_FRAME]])
            .unwrap();
        apm.process_stream_f32(&mut [vec![0.0; SAMPLES_PER_FRAME]])
            .unwrap();
        assert_eq!(apm.statistics().echo_return_loss, None);
    }

    #[test]
    fn rejects_wrong_geometry() {
        let mut apm = engine(&Config::default());
        let err = apm
            .process_stream_f32(&mut [vec![0.0; 10]])
            .unwrap_err();
        assert_eq!(err.code(), code::BAD_DATA_LENGTH);
        let err = apm
            .process_stream_f32(&mut [vec![0.0; SAMPLES_PER_FRAME], vec![0.0; SAMPLES_PER_FRAME]])
            .unwrap_err();
        assert_eq!(err.code(), code::BAD_NUMBER_CHANNELS);
        let err = apm.process_reverse_stream_i16(&mut [0; 3]).unwrap_err();
        assert_eq!(err.code(), code::BAD_DATA_LENGTH);
    }

    #[test]
    fn hints_are_clamped_and_stored() {
        let mut apm = engine(&Config::default());
        apm.set_stream_delay_ms(-20);
        assert_eq!(apm.stream_delay_ms(), 0);
        apm.set_stream_delay_ms(10_000);
        assert_eq!(apm.stream_delay_ms(), MAX_STREAM_DELAY_MS);
        apm.set_stream_analog_level(128);
        assert_eq!(apm.recommended_stream_analog_level(), 128);
        apm.set_stream_analog_level(300);
        assert_eq!(apm.recommended_stream_analog_level(), 255);
        apm.set_output_will_be_muted(true);
        apm.set_stream_key_pressed(true);
        assert!(apm.output_will_be_muted());
        assert!(apm.key_pressed());
    }

    #[test]
    fn initialize_keeps_config() {
        let config = aec_config();
        let mut apm = engine(&config);
        apm.process_reverse_stream_f32(&mut [vec![0.5; SAMPLES_PER_FRAME]])
            .unwrap();
        apm.process_stream_f32(&mut [vec![0.1; SAMPLES_PER_FRAME]])
            .unwrap();
        assert!(apm.statistics().echo_return_loss.is_some());

        apm.initialize().unwrap();
        assert_eq!(apm.statistics(), EngineStats::default());
        assert_eq!(apm.config(), &config);
    }
}
