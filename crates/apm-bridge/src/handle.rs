//! Owned engine handle with frame validation and a statistics snapshot.

use derive_more::Debug;

use crate::config::{Config, StreamDelay};
use crate::engine::{DefaultEngine, Engine};
use crate::error::Error;
use crate::sample::{deinterleave, interleave};
use crate::stats::Statistics;
use crate::stream_config::{SAMPLES_PER_FRAME, StreamConfig};

#[derive(Clone, Copy, PartialEq, Eq)]
enum Direction {
    Capture,
    Render,
}

/// An engine instance plus the per-instance state the binding keeps around
/// it.
///
/// A handle is either live or closed. [`destroy`](Self::destroy) releases
/// the engine and leaves the handle closed; after that every frame call and
/// [`apply_config`](Self::apply_config) fail with [`Error::Closed`], setters
/// do nothing and getters report no value.
///
/// A handle is not internally synchronized. Use
/// [`Processor`](crate::Processor) to share one between threads.
#[derive(Debug)]
pub struct Handle<E: Engine = DefaultEngine> {
    #[debug(skip)]
    engine: Option<E>,
    capture: StreamConfig,
    render: StreamConfig,
    #[debug(skip)]
    channels: Vec<Vec<f32>>,
    #[debug(skip)]
    interleaved: Vec<i16>,
    stream_delay: StreamDelay,
    stats: Statistics,
}

impl<E: Engine> Handle<E> {
    /// Create and initialize an engine for `config`.
    ///
    /// Fails with [`Error::InvalidChannels`] if either channel count is zero
    /// and with [`Error::Create`] if the engine refuses the configuration.
    /// When echo cancellation is enabled with a fixed delay, the delay is
    /// forwarded to the engine before the handle is returned.
    pub fn create(config: &Config) -> Result<Self, Error> {
        let (Ok(capture), Ok(render)) = (
            StreamConfig::from_channels(config.capture_channels),
            StreamConfig::from_channels(config.render_channels),
        ) else {
            return Err(Error::InvalidChannels {
                capture: config.capture_channels,
                render: config.render_channels,
            });
        };

        let mut engine = E::create(config, capture, render).map_err(|err| {
            tracing::warn!(code = err.code(), "engine refused configuration");
            Error::Create { code: err.code() }
        })?;

        let stream_delay = configured_delay(config);
        if let StreamDelay::Fixed { ms } = stream_delay {
            engine.set_stream_delay_ms(ms);
        }

        tracing::debug!(
            capture_channels = capture.num_channels(),
            render_channels = render.num_channels(),
            "created audio processing handle"
        );

        let max_channels = capture.num_channels().max(render.num_channels());
        Ok(Self {
            engine: Some(engine),
            capture,
            render,
            channels: vec![vec![0.0; SAMPLES_PER_FRAME]; max_channels],
            interleaved: Vec::with_capacity(capture.num_samples().max(render.num_samples())),
            stream_delay,
            stats: Statistics::default(),
        })
    }

    /// Reset the engine's adaptive state. Configuration, stream formats and
    /// hints are kept.
    pub fn initialize(&mut self) -> Result<(), Error> {
        let engine = self.engine.as_mut().ok_or(Error::Closed)?;
        engine.initialize().map_err(|err| {
            tracing::warn!(code = err.code(), "engine re-initialization failed");
            Error::from(err)
        })
    }

    /// Replace the engine configuration.
    ///
    /// Channel counts are fixed at creation; those in `config` are ignored.
    /// The delay hint is replaced too: the echo canceller's delay when it is
    /// enabled, delay-agnostic otherwise. If the engine rejects `config`,
    /// the previous delay hint stays in effect.
    pub fn apply_config(&mut self, config: &Config) -> Result<(), Error> {
        let engine = self.engine.as_mut().ok_or(Error::Closed)?;
        engine.apply_config(config).map_err(|err| {
            tracing::warn!(code = err.code(), "engine rejected configuration");
            Error::from(err)
        })?;
        let stream_delay = configured_delay(config);
        engine.set_stream_delay_ms(stream_delay.as_ms());
        self.stream_delay = stream_delay;
        tracing::debug!(?stream_delay, "applied configuration");
        Ok(())
    }

    /// Release the engine. Calling this on a closed handle is harmless.
    pub fn destroy(&mut self) {
        if self.engine.take().is_some() {
            self.stats = Statistics::default();
            tracing::debug!("destroyed audio processing handle");
        }
    }

    /// Whether [`destroy`](Self::destroy) has been called.
    pub fn is_closed(&self) -> bool {
        self.engine.is_none()
    }

    /// The engine, unless the handle is closed.
    pub fn engine(&self) -> Option<&E> {
        self.engine.as_ref()
    }

    /// Capture (near-end) stream format fixed at creation.
    pub fn capture_stream(&self) -> StreamConfig {
        self.capture
    }

    /// Render (far-end) stream format fixed at creation.
    pub fn render_stream(&self) -> StreamConfig {
        self.render
    }

    /// Process one interleaved capture frame in place.
    ///
    /// On success the statistics snapshot is refreshed. On failure `frame`
    /// and the snapshot are left as they were.
    pub fn process_capture_f32(
        &mut self,
        frame: &mut [f32],
        num_channels: usize,
    ) -> Result<(), Error> {
        self.process_f32(frame, num_channels, Direction::Capture)
    }

    /// Process one interleaved 16-bit capture frame in place.
    pub fn process_capture_i16(
        &mut self,
        frame: &mut [i16],
        num_channels: usize,
    ) -> Result<(), Error> {
        self.process_i16(frame, num_channels, Direction::Capture)
    }

    /// Process one interleaved render frame in place.
    pub fn process_render_f32(
        &mut self,
        frame: &mut [f32],
        num_channels: usize,
    ) -> Result<(), Error> {
        self.process_f32(frame, num_channels, Direction::Render)
    }

    /// Process one interleaved 16-bit render frame in place.
    pub fn process_render_i16(
        &mut self,
        frame: &mut [i16],
        num_channels: usize,
    ) -> Result<(), Error> {
        self.process_i16(frame, num_channels, Direction::Render)
    }

    /// Statistics captured after the latest successful capture frame.
    ///
    /// All zero before the first capture frame and after destroy.
    pub fn statistics(&self) -> Statistics {
        self.stats
    }

    /// Replace the render-to-capture delay hint.
    pub fn set_stream_delay(&mut self, delay: StreamDelay) {
        if let Some(engine) = self.engine.as_mut() {
            engine.set_stream_delay_ms(delay.as_ms());
            self.stream_delay = delay;
        }
    }

    /// The delay hint last set, as given by the caller.
    pub fn stream_delay(&self) -> StreamDelay {
        self.stream_delay
    }

    /// The delay hint in effect in the engine.
    pub fn stream_delay_ms(&self) -> Option<i32> {
        self.engine.as_ref().map(Engine::stream_delay_ms)
    }

    /// Report the current analog input level.
    pub fn set_stream_analog_level(&mut self, level: i32) {
        if let Some(engine) = self.engine.as_mut() {
            engine.set_stream_analog_level(level);
        }
    }

    /// The analog input level the engine recommends.
    pub fn recommended_stream_analog_level(&self) -> Option<i32> {
        self.engine
            .as_ref()
            .map(Engine::recommended_stream_analog_level)
    }

    /// Hint that the capture output will be muted.
    pub fn set_output_will_be_muted(&mut self, muted: bool) {
        if let Some(engine) = self.engine.as_mut() {
            engine.set_output_will_be_muted(muted);
        }
    }

    /// Hint that a key is being pressed.
    pub fn set_stream_key_pressed(&mut self, key_pressed: bool) {
        if let Some(engine) = self.engine.as_mut() {
            engine.set_stream_key_pressed(key_pressed);
        }
    }

    fn stream(&self, direction: Direction) -> StreamConfig {
        match direction {
            Direction::Capture => self.capture,
            Direction::Render => self.render,
        }
    }

    fn process_f32(
        &mut self,
        frame: &mut [f32],
        num_channels: usize,
        direction: Direction,
    ) -> Result<(), Error> {
        let stream = self.stream(direction);
        let engine = self.engine.as_mut().ok_or(Error::Closed)?;
        check_frame(stream, frame.len(), num_channels)?;

        let channels = &mut self.channels[..num_channels];
        deinterleave(frame, channels);
        let result = match direction {
            Direction::Capture => engine.process_stream_f32(channels),
            Direction::Render => engine.process_reverse_stream_f32(channels),
        };
        if let Err(err) = result {
            tracing::warn!(code = err.code(), "engine failed to process frame");
            return Err(err.into());
        }
        interleave(channels, frame);

        if direction == Direction::Capture {
            self.stats = Statistics::from(&engine.statistics());
        }
        Ok(())
    }

    fn process_i16(
        &mut self,
        frame: &mut [i16],
        num_channels: usize,
        direction: Direction,
    ) -> Result<(), Error> {
        let stream = self.stream(direction);
        let engine = self.engine.as_mut().ok_or(Error::Closed)?;
        check_frame(stream, frame.len(), num_channels)?;

        self.interleaved.clear();
        self.interleaved.extend_from_slice(frame);
        let result = match direction {
            Direction::Capture => engine.process_stream_i16(&mut self.interleaved),
            Direction::Render => engine.process_reverse_stream_i16(&mut self.interleaved),
        };
        if let Err(err) = result {
            tracing::warn!(code = err.code(), "engine failed to process frame");
            return Err(err.into());
        }
        frame.copy_from_slice(&self.interleaved);

        if direction == Direction::Capture {
            self.stats = Statistics::from(&engine.statistics());
        }
        Ok(())
    }
}

impl<E: Engine> Drop for Handle<E> {
    fn drop(&mut self) {
        self.destroy();
    }
}

fn configured_delay(config: &Config) -> StreamDelay {
    config
        .echo_canceller
        .map(|ec| ec.stream_delay)
        .unwrap_or_default()
}

fn check_frame(stream: StreamConfig, len: usize, num_channels: usize) -> Result<(), Error> {
    if num_channels != stream.num_channels() {
        return Err(Error::ChannelMismatch {
            expected: stream.num_channels(),
            actual: num_channels,
        });
    }
    if len != stream.num_samples() {
        return Err(Error::LengthMismatch {
            expected: stream.num_samples(),
            actual: len,
        });
    }
    Ok(())
}
