//! The boundary to the wrapped processing engine.
//!
//! [`Engine`] lists every entry point the binding relies on. Nothing else
//! about the engine is assumed: filtering, estimation, and adaptation all
//! happen behind it.

mod bypass;
#[cfg(feature = "native")]
mod native;

pub use bypass::BypassEngine;
#[cfg(feature = "native")]
pub use native::NativeEngine;

use std::fmt::Debug;

use crate::config::Config;
use crate::error::EngineError;
use crate::stats::EngineStats;
use crate::stream_config::StreamConfig;

/// Engine used by [`Processor`](crate::Processor) when none is named.
#[cfg(feature = "native")]
pub type DefaultEngine = NativeEngine;
/// Engine used by [`Processor`](crate::Processor) when none is named.
#[cfg(not(feature = "native"))]
pub type DefaultEngine = BypassEngine;

/// An opaque audio processing engine instance.
///
/// Frame calls always receive exactly one 10 ms frame: `f32` frames as one
/// buffer of [`SAMPLES_PER_FRAME`](crate::SAMPLES_PER_FRAME) samples per
/// channel, `i16` frames interleaved. Both are processed in place.
///
/// Dropping the engine destroys the underlying instance.
pub trait Engine: Debug + Send + Sized {
    /// Construct an instance with `config` and initialize it for the given
    /// capture and render formats.
    fn create(
        config: &Config,
        capture: StreamConfig,
        render: StreamConfig,
    ) -> Result<Self, EngineError>;

    /// Reset adaptive state, keeping the configuration and stream formats.
    fn initialize(&mut self) -> Result<(), EngineError>;

    /// Replace the configuration.
    fn apply_config(&mut self, config: &Config) -> Result<(), EngineError>;

    /// Process one deinterleaved capture (near-end) frame.
    fn process_stream_f32(&mut self, channels: &mut [Vec<f32>]) -> Result<(), EngineError>;

    /// Process one interleaved 16-bit capture (near-end) frame.
    fn process_stream_i16(&mut self, samples: &mut [i16]) -> Result<(), EngineError>;

    /// Process one deinterleaved render (far-end) frame.
    fn process_reverse_stream_f32(&mut self, channels: &mut [Vec<f32>])
    -> Result<(), EngineError>;

    /// Process one interleaved 16-bit render (far-end) frame.
    fn process_reverse_stream_i16(&mut self, samples: &mut [i16]) -> Result<(), EngineError>;

    /// Current engine statistics.
    fn statistics(&mut self) -> EngineStats;

    /// Set the render-to-capture delay hint in milliseconds.
    fn set_stream_delay_ms(&mut self, delay_ms: i32);

    /// The delay hint currently in effect.
    fn stream_delay_ms(&self) -> i32;

    /// Report the current analog input level, in `0..=255`.
    fn set_stream_analog_level(&mut self, level: i32);

    /// The analog input level the gain controller recommends.
    fn recommended_stream_analog_level(&self) -> i32;

    /// Hint that the capture output will be muted.
    fn set_output_will_be_muted(&mut self, muted: bool);

    /// Hint that a key is being pressed.
    fn set_stream_key_pressed(&mut self, key_pressed: bool);
}
