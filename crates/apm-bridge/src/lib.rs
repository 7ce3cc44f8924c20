//! Safe binding to a native audio processing engine.
//!
//! The engine provides echo cancellation, noise suppression, automatic gain
//! control, high-pass filtering and capture level adjustment. This crate does
//! no signal processing of its own: it marshals configuration, owns the
//! engine instance, validates and (de)interleaves 10 ms frames at 48 kHz, and
//! keeps a statistics snapshot after each capture frame.
//!
//! Two entry points are provided:
//!
//! - [`Handle`]: a single-owner handle with in-place frame calls.
//! - [`Processor`]: a lock-protected, copying wrapper that can be shared
//!   between a render thread and a capture thread.
//!
//! With the `native` feature the engine is reached through `apm-bridge-sys`;
//! without it [`DefaultEngine`] is the pass-through [`BypassEngine`].
//!
//! # Quick Start
//!
//! ```
//! use apm_bridge::{Config, Processor, SAMPLES_PER_FRAME};
//! use apm_bridge::config::{EchoCanceller, NoiseSuppression};
//!
//! let config = Config {
//!     echo_canceller: Some(EchoCanceller::default()),
//!     noise_suppression: Some(NoiseSuppression::default()),
//!     ..Default::default()
//! };
//! let apm: Processor = Processor::new(config)?;
//!
//! // For each 10 ms frame:
//! let far_end = vec![0.0f32; SAMPLES_PER_FRAME];
//! let near_end = vec![0.0f32; SAMPLES_PER_FRAME];
//! apm.process_render(&far_end)?;
//! let cleaned = apm.process_capture(&near_end)?;
//! # assert_eq!(cleaned.len(), SAMPLES_PER_FRAME);
//! # Ok::<(), apm_bridge::Error>(())
//! ```

pub mod config;
pub mod engine;
pub mod error;
mod handle;
mod processor;
pub mod sample;
pub mod stats;
mod stream_config;

pub use config::{Config, StreamDelay};
pub use engine::{BypassEngine, DefaultEngine, Engine};
pub use error::{EngineError, Error};
pub use handle::Handle;
pub use processor::Processor;
pub use stats::{EngineStats, Statistics};
pub use stream_config::{
    FRAME_MS, SAMPLE_RATE_HZ, SAMPLES_PER_FRAME, StreamConfig, StreamConfigError, frame_len,
};
