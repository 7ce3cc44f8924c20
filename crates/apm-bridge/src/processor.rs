//! Thread-safe, copying front end over [`Handle`].

use std::fmt;
use std::sync::{Mutex, MutexGuard, PoisonError};

use crate::config::{Config, StreamDelay};
use crate::engine::{DefaultEngine, Engine};
use crate::error::Error;
use crate::handle::Handle;
use crate::sample::{f32_to_s16_slice, s16_to_f32_slice};
use crate::stats::Statistics;

struct Inner<E: Engine> {
    handle: Handle<E>,
    config: Config,
}

/// A processing instance that can be shared between threads.
///
/// Every call holds an internal lock for its whole duration, so frame calls
/// from a render thread and a capture thread are serialized. Input frames are
/// borrowed and never modified; processed capture audio is returned as a new
/// buffer.
///
/// # Example
///
/// ```
/// use apm_bridge::{Config, Processor, SAMPLES_PER_FRAME};
/// use apm_bridge::config::{EchoCanceller, StreamDelay};
/// use apm_bridge::engine::BypassEngine;
///
/// let config = Config {
///     echo_canceller: Some(EchoCanceller {
///         stream_delay: StreamDelay::Fixed { ms: 40 },
///         ..Default::default()
///     }),
///     ..Default::default()
/// };
/// let apm = Processor::<BypassEngine>::new(config)?;
///
/// let far_end = vec![0.0f32; SAMPLES_PER_FRAME];
/// let near_end = vec![0.0f32; SAMPLES_PER_FRAME];
/// apm.process_render(&far_end)?;
/// let cleaned = apm.process_capture(&near_end)?;
/// assert_eq!(cleaned.len(), SAMPLES_PER_FRAME);
///
/// apm.close();
/// assert!(apm.is_closed());
/// # Ok::<(), apm_bridge::Error>(())
/// ```
pub struct Processor<E: Engine = DefaultEngine> {
    inner: Mutex<Inner<E>>,
}

impl<E: Engine> Processor<E> {
    /// Create a processor for `config`.
    pub fn new(config: Config) -> Result<Self, Error> {
        let handle = Handle::create(&config)?;
        Ok(Self {
            inner: Mutex::new(Inner { handle, config }),
        })
    }

    // A panic while the lock is held cannot leave the handle half-updated,
    // so a poisoned lock is still usable.
    fn lock(&self) -> MutexGuard<'_, Inner<E>> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// The configuration currently applied.
    pub fn config(&self) -> Config {
        self.lock().config.clone()
    }

    /// Replace the configuration as a whole.
    ///
    /// Channel counts are fixed at construction and are not changed.
    pub fn apply_config(&self, config: Config) -> Result<(), Error> {
        let mut inner = self.lock();
        inner.handle.apply_config(&config)?;
        inner.config = config;
        Ok(())
    }

    /// Reset the engine's adaptive state, keeping the configuration.
    pub fn initialize(&self) -> Result<(), Error> {
        self.lock().handle.initialize()
    }

    /// Process one interleaved capture frame and return the processed copy.
    ///
    /// `frame` must hold exactly `capture_channels × 480` samples.
    pub fn process_capture(&self, frame: &[f32]) -> Result<Vec<f32>, Error> {
        let mut inner = self.lock();
        let num_channels = inner.handle.capture_stream().num_channels();
        let mut out = frame.to_vec();
        inner.handle.process_capture_f32(&mut out, num_channels)?;
        Ok(out)
    }

    /// Process one interleaved 16-bit capture frame and return the processed
    /// copy.
    ///
    /// The frame goes through the float path; processed samples are clamped
    /// back into 16-bit range.
    pub fn process_capture_i16(&self, frame: &[i16]) -> Result<Vec<i16>, Error> {
        let mut inner = self.lock();
        let num_channels = inner.handle.capture_stream().num_channels();
        let mut samples = s16_to_f32_slice(frame);
        inner.handle.process_capture_f32(&mut samples, num_channels)?;
        Ok(f32_to_s16_slice(&samples))
    }

    /// Feed one interleaved render frame to the engine.
    ///
    /// `frame` must hold exactly `render_channels × 480` samples.
    pub fn process_render(&self, frame: &[f32]) -> Result<(), Error> {
        let mut inner = self.lock();
        let num_channels = inner.handle.render_stream().num_channels();
        let mut samples = frame.to_vec();
        inner.handle.process_render_f32(&mut samples, num_channels)
    }

    /// Feed one interleaved 16-bit render frame to the engine.
    pub fn process_render_i16(&self, frame: &[i16]) -> Result<(), Error> {
        let mut inner = self.lock();
        let num_channels = inner.handle.render_stream().num_channels();
        let mut samples = s16_to_f32_slice(frame);
        inner.handle.process_render_f32(&mut samples, num_channels)
    }

    /// Replace the render-to-capture delay hint.
    pub fn set_stream_delay(&self, delay: StreamDelay) -> Result<(), Error> {
        let mut inner = self.lock();
        if inner.handle.is_closed() {
            return Err(Error::Closed);
        }
        inner.handle.set_stream_delay(delay);
        Ok(())
    }

    /// The delay hint in effect, or `None` once closed.
    pub fn stream_delay_ms(&self) -> Option<i32> {
        self.lock().handle.stream_delay_ms()
    }

    /// Report the current analog input level.
    pub fn set_stream_analog_level(&self, level: i32) -> Result<(), Error> {
        let mut inner = self.lock();
        if inner.handle.is_closed() {
            return Err(Error::Closed);
        }
        inner.handle.set_stream_analog_level(level);
        Ok(())
    }

    /// The analog level the engine recommends, or `None` once closed.
    pub fn recommended_stream_analog_level(&self) -> Option<i32> {
        self.lock().handle.recommended_stream_analog_level()
    }

    /// Hint that the capture output will be muted. Ignored once closed.
    pub fn set_output_muted(&self, muted: bool) {
        self.lock().handle.set_output_will_be_muted(muted);
    }

    /// Hint that a key is being pressed. Ignored once closed.
    pub fn set_key_pressed(&self, key_pressed: bool) {
        self.lock().handle.set_stream_key_pressed(key_pressed);
    }

    /// Statistics from the latest capture frame.
    pub fn statistics(&self) -> Statistics {
        self.lock().handle.statistics()
    }

    /// Release the engine. Safe to call more than once.
    pub fn close(&self) {
        self.lock().handle.destroy();
    }

    /// Whether [`close`](Self::close) has been called.
    pub fn is_closed(&self) -> bool {
        self.lock().handle.is_closed()
    }
}

impl<E: Engine> fmt::Debug for Processor<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let inner = self.lock();
        f.debug_struct("Processor")
            .field("handle", &inner.handle)
            .field("config", &inner.config)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::thread;

    use super::*;
    use crate::config::{EchoCanceller, NoiseSuppression};
    use crate::engine::BypassEngine;
    use crate::stream_config::SAMPLES_PER_FRAME;

    type BypassProcessor = Processor<BypassEngine>;

    #[test]
    fn capture_returns_a_copy() {
        let apm = BypassProcessor::new(Config::default()).unwrap();
        let frame: Vec<f32> = (0..SAMPLES_PER_FRAME).map(|i| i as f32 / 960.0).collect();
        let out = apm.process_capture(&frame).unwrap();
        assert_eq!(out, frame);
    }

    #[test]
    fn i16_capture_goes_through_float_path() {
        let apm = BypassProcessor::new(Config::default()).unwrap();
        let frame: Vec<i16> = (0..SAMPLES_PER_FRAME as i16).map(|i| i * 60 - 14_000).collect();
        let out = apm.process_capture_i16(&frame).unwrap();
        for (a, b) in frame.iter().zip(&out) {
            assert!((i32::from(*a) - i32::from(*b)).abs() <= 1);
        }
    }

    #[test]
    fn lengths_follow_construction_channels() {
        let apm = BypassProcessor::new(Config {
            capture_channels: 2,
            render_channels: 1,
            ..Default::default()
        })
        .unwrap();
        assert_eq!(
            apm.process_capture(&[0.0; SAMPLES_PER_FRAME]),
            Err(Error::LengthMismatch {
                expected: 960,
                actual: 480
            })
        );
        apm.process_render(&[0.0; SAMPLES_PER_FRAME]).unwrap();
        assert_eq!(
            apm.process_render_i16(&[0; 2 * SAMPLES_PER_FRAME]),
            Err(Error::LengthMismatch {
                expected: 480,
                actual: 960
            })
        );
    }

    #[test]
    fn apply_config_replaces_record() {
        let apm = BypassProcessor::new(Config {
            echo_canceller: Some(EchoCanceller {
                stream_delay: StreamDelay::Fixed { ms: 60 },
                ..Default::default()
            }),
            ..Default::default()
        })
        .unwrap();
        assert_eq!(apm.stream_delay_ms(), Some(60));
        let next = Config {
            noise_suppression: Some(NoiseSuppression::default()),
            ..Default::default()
        };
        apm.apply_config(next.clone()).unwrap();
        assert_eq!(apm.config(), next);
        assert_eq!(apm.stream_delay_ms(), Some(0));
    }

    #[test]
    fn closed_processor_refuses_work() {
        let apm = BypassProcessor::new(Config::default()).unwrap();
        apm.close();
        apm.close();
        assert!(apm.is_closed());
        assert_eq!(
            apm.process_capture(&[0.0; SAMPLES_PER_FRAME]),
            Err(Error::Closed)
        );
        assert_eq!(
            apm.set_stream_delay(StreamDelay::Fixed { ms: 5 }),
            Err(Error::Closed)
        );
        assert_eq!(apm.set_stream_analog_level(10), Err(Error::Closed));
        assert_eq!(apm.apply_config(Config::default()), Err(Error::Closed));
        assert_eq!(apm.initialize(), Err(Error::Closed));
        assert_eq!(apm.stream_delay_ms(), None);
        assert_eq!(apm.recommended_stream_analog_level(), None);
        apm.set_output_muted(true);
        apm.set_key_pressed(true);
        assert_eq!(apm.statistics(), Statistics::default());
    }

    #[test]
    fn poisoned_lock_is_recovered() {
        let apm = Arc::new(BypassProcessor::new(Config::default()).unwrap());
        let clone = Arc::clone(&apm);
        let _ = thread::spawn(move || {
            let _guard = clone.lock();
            panic!("poison");
        })
        .join();
        assert!(apm.inner.is_poisoned());
        apm.process_capture(&[0.0; SAMPLES_PER_FRAME]).unwrap();
    }

    #[test]
    fn shared_between_threads() {
        let apm = Arc::new(
            BypassProcessor::new(Config {
                echo_canceller: Some(EchoCanceller::default()),
                ..Default::default()
            })
            .unwrap(),
        );
        let render = {
            let apm = Arc::clone(&apm);
            thread::spawn(move || {
                for _ in 0..50 {
                    apm.process_render(&[0.3; SAMPLES_PER_FRAME]).unwrap();
                }
            })
        };
        for _ in 0..50 {
            apm.process_capture(&[0.03; SAMPLES_PER_FRAME]).unwrap();
        }
        render.join().unwrap();
        assert!(apm.statistics().echo_return_loss.is_finite());
    }
}
