//! The native engine, reached through the `wap_*` C ABI.

mod conversions;

use std::ffi::c_int;
use std::ptr::NonNull;

use apm_bridge_sys as sys;

use crate::config::Config;
use crate::error::{EngineError, code};
use crate::stats::EngineStats;
use crate::stream_config::{SAMPLES_PER_FRAME, StreamConfig};

use super::Engine;

/// Owned instance of the native engine.
///
/// Destroyed exactly once, when dropped.
#[derive(Debug)]
pub struct NativeEngine {
    ptr: NonNull<sys::WapAudioProcessing>,
    capture: sys::WapStreamConfig,
    render: sys::WapStreamConfig,
}

// SAFETY: an engine instance has no thread affinity. Every call goes through
// `&mut self` or `&self`, and the handle layer never shares it unsynchronized.
unsafe impl Send for NativeEngine {}

fn check(status: sys::WapStatus) -> Result<(), EngineError> {
    if status == sys::WAP_OK {
        Ok(())
    } else {
        Err(EngineError::new(status))
    }
}

impl NativeEngine {
    fn raw(&self) -> *mut sys::WapAudioProcessing {
        self.ptr.as_ptr()
    }

    fn process_f32(
        &mut self,
        channels: &mut [Vec<f32>],
        stream: sys::WapStreamConfig,
        reverse: bool,
    ) -> Result<(), EngineError> {
        if channels.len() != stream.num_channels as usize {
            return Err(EngineError::new(code::BAD_NUMBER_CHANNELS));
        }
        if channels.iter().any(|ch| ch.len() != SAMPLES_PER_FRAME) {
            return Err(EngineError::new(code::BAD_DATA_LENGTH));
        }
        let dest: Vec<*mut f32> = channels.iter_mut().map(|ch| ch.as_mut_ptr()).collect();
        let src: Vec<*const f32> = dest.iter().map(|&p| p.cast_const()).collect();
        // SAFETY: `src` and `dest` hold one pointer per configured channel,
        // each to SAMPLES_PER_FRAME initialized samples that outlive the call.
        // The engine accepts identical source and destination buffers.
        let status = unsafe {
            if reverse {
                sys::wap_process_reverse_stream_f32(
                    self.raw(),
                    src.as_ptr(),
                    stream,
                    stream,
                    dest.as_ptr(),
                )
            } else {
                sys::wap_process_stream_f32(self.raw(), src.as_ptr(), stream, stream, dest.as_ptr())
            }
        };
        check(status)
    }

    fn process_i16(
        &mut self,
        samples: &mut [i16],
        stream: sys::WapStreamConfig,
        reverse: bool,
    ) -> Result<(), EngineError> {
        let expected = stream.num_channels as usize * SAMPLES_PER_FRAME;
        if samples.len() != expected {
            return Err(EngineError::new(code::BAD_DATA_LENGTH));
        }
        let len = samples.len() as c_int;
        let data = samples.as_mut_ptr();
        // SAFETY: `data` points at `len` initialized samples borrowed for the
        // whole call; the engine accepts identical source and destination.
        let status = unsafe {
            if reverse {
                sys::wap_process_reverse_stream_i16(
                    self.raw(),
                    data.cast_const(),
                    len,
                    stream,
                    stream,
                    data,
                    len,
                )
            } else {
                sys::wap_process_stream_i16(
                    self.raw(),
                    data.cast_const(),
                    len,
                    stream,
                    stream,
                    data,
                    len,
                )
            }
        };
        check(status)
    }
}

impl Engine for NativeEngine {
    fn create(
        config: &Config,
        capture: StreamConfig,
        render: StreamConfig,
    ) -> Result<Self, EngineError> {
        let raw_config = conversions::to_wap_config(config);
        // SAFETY: the config is passed by value; the engine owns nothing of ours.
        let ptr = unsafe { sys::wap_create_with_config(raw_config) };
        let ptr = NonNull::new(ptr).ok_or(EngineError::new(code::INTERNAL))?;
        let engine = Self {
            ptr,
            capture: conversions::to_wap_stream(capture),
            render: conversions::to_wap_stream(render),
        };
        // SAFETY: `ptr` is a live engine created above. On failure `engine`
        // is dropped, which destroys it.
        check(unsafe { sys::wap_initialize(engine.raw(), engine.capture, engine.render) })?;
        Ok(engine)
    }

    fn initialize(&mut self) -> Result<(), EngineError> {
        // SAFETY: `self.ptr` is live until drop.
        check(unsafe { sys::wap_initialize(self.raw(), self.capture, self.render) })
    }

    fn apply_config(&mut self, config: &Config) -> Result<(), EngineError> {
        let raw_config = conversions::to_wap_config(config);
        // SAFETY: `self.ptr` is live until drop.
        check(unsafe { sys::wap_apply_config(self.raw(), raw_config) })
    }

    fn process_stream_f32(&mut self, channels: &mut [Vec<f32>]) -> Result<(), EngineError> {
        self.process_f32(channels, self.capture, false)
    }

    fn process_stream_i16(&mut self, samples: &mut [i16]) -> Result<(), EngineError> {
        self.process_i16(samples, self.capture, false)
    }

    fn process_reverse_stream_f32(
        &mut self,
        channels: &mut [Vec<f32>],
    ) -> Result<(), EngineError> {
        self.process_f32(channels, self.render, true)
    }

    fn process_reverse_stream_i16(&mut self, samples: &mut [i16]) -> Result<(), EngineError> {
        self.process_i16(samples, self.render, true)
    }

    fn statistics(&mut self) -> EngineStats {
        let mut raw = sys::WapStats::default();
        // SAFETY: `raw` is a valid, writable WapStats.
        let status = unsafe { sys::wap_get_statistics(self.raw(), &raw mut raw) };
        if status != sys::WAP_OK {
            return EngineStats::default();
        }
        conversions::from_wap_stats(&raw)
    }

    fn set_stream_delay_ms(&mut self, delay_ms: i32) {
        // SAFETY: `self.ptr` is live until drop.
        let status = unsafe { sys::wap_set_stream_delay_ms(self.raw(), delay_ms) };
        if status != sys::WAP_OK {
            tracing::debug!(status, delay_ms, "stream delay clamped by engine");
        }
    }

    fn stream_delay_ms(&self) -> i32 {
        // SAFETY: `self.ptr` is live until drop.
        unsafe { sys::wap_stream_delay_ms(self.raw()) }
    }

    fn set_stream_analog_level(&mut self, level: i32) {
        // SAFETY: `self.ptr` is live until drop.
        let status = unsafe { sys::wap_set_stream_analog_level(self.raw(), level) };
        if status != sys::WAP_OK {
            tracing::debug!(status, level, "analog level clamped by engine");
        }
    }

    fn recommended_stream_analog_level(&self) -> i32 {
        // SAFETY: `self.ptr` is live until drop.
        unsafe { sys::wap_recommended_stream_analog_level(self.raw()) }
    }

    fn set_output_will_be_muted(&mut self, muted: bool) {
        // SAFETY: `self.ptr` is live until drop.
        unsafe { sys::wap_set_output_will_be_muted(self.raw(), muted) }
    }

    fn set_stream_key_pressed(&mut self, key_pressed: bool) {
        // SAFETY: `self.ptr` is live until drop.
        unsafe { sys::wap_set_stream_key_pressed(self.raw(), key_pressed) }
    }
}

impl Drop for NativeEngine {
    fn drop(&mut self) {
        // SAFETY: the pointer came from `wap_create_with_config` and drop
        // runs once.
        unsafe { sys::wap_destroy(self.raw()) }
    }
}
