//! Exported `extern "C"` functions.
//!
//! All symbols use the `apmb_` prefix. Functions returning `int32_t` report
//! `APMB_OK` or a negative status; engine failures pass their own code
//! through.

use std::ffi::c_char;
use std::mem;
use std::ptr;
use std::slice;

use apm_bridge::{Config, DefaultEngine, Error, Handle, SAMPLE_RATE_HZ, SAMPLES_PER_FRAME};

use crate::conversions::stream_delay_from_ms;
use crate::panic_guard::{ffi_guard, ffi_guard_or, ffi_guard_ptr};
use crate::types::{
    APMB_ERROR_CLOSED, APMB_ERROR_INTERNAL, APMB_OK, ApmbConfig, ApmbHandle, ApmbStats,
};

fn status(result: Result<(), Error>) -> i32 {
    match result {
        Ok(()) => APMB_OK,
        Err(err) => err.code(),
    }
}

fn channel_count(num_channels: i32) -> usize {
    // Negative counts can never match a handle's channel count.
    usize::try_from(num_channels).unwrap_or(usize::MAX)
}

/// Borrow the caller's frame. A null pointer is treated as an empty frame.
///
/// # Safety
///
/// When non-null, `data` must point at `len` initialized, writable samples
/// not aliased for the duration of the borrow.
unsafe fn frame_mut<'a, T>(data: *mut T, len: usize) -> &'a mut [T] {
    if data.is_null() {
        Default::default()
    } else {
        // SAFETY: upheld by the caller.
        unsafe { slice::from_raw_parts_mut(data, len) }
    }
}

// ─── Version & constants ─────────────────────────────────────────────

/// Returns a static, NUL-terminated version string.
#[unsafe(no_mangle)]
pub extern "C" fn apmb_version() -> *const c_char {
    c"0.1.0".as_ptr()
}

/// Processing sample rate in Hz.
#[unsafe(no_mangle)]
pub extern "C" fn apmb_sample_rate_hz() -> i32 {
    SAMPLE_RATE_HZ as i32
}

/// Samples per channel in one 10 ms frame.
#[unsafe(no_mangle)]
pub extern "C" fn apmb_num_samples_per_frame() -> usize {
    SAMPLES_PER_FRAME
}

/// Whether `code` reports success.
#[unsafe(no_mangle)]
pub extern "C" fn apmb_is_success(code: i32) -> bool {
    code == APMB_OK
}

// ─── Lifecycle ───────────────────────────────────────────────────────

/// Returns a configuration with every component disabled and one capture
/// and one render channel.
#[unsafe(no_mangle)]
pub extern "C" fn apmb_config_default() -> ApmbConfig {
    ApmbConfig::from_rust(&Config::default())
}

/// Creates a processing handle.
///
/// Returns `NULL` on failure. When `error_out` is non-null it receives
/// `APMB_OK` or the failure status. The caller owns the handle and must
/// release it with [`apmb_destroy()`].
#[unsafe(no_mangle)]
pub extern "C" fn apmb_create(config: ApmbConfig, error_out: *mut i32) -> *mut ApmbHandle {
    create_with(error_out, || Handle::create(&config.to_rust()))
}

fn create_with(
    error_out: *mut i32,
    create: impl FnOnce() -> Result<Handle<DefaultEngine>, Error>,
) -> *mut ApmbHandle {
    // Stays INTERNAL if `create` panics.
    let mut code = APMB_ERROR_INTERNAL;
    let code_slot = &mut code;
    let handle = ffi_guard_ptr! {
        match create() {
            Ok(inner) => {
                *code_slot = APMB_OK;
                Box::into_raw(Box::new(ApmbHandle { inner }))
            }
            Err(err) => {
                *code_slot = err.code();
                ptr::null_mut()
            }
        }
    };
    if !error_out.is_null() {
        // SAFETY: the caller guarantees a non-null `error_out` is writable.
        unsafe { ptr::write(error_out, code) };
    }
    handle
}

/// Destroys the handle `*handle` points at and sets `*handle` to `NULL`.
///
/// Passing `NULL`, or a pointer to `NULL`, is a no-op, so calling this twice
/// on the same variable is harmless.
#[unsafe(no_mangle)]
pub extern "C" fn apmb_destroy(handle: *mut *mut ApmbHandle) {
    ffi_guard_or! { (),
        if handle.is_null() {
            return;
        }
        // SAFETY: the caller guarantees `handle` points at a handle variable.
        let slot = unsafe { &mut *handle };
        let apm = mem::replace(slot, ptr::null_mut());
        if !apm.is_null() {
            // SAFETY: created by Box::into_raw in apmb_create; the slot was
            // the caller's single owner and is now null.
            drop(unsafe { Box::from_raw(apm) });
        }
    }
}

/// Resets adaptive state, keeping configuration and hints.
#[unsafe(no_mangle)]
pub extern "C" fn apmb_initialize(handle: *mut ApmbHandle) -> i32 {
    ffi_guard! {
        if handle.is_null() {
            return APMB_ERROR_CLOSED;
        }
        // SAFETY: the caller guarantees the pointer is valid and not aliased.
        let apm = unsafe { &mut *handle };
        status(apm.inner.initialize())
    }
}

/// Replaces the configuration. Channel counts in `config` are ignored.
#[unsafe(no_mangle)]
pub extern "C" fn apmb_apply_config(handle: *mut ApmbHandle, config: ApmbConfig) -> i32 {
    ffi_guard! {
        if handle.is_null() {
            return APMB_ERROR_CLOSED;
        }
        // SAFETY: the caller guarantees the pointer is valid and not aliased.
        let apm = unsafe { &mut *handle };
        status(apm.inner.apply_config(&config.to_rust()))
    }
}

// ─── Frames ──────────────────────────────────────────────────────────

/// Processes one interleaved capture frame of `len` floats in place.
#[unsafe(no_mangle)]
pub extern "C" fn apmb_process_stream(
    handle: *mut ApmbHandle,
    data: *mut f32,
    len: usize,
    num_channels: i32,
) -> i32 {
    ffi_guard! {
        if handle.is_null() {
            return APMB_ERROR_CLOSED;
        }
        // SAFETY: the caller guarantees the pointers are valid and `data`
        // holds `len` samples.
        let (apm, frame) = unsafe { (&mut *handle, frame_mut(data, len)) };
        status(apm.inner.process_capture_f32(frame, channel_count(num_channels)))
    }
}

/// Processes one interleaved 16-bit capture frame of `len` samples in place.
#[unsafe(no_mangle)]
pub extern "C" fn apmb_process_int_stream(
    handle: *mut ApmbHandle,
    data: *mut i16,
    len: usize,
    num_channels: i32,
) -> i32 {
    ffi_guard! {
        if handle.is_null() {
            return APMB_ERROR_CLOSED;
        }
        // SAFETY: see apmb_process_stream.
        let (apm, frame) = unsafe { (&mut *handle, frame_mut(data, len)) };
        status(apm.inner.process_capture_i16(frame, channel_count(num_channels)))
    }
}

/// Processes one interleaved render frame of `len` floats.
#[unsafe(no_mangle)]
pub extern "C" fn apmb_process_reverse_stream(
    handle: *mut ApmbHandle,
    data: *mut f32,
    len: usize,
    num_channels: i32,
) -> i32 {
    ffi_guard! {
        if handle.is_null() {
            return APMB_ERROR_CLOSED;
        }
        // SAFETY: see apmb_process_stream.
        let (apm, frame) = unsafe { (&mut *handle, frame_mut(data, len)) };
        status(apm.inner.process_render_f32(frame, channel_count(num_channels)))
    }
}

/// Processes one interleaved 16-bit render frame of `len` samples.
#[unsafe(no_mangle)]
pub extern "C" fn apmb_process_reverse_int_stream(
    handle: *mut ApmbHandle,
    data: *mut i16,
    len: usize,
    num_channels: i32,
) -> i32 {
    ffi_guard! {
        if handle.is_null() {
            return APMB_ERROR_CLOSED;
        }
        // SAFETY: see apmb_process_stream.
        let (apm, frame) = unsafe { (&mut *handle, frame_mut(data, len)) };
        status(apm.inner.process_render_i16(frame, channel_count(num_channels)))
    }
}

// ─── Statistics & hints ──────────────────────────────────────────────

/// Statistics from the latest capture frame. All zero for `NULL`.
#[unsafe(no_mangle)]
pub extern "C" fn apmb_get_statistics(handle: *const ApmbHandle) -> ApmbStats {
    ffi_guard_or! { ApmbStats::default(),
        if handle.is_null() {
            return ApmbStats::default();
        }
        // SAFETY: the caller guarantees the pointer is valid.
        let apm = unsafe { &*handle };
        ApmbStats::from(apm.inner.statistics())
    }
}

/// Sets the render-to-capture delay hint in milliseconds. A negative value
/// selects delay-agnostic mode, as in `ApmbEchoCanceller::stream_delay_ms`.
#[unsafe(no_mangle)]
pub extern "C" fn apmb_set_stream_delay_ms(handle: *mut ApmbHandle, delay_ms: i32) {
    ffi_guard_or! { (),
        // SAFETY: the caller guarantees a non-null pointer is valid and not
        // aliased.
        if let Some(apm) = unsafe { handle.as_mut() } {
            apm.inner.set_stream_delay(stream_delay_from_ms(delay_ms));
        }
    }
}

/// The delay hint in effect, or `0` for `NULL`.
#[unsafe(no_mangle)]
pub extern "C" fn apmb_stream_delay_ms(handle: *const ApmbHandle) -> i32 {
    ffi_guard_or! { 0,
        // SAFETY: the caller guarantees a non-null pointer is valid.
        unsafe { handle.as_ref() }
            .and_then(|apm| apm.inner.stream_delay_ms())
            .unwrap_or(0)
    }
}

/// Reports the current analog input level.
#[unsafe(no_mangle)]
pub extern "C" fn apmb_set_stream_analog_level(handle: *mut ApmbHandle, level: i32) {
    ffi_guard_or! { (),
        // SAFETY: the caller guarantees a non-null pointer is valid and not
        // aliased.
        if let Some(apm) = unsafe { handle.as_mut() } {
            apm.inner.set_stream_analog_level(level);
        }
    }
}

/// The analog level the engine recommends, or `0` for `NULL`.
#[unsafe(no_mangle)]
pub extern "C" fn apmb_recommended_stream_analog_level(handle: *const ApmbHandle) -> i32 {
    ffi_guard_or! { 0,
        // SAFETY: the caller guarantees a non-null pointer is valid.
        unsafe { handle.as_ref() }
            .and_then(|apm| apm.inner.recommended_stream_analog_level())
            .unwrap_or(0)
    }
}

/// Hints that the capture output will be muted.
#[unsafe(no_mangle)]
pub extern "C" fn apmb_set_output_will_be_muted(handle: *mut ApmbHandle, muted: bool) {
    ffi_guard_or! { (),
        // SAFETY: the caller guarantees a non-null pointer is valid and not
        // aliased.
        if let Some(apm) = unsafe { handle.as_mut() } {
            apm.inner.set_output_will_be_muted(muted);
        }
    }
}

/// Hints that a key is being pressed.
#[unsafe(no_mangle)]
pub extern "C" fn apmb_set_stream_key_pressed(handle: *mut ApmbHandle, key_pressed: bool) {
    ffi_guard_or! { (),
        // SAFETY: the caller guarantees a non-null pointer is valid and not
        // aliased.
        if let Some(apm) = unsafe { handle.as_mut() } {
            apm.inner.set_stream_key_pressed(key_pressed);
        }
    }
}

// ─── Tests ───────────────────────────────────────────────────────────
