//! Panic guards for the exported functions.
//!
//! Unwinding across an `extern "C"` boundary aborts the process, so every
//! exported function runs its body under `catch_unwind`.

/// Run an FFI body, returning `$fallback` if it panics.
macro_rules! ffi_guard_or {
    ($fallback:expr, $($body:tt)*) => {{
        use std::panic;
        use std::panic::AssertUnwindSafe;

        match panic::catch_unwind(AssertUnwindSafe(move || { $($body)* })) {
            Ok(result) => result,
            Err(_) => {
                tracing::error!("panic caught at the C API boundary");
                $fallback
            }
        }
    }};
}

/// Run an FFI body that returns a status code. A panic yields
/// [`APMB_ERROR_INTERNAL`](crate::APMB_ERROR_INTERNAL).
macro_rules! ffi_guard {
    ($($body:tt)*) => {
        $crate::panic_guard::ffi_guard_or!($crate::types::APMB_ERROR_INTERNAL, $($body)*)
    };
}

/// Run an FFI body that returns a pointer. A panic yields null.
macro_rules! ffi_guard_ptr {
    ($($body:tt)*) => {
        $crate::panic_guard::ffi_guard_or!(::core::ptr::null_mut(), $($body)*)
    };
}

pub(crate) use ffi_guard;
pub(crate) use ffi_guard_or;
pub(crate) use ffi_guard_ptr;

#[cfg(test)]
mod tests {
    use crate::types::{APMB_ERROR_INTERNAL, APMB_OK};

    #[test]
    fn status_guard_passes_result_through() {
        let status: i32 = ffi_guard! { APMB_OK };
        assert_eq!(status, APMB_OK);
    }

    #[test]
    fn status_guard_maps_panic_to_internal() {
        let status: i32 = ffi_guard! {
            panic!("boom");
        };
        assert_eq!(status, APMB_ERROR_INTERNAL);
    }

    #[test]
    fn pointer_guard_maps_panic_to_null() {
        let ptr: *mut u8 = ffi_guard_ptr! {
            panic!("boom");
        };
        assert!(ptr.is_null());
    }

    #[test]
    fn fallback_guard_returns_fallback() {
        let value: i32 = ffi_guard_or! { 7,
            panic!("boom");
        };
        assert_eq!(value, 7);
    }
}
