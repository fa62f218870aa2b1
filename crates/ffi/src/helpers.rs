use crate::error::{with_last_error_mut, DefaultSynowError, SynowError, SynowGridErrorCode};
use crate::instance::SynowGridInstance;
use std::ffi::CString;

/// Set the thread-local error message and code.
/// Internal helper for FFI functions to record failure details.
pub(crate) fn set_last_error(error: &impl SynowError) {
    with_last_error_mut(|(cstring, code)| {
        *cstring = CString::new(error.msg()).ok();
        *code = error.code();
    });
}

/// Clear the thread-local error message and code.
/// Called on successful operations.
pub(crate) fn clear_last_error() {
    with_last_error_mut(|(cstring, code)| {
        *cstring = None;
        *code = SynowGridErrorCode::Ok;
    });
}

/// Track an error by setting it in thread-local storage and returning its code.
#[inline]
pub(crate) fn track_error(error: &impl SynowError) -> SynowGridErrorCode {
    set_last_error(error);
    error.code()
}

/// Record the outcome of a fallible operation in thread-local storage.
///
/// Clears the last error on success; on failure stores it and returns its code.
pub(crate) fn track_result<T, E>(result: Result<T, E>) -> Result<T, SynowGridErrorCode>
where
    E: Into<DefaultSynowError>,
{
    match result {
        Ok(value) => {
            clear_last_error();
            Ok(value)
        }
        Err(error) => Err(track_error(&error.into())),
    }
}

/// Borrow an instance from a raw pointer.
///
/// # Safety
/// `ptr` must be null or a live pointer returned by `synow_grid_create`/`synow_grid_new`.
pub(crate) unsafe fn instance_from_ptr<'a>(
    ptr: *const SynowGridInstance,
) -> Result<&'a SynowGridInstance, DefaultSynowError> {
    unsafe { ptr.as_ref() }.ok_or_else(|| DefaultSynowError::null_pointer("ptr"))
}

/// Mutably borrow an instance from a raw pointer.
///
/// # Safety
/// `ptr` must be null or a live pointer returned by `synow_grid_create`/`synow_grid_new`,
/// not aliased for the duration of the borrow.
pub(crate) unsafe fn instance_from_ptr_mut<'a>(
    ptr: *mut SynowGridInstance,
) -> Result<&'a mut SynowGridInstance, DefaultSynowError> {
    unsafe { ptr.as_mut() }.ok_or_else(|| DefaultSynowError::null_pointer("ptr"))
}
