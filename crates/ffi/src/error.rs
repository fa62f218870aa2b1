use std::cell::RefCell;
use std::ffi::CString;
use std::os::raw::c_char;
use std::ptr;
use synow_grid_core::GridError;

/// Common interface for FFI error types.
///
/// This trait provides a unified way to handle errors across the FFI boundary,
/// allowing both simple error codes and custom error messages.
///
/// # Design
/// - `code()` - Returns the error code to be passed across FFI boundary
/// - `msg()` - Returns the error message for diagnostic purposes
pub(crate) trait SynowError {
    /// Returns the error code to be returned across the FFI boundary.
    fn code(&self) -> SynowGridErrorCode;

    /// Returns the human-readable error message.
    fn msg(&self) -> &str;
}

/// Default implementation of `SynowError` for FFI error scenarios.
///
/// Wraps a `SynowGridErrorCode` with a message. Grid validation errors from
/// the core crate convert into this type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct DefaultSynowError {
    code: SynowGridErrorCode,
    msg: String,
}

impl DefaultSynowError {
    /// Create error for null pointer passed where non-null required.
    ///
    /// # Arguments
    /// * `param_name` - The name of the parameter that was null (e.g., `"out_instance"`, `"ptr"`)
    pub fn null_pointer(param_name: &str) -> Self {
        Self {
            code: SynowGridErrorCode::NullPointer,
            msg: format!("Parameter '{param_name}' cannot be null"),
        }
    }
}

impl From<GridError> for DefaultSynowError {
    fn from(error: GridError) -> Self {
        let code = match error {
            GridError::InvalidWavelengthBounds { .. } => {
                SynowGridErrorCode::InvalidWavelengthBounds
            }
            GridError::InvalidBinWidth { .. } => SynowGridErrorCode::InvalidBinWidth,
            GridError::InsufficientShellCount { .. } => SynowGridErrorCode::InsufficientShellCount,
            GridError::InvalidOuterVelocity { .. } => SynowGridErrorCode::InvalidOuterVelocity,
            GridError::GridTooLarge { .. } => SynowGridErrorCode::GridTooLarge,
            GridError::InvalidVelocityRange { .. } => SynowGridErrorCode::InvalidVelocityRange,
            GridError::InvalidTemperature { .. } => SynowGridErrorCode::InvalidTemperature,
            GridError::WavelengthCapacityExceeded { .. } => {
                SynowGridErrorCode::WavelengthCapacityExceeded
            }
        };
        Self {
            code,
            msg: error.to_string(),
        }
    }
}

impl SynowError for DefaultSynowError {
    fn code(&self) -> SynowGridErrorCode {
        self.code
    }

    fn msg(&self) -> &str {
        &self.msg
    }
}

/// FFI error codes returned by grid functions.
/// Follows standard C convention: 0 = success, non-zero = error.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SynowGridErrorCode {
    /// Operation completed successfully.
    Ok = 0,

    /// Invalid pointer: null pointer passed where non-null required.
    NullPointer = 1,

    /// Wavelength bounds must be finite, positive and strictly increasing.
    InvalidWavelengthBounds = 2,

    /// Bin width is non-positive, non-finite, or too wide to give a single bin.
    InvalidBinWidth = 3,

    /// Fewer than two velocity shells requested.
    InsufficientShellCount = 4,

    /// Maximum outer velocity is negative or non-finite.
    InvalidOuterVelocity = 5,

    /// Grid cell count overflows.
    GridTooLarge = 6,

    /// Setup velocities are non-finite or `v_outer < v_phot`.
    InvalidVelocityRange = 7,

    /// Photospheric temperature is non-finite or non-positive.
    InvalidTemperature = 8,

    /// Every wavelength bin is already populated.
    WavelengthCapacityExceeded = 9,
}

impl From<DefaultSynowError> for SynowGridErrorCode {
    fn from(error: DefaultSynowError) -> Self {
        error.code
    }
}

thread_local! {
    /// Thread-local storage for the most recent FFI error (C string, error code).
    /// Allows callers to retrieve diagnostic information after a failed call.
    static LAST_ERROR: RefCell<(Option<CString>, SynowGridErrorCode)> = const { RefCell::new((None, SynowGridErrorCode::Ok)) };
}

/// Internal helper to read `LAST_ERROR` thread-local storage (cstring, code).
pub(crate) fn with_last_error<F, R>(f: F) -> R
where
    F: FnOnce(&(Option<CString>, SynowGridErrorCode)) -> R,
{
    LAST_ERROR.with_borrow(f)
}

/// Internal helper to mutate `LAST_ERROR` thread-local storage (cstring, code).
pub(crate) fn with_last_error_mut<F, R>(f: F) -> R
where
    F: FnOnce(&mut (Option<CString>, SynowGridErrorCode)) -> R,
{
    LAST_ERROR.with_borrow_mut(f)
}

/// Retrieve the most recent FFI error message as a null-terminated C string.
///
/// Returns:
/// - A borrowed pointer to the error message if an error occurred.
/// - `null` if the last call on this thread succeeded.
///
/// # Lifetime
/// The returned pointer is valid until the next FFI call on this thread.
///
/// **DO NOT FREE THIS POINTER** - it is managed internally.
///
/// Example:
/// ```c
/// SynowGridInstance* grid = NULL;
/// SynowGridErrorCode err = synow_grid_create(3000.0, 10000.0, 0.3, 100, 30.0, &grid);
/// if (err != Ok) {
///     fprintf(stderr, "grid creation failed: %s\n", synow_grid_get_last_error());
/// }
/// ```
#[no_mangle]
pub extern "C" fn synow_grid_get_last_error() -> *const c_char {
    with_last_error(|(cstring, _code)| cstring.as_ref().map_or(ptr::null(), |cs| cs.as_ptr()))
}

/// Retrieve the most recent FFI error code (`Ok` if the last call succeeded).
#[no_mangle]
pub extern "C" fn synow_grid_get_last_error_code() -> SynowGridErrorCode {
    with_last_error(|(_cstring, code)| *code)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::ffi::CStr;

    #[test]
    fn test_grid_error_maps_to_code() {
        let err = DefaultSynowError::from(GridError::InsufficientShellCount { v_size: 1 });
        assert_eq!(err.code(), SynowGridErrorCode::InsufficientShellCount);
        assert!(err.msg().contains("velocity shells"));

        let err = DefaultSynowError::from(GridError::InvalidTemperature { t_phot: -1.0 });
        assert_eq!(
            SynowGridErrorCode::from(err),
            SynowGridErrorCode::InvalidTemperature
        );
    }

    #[test]
    fn test_last_error_round_trip() {
        crate::helpers::set_last_error(&DefaultSynowError::null_pointer("ptr"));

        assert_eq!(synow_grid_get_last_error_code(), SynowGridErrorCode::NullPointer);
        let msg = synow_grid_get_last_error();
        assert!(!msg.is_null());
        let msg = unsafe { CStr::from_ptr(msg) }.to_str().unwrap();
        assert_eq!(msg, "Parameter 'ptr' cannot be null");

        crate::helpers::clear_last_error();
        assert!(synow_grid_get_last_error().is_null());
        assert_eq!(synow_grid_get_last_error_code(), SynowGridErrorCode::Ok);
    }
}
