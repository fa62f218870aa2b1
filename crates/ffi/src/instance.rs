use std::ptr;
use synow_grid_core::SynowGrid;

use crate::error::{DefaultSynowError, SynowGridErrorCode};
use crate::helpers::{track_error, track_result};

/// Opaque grid handle owned by the caller.
///
/// # Thread Safety
/// A handle is not designed for concurrent use. Each worker running its own
/// synthesis trials should create its own handle; sharing one across threads
/// requires external serialisation. Buffer pointers obtained from a handle
/// alias its storage and stay valid until `synow_grid_destroy`.
pub struct SynowGridInstance {
    pub(crate) grid: SynowGrid,
}

impl SynowGridInstance {
    /// Build a handle with Doppler margins applied to the output window.
    ///
    /// # Errors
    ///
    /// Any grid validation error, converted to its FFI code.
    pub(crate) fn create(
        min_output_wl: f64,
        max_output_wl: f64,
        bin_width: f64,
        v_size: usize,
        v_outer_max: f64,
    ) -> Result<Box<Self>, DefaultSynowError> {
        let grid = SynowGrid::create(min_output_wl, max_output_wl, bin_width, v_size, v_outer_max)?;
        Ok(Box::new(Self { grid }))
    }

    /// Build a handle over explicit internal wavelength bounds.
    ///
    /// # Errors
    ///
    /// Any grid validation error, converted to its FFI code.
    pub(crate) fn new(
        min_wl: f64,
        max_wl: f64,
        bin_width: f64,
        v_size: usize,
    ) -> Result<Box<Self>, DefaultSynowError> {
        let grid = SynowGrid::new(min_wl, max_wl, bin_width, v_size)?;
        Ok(Box::new(Self { grid }))
    }
}

/// Write a freshly built instance (or null on failure) into `out_instance`.
///
/// # Safety
/// `out_instance` must be non-null and writable.
unsafe fn publish_instance(
    result: Result<Box<SynowGridInstance>, DefaultSynowError>,
    out_instance: *mut *mut SynowGridInstance,
) -> SynowGridErrorCode {
    match track_result(result) {
        Ok(instance) => {
            unsafe {
                *out_instance = Box::into_raw(instance);
            }
            SynowGridErrorCode::Ok
        }
        Err(code) => {
            unsafe {
                // Set to null on error (per documentation contract)
                *out_instance = ptr::null_mut();
            }
            code
        }
    }
}

/// Create a grid covering the Doppler-shifted output window.
///
/// The internal window is widened to
/// `[min_output_wl / (1 + 3 v_outer_max / c), max_output_wl (1 + v_outer_max / c)]`
/// with `c = 299.792`.
///
/// Returns
/// - `Ok`: success, `out_instance` contains a valid pointer
/// - `NullPointer`: `out_instance` is null
/// - a validation code (`InvalidWavelengthBounds`, `InvalidBinWidth`,
///   `InsufficientShellCount`, `InvalidOuterVelocity`, `GridTooLarge`) with
///   `out_instance` set to null
///
/// # Safety
///
/// - `out_instance` must be a valid, non-null pointer to writable memory.
/// - The caller takes ownership of the returned instance and MUST call
///   `synow_grid_destroy` exactly once.
///
/// Example (C)
/// ```c
/// SynowGridInstance* grid = NULL;
/// if (synow_grid_create(3000.0, 10000.0, 0.3, 100, 30.0, &grid) != Ok) {
///     fprintf(stderr, "%s\n", synow_grid_get_last_error());
///     return;
/// }
/// // ... reset per trial, read buffers ...
/// synow_grid_destroy(grid);
/// ```
#[no_mangle]
pub unsafe extern "C" fn synow_grid_create(
    min_output_wl: f64,
    max_output_wl: f64,
    bin_width: f64,
    v_size: usize,
    v_outer_max: f64,
    out_instance: *mut *mut SynowGridInstance,
) -> SynowGridErrorCode {
    if out_instance.is_null() {
        return track_error(&DefaultSynowError::null_pointer("out_instance"));
    }

    let result = SynowGridInstance::create(
        min_output_wl,
        max_output_wl,
        bin_width,
        v_size,
        v_outer_max,
    );
    unsafe { publish_instance(result, out_instance) }
}

/// Create a grid over explicit internal wavelength bounds (no Doppler margins).
///
/// Same return and ownership contract as `synow_grid_create`.
///
/// # Safety
///
/// - `out_instance` must be a valid, non-null pointer to writable memory.
/// - The caller MUST call `synow_grid_destroy` exactly once on the result.
#[no_mangle]
pub unsafe extern "C" fn synow_grid_new(
    min_wl: f64,
    max_wl: f64,
    bin_width: f64,
    v_size: usize,
    out_instance: *mut *mut SynowGridInstance,
) -> SynowGridErrorCode {
    if out_instance.is_null() {
        return track_error(&DefaultSynowError::null_pointer("out_instance"));
    }

    let result = SynowGridInstance::new(min_wl, max_wl, bin_width, v_size);
    unsafe { publish_instance(result, out_instance) }
}

/// Destroys a grid previously created by `synow_grid_create` or `synow_grid_new`.
///
/// Releases the wavelength, velocity, optical depth and source function
/// buffers and the owned blackbody model. A null `ptr` is a no-op.
///
/// # Safety
/// - The pointer MUST have been created by `synow_grid_create` or `synow_grid_new`.
/// - The pointer MUST NOT have been freed already.
/// - After this call the handle and every buffer pointer obtained from it are dangling.
#[no_mangle]
pub unsafe extern "C" fn synow_grid_destroy(ptr: *mut SynowGridInstance) {
    if ptr.is_null() {
        return;
    }

    // SAFETY: `ptr` came from `Box::into_raw` in `publish_instance` and has not
    // been freed; reclaiming the Box runs the grid's destructor.
    unsafe {
        drop(Box::from_raw(ptr));
    }
}
