use synow_grid_core::Setup;

use crate::error::SynowGridErrorCode;
use crate::helpers::{instance_from_ptr_mut, track_error, track_result};
use crate::instance::SynowGridInstance;

/// C-compatible trial parameters consumed by `synow_grid_reset`.
#[repr(C)]
#[derive(Debug, Clone, Copy)]
pub struct SynowSetup {
    /// Photospheric velocity (same unit as the light-speed constant 299.792)
    pub v_phot: f64,
    /// Outer ejecta velocity
    pub v_outer: f64,
    /// Photospheric temperature (K)
    pub t_phot: f64,
}

impl From<SynowSetup> for Setup {
    fn from(setup: SynowSetup) -> Self {
        Setup::new(setup.v_phot, setup.v_outer, setup.t_phot)
    }
}

/// Prepare the grid for a new synthesis trial.
///
/// Zeroes every buffer, lays the velocity axis from `v_phot` to `v_outer` and
/// sets the blackbody to `t_phot`. Geometry and buffer pointers are unchanged.
///
/// Returns `Ok`, `NullPointer`, `InvalidVelocityRange` or `InvalidTemperature`.
/// The grid is untouched on failure.
///
/// # Safety
/// `ptr` must be null or a live pointer from `synow_grid_create`/`synow_grid_new`.
#[no_mangle]
pub unsafe extern "C" fn synow_grid_reset(
    ptr: *mut SynowGridInstance,
    setup: SynowSetup,
) -> SynowGridErrorCode {
    let instance = match unsafe { instance_from_ptr_mut(ptr) } {
        Ok(instance) => instance,
        Err(e) => return track_error(&e),
    };

    match track_result(instance.grid.reset(&setup.into())) {
        Ok(()) => SynowGridErrorCode::Ok,
        Err(code) => code,
    }
}

/// Zero every buffer and the populated-bin counter without touching the velocity setup.
///
/// # Safety
/// `ptr` must be null or a live pointer from `synow_grid_create`/`synow_grid_new`.
#[no_mangle]
pub unsafe extern "C" fn synow_grid_zero(ptr: *mut SynowGridInstance) -> SynowGridErrorCode {
    match track_result(unsafe { instance_from_ptr_mut(ptr) }) {
        Ok(instance) => {
            instance.grid.zero();
            SynowGridErrorCode::Ok
        }
        Err(code) => code,
    }
}

/// Append the next populated wavelength bin.
///
/// On success writes the bin index to `out_index` (if non-null).
/// Returns `WavelengthCapacityExceeded` once every bin is in use.
///
/// # Safety
/// - `ptr` must be null or a live pointer from `synow_grid_create`/`synow_grid_new`.
/// - `out_index` must be null or valid for writes.
#[no_mangle]
pub unsafe extern "C" fn synow_grid_push_wavelength(
    ptr: *mut SynowGridInstance,
    wavelength: f64,
    out_index: *mut usize,
) -> SynowGridErrorCode {
    let instance = match unsafe { instance_from_ptr_mut(ptr) } {
        Ok(instance) => instance,
        Err(e) => return track_error(&e),
    };

    match track_result(instance.grid.push_wavelength(wavelength)) {
        Ok(index) => {
            if !out_index.is_null() {
                unsafe {
                    *out_index = index;
                }
            }
            SynowGridErrorCode::Ok
        }
        Err(code) => code,
    }
}
