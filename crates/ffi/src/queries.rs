//! FFI query functions for grid geometry and buffers.
//!
//! Buffers are exposed as raw pointers into the grid's own storage so that
//! downstream opacity and transfer code can read and write them in place.
//! `tau` and `src` are wavelength-major: cell `(iw, iv)` is at `iw * v_size + iv`.

use std::ptr;

use crate::error::{DefaultSynowError, SynowGridErrorCode};
use crate::helpers::{instance_from_ptr, instance_from_ptr_mut, track_error, track_result};
use crate::instance::SynowGridInstance;

/// C-compatible snapshot of the grid geometry.
#[repr(C)]
#[derive(Debug, Clone, Copy, Default)]
pub struct GridGeometry {
    /// Internal minimum wavelength (Å)
    pub min_wl: f64,
    /// Internal maximum wavelength (Å)
    pub max_wl: f64,
    /// Bin width in velocity units
    pub bin_width: f64,
    /// Number of wavelength bins
    pub wl_size: usize,
    /// Number of velocity shells
    pub v_size: usize,
    /// Wavelength bins populated since the last reset
    pub wl_used: usize,
}

/// Read the grid geometry into `out_geometry`.
///
/// # Safety
/// - `ptr` must be null or a live pointer from `synow_grid_create`/`synow_grid_new`.
/// - `out_geometry` must be null or valid for writes.
#[no_mangle]
pub unsafe extern "C" fn synow_grid_get_geometry(
    ptr: *const SynowGridInstance,
    out_geometry: *mut GridGeometry,
) -> SynowGridErrorCode {
    if out_geometry.is_null() {
        return track_error(&DefaultSynowError::null_pointer("out_geometry"));
    }

    match track_result(unsafe { instance_from_ptr(ptr) }) {
        Ok(instance) => {
            let grid = &instance.grid;
            unsafe {
                *out_geometry = GridGeometry {
                    min_wl: grid.min_wl(),
                    max_wl: grid.max_wl(),
                    bin_width: grid.bin_width(),
                    wl_size: grid.wl_size(),
                    v_size: grid.v_size(),
                    wl_used: grid.wl_used(),
                };
            }
            SynowGridErrorCode::Ok
        }
        Err(code) => code,
    }
}

/// Which buffer a pointer query refers to.
#[derive(Clone, Copy)]
enum Buffer {
    Wavelength,
    Velocity,
    OpticalDepth,
    Source,
}

/// Resolve a buffer pointer, recording a null-pointer error on a null handle.
unsafe fn buffer_ptr(ptr: *mut SynowGridInstance, buffer: Buffer) -> *mut f64 {
    match track_result(unsafe { instance_from_ptr_mut(ptr) }) {
        Ok(instance) => {
            let grid = &mut instance.grid;
            match buffer {
                Buffer::Wavelength => grid.wl_mut().as_mut_ptr(),
                Buffer::Velocity => grid.v_mut().as_mut_ptr(),
                Buffer::OpticalDepth => grid.tau_mut().as_mut_slice().as_mut_ptr(),
                Buffer::Source => grid.src_mut().as_mut_slice().as_mut_ptr(),
            }
        }
        Err(_) => ptr::null_mut(),
    }
}

/// Wavelength axis (`wl_size` values). Null if `ptr` is null.
///
/// # Safety
/// `ptr` must be null or a live pointer from `synow_grid_create`/`synow_grid_new`.
/// The returned pointer is valid until `synow_grid_destroy`.
#[no_mangle]
pub unsafe extern "C" fn synow_grid_wl(ptr: *mut SynowGridInstance) -> *mut f64 {
    unsafe { buffer_ptr(ptr, Buffer::Wavelength) }
}

/// Velocity axis (`v_size` values). Null if `ptr` is null.
///
/// # Safety
/// `ptr` must be null or a live pointer from `synow_grid_create`/`synow_grid_new`.
/// The returned pointer is valid until `synow_grid_destroy`.
#[no_mangle]
pub unsafe extern "C" fn synow_grid_v(ptr: *mut SynowGridInstance) -> *mut f64 {
    unsafe { buffer_ptr(ptr, Buffer::Velocity) }
}

/// Optical depth field (`wl_size * v_size` values). Null if `ptr` is null.
///
/// # Safety
/// `ptr` must be null or a live pointer from `synow_grid_create`/`synow_grid_new`.
/// The returned pointer is valid until `synow_grid_destroy`.
#[no_mangle]
pub unsafe extern "C" fn synow_grid_tau(ptr: *mut SynowGridInstance) -> *mut f64 {
    unsafe { buffer_ptr(ptr, Buffer::OpticalDepth) }
}

/// Source function field (`wl_size * v_size` values). Null if `ptr` is null.
///
/// # Safety
/// `ptr` must be null or a live pointer from `synow_grid_create`/`synow_grid_new`.
/// The returned pointer is valid until `synow_grid_destroy`.
#[no_mangle]
pub unsafe extern "C" fn synow_grid_src(ptr: *mut SynowGridInstance) -> *mut f64 {
    unsafe { buffer_ptr(ptr, Buffer::Source) }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::instance::{synow_grid_create, synow_grid_destroy};
    use crate::trial::{synow_grid_reset, SynowSetup};
    use std::slice;

    #[test]
    fn test_geometry() {
        let mut grid: *mut SynowGridInstance = ptr::null_mut();
        let code = unsafe { synow_grid_create(5000.0, 10000.0, 0.3, 5, 10000.0, &mut grid) };
        assert_eq!(code, SynowGridErrorCode::Ok);

        let mut geometry = GridGeometry::default();
        assert_eq!(
            unsafe { synow_grid_get_geometry(grid, &mut geometry) },
            SynowGridErrorCode::Ok
        );
        assert!((geometry.min_wl - 5000.0 / (1.0 + 3.0 * 10000.0 / 299.792)).abs() < 1e-9);
        assert!((geometry.max_wl / (10000.0 * (1.0 + 10000.0 / 299.792)) - 1.0).abs() < 1e-12);
        assert_eq!(geometry.v_size, 5);
        assert!(geometry.wl_size >= 1);
        assert_eq!(geometry.wl_used, 0);

        unsafe { synow_grid_destroy(grid) };
    }

    #[test]
    fn test_buffers_alias_grid_storage() {
        let mut grid: *mut SynowGridInstance = ptr::null_mut();
        let code = unsafe { synow_grid_create(3000.0, 10000.0, 0.3, 4, 30.0, &mut grid) };
        assert_eq!(code, SynowGridErrorCode::Ok);
        let setup = SynowSetup {
            v_phot: 10.0,
            v_outer: 25.0,
            t_phot: 11000.0,
        };
        assert_eq!(unsafe { synow_grid_reset(grid, setup) }, SynowGridErrorCode::Ok);

        let v = unsafe { slice::from_raw_parts(synow_grid_v(grid), 4) };
        assert_eq!(v, &[10.0, 15.0, 20.0, 25.0]);

        // Write through the raw pointer, read back through the grid
        let tau = unsafe { synow_grid_tau(grid) };
        unsafe { *tau.add(4 + 2) = 0.75 };
        assert_eq!(unsafe { &(*grid).grid }.tau().get(1, 2), Some(0.75));

        let src = unsafe { synow_grid_src(grid) };
        let wl = unsafe { synow_grid_wl(grid) };
        assert!(!src.is_null());
        assert!(!wl.is_null());

        unsafe { synow_grid_destroy(grid) };
    }

    #[test]
    fn test_null_handle_yields_null_buffers() {
        assert!(unsafe { synow_grid_tau(ptr::null_mut()) }.is_null());
        assert_eq!(
            crate::error::synow_grid_get_last_error_code(),
            SynowGridErrorCode::NullPointer
        );

        let mut geometry = GridGeometry::default();
        assert_eq!(
            unsafe { synow_grid_get_geometry(ptr::null(), &mut geometry) },
            SynowGridErrorCode::NullPointer
        );
    }
}
