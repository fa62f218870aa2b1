//! C interface to the SYNOW spectral grid.
//!
//! Callers own an opaque `SynowGridInstance` handle created by
//! `synow_grid_create` or `synow_grid_new` and released with
//! `synow_grid_destroy`. Every fallible call returns a `SynowGridErrorCode`
//! and records a message retrievable with `synow_grid_get_last_error`.

mod error;
mod helpers;
pub mod instance;
pub mod queries;
pub mod trial;

pub use error::{synow_grid_get_last_error, synow_grid_get_last_error_code, SynowGridErrorCode};
pub use instance::{synow_grid_create, synow_grid_destroy, synow_grid_new, SynowGridInstance};
pub use queries::{
    synow_grid_get_geometry, synow_grid_src, synow_grid_tau, synow_grid_v, synow_grid_wl,
    GridGeometry,
};
pub use trial::{synow_grid_push_wavelength, synow_grid_reset, synow_grid_zero, SynowSetup};
