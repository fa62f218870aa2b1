//! Wavelength × velocity grid modules

pub mod config;
pub mod error;
pub mod field;
pub mod synow_grid;

// Re-export main types
pub use config::GridConfig;
pub use error::GridError;
pub use field::Field2D;
pub use synow_grid::*;
