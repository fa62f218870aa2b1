//! Synow Grid Core Library
//!
//! Wavelength × velocity radiative-transfer grid for parameterised supernova
//! spectrum synthesis. Builds a logarithmically binned wavelength axis wide
//! enough to hold the Doppler-shifted output window, a linear velocity axis
//! from the photosphere to the outer ejecta, and the per-cell optical depth
//! and source function fields that downstream opacity and transfer routines
//! write into.
//!
//! ## Lifecycle
//!
//! - [`SynowGrid::create`] once per synthesis configuration
//! - [`SynowGrid::reset`] once per trial, against a [`Setup`]
//! - drop at the end of the session

// Core types and utilities
pub mod core_types;

// Radiation models
pub mod physics;

// Grid construction and per-trial state
pub mod grid;

// Re-export core types
pub use core_types::{Angstrom, Kelvin, Setup};

// Re-export physics types
pub use physics::{Blackbody, RadiationModel};

// Re-export grid types
pub use grid::{Field2D, GridConfig, GridError, SynowGrid, SPEED_OF_LIGHT};
