//! Core types and utilities

pub mod setup;
pub mod units;

pub use setup::Setup;
pub use units::*;
