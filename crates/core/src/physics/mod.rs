//! Radiation models driven by the grid

pub mod blackbody;
pub mod radiation_model;

pub use blackbody::Blackbody;
pub use radiation_model::RadiationModel;
