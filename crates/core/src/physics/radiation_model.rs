//! Radiation model trait definition
//!
//! The grid owns exactly one radiation model, re-parameterised by the
//! photospheric temperature on every reset. This trait is the seam between
//! the grid and the model so that alternative continua (or instrumented
//! models in tests) can be dropped in.

use crate::core_types::units::Kelvin;

/// Temperature-parameterised continuum emitter owned by the grid
pub trait RadiationModel: Send {
    /// Current model temperature
    fn temperature(&self) -> Kelvin;

    /// Re-parameterise the model
    ///
    /// Invalidates anything the model derived from the previous temperature.
    fn set_temperature(&mut self, temperature: Kelvin);

    /// Evaluate the specific intensity at a wavelength
    ///
    /// # Arguments
    ///
    /// * `wavelength` - Wavelength in ångström; non-positive or non-finite values yield 0
    ///
    /// # Returns
    ///
    /// Specific intensity per unit wavelength. Models may cache the result,
    /// which is why evaluation takes `&mut self`.
    fn evaluate(&mut self, wavelength: f64) -> f64;
}
