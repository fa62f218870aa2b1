//! Planck blackbody continuum
//!
//! Photospheric continuum used as the lower boundary of the transfer
//! calculation. Intensities are in cgs (erg s⁻¹ cm⁻² sr⁻¹ cm⁻¹); wavelengths
//! are taken in ångström and converted internally.
//!
//! # Scientific References
//! - Planck (1901), "On the Law of Distribution of Energy in the Normal Spectrum"
//! - Rybicki & Lightman (1979), "Radiative Processes in Astrophysics", §1.5

use crate::core_types::units::{Angstrom, Kelvin};
use crate::physics::RadiationModel;
use serde::{Deserialize, Serialize};

/// First radiation constant 2hc² (erg cm² s⁻¹)
const TWO_HC2: f64 = 1.191042972e-5;

/// Second radiation constant hc/k (cm K)
const HC_OVER_K: f64 = 1.438776877;

/// Wien displacement constant expressed in Å K
const WIEN_DISPLACEMENT: f64 = 2.897771955e7;

/// A cached evaluation of the Planck function
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Evaluation {
    pub wavelength: Angstrom,
    pub intensity: f64,
}

/// Blackbody emitter at a single temperature
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Blackbody {
    temperature: Kelvin,
    /// Most recent evaluation, cleared whenever the temperature changes
    last: Option<Evaluation>,
}

impl Blackbody {
    /// Create a blackbody at absolute zero (emits nothing until re-parameterised)
    pub fn new() -> Self {
        Self::with_temperature(Kelvin::ABSOLUTE_ZERO)
    }

    /// Create a blackbody at the given temperature
    pub fn with_temperature(temperature: Kelvin) -> Self {
        Blackbody {
            temperature,
            last: None,
        }
    }

    /// Planck specific intensity `B_λ(T)` without touching the cache
    ///
    /// Returns 0 at absolute zero and wherever the Wien tail underflows.
    pub fn intensity(&self, wavelength: Angstrom) -> f64 {
        let t = self.temperature.value();
        if t <= 0.0 {
            return 0.0;
        }

        let lambda = wavelength.to_centimeters();
        let x = HC_OVER_K / (lambda * t);

        // exp_m1 keeps the Rayleigh-Jeans limit (small x) accurate
        TWO_HC2 / lambda.powi(5) / x.exp_m1()
    }

    /// Wavelength of peak `B_λ` (Wien's law), `None` at absolute zero
    pub fn peak_wavelength(&self) -> Option<Angstrom> {
        let t = self.temperature.value();
        (t > 0.0).then(|| Angstrom::new(WIEN_DISPLACEMENT / t))
    }

    /// Most recent cached evaluation
    pub fn last_evaluation(&self) -> Option<Evaluation> {
        self.last
    }
}

impl Default for Blackbody {
    fn default() -> Self {
        Self::new()
    }
}

impl RadiationModel for Blackbody {
    fn temperature(&self) -> Kelvin {
        self.temperature
    }

    fn set_temperature(&mut self, temperature: Kelvin) {
        if temperature != self.temperature {
            self.last = None;
        }
        self.temperature = temperature;
    }

    fn evaluate(&mut self, wavelength: f64) -> f64 {
        // Unpopulated bins hold 0.0; no emission there and nothing cached
        if !(wavelength.is_finite() && wavelength > 0.0) {
            return 0.0;
        }
        if let Some(cached) = self.last {
            if cached.wavelength.value() == wavelength {
                return cached.intensity;
            }
        }

        let wavelength = Angstrom::new(wavelength);
        let intensity = self.intensity(wavelength);
        self.last = Some(Evaluation {
            wavelength,
            intensity,
        });
        intensity
    }
}
