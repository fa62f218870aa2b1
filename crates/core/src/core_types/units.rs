//! Semantic unit types for the grid's physical quantities
//!
//! Newtype wrappers that keep wavelengths and temperatures from being mixed
//! up with the plain `f64` velocities and optical depths the grid stores.
//!
//! # Design Philosophy
//! - Both types wrap `f64`; the Planck function needs the precision
//! - Total ordering via `Ord` (NaN handled as greater than all values)
//! - Private inner fields with validated constructors
//! - Serde support for serialization
//!
//! # Usage
//! ```
//! use synow_grid_core::core_types::units::{Angstrom, Kelvin};
//!
//! let t = Kelvin::new(11000.0);
//! assert!((*t - 11000.0).abs() < f64::EPSILON);
//!
//! let wl = Angstrom::new(6355.0);
//! assert!((wl.to_centimeters() - 6.355e-5).abs() < 1e-12);
//! ```

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::ops::Deref;

/// Compare f64 values with total ordering using Rust's built-in `total_cmp`
#[inline]
fn f64_total_cmp(a: f64, b: f64) -> Ordering {
    a.total_cmp(&b)
}

// ============================================================================
// TEMPERATURE
// ============================================================================

/// Absolute temperature in kelvin
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[repr(transparent)]
pub struct Kelvin(f64);

impl Eq for Kelvin {}

impl PartialOrd for Kelvin {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Kelvin {
    fn cmp(&self, other: &Self) -> Ordering {
        f64_total_cmp(self.0, other.0)
    }
}

impl Deref for Kelvin {
    type Target = f64;
    #[inline]
    fn deref(&self) -> &f64 {
        &self.0
    }
}

impl Kelvin {
    /// Absolute zero
    pub const ABSOLUTE_ZERO: Kelvin = Kelvin(0.0);

    /// Create a new Kelvin temperature. Asserts value >= absolute zero (0 K).
    #[inline]
    #[must_use]
    #[track_caller]
    pub fn new(value: f64) -> Self {
        assert!(
            value >= 0.0,
            "Kelvin::new: value is below absolute zero (0 K)"
        );
        Kelvin(value)
    }

    /// Create a temperature if `value` is finite and at or above absolute zero
    #[inline]
    #[must_use]
    pub fn try_new(value: f64) -> Option<Self> {
        (value.is_finite() && value >= 0.0).then_some(Kelvin(value))
    }

    /// Get the raw f64 value
    #[inline]
    #[must_use]
    pub fn value(self) -> f64 {
        self.0
    }
}

impl From<Kelvin> for f64 {
    fn from(k: Kelvin) -> f64 {
        k.0
    }
}

impl fmt::Display for Kelvin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.1} K", self.0)
    }
}

// ============================================================================
// WAVELENGTH
// ============================================================================

/// Wavelength in ångström (1 Å = 1e-8 cm)
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[repr(transparent)]
pub struct Angstrom(f64);

impl Eq for Angstrom {}

impl PartialOrd for Angstrom {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Angstrom {
    fn cmp(&self, other: &Self) -> Ordering {
        f64_total_cmp(self.0, other.0)
    }
}

impl Deref for Angstrom {
    type Target = f64;
    #[inline]
    fn deref(&self) -> &f64 {
        &self.0
    }
}

impl Angstrom {
    /// Ångström to centimetre conversion factor
    const ANGSTROM_TO_CM: f64 = 1.0e-8;

    /// Create a new wavelength. Asserts value > 0.
    #[inline]
    #[must_use]
    #[track_caller]
    pub fn new(value: f64) -> Self {
        assert!(value > 0.0, "Angstrom::new: wavelength must be positive");
        Angstrom(value)
    }

    /// Get the raw f64 value
    #[inline]
    #[must_use]
    pub fn value(self) -> f64 {
        self.0
    }

    /// Convert to centimetres
    #[inline]
    #[must_use]
    pub fn to_centimeters(self) -> f64 {
        self.0 * Self::ANGSTROM_TO_CM
    }
}

impl From<Angstrom> for f64 {
    fn from(a: Angstrom) -> f64 {
        a.0
    }
}

impl fmt::Display for Angstrom {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.2} Å", self.0)
    }
}
