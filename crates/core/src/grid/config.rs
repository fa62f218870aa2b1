//! Grid configuration
//!
//! One `GridConfig` describes a synthesis session: the observed wavelength
//! window to produce, the bin width, the number of velocity shells and the
//! fastest ejecta velocity any trial will use.

use crate::grid::error::GridError;
use serde::{Deserialize, Serialize};

/// Configuration for building a [`crate::SynowGrid`]
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GridConfig {
    /// Bluest output wavelength (Å)
    pub min_output_wl: f64,

    /// Reddest output wavelength (Å)
    pub max_output_wl: f64,

    /// Bin width in velocity units; sets the fractional width of each
    /// logarithmic wavelength bin (`bin_width / c`)
    pub bin_width: f64,

    /// Number of velocity shells from photosphere to outer edge
    pub v_size: usize,

    /// Fastest outer ejecta velocity of any trial; sets the Doppler margins
    pub v_outer_max: f64,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            min_output_wl: 3000.0,
            max_output_wl: 10000.0,
            bin_width: 0.3,
            v_size: 100,
            v_outer_max: 30.0,
        }
    }
}

impl GridConfig {
    /// Check the configuration before any allocation happens
    ///
    /// # Errors
    ///
    /// Returns the first violated constraint: output window, shell count,
    /// bin width, then maximum outer velocity.
    pub fn validate(&self) -> Result<(), GridError> {
        let (min_wl, max_wl) = (self.min_output_wl, self.max_output_wl);
        if !(min_wl.is_finite() && max_wl.is_finite() && min_wl > 0.0 && min_wl < max_wl) {
            return Err(GridError::InvalidWavelengthBounds { min_wl, max_wl });
        }
        if self.v_size < 2 {
            return Err(GridError::InsufficientShellCount {
                v_size: self.v_size,
            });
        }
        if !(self.bin_width.is_finite() && self.bin_width > 0.0) {
            return Err(GridError::InvalidBinWidth {
                bin_width: self.bin_width,
            });
        }
        if !(self.v_outer_max.is_finite() && self.v_outer_max >= 0.0) {
            return Err(GridError::InvalidOuterVelocity {
                v_outer_max: self.v_outer_max,
            });
        }
        Ok(())
    }
}
