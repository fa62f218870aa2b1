//! Grid construction and reset errors

use std::fmt;

/// Errors raised while building or resetting a grid
///
/// All variants are validation failures. They are fatal to the operation
/// that raised them; the grid (if any) is left untouched.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GridError {
    /// Wavelength bounds must be finite, positive and strictly increasing
    InvalidWavelengthBounds { min_wl: f64, max_wl: f64 },
    /// Bin width must be finite, positive and small enough to give at least one bin
    InvalidBinWidth { bin_width: f64 },
    /// At least two velocity shells (photosphere and outer edge) are required
    InsufficientShellCount { v_size: usize },
    /// Maximum outer velocity must be finite and non-negative
    InvalidOuterVelocity { v_outer_max: f64 },
    /// `wl_size * v_size` does not fit in memory addressing
    GridTooLarge { wl_size: usize, v_size: usize },
    /// Setup velocities must be finite with `v_outer >= v_phot`
    InvalidVelocityRange { v_phot: f64, v_outer: f64 },
    /// Photospheric temperature must be finite and positive
    InvalidTemperature { t_phot: f64 },
    /// Every wavelength bin is already populated
    WavelengthCapacityExceeded { wl_size: usize },
}

impl fmt::Display for GridError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GridError::InvalidWavelengthBounds { min_wl, max_wl } => write!(
                f,
                "Invalid wavelength bounds: need 0 < min_wl < max_wl, got [{min_wl}, {max_wl}]"
            ),
            GridError::InvalidBinWidth { bin_width } => {
                write!(f, "Invalid bin width {bin_width}: yields no wavelength bins")
            }
            GridError::InsufficientShellCount { v_size } => {
                write!(f, "Need at least 2 velocity shells, got {v_size}")
            }
            GridError::InvalidOuterVelocity { v_outer_max } => write!(
                f,
                "Maximum outer velocity must be finite and non-negative, got {v_outer_max}"
            ),
            GridError::GridTooLarge { wl_size, v_size } => {
                write!(f, "Grid of {wl_size} x {v_size} cells is too large")
            }
            GridError::InvalidVelocityRange { v_phot, v_outer } => write!(
                f,
                "Invalid velocity range: need v_phot <= v_outer, got v_phot={v_phot}, v_outer={v_outer}"
            ),
            GridError::InvalidTemperature { t_phot } => {
                write!(f, "Photospheric temperature must be positive, got {t_phot}")
            }
            GridError::WavelengthCapacityExceeded { wl_size } => {
                write!(f, "All {wl_size} wavelength bins are in use")
            }
        }
    }
}

impl std::error::Error for GridError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_mentions_values() {
        let err = GridError::InvalidWavelengthBounds {
            min_wl: 9000.0,
            max_wl: 3000.0,
        };
        let msg = err.to_string();
        assert!(msg.contains("9000"));
        assert!(msg.contains("3000"));

        let err = GridError::InsufficientShellCount { v_size: 1 };
        assert_eq!(err.to_string(), "Need at least 2 velocity shells, got 1");
    }

    #[test]
    fn test_is_std_error() {
        let err: Box<dyn std::error::Error> = Box::new(GridError::InvalidBinWidth { bin_width: 0.0 });
        assert!(err.to_string().contains("bin width"));
    }
}
