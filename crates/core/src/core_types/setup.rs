//! Per-trial synthesis parameters consumed by the grid

use serde::{Deserialize, Serialize};

/// Parameters of one synthesis trial
///
/// Only the fields the grid reads are modelled here. Velocities share the
/// unit of [`crate::grid::SPEED_OF_LIGHT`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Setup {
    /// Photospheric velocity (innermost shell)
    pub v_phot: f64,
    /// Outer ejecta velocity (outermost shell)
    pub v_outer: f64,
    /// Photospheric temperature (K)
    pub t_phot: f64,
}

impl Setup {
    /// Create a new trial setup
    pub fn new(v_phot: f64, v_outer: f64, t_phot: f64) -> Self {
        Setup {
            v_phot,
            v_outer,
            t_phot,
        }
    }

    /// Velocity span covered by the ejecta
    pub fn velocity_span(&self) -> f64 {
        self.v_outer - self.v_phot
    }
}

impl Default for Setup {
    fn default() -> Self {
        Self {
            v_phot: 10.0,   // Typical SN Ia photosphere near maximum light
            v_outer: 30.0,  // Matches the default grid v_outer_max
            t_phot: 10000.0, // K
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_velocity_span() {
        let setup = Setup::new(1000.0, 20000.0, 9000.0);
        assert_eq!(setup.velocity_span(), 19000.0);
    }

    #[test]
    fn test_default_is_ordered() {
        let setup = Setup::default();
        assert!(setup.v_outer > setup.v_phot);
        assert!(setup.t_phot > 0.0);
    }
}
