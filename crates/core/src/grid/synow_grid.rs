//! Wavelength × velocity radiative-transfer grid
//!
//! The wavelength axis is logarithmic: every bin has the same fractional
//! width `bin_width / c`, so a Doppler shift moves a line by a constant number
//! of bins wherever it sits in the spectrum. The velocity axis is linear from
//! the photosphere to the outer edge of the ejecta.
//!
//! The internal wavelength window is wider than the requested output window.
//! Light leaving the photosphere is blueshifted by up to the outer ejecta
//! velocity, and line interactions can push it further to the blue, so the
//! blue margin is three times the red one.

use crate::core_types::setup::Setup;
use crate::core_types::units::Kelvin;
use crate::grid::config::GridConfig;
use crate::grid::error::GridError;
use crate::grid::field::Field2D;
use crate::physics::{Blackbody, RadiationModel};
use tracing::{debug, warn};

/// Speed of light in the velocity unit of the grid (10³ km/s)
pub const SPEED_OF_LIGHT: f64 = 299.792;

/// Blue-side Doppler margin, in multiples of `v_outer_max / c`
pub const BLUE_MARGIN_FACTOR: f64 = 3.0;

/// Red-side Doppler margin, in multiples of `v_outer_max / c`
pub const RED_MARGIN_FACTOR: f64 = 1.0;

/// Wavelength × velocity grid with optical depth and source function fields
///
/// Geometry (`min_wl`, `max_wl`, `bin_width`, `wl_size`, `v_size`) is fixed at
/// construction. [`SynowGrid::reset`] re-zeroes the contents and re-derives
/// the velocity axis for each trial without reallocating.
///
/// The grid owns its radiation model `M` exclusively; dropping the grid drops
/// the model and all four buffers together.
#[derive(Debug, Clone)]
pub struct SynowGrid<M = Blackbody> {
    /// Internal wavelength bounds (Å)
    min_wl: f64,
    max_wl: f64,

    /// Bin width in velocity units
    bin_width: f64,

    /// Axis sizes
    wl_size: usize,
    v_size: usize,

    /// Wavelength axis, populated by downstream physics
    wl: Vec<f64>,
    /// Velocity of each shell
    v: Vec<f64>,

    /// Optical depth per cell
    tau: Field2D,
    /// Source function per cell
    src: Field2D,

    /// Number of wavelength bins populated so far
    wl_used: usize,

    /// Photospheric radiation model
    bb: M,
}

/// Number of logarithmic bins of fractional width `bin_width / c` in `[min_wl, max_wl]`
///
/// Rounded to nearest. Callers validate the bounds first.
fn log_bin_count(min_wl: f64, max_wl: f64, bin_width: f64) -> Result<usize, GridError> {
    if !(bin_width.is_finite() && bin_width > 0.0) {
        return Err(GridError::InvalidBinWidth { bin_width });
    }

    let bins = (max_wl / min_wl).ln() / (1.0 + bin_width / SPEED_OF_LIGHT).ln();
    let rounded = (bins + 0.5).trunc();
    if !rounded.is_finite() || rounded < 1.0 || rounded > usize::MAX as f64 {
        return Err(GridError::InvalidBinWidth { bin_width });
    }
    Ok(rounded as usize)
}

/// Zeroed buffer of `len` values, `None` if the allocation fails
fn zeroed_buffer(len: usize) -> Option<Vec<f64>> {
    let mut buffer = Vec::new();
    buffer.try_reserve_exact(len).ok()?;
    buffer.resize(len, 0.0);
    Some(buffer)
}

impl SynowGrid<Blackbody> {
    /// Build a grid whose internal window covers the Doppler-shifted output window
    ///
    /// ```text
    /// min_wl = min_output_wl / (1 + 3 · v_outer_max / c)
    /// max_wl = max_output_wl · (1 + 1 · v_outer_max / c)
    /// ```
    ///
    /// # Errors
    ///
    /// [`GridError::InvalidOuterVelocity`] for a negative or non-finite
    /// `v_outer_max`, otherwise any error from [`SynowGrid::new`].
    pub fn create(
        min_output_wl: f64,
        max_output_wl: f64,
        bin_width: f64,
        v_size: usize,
        v_outer_max: f64,
    ) -> Result<Self, GridError> {
        Self::create_with_model(
            min_output_wl,
            max_output_wl,
            bin_width,
            v_size,
            v_outer_max,
            Blackbody::new(),
        )
    }

    /// Build a grid over explicit internal wavelength bounds
    ///
    /// # Errors
    ///
    /// See [`SynowGrid::with_model`].
    pub fn new(min_wl: f64, max_wl: f64, bin_width: f64, v_size: usize) -> Result<Self, GridError> {
        Self::with_model(min_wl, max_wl, bin_width, v_size, Blackbody::new())
    }

    /// Build a grid from a session configuration
    ///
    /// # Errors
    ///
    /// Returns the first constraint the configuration violates.
    pub fn from_config(config: &GridConfig) -> Result<Self, GridError> {
        config.validate()?;
        Self::create(
            config.min_output_wl,
            config.max_output_wl,
            config.bin_width,
            config.v_size,
            config.v_outer_max,
        )
    }
}

impl<M: RadiationModel> SynowGrid<M> {
    /// Factory taking an explicit radiation model; see [`SynowGrid::create`]
    ///
    /// # Errors
    ///
    /// [`GridError::InvalidOuterVelocity`] for a negative or non-finite
    /// `v_outer_max`, otherwise any error from [`SynowGrid::with_model`].
    pub fn create_with_model(
        min_output_wl: f64,
        max_output_wl: f64,
        bin_width: f64,
        v_size: usize,
        v_outer_max: f64,
        model: M,
    ) -> Result<Self, GridError> {
        if !(v_outer_max.is_finite() && v_outer_max >= 0.0) {
            return Err(GridError::InvalidOuterVelocity { v_outer_max });
        }

        let beta = v_outer_max / SPEED_OF_LIGHT;
        let min_wl = min_output_wl / (1.0 + BLUE_MARGIN_FACTOR * beta);
        let max_wl = max_output_wl * (1.0 + RED_MARGIN_FACTOR * beta);

        Self::with_model(min_wl, max_wl, bin_width, v_size, model)
    }

    /// Build a grid over explicit internal wavelength bounds with a given model
    ///
    /// All buffers are allocated once here and zeroed.
    ///
    /// # Errors
    ///
    /// - [`GridError::InvalidWavelengthBounds`] unless `0 < min_wl < max_wl`, both finite
    /// - [`GridError::InsufficientShellCount`] if `v_size < 2`
    /// - [`GridError::InvalidBinWidth`] if the bin width gives no bins
    /// - [`GridError::GridTooLarge`] if `wl_size * v_size` cells overflow the address
    ///   space or the buffers cannot be allocated
    pub fn with_model(
        min_wl: f64,
        max_wl: f64,
        bin_width: f64,
        v_size: usize,
        model: M,
    ) -> Result<Self, GridError> {
        if !(min_wl.is_finite() && max_wl.is_finite() && min_wl > 0.0 && min_wl < max_wl) {
            return Err(GridError::InvalidWavelengthBounds { min_wl, max_wl });
        }
        if v_size < 2 {
            return Err(GridError::InsufficientShellCount { v_size });
        }

        let wl_size = log_bin_count(min_wl, max_wl, bin_width)?;
        let too_large = GridError::GridTooLarge { wl_size, v_size };
        let cells = wl_size.checked_mul(v_size).ok_or(too_large)?;
        let cell_bytes = cells
            .checked_mul(std::mem::size_of::<f64>())
            .ok_or(too_large)?;
        if cell_bytes > isize::MAX as usize {
            return Err(too_large);
        }

        debug!(
            "Grid created: [{:.3}, {:.3}] Å, bin_width={}, {} wavelength bins x {} shells",
            min_wl, max_wl, bin_width, wl_size, v_size
        );

        // Buffers start zeroed; an allocation the system refuses is reported, not aborted on
        let wl = zeroed_buffer(wl_size).ok_or(too_large)?;
        let v = zeroed_buffer(v_size).ok_or(too_large)?;
        let tau = Field2D::try_new(wl_size, v_size).ok_or(too_large)?;
        let src = Field2D::try_new(wl_size, v_size).ok_or(too_large)?;

        Ok(SynowGrid {
            min_wl,
            max_wl,
            bin_width,
            wl_size,
            v_size,
            wl,
            v,
            tau,
            src,
            wl_used: 0,
            bb: model,
        })
    }

    /// Prepare the grid for a new trial
    ///
    /// Zeroes every buffer, lays the velocity axis linearly from `v_phot` to
    /// `v_outer` (end shells set exactly), sets the radiation model to
    /// `t_phot` and evaluates it at `min_wl` then `max_wl`. The values are
    /// discarded; a caching model such as [`Blackbody`] is left holding the
    /// `max_wl` evaluation.
    ///
    /// Nothing is modified if the setup is rejected.
    ///
    /// # Errors
    ///
    /// - [`GridError::InvalidVelocityRange`] for non-finite velocities or `v_outer < v_phot`
    /// - [`GridError::InvalidTemperature`] for a non-finite or non-positive `t_phot`
    pub fn reset(&mut self, setup: &Setup) -> Result<(), GridError> {
        let Setup {
            v_phot,
            v_outer,
            t_phot,
        } = *setup;

        if !(v_phot.is_finite() && v_outer.is_finite() && v_outer >= v_phot) {
            return Err(GridError::InvalidVelocityRange { v_phot, v_outer });
        }
        let temperature = match Kelvin::try_new(t_phot) {
            Some(t) if t > Kelvin::ABSOLUTE_ZERO => t,
            _ => return Err(GridError::InvalidTemperature { t_phot }),
        };
        if v_outer == v_phot {
            warn!("Degenerate setup: v_phot == v_outer == {v_phot}, velocity axis is flat");
        }

        self.zero();

        let v_step = setup.velocity_span() / (self.v_size - 1) as f64;
        let last = self.v_size - 1;
        for i in 1..last {
            self.v[i] = v_phot + i as f64 * v_step;
        }
        self.v[0] = v_phot;
        self.v[last] = v_outer;

        self.bb.set_temperature(temperature);
        self.bb.evaluate(self.min_wl);
        self.bb.evaluate(self.max_wl);

        debug!(
            "Grid reset: v=[{}, {}] step={:.4}, T_phot={}",
            v_phot, v_outer, v_step, temperature
        );
        Ok(())
    }

    /// Zero every buffer and the populated-bin counter without reallocating
    pub fn zero(&mut self) {
        self.wl_used = 0;
        self.wl.fill(0.0);
        self.v.fill(0.0);
        self.tau.fill(0.0);
        self.src.fill(0.0);
    }

    /// Record the next populated wavelength bin
    ///
    /// Writes `wavelength` into `wl[wl_used]` and advances the counter.
    ///
    /// # Returns
    ///
    /// Index of the bin written
    ///
    /// # Errors
    ///
    /// [`GridError::WavelengthCapacityExceeded`] once every bin is in use.
    pub fn push_wavelength(&mut self, wavelength: f64) -> Result<usize, GridError> {
        if self.wl_used >= self.wl_size {
            return Err(GridError::WavelengthCapacityExceeded {
                wl_size: self.wl_size,
            });
        }
        let index = self.wl_used;
        self.wl[index] = wavelength;
        self.wl_used += 1;
        Ok(index)
    }

    /// Wavelength of bin `i` on the logarithmic axis, `min_wl · (1 + bin_width/c)^i`
    pub fn bin_wavelength(&self, i: usize) -> Option<f64> {
        if i >= self.wl_size {
            return None;
        }
        let log_step = (1.0 + self.bin_width / SPEED_OF_LIGHT).ln();
        Some(self.min_wl * (i as f64 * log_step).exp())
    }

    // Geometry queries

    /// Internal minimum wavelength (Å)
    pub fn min_wl(&self) -> f64 {
        self.min_wl
    }

    /// Internal maximum wavelength (Å)
    pub fn max_wl(&self) -> f64 {
        self.max_wl
    }

    /// Bin width in velocity units
    pub fn bin_width(&self) -> f64 {
        self.bin_width
    }

    /// Number of wavelength bins
    pub fn wl_size(&self) -> usize {
        self.wl_size
    }

    /// Number of velocity shells
    pub fn v_size(&self) -> usize {
        self.v_size
    }

    /// Number of cells in each 2D field
    pub fn cell_count(&self) -> usize {
        self.wl_size * self.v_size
    }

    /// Number of wavelength bins populated since the last reset
    pub fn wl_used(&self) -> usize {
        self.wl_used
    }

    // Buffer access for downstream physics

    /// Wavelength axis
    pub fn wl(&self) -> &[f64] {
        &self.wl
    }

    /// Mutable wavelength axis
    pub fn wl_mut(&mut self) -> &mut [f64] {
        &mut self.wl
    }

    /// Velocity axis
    pub fn v(&self) -> &[f64] {
        &self.v
    }

    /// Mutable velocity axis
    pub fn v_mut(&mut self) -> &mut [f64] {
        &mut self.v
    }

    /// Optical depth field
    pub fn tau(&self) -> &Field2D {
        &self.tau
    }

    /// Mutable optical depth field
    pub fn tau_mut(&mut self) -> &mut Field2D {
        &mut self.tau
    }

    /// Source function field
    pub fn src(&self) -> &Field2D {
        &self.src
    }

    /// Mutable source function field
    pub fn src_mut(&mut self) -> &mut Field2D {
        &mut self.src
    }

    /// Owned radiation model
    pub fn radiation_model(&self) -> &M {
        &self.bb
    }

    /// Mutable owned radiation model
    pub fn radiation_model_mut(&mut self) -> &mut M {
        &mut self.bb
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn sample_grid() -> SynowGrid {
        SynowGrid::new(3000.0, 10000.0, 0.3, 5).unwrap()
    }

    #[test]
    fn test_grid_creation() {
        let grid = sample_grid();

        // ln(10000/3000) / ln(1 + 0.3/299.792) = 1203.74
        assert_eq!(grid.wl_size(), 1204);
        assert_eq!(grid.v_size(), 5);
        assert_eq!(grid.wl().len(), 1204);
        assert_eq!(grid.v().len(), 5);
        assert_eq!(grid.tau().len(), 1204 * 5);
        assert_eq!(grid.src().len(), 1204 * 5);
        assert_eq!(grid.cell_count(), 1204 * 5);
    }

    #[test]
    fn test_new_grid_is_zeroed() {
        let grid = sample_grid();
        assert_eq!(grid.wl_used(), 0);
        assert!(grid.wl().iter().all(|&x| x == 0.0));
        assert!(grid.v().iter().all(|&x| x == 0.0));
        assert!(grid.tau().as_slice().iter().all(|&x| x == 0.0));
        assert!(grid.src().as_slice().iter().all(|&x| x == 0.0));
    }

    #[test]
    fn test_factory_margins() {
        let grid = SynowGrid::create(5000.0, 10000.0, 0.3, 5, 10000.0).unwrap();

        let beta = 10000.0 / 299.792;
        assert_relative_eq!(grid.min_wl(), 5000.0 / (1.0 + 3.0 * beta), max_relative = 1e-12);
        assert_relative_eq!(grid.max_wl(), 10000.0 * (1.0 + beta), max_relative = 1e-12);
        assert_relative_eq!(grid.min_wl(), 49.47, epsilon = 0.01);
        assert_relative_eq!(grid.max_wl(), 343567.0, max_relative = 1e-4);
    }

    #[test]
    fn test_factory_without_velocity_keeps_window() {
        let grid = SynowGrid::create(3000.0, 10000.0, 0.3, 5, 0.0).unwrap();
        assert_eq!(grid.min_wl(), 3000.0);
        assert_eq!(grid.max_wl(), 10000.0);
    }

    #[test]
    fn test_factory_rejects_negative_velocity() {
        let err = SynowGrid::create(3000.0, 10000.0, 0.3, 5, -1.0).unwrap_err();
        assert_eq!(err, GridError::InvalidOuterVelocity { v_outer_max: -1.0 });
    }

    #[test]
    fn test_construction_errors() {
        assert!(matches!(
            SynowGrid::new(10000.0, 3000.0, 0.3, 5),
            Err(GridError::InvalidWavelengthBounds { .. })
        ));
        assert!(matches!(
            SynowGrid::new(0.0, 3000.0, 0.3, 5),
            Err(GridError::InvalidWavelengthBounds { .. })
        ));
        assert!(matches!(
            SynowGrid::new(3000.0, 3000.0, 0.3, 5),
            Err(GridError::InvalidWavelengthBounds { .. })
        ));
        assert!(matches!(
            SynowGrid::new(3000.0, 10000.0, 0.3, 1),
            Err(GridError::InsufficientShellCount { v_size: 1 })
        ));
        assert!(matches!(
            SynowGrid::new(3000.0, 10000.0, 0.0, 5),
            Err(GridError::InvalidBinWidth { .. })
        ));
        assert!(matches!(
            SynowGrid::new(3000.0, 10000.0, f64::NAN, 5),
            Err(GridError::InvalidBinWidth { .. })
        ));
    }

    #[test]
    fn test_oversized_grid_is_reported() {
        // Cell count overflows usize
        assert_eq!(
            SynowGrid::new(3000.0, 10000.0, 0.3, usize::MAX).unwrap_err(),
            GridError::GridTooLarge {
                wl_size: 1204,
                v_size: usize::MAX
            }
        );

        // Cell count fits, byte count does not
        let v_size = usize::MAX / 2048;
        assert_eq!(
            SynowGrid::new(3000.0, 10000.0, 0.3, v_size).unwrap_err(),
            GridError::GridTooLarge {
                wl_size: 1204,
                v_size
            }
        );

        // Tiny bins over a huge window: about 1e18 bins, 1.7e19 bytes per field
        assert!(matches!(
            SynowGrid::new(1.0, 1e300, 2.07e-13, 2),
            Err(GridError::GridTooLarge { v_size: 2, .. })
        ));
    }

    #[test]
    fn test_bin_count_uses_log_of_one_plus_ratio() {
        for bin_width in [0.05, 0.3, 1.0, 2.5] {
            let grid = SynowGrid::new(3000.0, 10000.0, bin_width, 3).unwrap();
            let bins = (10000.0_f64 / 3000.0).ln() / (1.0 + bin_width / 299.792).ln();
            assert_eq!(grid.wl_size(), (bins + 0.5) as usize);
        }
    }

    #[test]
    fn test_bin_width_too_wide_for_window() {
        // A single bin spans far more than the window, rounding to zero bins
        let err = SynowGrid::new(3000.0, 3001.0, 300.0, 5).unwrap_err();
        assert_eq!(err, GridError::InvalidBinWidth { bin_width: 300.0 });
    }

    #[test]
    fn test_reset_velocity_axis() {
        let mut grid = sample_grid();
        grid.reset(&Setup::new(1000.0, 20000.0, 10000.0)).unwrap();
        assert_eq!(grid.v(), &[1000.0, 5750.0, 10500.0, 15250.0, 20000.0]);
    }

    #[test]
    fn test_reset_clears_downstream_writes() {
        let mut grid = sample_grid();
        grid.push_wavelength(3001.0).unwrap();
        grid.tau_mut().set(3, 2, 0.8);
        grid.src_mut().fill(1.0);

        grid.reset(&Setup::default()).unwrap();

        assert_eq!(grid.wl_used(), 0);
        assert!(grid.wl().iter().all(|&x| x == 0.0));
        assert!(grid.tau().as_slice().iter().all(|&x| x == 0.0));
        assert!(grid.src().as_slice().iter().all(|&x| x == 0.0));
    }

    #[test]
    fn test_reset_sets_temperature_and_probes_extremes() {
        let mut grid = sample_grid();
        grid.reset(&Setup::new(10.0, 25.0, 12000.0)).unwrap();

        let bb = grid.radiation_model();
        assert_eq!(bb.temperature(), Kelvin::new(12000.0));
        let last = bb.last_evaluation().unwrap();
        assert_eq!(last.wavelength.value(), grid.max_wl());
        assert!(last.intensity > 0.0);
    }

    #[test]
    fn test_reset_rejects_bad_setup_without_mutating() {
        let mut grid = sample_grid();
        grid.reset(&Setup::new(1000.0, 20000.0, 10000.0)).unwrap();
        grid.tau_mut().set(0, 0, 2.0);

        assert_eq!(
            grid.reset(&Setup::new(20000.0, 1000.0, 10000.0)),
            Err(GridError::InvalidVelocityRange {
                v_phot: 20000.0,
                v_outer: 1000.0
            })
        );
        assert_eq!(
            grid.reset(&Setup::new(1000.0, 20000.0, 0.0)),
            Err(GridError::InvalidTemperature { t_phot: 0.0 })
        );
        assert!(matches!(
            grid.reset(&Setup::new(f64::NAN, 20000.0, 10000.0)),
            Err(GridError::InvalidVelocityRange { .. })
        ));

        assert_eq!(grid.tau().get(0, 0), Some(2.0));
        assert_eq!(grid.v()[4], 20000.0);
    }

    #[test]
    fn test_reset_flat_velocity_axis() {
        let mut grid = sample_grid();
        grid.reset(&Setup::new(12.0, 12.0, 10000.0)).unwrap();
        assert!(grid.v().iter().all(|&v| v == 12.0));
    }

    #[test]
    fn test_zero() {
        let mut grid = sample_grid();
        grid.reset(&Setup::default()).unwrap();
        grid.push_wavelength(3500.0).unwrap();
        grid.src_mut().set(1, 1, 4.0);

        grid.zero();

        assert_eq!(grid.wl_used(), 0);
        assert!(grid.v().iter().all(|&x| x == 0.0));
        assert!(grid.src().as_slice().iter().all(|&x| x == 0.0));
        assert_eq!(grid.wl_size(), 1204);
    }

    #[test]
    fn test_push_wavelength_capacity() {
        let mut grid = SynowGrid::new(3000.0, 3010.0, 0.3, 2).unwrap();
        let capacity = grid.wl_size();
        assert!(capacity >= 1);

        for i in 0..capacity {
            assert_eq!(grid.push_wavelength(3000.0 + i as f64), Ok(i));
        }
        assert_eq!(grid.wl_used(), capacity);
        assert_eq!(
            grid.push_wavelength(4000.0),
            Err(GridError::WavelengthCapacityExceeded { wl_size: capacity })
        );
    }

    #[test]
    fn test_bin_wavelength_axis() {
        let grid = sample_grid();
        assert_relative_eq!(grid.bin_wavelength(0).unwrap(), 3000.0, max_relative = 1e-14);

        // Rounding the bin count moves the last bin by less than one bin width
        let last = grid.bin_wavelength(grid.wl_size() - 1).unwrap();
        let ratio = 1.0 + grid.bin_width() / SPEED_OF_LIGHT;
        assert!(last < grid.max_wl() * ratio);
        assert!(last > grid.max_wl() / ratio / ratio);

        assert!(grid.bin_wavelength(grid.wl_size()).is_none());
    }

    #[test]
    fn test_from_config() {
        let grid = SynowGrid::from_config(&GridConfig::default()).unwrap();
        assert_eq!(grid.v_size(), 100);
        assert!(grid.min_wl() < 3000.0);
        assert!(grid.max_wl() > 10000.0);

        let bad = GridConfig {
            v_size: 0,
            ..Default::default()
        };
        assert_eq!(
            SynowGrid::from_config(&bad).unwrap_err(),
            GridError::InsufficientShellCount { v_size: 0 }
        );
    }
}
