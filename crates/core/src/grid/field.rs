//! Per-cell field storage for the wavelength × velocity grid
//!
//! Optical depth and source function are stored as flat `Vec<f64>` buffers in
//! wavelength-major order, so each wavelength bin's velocity profile is one
//! contiguous row.

use rayon::prelude::*;
use serde::{Deserialize, Serialize};

/// Flattened 2D field indexed by (wavelength bin, velocity shell)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Field2D {
    /// Values in wavelength-major order (`iw * v_size + iv`)
    data: Vec<f64>,
    /// Number of wavelength bins (rows)
    wl_size: usize,
    /// Number of velocity shells (columns)
    v_size: usize,
}

impl Field2D {
    /// Create a new field with given dimensions, initialized to zero
    ///
    /// # Arguments
    ///
    /// * `wl_size` - Number of wavelength bins
    /// * `v_size` - Number of velocity shells
    ///
    /// # Returns
    ///
    /// New field initialized to all zeros
    #[must_use]
    pub fn new(wl_size: usize, v_size: usize) -> Self {
        Self {
            data: vec![0.0; wl_size * v_size],
            wl_size,
            v_size,
        }
    }

    /// Create a zeroed field, `None` if the size overflows or the allocation fails
    pub fn try_new(wl_size: usize, v_size: usize) -> Option<Self> {
        let len = wl_size.checked_mul(v_size)?;
        let mut data = Vec::new();
        data.try_reserve_exact(len).ok()?;
        data.resize(len, 0.0);
        Some(Self {
            data,
            wl_size,
            v_size,
        })
    }

    /// Number of wavelength bins
    pub fn wl_size(&self) -> usize {
        self.wl_size
    }

    /// Number of velocity shells
    pub fn v_size(&self) -> usize {
        self.v_size
    }

    /// Total number of cells
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// True if the field has no cells
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Flat index of a cell, `None` if out of bounds
    #[inline]
    pub fn index(&self, iw: usize, iv: usize) -> Option<usize> {
        (iw < self.wl_size && iv < self.v_size).then_some(iw * self.v_size + iv)
    }

    /// Get value at (wavelength bin, velocity shell), bounds-checked
    pub fn get(&self, iw: usize, iv: usize) -> Option<f64> {
        self.index(iw, iv).map(|i| self.data[i])
    }

    /// Get mutable reference at (wavelength bin, velocity shell), bounds-checked
    pub fn get_mut(&mut self, iw: usize, iv: usize) -> Option<&mut f64> {
        let i = self.index(iw, iv)?;
        Some(&mut self.data[i])
    }

    /// Set value at (wavelength bin, velocity shell)
    ///
    /// Returns `false` (and writes nothing) if the cell is out of bounds.
    pub fn set(&mut self, iw: usize, iv: usize, value: f64) -> bool {
        match self.get_mut(iw, iv) {
            Some(cell) => {
                *cell = value;
                true
            }
            None => false,
        }
    }

    /// Velocity profile of one wavelength bin
    pub fn row(&self, iw: usize) -> Option<&[f64]> {
        (iw < self.wl_size).then(|| &self.data[iw * self.v_size..(iw + 1) * self.v_size])
    }

    /// Mutable velocity profile of one wavelength bin
    pub fn row_mut(&mut self, iw: usize) -> Option<&mut [f64]> {
        if iw < self.wl_size {
            Some(&mut self.data[iw * self.v_size..(iw + 1) * self.v_size])
        } else {
            None
        }
    }

    /// Parallel iterator over (wavelength bin, mutable velocity profile)
    ///
    /// Lets per-bin physics run across rayon's pool; rows are disjoint.
    pub fn par_rows_mut(&mut self) -> impl IndexedParallelIterator<Item = (usize, &mut [f64])> {
        self.data.par_chunks_mut(self.v_size.max(1)).enumerate()
    }

    /// Fill entire field with a value
    pub fn fill(&mut self, value: f64) {
        self.data.fill(value);
    }

    /// Get reference to field data
    #[must_use]
    pub fn as_slice(&self) -> &[f64] {
        &self.data
    }

    /// Get mutable reference to field data
    pub fn as_mut_slice(&mut self) -> &mut [f64] {
        &mut self.data
    }
}
