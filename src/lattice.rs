//! Periodic imaginary-time lattice: parameters and field configuration.
//!
//! A path x[0..N-1] lives on N time slices separated by the spacing a,
//! with x[N] ≡ x[0]. All neighbour lookups go through [`LatticePath::next`]
//! and [`LatticePath::prev`] so the wrap-around is handled in one place.

use serde::{Deserialize, Serialize};

use crate::error::{LatticeError, Result};

/// Immutable lattice parameters of a run.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LatticeParams {
    /// Number of time slices N
    pub n_sites: usize,
    /// Lattice spacing a
    pub spacing: f64,
    /// Metropolis proposal half-width eps
    pub step: f64,
}

impl LatticeParams {
    /// Build and validate lattice parameters.
    pub fn new(n_sites: usize, spacing: f64, step: f64) -> Result<Self> {
        let params = Self { n_sites, spacing, step };
        params.validate()?;
        Ok(params)
    }

    pub fn validate(&self) -> Result<()> {
        if self.n_sites < 2 {
            return Err(LatticeError::InvalidConfig(format!(
                "lattice needs at least 2 sites, got {}",
                self.n_sites
            )));
        }
        if !(self.spacing.is_finite() && self.spacing > 0.0) {
            return Err(LatticeError::InvalidConfig(format!(
                "lattice spacing must be positive, got {}",
                self.spacing
            )));
        }
        if !(self.step.is_finite() && self.step > 0.0) {
            return Err(LatticeError::InvalidConfig(format!(
                "metropolis step must be positive, got {}",
                self.step
            )));
        }
        Ok(())
    }

    /// Total imaginary-time extent T = a·N.
    pub fn extent(&self) -> f64 {
        self.spacing * self.n_sites as f64
    }

    /// Physical time t = a·q of separation q.
    pub fn time(&self, q: usize) -> f64 {
        self.spacing * q as f64
    }
}

/// One imaginary-time path with periodic boundary conditions.
#[derive(Debug, Clone, PartialEq)]
pub struct LatticePath {
    /// Field value at each time slice
    pub sites: Vec<f64>,
}

impl LatticePath {
    /// Cold start: every site at zero.
    pub fn zeros(n_sites: usize) -> Self {
        Self { sites: vec![0.0; n_sites] }
    }

    pub fn from_sites(sites: Vec<f64>) -> Self {
        Self { sites }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.sites.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.sites.is_empty()
    }

    /// Set every site back to zero.
    pub fn reset(&mut self) {
        self.sites.iter_mut().for_each(|x| *x = 0.0);
    }

    /// Index of the following slice, (j + 1) mod N.
    #[inline]
    pub fn next(&self, j: usize) -> usize {
        (j + 1) % self.sites.len()
    }

    /// Index of the preceding slice, (j - 1) mod N.
    #[inline]
    pub fn prev(&self, j: usize) -> usize {
        let n = self.sites.len();
        (j + n - 1) % n
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.sites
    }

    /// <x²> over the slices of this path.
    pub fn mean_square(&self) -> f64 {
        self.sites.iter().map(|x| x * x).sum::<f64>() / self.sites.len() as f64
    }
}
