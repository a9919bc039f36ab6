//! Bootstrap estimate of the energy gap ΔE(t) from a correlator ensemble.
//!
//! Each repetition resamples the N_cf rows with replacement, averages them
//! column-wise to Ḡ(n), and forms ΔE(q) = ln(Ḡ(q) / Ḡ(q+1)) / a. The curve
//! reports the mean over repetitions and the Bessel-corrected spread.

use nalgebra::DVector;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::error::{checked_table_size, LatticeError, Result};
use crate::sampling::CorrelatorEnsemble;

pub const DEFAULT_BOOTSTRAP_SAMPLES: usize = 100;

/// ΔE at one time separation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GapPoint {
    /// Physical time t = a·q
    pub t: f64,
    /// Mean over bootstrap repetitions
    pub average: f64,
    /// Sample standard deviation over bootstrap repetitions
    pub std_dev: f64,
}

/// ΔE(t) for q = 0..N-2.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnergyGapCurve {
    pub spacing: f64,
    pub points: Vec<GapPoint>,
}

impl EnergyGapCurve {
    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn points(&self) -> &[GapPoint] {
        &self.points
    }

    pub fn times(&self) -> Vec<f64> {
        self.points.iter().map(|p| p.t).collect()
    }

    pub fn averages(&self) -> Vec<f64> {
        self.points.iter().map(|p| p.average).collect()
    }

    pub fn std_devs(&self) -> Vec<f64> {
        self.points.iter().map(|p| p.std_dev).collect()
    }

    /// Collapse B × (N-1) bootstrap replicas into a curve.
    pub(crate) fn from_replicas(replicas: &[Vec<f64>], spacing: f64) -> Result<Self> {
        let n_boot = replicas.len();
        if n_boot < 2 {
            return Err(LatticeError::InvalidConfig(format!(
                "need at least 2 bootstrap replicas, got {n_boot}"
            )));
        }
        let width = replicas[0].len();
        if let Some(bad) = replicas.iter().position(|r| r.len() != width) {
            return Err(LatticeError::InvalidConfig(format!(
                "replica {bad} has {} entries, expected {width}",
                replicas[bad].len()
            )));
        }
        let points = (0..width)
            .map(|q| {
                let mean = replicas.iter().map(|r| r[q]).sum::<f64>() / n_boot as f64;
                let var = replicas.iter().map(|r| (r[q] - mean).powi(2)).sum::<f64>()
                    / (n_boot as f64 - 1.0);
                GapPoint {
                    t: spacing * q as f64,
                    average: mean,
                    std_dev: var.sqrt(),
                }
            })
            .collect();
        Ok(Self { spacing, points })
    }
}

/// Log-ratio energy gaps of one averaged correlator.
///
/// Entries where either Ḡ(q) or Ḡ(q+1) is not strictly positive are set to
/// zero instead of producing NaN.
pub fn energy_gaps(avg: &[f64], spacing: f64) -> Vec<f64> {
    avg.windows(2)
        .map(|w| {
            if w[0] > 0.0 && w[1] > 0.0 {
                (w[0] / w[1]).ln() / spacing
            } else {
                0.0
            }
        })
        .collect()
}

/// Nonparametric bootstrap over the rows of a [`CorrelatorEnsemble`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BootstrapEstimator {
    n_bootstrap: usize,
    spacing: f64,
}

impl BootstrapEstimator {
    /// `n_bootstrap` repetitions (at least 2) for a lattice of spacing `spacing`.
    pub fn new(n_bootstrap: usize, spacing: f64) -> Result<Self> {
        if n_bootstrap < 2 {
            return Err(LatticeError::InvalidConfig(format!(
                "bootstrap needs at least 2 repetitions, got {n_bootstrap}"
            )));
        }
        if !(spacing.is_finite() && spacing > 0.0) {
            return Err(LatticeError::InvalidConfig(format!(
                "lattice spacing must be positive, got {spacing}"
            )));
        }
        Ok(Self { n_bootstrap, spacing })
    }

    pub fn n_bootstrap(&self) -> usize {
        self.n_bootstrap
    }

    /// Column means of one resampled ensemble: N_cf row indices drawn
    /// uniformly with replacement.
    pub fn resample_means<R: Rng + ?Sized>(
        &self,
        ensemble: &CorrelatorEnsemble,
        rng: &mut R,
    ) -> DVector<f64> {
        let n_cf = ensemble.n_samples();
        let n_sites = ensemble.n_sites();
        let samples = ensemble.matrix();
        let mut avg = DVector::zeros(n_sites);
        for _ in 0..n_cf {
            let idx = rng.gen_range(0..n_cf);
            for n in 0..n_sites {
                avg[n] += samples[(idx, n)];
            }
        }
        avg / n_cf as f64
    }

    /// ΔE for every repetition, B rows of N-1 entries.
    ///
    /// One seed per repetition is drawn from `rng` up front, so the result
    /// does not depend on how rayon schedules the repetitions.
    pub fn replicas<R: Rng + ?Sized>(
        &self,
        ensemble: &CorrelatorEnsemble,
        rng: &mut R,
    ) -> Result<Vec<Vec<f64>>> {
        checked_table_size(self.n_bootstrap, ensemble.n_sites() - 1, "bootstrap table")?;
        let seeds: Vec<u64> = (0..self.n_bootstrap).map(|_| rng.gen()).collect();
        Ok(seeds
            .par_iter()
            .map(|&seed| {
                let mut local = StdRng::seed_from_u64(seed);
                let avg = self.resample_means(ensemble, &mut local);
                energy_gaps(avg.as_slice(), self.spacing)
            })
            .collect())
    }

    /// Mean and standard deviation of ΔE(t), one point per q = 0..N-2.
    pub fn estimate<R: Rng + ?Sized>(
        &self,
        ensemble: &CorrelatorEnsemble,
        rng: &mut R,
    ) -> Result<EnergyGapCurve> {
        let replicas = self.replicas(ensemble, rng)?;
        EnergyGapCurve::from_replicas(&replicas, self.spacing)
    }
}
