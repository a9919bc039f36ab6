//! Ensemble generation: thermalization, decorrelation sweeps and one
//! correlator row per recorded configuration.

use std::sync::atomic::{AtomicBool, Ordering};

use nalgebra::{DMatrix, DVector};
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::correlator::fill_correlator_row;
use super::metropolis::MetropolisUpdater;
use crate::action::LocalAction;
use crate::error::{checked_table_size, LatticeError, Result};
use crate::lattice::{LatticeParams, LatticePath};
use crate::potential::Potential;

/// Thermalization length in units of the decorrelation gap.
pub const THERMALIZATION_FACTOR: usize = 5;

/// Sample counts of one ensemble run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnsembleParams {
    /// Sweeps between recorded configurations (N_cor)
    pub n_cor: usize,
    /// Number of recorded configurations (N_cf)
    pub n_cf: usize,
}

impl EnsembleParams {
    pub fn validate(&self) -> Result<()> {
        if self.n_cor == 0 {
            return Err(LatticeError::InvalidConfig("n_cor must be at least 1".into()));
        }
        if self.n_cf == 0 {
            return Err(LatticeError::InvalidConfig("n_cf must be at least 1".into()));
        }
        self.thermalization_sweeps()?;
        Ok(())
    }

    /// 5·N_cor burn-in sweeps.
    pub fn thermalization_sweeps(&self) -> Result<usize> {
        self.n_cor.checked_mul(THERMALIZATION_FACTOR).ok_or_else(|| {
            LatticeError::ResourceLimit(format!("thermalization of 5 x {} sweeps", self.n_cor))
        })
    }
}

/// N_cf × N table of correlators: row α, column n holds G_α(n).
#[derive(Debug, Clone, PartialEq)]
pub struct CorrelatorEnsemble {
    samples: DMatrix<f64>,
}

impl CorrelatorEnsemble {
    /// Build an ensemble from explicit rows, all of the same non-zero length.
    pub fn from_rows(rows: &[Vec<f64>]) -> Result<Self> {
        let n_cf = rows.len();
        if n_cf == 0 {
            return Err(LatticeError::InvalidConfig("ensemble needs at least one row".into()));
        }
        let n_sites = rows[0].len();
        if n_sites < 2 {
            return Err(LatticeError::InvalidConfig(format!(
                "ensemble rows need at least 2 entries, got {n_sites}"
            )));
        }
        if let Some(bad) = rows.iter().position(|r| r.len() != n_sites) {
            return Err(LatticeError::InvalidConfig(format!(
                "row {bad} has {} entries, expected {n_sites}",
                rows[bad].len()
            )));
        }
        checked_table_size(n_cf, n_sites, "ensemble")?;
        Ok(Self {
            samples: DMatrix::from_fn(n_cf, n_sites, |i, j| rows[i][j]),
        })
    }

    fn zeros(n_cf: usize, n_sites: usize) -> Self {
        Self { samples: DMatrix::zeros(n_cf, n_sites) }
    }

    /// N_cf
    pub fn n_samples(&self) -> usize {
        self.samples.nrows()
    }

    /// N
    pub fn n_sites(&self) -> usize {
        self.samples.ncols()
    }

    pub fn get(&self, sample: usize, n: usize) -> f64 {
        self.samples[(sample, n)]
    }

    pub fn matrix(&self) -> &DMatrix<f64> {
        &self.samples
    }

    /// Average over samples of G(n) for every n.
    pub fn column_means(&self) -> DVector<f64> {
        self.samples.row_mean().transpose()
    }

    pub fn to_rows(&self) -> Vec<Vec<f64>> {
        self.samples
            .row_iter()
            .map(|row| row.iter().copied().collect())
            .collect()
    }
}

/// Drives one Markov chain from a cold start to a full ensemble.
#[derive(Debug, Clone)]
pub struct EnsembleDriver<P: Potential> {
    lattice: LatticeParams,
    params: EnsembleParams,
    updater: MetropolisUpdater<P>,
}

impl<P: Potential> EnsembleDriver<P> {
    /// Validates every parameter and the ensemble size before any sweep.
    /// The action must be discretized with the lattice's own spacing.
    pub fn new(lattice: LatticeParams, params: EnsembleParams, action: LocalAction<P>) -> Result<Self> {
        lattice.validate()?;
        params.validate()?;
        if action.spacing != lattice.spacing {
            return Err(LatticeError::InvalidConfig(format!(
                "action spacing {} does not match lattice spacing {}",
                action.spacing, lattice.spacing
            )));
        }
        checked_table_size(params.n_cf, lattice.n_sites, "ensemble")?;
        Ok(Self {
            lattice,
            params,
            updater: MetropolisUpdater::new(action, lattice.step),
        })
    }

    pub fn lattice(&self) -> &LatticeParams {
        &self.lattice
    }

    pub fn params(&self) -> &EnsembleParams {
        &self.params
    }

    /// Acceptance rate over all sweeps of the last run, thermalization included.
    pub fn acceptance_rate(&self) -> f64 {
        self.updater.acceptance_rate()
    }

    /// Single-site proposals made by the last run, thermalization included.
    pub fn proposed_moves(&self) -> u64 {
        self.updater.proposed()
    }

    /// Generate the N_cf × N ensemble.
    pub fn run<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Result<CorrelatorEnsemble> {
        self.run_until(rng, &AtomicBool::new(false))
    }

    /// Like [`run`](Self::run), but checks `stop` between recorded samples
    /// and returns [`LatticeError::Aborted`] once it is raised.
    pub fn run_until<R: Rng + ?Sized>(
        &mut self,
        rng: &mut R,
        stop: &AtomicBool,
    ) -> Result<CorrelatorEnsemble> {
        let n_sites = self.lattice.n_sites;
        let n_cf = self.params.n_cf;
        let mut path = LatticePath::zeros(n_sites);
        let mut ensemble = CorrelatorEnsemble::zeros(n_cf, n_sites);
        let mut row = vec![0.0; n_sites];
        self.updater.reset_counters();

        for _ in 0..self.params.thermalization_sweeps()? {
            self.updater.sweep(&mut path, rng);
        }

        for alpha in 0..n_cf {
            if stop.load(Ordering::Relaxed) {
                return Err(LatticeError::Aborted { completed: alpha, requested: n_cf });
            }
            for _ in 0..self.params.n_cor {
                self.updater.sweep(&mut path, rng);
            }
            fill_correlator_row(&path, &mut row);
            ensemble.samples.row_mut(alpha).copy_from_slice(&row);
        }

        Ok(ensemble)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::action::ActionKind;
    use crate::sampling::two_point;
    use crate::potential::Harmonic;
    use approx::assert_relative_eq;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn harmonic_driver(n_cf: usize) -> EnsembleDriver<Harmonic> {
        let lattice = LatticeParams::new(20, 0.5, 1.4).unwrap();
        let action = LocalAction::new(ActionKind::Standard, 0.5, Harmonic { mass: 1.0 });
        EnsembleDriver::new(lattice, EnsembleParams { n_cor: 20, n_cf }, action).unwrap()
    }

    #[test]
    fn test_rejects_bad_params() {
        let lattice = LatticeParams { n_sites: 20, spacing: 0.5, step: 1.4 };
        let action = LocalAction::new(ActionKind::Standard, 0.5, Harmonic { mass: 1.0 });
        assert!(EnsembleDriver::new(lattice, EnsembleParams { n_cor: 0, n_cf: 10 }, action).is_err());
        assert!(EnsembleDriver::new(lattice, EnsembleParams { n_cor: 10, n_cf: 0 }, action).is_err());
        let tiny = LatticeParams { n_sites: 1, ..lattice };
        assert!(EnsembleDriver::new(tiny, EnsembleParams { n_cor: 10, n_cf: 10 }, action).is_err());
        let huge = EnsembleParams { n_cor: 1, n_cf: usize::MAX / 2 };
        assert!(matches!(
            EnsembleDriver::new(lattice, huge, action),
            Err(LatticeError::ResourceLimit(_))
        ));
    }

    #[test]
    fn test_rejects_action_spacing_mismatch() {
        let lattice = LatticeParams::new(20, 0.5, 1.4).unwrap();
        let params = EnsembleParams { n_cor: 10, n_cf: 10 };
        let zero = LocalAction::new(ActionKind::Standard, 0.0, Harmonic { mass: 1.0 });
        assert!(matches!(
            EnsembleDriver::new(lattice, params, zero),
            Err(LatticeError::InvalidConfig(_))
        ));
        let other = LocalAction::new(ActionKind::Improved, 0.1, Harmonic { mass: 1.0 });
        assert!(matches!(
            EnsembleDriver::new(lattice, params, other),
            Err(LatticeError::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_sweep_schedule() {
        // 5·N_cor burn-in sweeps, then N_cor sweeps before each of N_cf rows
        let mut driver = harmonic_driver(7);
        assert_eq!(driver.proposed_moves(), 0);
        driver.run(&mut StdRng::seed_from_u64(15)).unwrap();
        assert_eq!(driver.proposed_moves(), ((5 * 20 + 7 * 20) * 20) as u64);
        // counters restart with every run
        driver.run(&mut StdRng::seed_from_u64(16)).unwrap();
        assert_eq!(driver.proposed_moves(), ((5 * 20 + 7 * 20) * 20) as u64);
    }

    #[test]
    fn test_last_row_matches_replayed_chain() {
        let lattice = LatticeParams::new(6, 0.5, 1.4).unwrap();
        let action = LocalAction::new(ActionKind::Standard, 0.5, Harmonic { mass: 1.0 });
        let mut driver =
            EnsembleDriver::new(lattice, EnsembleParams { n_cor: 3, n_cf: 2 }, action).unwrap();
        let ensemble = driver.run(&mut StdRng::seed_from_u64(17)).unwrap();

        let mut updater = MetropolisUpdater::new(action, 1.4);
        let mut path = LatticePath::zeros(6);
        let mut rng = StdRng::seed_from_u64(17);
        for _ in 0..(5 * 3 + 2 * 3) {
            updater.sweep(&mut path, &mut rng);
        }
        for n in 0..6 {
            assert_relative_eq!(ensemble.get(1, n), two_point(&path, n), epsilon = 1e-12);
        }
    }

    #[test]
    fn test_ensemble_shape() {
        let mut driver = harmonic_driver(30);
        let mut rng = StdRng::seed_from_u64(11);
        let ensemble = driver.run(&mut rng).unwrap();
        assert_eq!(ensemble.n_samples(), 30);
        assert_eq!(ensemble.n_sites(), 20);
        assert_eq!(ensemble.to_rows().len(), 30);
        assert!(ensemble.to_rows().iter().all(|r| r.len() == 20));
        // G(0) = <x²> of a configuration is never negative
        assert!((0..30).all(|alpha| ensemble.get(alpha, 0) >= 0.0));
        let rate = driver.acceptance_rate();
        assert!(rate > 0.1 && rate < 0.9, "acceptance rate {rate}");
    }

    #[test]
    fn test_rows_reflection_symmetric() {
        let mut driver = harmonic_driver(20);
        let mut rng = StdRng::seed_from_u64(12);
        let ensemble = driver.run(&mut rng).unwrap();
        for alpha in 0..20 {
            for n in 1..20 {
                assert_relative_eq!(
                    ensemble.get(alpha, n),
                    ensemble.get(alpha, 20 - n),
                    epsilon = 1e-12
                );
            }
        }
    }

    #[test]
    fn test_reproducible_with_seed() {
        let first = harmonic_driver(10).run(&mut StdRng::seed_from_u64(13)).unwrap();
        let second = harmonic_driver(10).run(&mut StdRng::seed_from_u64(13)).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_stop_flag_aborts_between_samples() {
        let mut driver = harmonic_driver(10);
        let stop = AtomicBool::new(true);
        let err = driver
            .run_until(&mut StdRng::seed_from_u64(14), &stop)
            .unwrap_err();
        assert!(matches!(err, LatticeError::Aborted { completed: 0, requested: 10 }));
    }

    #[test]
    fn test_from_rows_validation() {
        assert!(CorrelatorEnsemble::from_rows(&[]).is_err());
        assert!(CorrelatorEnsemble::from_rows(&[vec![1.0]]).is_err());
        assert!(CorrelatorEnsemble::from_rows(&[vec![1.0, 2.0], vec![1.0]]).is_err());
        let ensemble = CorrelatorEnsemble::from_rows(&[vec![1.0, 2.0], vec![3.0, 6.0]]).unwrap();
        let means = ensemble.column_means();
        assert_relative_eq!(means[0], 2.0);
        assert_relative_eq!(means[1], 4.0);
        assert_eq!(ensemble.to_rows(), vec![vec![1.0, 2.0], vec![3.0, 6.0]]);
    }
}
