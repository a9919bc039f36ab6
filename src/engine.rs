//! Run entry point: configuration, independent runs and reporting.
//!
//! A [`SimulationConfig`] describes one lattice, one potential and one action
//! together with a list of ensemble sizes. Every ensemble size is an
//! independent Markov chain with its own path, generator and ensemble, so a
//! batch is run in parallel with rayon.

use std::sync::atomic::AtomicBool;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::action::{ActionKind, LocalAction};
use crate::analysis::{BootstrapEstimator, EnergyGapCurve, DEFAULT_BOOTSTRAP_SAMPLES};
use crate::error::{checked_table_size, LatticeError, Result};
use crate::lattice::LatticeParams;
use crate::potential::PotentialKind;
use crate::sampling::{EnsembleDriver, EnsembleParams};

/// Full description of a batch of runs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SimulationConfig {
    pub lattice: LatticeParams,
    /// Decorrelation sweeps between samples
    pub n_cor: usize,
    /// Ensemble sizes, one independent run each
    pub n_cf: Vec<usize>,
    #[serde(default = "default_bootstrap_samples")]
    pub bootstrap_samples: usize,
    #[serde(default)]
    pub potential: PotentialKind,
    #[serde(default)]
    pub action: ActionKind,
    /// Master seed; drawn from the thread generator when absent
    #[serde(default)]
    pub seed: Option<u64>,
    /// Attach the raw correlator table to each result
    #[serde(default)]
    pub keep_ensemble: bool,
}

fn default_bootstrap_samples() -> usize {
    DEFAULT_BOOTSTRAP_SAMPLES
}

impl SimulationConfig {
    /// Single-run configuration with default bootstrap settings.
    pub fn new(
        lattice: LatticeParams,
        n_cor: usize,
        n_cf: usize,
        potential: PotentialKind,
        action: ActionKind,
    ) -> Self {
        Self {
            lattice,
            n_cor,
            n_cf: vec![n_cf],
            bootstrap_samples: DEFAULT_BOOTSTRAP_SAMPLES,
            potential,
            action,
            seed: None,
            keep_ensemble: false,
        }
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Every check that can fail before the first sweep.
    pub fn validate(&self) -> Result<()> {
        self.lattice.validate()?;
        self.potential.validate()?;
        if self.n_cf.is_empty() {
            return Err(LatticeError::InvalidConfig("no ensemble size given".into()));
        }
        for &n_cf in &self.n_cf {
            EnsembleParams { n_cor: self.n_cor, n_cf }.validate()?;
            checked_table_size(n_cf, self.lattice.n_sites, "ensemble")?;
        }
        BootstrapEstimator::new(self.bootstrap_samples, self.lattice.spacing)?;
        checked_table_size(self.bootstrap_samples, self.lattice.n_sites - 1, "bootstrap table")?;
        Ok(())
    }
}

/// Outcome of one independent run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationResult {
    pub potential: PotentialKind,
    pub action: ActionKind,
    pub lattice: LatticeParams,
    pub n_cor: usize,
    pub n_cf: usize,
    /// Seed of this run's Markov chain
    pub seed: u64,
    /// Seed of the resampling generator; with `ensemble` it reproduces `curve`
    pub bootstrap_seed: u64,
    pub acceptance_rate: f64,
    pub curve: EnergyGapCurve,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ensemble: Option<Vec<Vec<f64>>>,
}

/// Seed of the `index`-th run derived from a master seed (SplitMix64).
pub fn derive_run_seed(master_seed: u64, index: u64) -> u64 {
    let mut z = master_seed.wrapping_add(index.wrapping_add(1).wrapping_mul(0x9E37_79B9_7F4A_7C15));
    z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
    z ^ (z >> 31)
}

const BOOTSTRAP_STREAM: u64 = u64::MAX - 1;

/// Seed of the bootstrap that follows the chain seeded with `run_seed`.
pub fn derive_bootstrap_seed(run_seed: u64) -> u64 {
    derive_run_seed(run_seed, BOOTSTRAP_STREAM)
}

/// A validated configuration ready to run.
#[derive(Debug, Clone)]
pub struct Simulation {
    config: SimulationConfig,
    master_seed: u64,
}

impl Simulation {
    pub fn new(config: SimulationConfig) -> Result<Self> {
        config.validate()?;
        let master_seed = config.seed.unwrap_or_else(|| rand::thread_rng().gen());
        Ok(Self { config, master_seed })
    }

    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    pub fn master_seed(&self) -> u64 {
        self.master_seed
    }

    /// One chain of `n_cf` samples driven by a generator seeded with `seed`,
    /// followed by the bootstrap on its own generator.
    pub fn run_single(&self, n_cf: usize, seed: u64, stop: &AtomicBool) -> Result<SimulationResult> {
        let cfg = &self.config;
        let lattice = cfg.lattice;
        let potential = cfg.potential.instantiate(lattice.spacing);
        let action = LocalAction::new(cfg.action, lattice.spacing, potential);
        let params = EnsembleParams { n_cor: cfg.n_cor, n_cf };
        let mut driver = EnsembleDriver::new(lattice, params, action)?;
        let estimator = BootstrapEstimator::new(cfg.bootstrap_samples, lattice.spacing)?;

        let ensemble = driver.run_until(&mut StdRng::seed_from_u64(seed), stop)?;
        let bootstrap_seed = derive_bootstrap_seed(seed);
        let curve = estimator.estimate(&ensemble, &mut StdRng::seed_from_u64(bootstrap_seed))?;

        Ok(SimulationResult {
            potential: cfg.potential,
            action: cfg.action,
            lattice,
            n_cor: cfg.n_cor,
            n_cf,
            seed,
            bootstrap_seed,
            acceptance_rate: driver.acceptance_rate(),
            curve,
            ensemble: cfg.keep_ensemble.then(|| ensemble.to_rows()),
        })
    }

    /// All configured ensemble sizes, in configuration order.
    pub fn run_batch(&self) -> Result<Vec<SimulationResult>> {
        self.run_batch_until(&AtomicBool::new(false))
    }

    /// Like [`run_batch`](Self::run_batch); raising `stop` aborts every
    /// pending run at its next sample boundary.
    pub fn run_batch_until(&self, stop: &AtomicBool) -> Result<Vec<SimulationResult>> {
        self.config
            .n_cf
            .par_iter()
            .enumerate()
            .map(|(index, &n_cf)| {
                let seed = derive_run_seed(self.master_seed, index as u64);
                self.run_single(n_cf, seed, stop)
            })
            .collect()
    }
}

/// Run a configuration and print a summary of every curve.
pub fn run_and_report(config: SimulationConfig) -> Result<Vec<SimulationResult>> {
    let simulation = Simulation::new(config)?;
    let cfg = simulation.config();

    println!("=== Lattice Path Integral Monte Carlo ===");
    println!("Potential: {}", cfg.potential);
    println!("Action: {}", cfg.action);
    println!(
        "N = {}, a = {:.4}, eps = {:.4}, N_cor = {}",
        cfg.lattice.n_sites, cfg.lattice.spacing, cfg.lattice.step, cfg.n_cor
    );
    println!("Ensemble sizes: {:?}", cfg.n_cf);
    println!("Bootstrap samples: {}", cfg.bootstrap_samples);
    println!("Master seed: {}", simulation.master_seed());
    println!();

    let results = simulation.run_batch()?;

    for result in &results {
        println!(
            "--- N_cf = {} (seed {}, bootstrap seed {}, acceptance = {:.2}%) ---",
            result.n_cf,
            result.seed,
            result.bootstrap_seed,
            100.0 * result.acceptance_rate
        );
        println!("{:>8} {:>12} {:>12}", "t", "ΔE(t)", "σ");
        for point in result.curve.points() {
            println!("{:8.3} {:12.6} {:12.6}", point.t, point.average, point.std_dev);
        }
        println!();
    }

    Ok(results)
}
