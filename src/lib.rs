//! Lattice PIMC - energy gaps of one-dimensional quantum systems from
//! Euclidean path integrals on a periodic time lattice.
//!
//! Paths are sampled with a single-site Metropolis algorithm, the two-point
//! correlator G(n) is recorded on decorrelated configurations, and the
//! energy gap ΔE(t) = ln(G(t)/G(t+a))/a is estimated with a bootstrap.

pub mod error;
pub mod potential;
pub mod lattice;
pub mod action;
pub mod sampling;
pub mod analysis;
pub mod quadrature;
pub mod engine;
pub mod io;

// Re-export commonly used types at crate root
pub use error::{LatticeError, Result};
pub use potential::{Potential, PotentialKind, LocalPotential, Harmonic, Quartic, Anharmonic};
pub use lattice::{LatticeParams, LatticePath};
pub use action::{ActionKind, LocalAction};
pub use sampling::{CorrelatorEnsemble, EnsembleDriver, EnsembleParams, MetropolisUpdater};
pub use analysis::{BootstrapEstimator, EnergyGapCurve, GapPoint};
pub use quadrature::{PathIntegralQuadrature, harmonic_propagator_exact};
pub use engine::{Simulation, SimulationConfig, SimulationResult, run_and_report};
pub use io::{read_config, write_results};
