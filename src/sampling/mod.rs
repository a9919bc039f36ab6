//! Sampling module - Metropolis updates and ensemble generation.

mod metropolis;
mod correlator;
mod ensemble;

pub use metropolis::{metropolis_accept, MetropolisUpdater};
pub use correlator::{fill_correlator_row, two_point};
pub use ensemble::{CorrelatorEnsemble, EnsembleDriver, EnsembleParams, THERMALIZATION_FACTOR};
