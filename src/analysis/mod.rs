//! Analysis module - statistical post-processing of correlator ensembles.

mod bootstrap;

pub use bootstrap::{
    energy_gaps, BootstrapEstimator, EnergyGapCurve, GapPoint, DEFAULT_BOOTSTRAP_SAMPLES,
};
