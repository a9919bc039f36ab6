//! Potential module - local (non-kinetic) energy densities of a lattice site.

mod traits;
mod library;

pub use traits::Potential;
pub use library::{Anharmonic, Harmonic, LocalPotential, PotentialKind, Quartic};
