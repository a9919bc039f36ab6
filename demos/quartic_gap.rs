//! Energy gap of the quartic oscillator V(x) = x⁴/2
//!
//! Run with: cargo run --release --example quartic_gap

use lattice_pimc::{run_and_report, ActionKind, LatticeParams, PotentialKind, SimulationConfig};

fn main() -> lattice_pimc::Result<()> {
    let lattice = LatticeParams::new(20, 0.5, 1.4)?;
    let mut config = SimulationConfig::new(lattice, 20, 1000, PotentialKind::Quartic, ActionKind::Standard);
    config.n_cf = vec![25, 100, 1000, 10000];
    run_and_report(config)?;
    Ok(())
}
