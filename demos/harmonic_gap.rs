//! Energy gap of the harmonic oscillator
//!
//! Run with: cargo run --release --example harmonic_gap
//!
//! With ℏ = m = ω = 1 the gap E1 - E0 is 1, so ΔE(t) should sit near 1
//! for small t and lose precision as G(t) decays into the noise.

use lattice_pimc::{run_and_report, ActionKind, LatticeParams, PotentialKind, SimulationConfig};

fn main() -> lattice_pimc::Result<()> {
    let lattice = LatticeParams::new(20, 0.5, 1.4)?;
    let mut config = SimulationConfig::new(
        lattice,
        20,
        1000,
        PotentialKind::Harmonic { mass: 1.0 },
        ActionKind::Standard,
    );
    config.n_cf = vec![25, 100, 1000, 10000];

    run_and_report(config)?;

    println!("Exact gap: ΔE = ω = 1 (natural units)");
    Ok(())
}
