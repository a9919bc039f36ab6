//! Closed Euclidean propagator ⟨x0| e^{-HT} |x0⟩ by direct quadrature
//!
//! Run with: cargo run --release --example propagator
//!
//! N = 8 slices at a = 0.5 (T = 4). For the harmonic oscillator the result
//! is compared with |ψ0(x0)|² e^{-E0 T}; E0 is estimated from the trace.

use lattice_pimc::{harmonic_propagator_exact, Harmonic, PathIntegralQuadrature, Potential, Quartic};

fn report<P: Potential>(name: &str, quad: &PathIntegralQuadrature<P>, exact: bool) {
    println!("=== {} ===", name);
    println!("{:>6} {:>14} {:>14}", "x0", "numerical", "analytical");
    for i in 0..15 {
        let x0 = 2.0 * i as f64 / 14.0;
        let numerical = quad.propagator(x0);
        if exact {
            let analytical = harmonic_propagator_exact(x0, quad.extent());
            println!("{:6.3} {:14.6e} {:14.6e}", x0, numerical, analytical);
        } else {
            println!("{:6.3} {:14.6e} {:>14}", x0, numerical, "-");
        }
    }
    println!("Estimated E0 = {:.5}", quad.ground_state_energy());
    println!();
}

fn main() -> lattice_pimc::Result<()> {
    let (a, n) = (0.5, 8);
    report("Harmonic", &PathIntegralQuadrature::new(Harmonic { mass: 1.0 }, a, n)?, true);
    report("Quartic", &PathIntegralQuadrature::new(Quartic, a, n)?, false);
    Ok(())
}
