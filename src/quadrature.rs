//! Direct evaluation of the lattice path integral by transfer-matrix
//! quadrature, used to cross-check the Monte Carlo engine on small lattices.
//!
//! With the kernel
//!
//!   K(x, y) = sqrt(1 / 2πa) · exp(-(y - x)² / 2a - a V(x))
//!
//! the closed propagator ⟨x0| e^{-HT} |x0⟩ is an (N-1)-fold integral over a
//! chain of N kernels, and the trace Z = Tr e^{-HT} is the N-fold integral
//! over a closed chain. Both are evaluated on a uniform grid over
//! [-L, L] where every integral becomes a matrix product. For large T,
//! Z ≈ e^{-E0 T}, so E0 ≈ -ln Z / T.

use std::f64::consts::PI;

use nalgebra::{DMatrix, DVector};

use crate::error::{checked_table_size, LatticeError, Result};
use crate::potential::Potential;

pub const DEFAULT_GRID_POINTS: usize = 201;
pub const DEFAULT_GRID_HALF_WIDTH: f64 = 5.0;

/// Transfer matrix A_ij = h K(x_i, x_j) of one potential on a fixed grid.
#[derive(Debug, Clone)]
pub struct PathIntegralQuadrature<P: Potential> {
    potential: P,
    spacing: f64,
    n_slices: usize,
    grid: DVector<f64>,
    /// Grid step h
    weight: f64,
    transfer: DMatrix<f64>,
}

impl<P: Potential> PathIntegralQuadrature<P> {
    /// Quadrature on the default grid of 201 points over [-5, 5].
    pub fn new(potential: P, spacing: f64, n_slices: usize) -> Result<Self> {
        Self::with_grid(potential, spacing, n_slices, DEFAULT_GRID_POINTS, DEFAULT_GRID_HALF_WIDTH)
    }

    pub fn with_grid(
        potential: P,
        spacing: f64,
        n_slices: usize,
        points: usize,
        half_width: f64,
    ) -> Result<Self> {
        if n_slices < 2 {
            return Err(LatticeError::InvalidConfig(format!(
                "quadrature needs at least 2 time slices, got {n_slices}"
            )));
        }
        if !(spacing.is_finite() && spacing > 0.0) {
            return Err(LatticeError::InvalidConfig(format!(
                "lattice spacing must be positive, got {spacing}"
            )));
        }
        if points < 3 || !(half_width.is_finite() && half_width > 0.0) {
            return Err(LatticeError::InvalidConfig(format!(
                "quadrature grid of {points} points over [-{half_width}, {half_width}]"
            )));
        }
        checked_table_size(points, points, "transfer matrix")?;

        let weight = 2.0 * half_width / (points - 1) as f64;
        let grid = DVector::from_fn(points, |i, _| -half_width + weight * i as f64);
        let mut quadrature = Self {
            potential,
            spacing,
            n_slices,
            grid,
            weight,
            transfer: DMatrix::zeros(points, points),
        };
        let transfer = DMatrix::from_fn(points, points, |i, j| {
            weight * quadrature.kernel(quadrature.grid[i], quadrature.grid[j])
        });
        quadrature.transfer = transfer;
        Ok(quadrature)
    }

    /// Short-time kernel between neighbouring slices at x and y.
    #[inline]
    pub fn kernel(&self, x: f64, y: f64) -> f64 {
        let a = self.spacing;
        let dx = y - x;
        (1.0 / (2.0 * PI * a)).sqrt() * (-(dx * dx) / (2.0 * a) - a * self.potential.value(x)).exp()
    }

    /// Total Euclidean time T = a·N.
    pub fn extent(&self) -> f64 {
        self.spacing * self.n_slices as f64
    }

    /// Z = Tr A^N
    pub fn trace(&self) -> f64 {
        let mut power = self.transfer.clone();
        for _ in 1..self.n_slices {
            power = &power * &self.transfer;
        }
        power.trace()
    }

    /// ⟨x0| e^{-HT} |x0⟩ with both endpoints pinned at `x0`.
    pub fn propagator(&self, x0: f64) -> f64 {
        let mut chain = DVector::from_fn(self.grid.len(), |i, _| self.kernel(x0, self.grid[i]));
        for _ in 0..self.n_slices - 2 {
            chain = self.transfer.tr_mul(&chain);
        }
        chain
            .iter()
            .zip(self.grid.iter())
            .map(|(f, &x)| f * self.weight * self.kernel(x, x0))
            .sum()
    }

    /// E0 ≈ -ln Z / T
    pub fn ground_state_energy(&self) -> f64 {
        -self.trace().ln() / self.extent()
    }
}

/// Continuum harmonic propagator at large T: |ψ0(x0)|² e^{-T/2},
/// with ψ0(x) = e^{-x²/2} / π^{1/4}.
pub fn harmonic_propagator_exact(x0: f64, t: f64) -> f64 {
    let psi0 = (-x0 * x0 / 2.0).exp() / PI.powf(0.25);
    psi0 * psi0 * (-0.5 * t).exp()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::potential::{Harmonic, Quartic};
    use approx::assert_relative_eq;

    #[test]
    fn test_rejects_bad_grid() {
        let v = Harmonic { mass: 1.0 };
        assert!(PathIntegralQuadrature::new(v, 0.5, 1).is_err());
        assert!(PathIntegralQuadrature::new(v, 0.0, 8).is_err());
        assert!(PathIntegralQuadrature::with_grid(v, 0.5, 8, 2, 5.0).is_err());
        assert!(PathIntegralQuadrature::with_grid(v, 0.5, 8, 101, -1.0).is_err());
    }

    #[test]
    fn test_harmonic_trace_matches_lattice_formula() {
        // Gaussian lattice integral: Z = 1 / (2 sinh(N ω̃ a / 2)),
        // cosh(ω̃ a) = 1 + a²/2
        let (a, n) = (0.5, 8);
        let quad = PathIntegralQuadrature::new(Harmonic { mass: 1.0 }, a, n).unwrap();
        let wa = (1.0f64 + a * a / 2.0).acosh();
        let exact = 1.0 / (2.0 * (n as f64 * wa / 2.0).sinh());
        assert_relative_eq!(quad.trace(), exact, max_relative = 1e-3);
    }

    #[test]
    fn test_harmonic_ground_state_energy() {
        let quad = PathIntegralQuadrature::new(Harmonic { mass: 1.0 }, 0.5, 8).unwrap();
        assert_relative_eq!(quad.ground_state_energy(), 0.5, epsilon = 0.02);
    }

    #[test]
    fn test_harmonic_propagator_close_to_continuum() {
        let quad = PathIntegralQuadrature::new(Harmonic { mass: 1.0 }, 0.5, 8).unwrap();
        for &x0 in &[0.0, 0.5, 1.0] {
            let exact = harmonic_propagator_exact(x0, quad.extent());
            assert_relative_eq!(quad.propagator(x0), exact, max_relative = 0.2);
        }
        // symmetric in x0
        assert_relative_eq!(quad.propagator(0.7), quad.propagator(-0.7), max_relative = 1e-6);
    }

    #[test]
    fn test_quartic_energy_positive_and_finite() {
        for &a in &[0.4, 0.5] {
            let quad = PathIntegralQuadrature::new(Quartic, a, 8).unwrap();
            let e0 = quad.ground_state_energy();
            assert!(e0.is_finite() && e0 > 0.0, "E0 = {e0} at a = {a}");
        }
    }
}
