//! Translation-averaged two-point function of a single configuration.

use crate::lattice::LatticePath;

/// G(n) = (1/N) Σ_j x_j x_{(j+n) mod N}
#[inline]
pub fn two_point(path: &LatticePath, n: usize) -> f64 {
    let x = &path.sites;
    let len = x.len();
    let mut g = 0.0;
    for j in 0..len {
        g += x[j] * x[(j + n) % len];
    }
    g / len as f64
}

/// Fill `row[n] = G(n)` for n = 0..N-1.
pub fn fill_correlator_row(path: &LatticePath, row: &mut [f64]) {
    debug_assert_eq!(row.len(), path.len());
    for (n, g) in row.iter_mut().enumerate() {
        *g = two_point(path, n);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_zero_separation_is_mean_square() {
        let path = LatticePath::from_sites(vec![1.0, -2.0, 0.5, 3.0]);
        assert_relative_eq!(two_point(&path, 0), path.mean_square(), epsilon = 1e-12);
    }

    #[test]
    fn test_wraps_around() {
        let path = LatticePath::from_sites(vec![1.0, 2.0, 3.0]);
        // (1*2 + 2*3 + 3*1) / 3
        assert_relative_eq!(two_point(&path, 1), 11.0 / 3.0, epsilon = 1e-12);
        // (1*3 + 2*1 + 3*2) / 3
        assert_relative_eq!(two_point(&path, 2), 11.0 / 3.0, epsilon = 1e-12);
    }

    #[test]
    fn test_reflection_symmetry_per_configuration() {
        let path = LatticePath::from_sites(vec![0.3, -1.2, 0.8, 2.1, -0.4, 0.05, 1.7]);
        let n = path.len();
        for k in 1..n {
            assert_relative_eq!(two_point(&path, k), two_point(&path, n - k), epsilon = 1e-12);
        }
    }

    #[test]
    fn test_fill_row() {
        let path = LatticePath::from_sites(vec![1.0, 0.0, -1.0, 0.0]);
        let mut row = vec![0.0; 4];
        fill_correlator_row(&path, &mut row);
        assert_relative_eq!(row[0], 0.5, epsilon = 1e-12);
        assert_relative_eq!(row[1], 0.0, epsilon = 1e-12);
        assert_relative_eq!(row[2], -0.5, epsilon = 1e-12);
        assert_relative_eq!(row[3], 0.0, epsilon = 1e-12);
    }
}
