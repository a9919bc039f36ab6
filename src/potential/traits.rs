//! Trait for site-local potentials.

/// Local potential energy density V(x) of one lattice site.
///
/// Implementations are pure: the value depends only on `x` and on
/// coefficients fixed at construction, never on neighbouring sites.
pub trait Potential: Send + Sync {
    /// Evaluate V at the site value `x`.
    fn value(&self, x: f64) -> f64;
}
