//! Local Euclidean action at one lattice site.
//!
//! Metropolis acceptance only needs the change of the action under a move
//! of x_j, so only the j-dependent part is evaluated:
//!
//! standard: S_j = a V(x_j) + x_j (x_j - x_{j+1} - x_{j-1}) / a
//! improved: S_j = x_j (x_j - x_{j+1} - x_{j-1}) / a + a V(x_j) (1 + a²/12)
//!
//! The kinetic term is the finite-difference form (1/2a)[(x_j - x_{j+1})² +
//! (x_j - x_{j-1})²] with the terms independent of x_j dropped (m = 1).

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::LatticeError;
use crate::lattice::LatticePath;
use crate::potential::Potential;

/// Which discretization of the action to use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionKind {
    /// Unimproved nearest-neighbour action
    #[default]
    Standard,
    /// Ghost-free O(a²) improvement; pair with a potential carrying the
    /// matching correction terms
    Improved,
}

impl FromStr for ActionKind {
    type Err = LatticeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "standard" | "unimproved" => Ok(ActionKind::Standard),
            "improved" | "ghost-free" | "noghost" => Ok(ActionKind::Improved),
            other => Err(LatticeError::UnknownSelection {
                kind: "action",
                key: other.to_string(),
            }),
        }
    }
}

impl fmt::Display for ActionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ActionKind::Standard => write!(f, "standard"),
            ActionKind::Improved => write!(f, "improved"),
        }
    }
}

/// Evaluates S_j for a fixed action formula, spacing and potential.
#[derive(Debug, Clone, Copy)]
pub struct LocalAction<P: Potential> {
    pub kind: ActionKind,
    pub spacing: f64,
    pub potential: P,
}

impl<P: Potential> LocalAction<P> {
    pub fn new(kind: ActionKind, spacing: f64, potential: P) -> Self {
        Self { kind, spacing, potential }
    }

    /// Local action contribution of site `j`.
    #[inline]
    pub fn evaluate(&self, path: &LatticePath, j: usize) -> f64 {
        let a = self.spacing;
        let x = &path.sites;
        let xj = x[j];
        let kinetic = xj * (xj - x[path.next(j)] - x[path.prev(j)]) / a;
        let potential = a * self.potential.value(xj);
        match self.kind {
            ActionKind::Standard => kinetic + potential,
            ActionKind::Improved => kinetic + potential * (1.0 + a * a / 12.0),
        }
    }

    /// Total action Σ_j [(x_{j+1} - x_j)² / (2a) + a V(x_j)] of the path,
    /// with the improvement factor on V for the improved action.
    pub fn total(&self, path: &LatticePath) -> f64 {
        let a = self.spacing;
        let factor = match self.kind {
            ActionKind::Standard => 1.0,
            ActionKind::Improved => 1.0 + a * a / 12.0,
        };
        (0..path.len())
            .map(|j| {
                let dx = path.sites[path.next(j)] - path.sites[j];
                0.5 * dx * dx / a + a * factor * self.potential.value(path.sites[j])
            })
            .sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::potential::{Harmonic, Quartic};
    use approx::assert_relative_eq;

    fn harmonic_action(kind: ActionKind) -> LocalAction<Harmonic> {
        LocalAction::new(kind, 0.5, Harmonic { mass: 1.0 })
    }

    #[test]
    fn test_standard_local_action() {
        let action = harmonic_action(ActionKind::Standard);
        let path = LatticePath::from_sites(vec![0.5, 1.0, -0.5, 0.25]);
        // x1 = 1, neighbours 0.5 and -0.5
        let expected = 0.5 * 0.5 * 1.0 + 1.0 * (1.0 - (-0.5) - 0.5) / 0.5;
        assert_relative_eq!(action.evaluate(&path, 1), expected, epsilon = 1e-12);
    }

    #[test]
    fn test_improved_scales_potential_only() {
        let standard = LocalAction::new(ActionKind::Standard, 0.5, Quartic);
        let improved = LocalAction::new(ActionKind::Improved, 0.5, Quartic);
        let path = LatticePath::from_sites(vec![0.3, 1.2, -0.1]);
        let kinetic = 1.2 * (1.2 - (-0.1) - 0.3) / 0.5;
        let pot = 0.5 * Quartic.value(1.2);
        assert_relative_eq!(standard.evaluate(&path, 1), kinetic + pot, epsilon = 1e-12);
        assert_relative_eq!(
            improved.evaluate(&path, 1),
            kinetic + pot * (1.0 + 0.25 / 12.0),
            epsilon = 1e-12
        );
    }

    #[test]
    fn test_last_site_reads_first_as_next() {
        let action = harmonic_action(ActionKind::Standard);
        let path = LatticePath::from_sites(vec![2.0, 0.0, 0.0, 0.0, 1.0]);
        // j = N-1: next is x[0] = 2, prev is x[3] = 0
        let expected = 0.5 * 0.5 + 1.0 * (1.0 - 2.0 - 0.0) / 0.5;
        assert_relative_eq!(action.evaluate(&path, 4), expected, epsilon = 1e-12);
        // j = 0: prev is x[N-1] = 1
        let expected = 0.5 * 0.5 * 4.0 + 2.0 * (2.0 - 0.0 - 1.0) / 0.5;
        assert_relative_eq!(action.evaluate(&path, 0), expected, epsilon = 1e-12);
    }

    #[test]
    fn test_local_difference_matches_total_difference() {
        let action = harmonic_action(ActionKind::Improved);
        let mut path = LatticePath::from_sites(vec![0.1, -0.4, 0.9, 0.3, -1.1, 0.6]);
        let j = 5;
        let s_local_old = action.evaluate(&path, j);
        let s_total_old = action.total(&path);
        path.sites[j] += 0.37;
        let s_local_new = action.evaluate(&path, j);
        let s_total_new = action.total(&path);
        assert_relative_eq!(
            s_local_new - s_local_old,
            s_total_new - s_total_old,
            epsilon = 1e-12
        );
    }

    #[test]
    fn test_action_kind_parsing() {
        assert_eq!("standard".parse::<ActionKind>().unwrap(), ActionKind::Standard);
        assert_eq!("Improved".parse::<ActionKind>().unwrap(), ActionKind::Improved);
        assert!(matches!(
            "lepage".parse::<ActionKind>(),
            Err(LatticeError::UnknownSelection { kind: "action", .. })
        ));
        let kind: ActionKind = serde_yaml::from_str("improved").unwrap();
        assert_eq!(kind, ActionKind::Improved);
    }
}
