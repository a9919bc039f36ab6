//! Harmonic, quartic and ghost-free anharmonic potentials, plus the
//! selection key used by configuration files.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::traits::Potential;
use crate::error::LatticeError;

/// V(x) = m x² / 2
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Harmonic {
    pub mass: f64,
}

impl Potential for Harmonic {
    #[inline]
    fn value(&self, x: f64) -> f64 {
        0.5 * self.mass * x * x
    }
}

/// V(x) = x⁴ / 2
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Quartic;

impl Potential for Quartic {
    #[inline]
    fn value(&self, x: f64) -> f64 {
        0.5 * x.powi(4)
    }
}

/// Anharmonic oscillator x²/2 (1 + c x²) with the O(a), O(a²) and O(a³)
/// field-redefinition terms that remove the ghost modes of the improved
/// action.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Anharmonic {
    /// Anharmonic coupling c
    pub coupling: f64,
    /// Lattice spacing a entering the correction terms
    pub spacing: f64,
}

impl Potential for Anharmonic {
    #[inline]
    fn value(&self, x: f64) -> f64 {
        let c = self.coupling;
        let a = self.spacing;
        let x2 = x * x;
        (x2 / 2.0) * (1.0 + c * x2)
            + (a.powi(2) / 24.0) * (x + 2.0 * c * x.powi(3)).powi(2)
            - (a * c * x2) / 4.0
            + (a.powi(3) / 2.0) * (c * x2 / 4.0).powi(2)
    }
}

/// Potential selection as it appears in a configuration file.
///
/// ```yaml
/// potential:
///   kind: anharmonic
///   coupling: 2.0
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PotentialKind {
    Harmonic {
        #[serde(default = "default_mass")]
        mass: f64,
    },
    Quartic,
    Anharmonic {
        #[serde(default = "default_coupling")]
        coupling: f64,
    },
}

fn default_mass() -> f64 {
    1.0
}

fn default_coupling() -> f64 {
    2.0
}

impl PotentialKind {
    /// Reject coefficients that make the potential meaningless.
    pub fn validate(&self) -> Result<(), LatticeError> {
        match *self {
            PotentialKind::Harmonic { mass } if !(mass.is_finite() && mass > 0.0) => Err(
                LatticeError::InvalidConfig(format!("harmonic mass must be positive, got {mass}")),
            ),
            PotentialKind::Anharmonic { coupling } if !coupling.is_finite() => Err(
                LatticeError::InvalidConfig(format!("anharmonic coupling must be finite, got {coupling}")),
            ),
            _ => Ok(()),
        }
    }

    /// Bind the selection to a lattice spacing.
    pub fn instantiate(&self, spacing: f64) -> LocalPotential {
        match *self {
            PotentialKind::Harmonic { mass } => LocalPotential::Harmonic(Harmonic { mass }),
            PotentialKind::Quartic => LocalPotential::Quartic(Quartic),
            PotentialKind::Anharmonic { coupling } => {
                LocalPotential::Anharmonic(Anharmonic { coupling, spacing })
            }
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            PotentialKind::Harmonic { .. } => "harmonic",
            PotentialKind::Quartic => "quartic",
            PotentialKind::Anharmonic { .. } => "anharmonic",
        }
    }
}

impl Default for PotentialKind {
    fn default() -> Self {
        PotentialKind::Harmonic { mass: default_mass() }
    }
}

impl fmt::Display for PotentialKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PotentialKind::Harmonic { mass } => write!(f, "harmonic (m = {mass})"),
            PotentialKind::Quartic => write!(f, "quartic"),
            PotentialKind::Anharmonic { coupling } => write!(f, "anharmonic (c = {coupling})"),
        }
    }
}

/// Parses a bare key with default coefficients, as given on the command line.
impl FromStr for PotentialKind {
    type Err = LatticeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "harmonic" => Ok(PotentialKind::Harmonic { mass: default_mass() }),
            "quartic" => Ok(PotentialKind::Quartic),
            "anharmonic" | "anharmonic-ghost-free" => Ok(PotentialKind::Anharmonic {
                coupling: default_coupling(),
            }),
            other => Err(LatticeError::UnknownSelection {
                kind: "potential",
                key: other.to_string(),
            }),
        }
    }
}

/// A potential bound to its coefficients, dispatched without boxing.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LocalPotential {
    Harmonic(Harmonic),
    Quartic(Quartic),
    Anharmonic(Anharmonic),
}

impl Potential for LocalPotential {
    #[inline]
    fn value(&self, x: f64) -> f64 {
        match self {
            LocalPotential::Harmonic(p) => p.value(x),
            LocalPotential::Quartic(p) => p.value(x),
            LocalPotential::Anharmonic(p) => p.value(x),
        }
    }
}
