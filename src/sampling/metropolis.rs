//! Single-site Metropolis sweep over a periodic lattice path.

use rand::Rng;
use rand_distr::{Distribution, Uniform};

use crate::action::LocalAction;
use crate::lattice::LatticePath;
use crate::potential::Potential;

/// Metropolis test for an action change `delta_s`.
///
/// A move is rejected only when the action strictly increases and a fresh
/// uniform draw exceeds exp(-ΔS). No random number is consumed when ΔS ≤ 0.
#[inline]
pub fn metropolis_accept<R: Rng + ?Sized>(delta_s: f64, rng: &mut R) -> bool {
    !(delta_s > 0.0 && (-delta_s).exp() < rng.gen::<f64>())
}

/// Sweeps a path site by site in fixed order j = 0..N-1, proposing
/// x_j → x_j + δ with δ uniform in [-eps, eps].
#[derive(Debug, Clone)]
pub struct MetropolisUpdater<P: Potential> {
    action: LocalAction<P>,
    proposal: Uniform<f64>,
    accepted: u64,
    proposed: u64,
}

impl<P: Potential> MetropolisUpdater<P> {
    /// `step` is the proposal half-width eps and must be positive.
    pub fn new(action: LocalAction<P>, step: f64) -> Self {
        Self {
            action,
            proposal: Uniform::new_inclusive(-step, step),
            accepted: 0,
            proposed: 0,
        }
    }

    pub fn action(&self) -> &LocalAction<P> {
        &self.action
    }

    /// One full sweep; the path is updated in place.
    pub fn sweep<R: Rng + ?Sized>(&mut self, path: &mut LatticePath, rng: &mut R) {
        for j in 0..path.len() {
            let old_x = path.sites[j];
            let old_action = self.action.evaluate(path, j);
            path.sites[j] += self.proposal.sample(rng);
            let delta_s = self.action.evaluate(path, j) - old_action;
            if metropolis_accept(delta_s, rng) {
                self.accepted += 1;
            } else {
                path.sites[j] = old_x;
            }
        }
        self.proposed += path.len() as u64;
    }

    /// Fraction of accepted proposals since construction or the last reset.
    pub fn acceptance_rate(&self) -> f64 {
        if self.proposed == 0 {
            0.0
        } else {
            self.accepted as f64 / self.proposed as f64
        }
    }

    /// Single-site proposals since construction or the last reset.
    pub fn proposed(&self) -> u64 {
        self.proposed
    }

    pub fn accepted(&self) -> u64 {
        self.accepted
    }

    pub fn reset_counters(&mut self) {
        self.accepted = 0;
        self.proposed = 0;
    }
}
