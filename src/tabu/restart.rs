//! Stagnation responses: intensification, diversification and strategic
//! oscillation.
//!
//! Every policy reports whether it changed the search state (working
//! solution or tabu memory). A restart that changes nothing, with no
//! periodic restart configured, means the run has converged.

use rand::seq::IndexedRandom;
use rand::Rng;

use super::config::RestartPolicy;
use super::runner::TabuSearch;
use crate::eval::{Evaluator, Solution};

impl<E: Evaluator + ?Sized, R: Rng> TabuSearch<'_, E, R> {
    /// Runs the configured restart policy once.
    pub(super) fn apply_restart(&mut self) -> bool {
        match self.config.restart {
            RestartPolicy::None => false,
            RestartPolicy::Intensification { burst } => self.intensify(burst),
            RestartPolicy::Diversification {
                fixation_rate,
                inclusion_probability,
            } => self.diversify(fixation_rate, inclusion_probability),
            RestartPolicy::StrategicOscillation => self.oscillate(),
        }
    }

    /// Resumes from the best-known solution with an empty tabu memory, then
    /// keeps moving while each move strictly improves the working cost.
    fn intensify(&mut self, burst: usize) -> bool {
        let mut changed = !self.current.same_elements(&self.best) || !self.memory.is_clear();
        self.current = self.best.clone();
        self.memory.clear();

        for _ in 0..burst {
            let before = self.current.cost();
            if self.step().is_none() {
                break;
            }
            changed = true;
            self.record_best();
            if self.current.cost() >= before {
                break;
            }
        }
        changed
    }

    /// Fixes the least-used variables of the best-known solution and adds
    /// every other variable with probability `inclusion_probability`.
    ///
    /// The result may violate the cover; later moves repair it.
    fn diversify(&mut self, fixation_rate: f64, inclusion_probability: f64) -> bool {
        let keep = (fixation_rate * self.best.len() as f64).floor() as usize;
        let mut least_used = self.best.to_vec();
        least_used.sort_by_key(|&e| self.usage[e]);
        least_used.truncate(keep);
        if least_used.is_empty() {
            return false;
        }

        let mut fresh = Solution::from_elements(least_used);
        for elem in 0..self.evaluator.domain_size() {
            if !fresh.contains(elem) && self.rng.random_bool(inclusion_probability) {
                fresh.insert(elem);
            }
        }
        self.evaluator.evaluate_into(&mut fresh);
        self.current = fresh;
        true
    }

    /// Swaps one random selected variable for one random unselected one,
    /// whatever the cost.
    fn oscillate(&mut self) -> bool {
        let selected = self.current.to_vec();
        let removed = selected.choose(&mut self.rng).copied();
        if let Some(elem) = removed {
            self.current.remove(elem);
        }

        let candidates: Vec<usize> = (0..self.evaluator.domain_size())
            .filter(|&e| !self.current.contains(e) && Some(e) != removed)
            .collect();
        let inserted = candidates.choose(&mut self.rng).copied();
        if let Some(elem) = inserted {
            self.current.insert(elem);
            self.usage[elem] += 1;
        }

        if removed.is_none() && inserted.is_none() {
            return false;
        }
        self.evaluator.evaluate_into(&mut self.current);
        true
    }
}
