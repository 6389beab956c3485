//! Core evaluator trait and the solution container it scores.

use std::collections::BTreeSet;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use super::coverage::SetCover;

/// A set of selected domain indices plus its cached cost.
///
/// Members iterate in ascending index order, so neighbourhood scans and
/// therefore whole runs are reproducible for a fixed seed.
///
/// The cost is whatever the owning evaluator last reported. The search
/// engine keeps it equal to `evaluate(self)` after every committed move.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Solution {
    elements: BTreeSet<usize>,
    cost: f64,
}

impl Solution {
    /// Creates an empty solution with cost `0.0`.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an unevaluated solution from the given indices.
    ///
    /// Duplicates collapse. The cost starts at `0.0`. Every index must be
    /// below the domain size of the evaluator that will score it; scoring
    /// an out-of-range index panics.
    pub fn from_elements<I: IntoIterator<Item = usize>>(elements: I) -> Self {
        Self {
            elements: elements.into_iter().collect(),
            cost: 0.0,
        }
    }

    /// Cached cost.
    pub fn cost(&self) -> f64 {
        self.cost
    }

    pub fn set_cost(&mut self, cost: f64) {
        self.cost = cost;
    }

    pub fn contains(&self, elem: usize) -> bool {
        self.elements.contains(&elem)
    }

    /// Adds `elem`; returns `false` if it was already selected.
    pub fn insert(&mut self, elem: usize) -> bool {
        self.elements.insert(elem)
    }

    /// Drops `elem`; returns `false` if it was not selected.
    pub fn remove(&mut self, elem: usize) -> bool {
        self.elements.remove(&elem)
    }

    pub fn clear(&mut self) {
        self.elements.clear();
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    /// Selected indices in ascending order.
    pub fn iter(&self) -> impl Iterator<Item = usize> + '_ {
        self.elements.iter().copied()
    }

    /// Selected indices as a sorted vector.
    pub fn to_vec(&self) -> Vec<usize> {
        self.iter().collect()
    }

    /// Returns `true` if both solutions select exactly the same indices,
    /// regardless of cached cost.
    pub fn same_elements(&self, other: &Solution) -> bool {
        self.elements == other.elements
    }
}

/// Scores solutions and candidate moves over a fixed domain `0..n`.
///
/// All costs follow one **minimization** convention: lower is better and
/// every move delta is `cost(after) - cost(before)`. Maximization problems
/// are expressed by wrapping the natural model in
/// [`Inverted`](super::Inverted).
///
/// Move methods never mutate their argument and must run in `O(|solution|)`
/// for the plain quadratic model; decorators may add their own checks.
///
/// Decorators implement this trait by delegating to an inner evaluator
/// and adjusting its answers.
pub trait Evaluator: Send + Sync {
    /// Number of decision variables `n`.
    fn domain_size(&self) -> usize;

    /// Full cost of `solution`, computed from scratch.
    fn evaluate(&self, solution: &Solution) -> f64;

    /// Cost change of adding `elem` to `solution`.
    fn evaluate_insertion(&self, elem: usize, solution: &Solution) -> f64;

    /// Cost change of dropping `elem` from `solution`.
    fn evaluate_removal(&self, elem: usize, solution: &Solution) -> f64;

    /// Cost change of adding `elem_in` and dropping `elem_out` in one move.
    fn evaluate_exchange(&self, elem_in: usize, elem_out: usize, solution: &Solution) -> f64;

    /// Set-cover constraint attached to this evaluator, if any.
    ///
    /// Used by greedy construction to know which targets must be covered.
    fn set_cover(&self) -> Option<&SetCover> {
        None
    }

    /// Evaluates `solution` and stores the result as its cached cost.
    fn evaluate_into(&self, solution: &mut Solution) -> f64 {
        let cost = self.evaluate(solution);
        solution.set_cost(cost);
        cost
    }
}
