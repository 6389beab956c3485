//! Set-cover feasibility decorator.
//!
//! Every variable `i` owns a subset of target elements `1..=n`. A selection
//! is feasible when the union of the owned subsets covers all `n` targets.
//! [`CoverageModel`] gates an inner evaluator with that constraint.

use super::types::{Evaluator, Solution};
use crate::error::{QbfError, Result};

/// Cost reported for an insertion that leaves the solution uncovered.
///
/// Finite on purpose: insertions are discouraged, never forbidden, so the
/// search can still grow its way back to a feasible cover. Removals and
/// exchanges that break the cover report `f64::INFINITY` instead.
pub const INFEASIBLE_INSERTION_COST: f64 = 1.0e6;

/// The subsets owned by each variable.
#[derive(Debug, Clone, PartialEq)]
pub struct SetCover {
    subsets: Vec<Vec<usize>>,
}

impl SetCover {
    /// Creates the constraint for `subsets.len()` variables and as many
    /// targets. Target identifiers are 1-indexed.
    ///
    /// Repeated targets within a subset are collapsed; identifiers outside
    /// `1..=n` are rejected.
    pub fn new(subsets: Vec<Vec<usize>>) -> Result<Self> {
        let n = subsets.len();
        let mut normalized = Vec::with_capacity(n);
        for (i, mut subset) in subsets.into_iter().enumerate() {
            if let Some(&bad) = subset.iter().find(|&&t| t == 0 || t > n) {
                return Err(QbfError::MalformedInstance(format!(
                    "subset {i} covers target {bad}, expected 1..={n}"
                )));
            }
            subset.sort_unstable();
            subset.dedup();
            normalized.push(subset);
        }
        Ok(Self {
            subsets: normalized,
        })
    }

    /// Number of variables, which is also the number of targets.
    pub fn len(&self) -> usize {
        self.subsets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.subsets.is_empty()
    }

    /// Targets covered by variable `index`, ascending.
    pub fn subset(&self, index: usize) -> &[usize] {
        &self.subsets[index]
    }

    fn covered_flags<I: IntoIterator<Item = usize>>(&self, selected: I) -> (Vec<bool>, usize) {
        let n = self.subsets.len();
        let mut covered = vec![false; n + 1];
        let mut count = 0;
        for index in selected {
            let Some(subset) = self.subsets.get(index) else {
                continue;
            };
            for &target in subset {
                if !covered[target] {
                    covered[target] = true;
                    count += 1;
                }
            }
        }
        (covered, count)
    }

    /// Returns `true` if the selected variables cover every target.
    pub fn covers<I: IntoIterator<Item = usize>>(&self, selected: I) -> bool {
        self.covered_flags(selected).1 == self.subsets.len()
    }

    /// Targets the selected variables leave uncovered, ascending.
    pub fn uncovered<I: IntoIterator<Item = usize>>(&self, selected: I) -> Vec<usize> {
        let (covered, _) = self.covered_flags(selected);
        (1..covered.len()).filter(|&t| !covered[t]).collect()
    }
}

/// Decorates a minimize-sense evaluator with the set-cover constraint.
///
/// Before delegating a move, the hypothetical post-move selection is
/// checked for coverage:
///
/// | move        | infeasible result             |
/// |-------------|-------------------------------|
/// | insertion   | [`INFEASIBLE_INSERTION_COST`] |
/// | removal     | `f64::INFINITY`               |
/// | exchange    | `f64::INFINITY`               |
/// | full value  | `f64::INFINITY`               |
///
/// Each check recomputes the union from scratch, `O(|S| * avg subset size)`.
#[derive(Debug, Clone, PartialEq)]
pub struct CoverageModel<E> {
    inner: E,
    cover: SetCover,
}

impl<E: Evaluator> CoverageModel<E> {
    /// Wraps `inner`; the cover must be defined over the same domain.
    pub fn new(inner: E, cover: SetCover) -> Result<Self> {
        if inner.domain_size() != cover.len() {
            return Err(QbfError::MalformedInstance(format!(
                "objective has {} variables but the cover defines {} subsets",
                inner.domain_size(),
                cover.len()
            )));
        }
        Ok(Self { inner, cover })
    }

    pub fn inner(&self) -> &E {
        &self.inner
    }

    pub fn cover(&self) -> &SetCover {
        &self.cover
    }

    /// Returns `true` if `solution` covers every target.
    pub fn is_valid(&self, solution: &Solution) -> bool {
        self.cover.covers(solution.iter())
    }

    fn is_valid_after(
        &self,
        solution: &Solution,
        added: Option<usize>,
        removed: Option<usize>,
    ) -> bool {
        let kept = solution.iter().filter(|&e| Some(e) != removed);
        self.cover.covers(kept.chain(added))
    }
}

impl<E: Evaluator> Evaluator for CoverageModel<E> {
    fn domain_size(&self) -> usize {
        self.inner.domain_size()
    }

    fn evaluate(&self, solution: &Solution) -> f64 {
        if !self.is_valid(solution) {
            return f64::INFINITY;
        }
        self.inner.evaluate(solution)
    }

    fn evaluate_insertion(&self, elem: usize, solution: &Solution) -> f64 {
        if !self.is_valid_after(solution, Some(elem), None) {
            return INFEASIBLE_INSERTION_COST;
        }
        self.inner.evaluate_insertion(elem, solution)
    }

    fn evaluate_removal(&self, elem: usize, solution: &Solution) -> f64 {
        if !self.is_valid_after(solution, None, Some(elem)) {
            return f64::INFINITY;
        }
        self.inner.evaluate_removal(elem, solution)
    }

    fn evaluate_exchange(&self, elem_in: usize, elem_out: usize, solution: &Solution) -> f64 {
        if !self.is_valid_after(solution, Some(elem_in), Some(elem_out)) {
            return f64::INFINITY;
        }
        self.inner.evaluate_exchange(elem_in, elem_out, solution)
    }

    fn set_cover(&self) -> Option<&SetCover> {
        Some(&self.cover)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::eval::{Inverted, QuadraticModel};
    use proptest::prelude::*;

    // S0 = {1, 2}, S1 = {3}, S2 = {2, 3}
    fn cover() -> SetCover {
        SetCover::new(vec![vec![1, 2], vec![3], vec![2, 3]]).unwrap()
    }

    fn model() -> CoverageModel<Inverted<QuadraticModel>> {
        let qbf = QuadraticModel::diagonal(&[5.0, 3.0, 4.0]);
        CoverageModel::new(Inverted::new(qbf), cover()).unwrap()
    }

    #[test]
    fn test_rejects_out_of_range_targets() {
        let err = SetCover::new(vec![vec![1], vec![3]]).unwrap_err();
        assert!(matches!(err, QbfError::MalformedInstance(_)));
        assert!(SetCover::new(vec![vec![0]]).is_err());
    }

    #[test]
    fn test_rejects_domain_mismatch() {
        let qbf = QuadraticModel::diagonal(&[1.0, 2.0]);
        assert!(CoverageModel::new(qbf, cover()).is_err());
    }

    #[test]
    fn test_duplicate_targets_collapse() {
        let cover = SetCover::new(vec![vec![1, 1, 1]]).unwrap();
        assert_eq!(cover.subset(0), &[1]);
    }

    #[test]
    fn test_validity_and_uncovered() {
        let cover = cover();
        assert!(cover.covers([0, 1]));
        assert!(cover.covers([0, 2]));
        assert!(!cover.covers([1, 2]));
        assert_eq!(cover.uncovered([1, 2]), vec![1]);
        assert_eq!(cover.uncovered(std::iter::empty()), vec![1, 2, 3]);
    }

    #[test]
    fn test_empty_universe_is_always_covered() {
        let cover = SetCover::new(vec![]).unwrap();
        assert!(cover.is_empty());
        assert!(cover.covers(std::iter::empty()));
    }

    #[test]
    fn test_infeasible_full_evaluation_is_infinite() {
        let model = model();
        assert_eq!(model.evaluate(&Solution::from_elements([1, 2])), f64::INFINITY);
        assert_eq!(model.evaluate(&Solution::from_elements([0, 1])), -8.0);
    }

    #[test]
    fn test_penalty_asymmetry() {
        let model = model();

        // From {1}: adding 2 still misses target 1 → finite penalty.
        let partial = Solution::from_elements([1]);
        assert_eq!(model.evaluate_insertion(2, &partial), INFEASIBLE_INSERTION_COST);
        // Adding 0 completes the cover → plain delta.
        assert_eq!(model.evaluate_insertion(0, &partial), -5.0);

        // From {0, 1}: dropping either breaks the cover → forbidden.
        let feasible = Solution::from_elements([0, 1]);
        assert_eq!(model.evaluate_removal(0, &feasible), f64::INFINITY);
        assert_eq!(model.evaluate_removal(1, &feasible), f64::INFINITY);

        // Swapping 1 for 2 keeps {1, 2, 3} covered; swapping 0 for 2 loses target 1.
        assert_eq!(model.evaluate_exchange(2, 1, &feasible), -1.0);
        assert_eq!(model.evaluate_exchange(2, 0, &feasible), f64::INFINITY);
    }

    #[test]
    fn test_feasible_removal_delegates() {
        let model = model();
        let sol = Solution::from_elements([0, 1, 2]);
        assert_eq!(model.evaluate_removal(2, &sol), 4.0);
        assert!(model.set_cover().is_some());
    }

    fn cover_and_nested_selection() -> impl Strategy<Value = (SetCover, Vec<usize>, Vec<usize>)> {
        (1usize..10).prop_flat_map(|n| {
            let subset = proptest::collection::vec(1..=n, 0..=n);
            (
                proptest::collection::vec(subset, n),
                proptest::collection::vec(any::<bool>(), n),
                proptest::collection::vec(any::<bool>(), n),
            )
                .prop_map(|(subsets, small, extra)| {
                    let cover = SetCover::new(subsets).unwrap();
                    let smaller: Vec<usize> = (0..small.len()).filter(|&i| small[i]).collect();
                    let larger: Vec<usize> =
                        (0..small.len()).filter(|&i| small[i] || extra[i]).collect();
                    (cover, smaller, larger)
                })
        })
    }

    proptest! {
        #[test]
        fn prop_coverage_is_monotonic((cover, smaller, larger) in cover_and_nested_selection()) {
            if cover.covers(smaller.iter().copied()) {
                prop_assert!(cover.covers(larger.iter().copied()));
            }
        }
    }
}
