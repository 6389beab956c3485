//! Sign-inverting decorator.

use super::coverage::SetCover;
use super::types::{Evaluator, Solution};

/// Turns a maximize-sense evaluator into a minimize-sense one by negating
/// every value it reports.
///
/// The search engine only ever minimizes, so natural "larger is better"
/// models such as [`QuadraticModel`](super::QuadraticModel) are wrapped
/// exactly once in this type. Results are flipped back when reported.
#[derive(Debug, Clone, PartialEq)]
pub struct Inverted<E> {
    inner: E,
}

impl<E: Evaluator> Inverted<E> {
    pub fn new(inner: E) -> Self {
        Self { inner }
    }

    pub fn inner(&self) -> &E {
        &self.inner
    }

    pub fn into_inner(self) -> E {
        self.inner
    }
}

impl<E: Evaluator> Evaluator for Inverted<E> {
    fn domain_size(&self) -> usize {
        self.inner.domain_size()
    }

    fn evaluate(&self, solution: &Solution) -> f64 {
        -self.inner.evaluate(solution)
    }

    fn evaluate_insertion(&self, elem: usize, solution: &Solution) -> f64 {
        -self.inner.evaluate_insertion(elem, solution)
    }

    fn evaluate_removal(&self, elem: usize, solution: &Solution) -> f64 {
        -self.inner.evaluate_removal(elem, solution)
    }

    fn evaluate_exchange(&self, elem_in: usize, elem_out: usize, solution: &Solution) -> f64 {
        -self.inner.evaluate_exchange(elem_in, elem_out, solution)
    }

    fn set_cover(&self) -> Option<&SetCover> {
        self.inner.set_cover()
    }
}
