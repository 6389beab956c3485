//! Quadratic binary function `f(x) = xᵀAx` over an upper-triangular `A`.

use super::types::{Evaluator, Solution};
use crate::error::{QbfError, Result};

/// Upper-triangular coefficient matrix of a QBF.
///
/// Only entries with `row <= col` are stored. Entries below the diagonal
/// always read as zero; they are never mirrored from the upper triangle.
///
/// This model reports values in the natural **maximize** sense. Wrap it in
/// [`Inverted`](super::Inverted) before handing it to the search engine.
///
/// # Examples
///
/// ```
/// use u_tabu_qbf::eval::{Evaluator, QuadraticModel, Solution};
///
/// // [[1, 2],
/// //  [_, 3]]
/// let model = QuadraticModel::from_upper(2, vec![1.0, 2.0, 3.0]).unwrap();
/// let sol = Solution::from_elements([0, 1]);
/// assert_eq!(model.evaluate(&sol), 6.0);
/// assert_eq!(model.coefficient(1, 0), 0.0);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct QuadraticModel {
    n: usize,
    /// Row-major packed upper triangle, `n * (n + 1) / 2` entries.
    upper: Vec<f64>,
}

impl QuadraticModel {
    /// Builds a model from the packed upper triangle, row by row
    /// (`A[0][0..n]`, `A[1][1..n]`, ...).
    pub fn from_upper(n: usize, upper: Vec<f64>) -> Result<Self> {
        let expected = Self::triangle_len(n).ok_or_else(|| {
            QbfError::MalformedInstance(format!("domain size {n} is too large"))
        })?;
        if upper.len() != expected {
            return Err(QbfError::MalformedInstance(format!(
                "expected {expected} upper-triangular coefficients for n = {n}, found {}",
                upper.len()
            )));
        }
        Ok(Self { n, upper })
    }

    /// Builds a model from a square matrix, reading only `row <= col`.
    pub fn from_dense(rows: &[Vec<f64>]) -> Result<Self> {
        let n = rows.len();
        let mut upper = Vec::with_capacity(n * (n + 1) / 2);
        for (i, row) in rows.iter().enumerate() {
            if row.len() != n {
                return Err(QbfError::MalformedInstance(format!(
                    "row {i} has {} entries, expected {n}",
                    row.len()
                )));
            }
            upper.extend_from_slice(&row[i..]);
        }
        Ok(Self { n, upper })
    }

    /// Builds a purely linear model: `diag(values)`, zero elsewhere.
    pub fn diagonal(values: &[f64]) -> Self {
        let n = values.len();
        let mut upper = vec![0.0; n * (n + 1) / 2];
        for (i, &v) in values.iter().enumerate() {
            upper[Self::offset(n, i)] = v;
        }
        Self { n, upper }
    }

    /// Number of upper-triangular entries for `n` variables, `None` on overflow.
    pub fn triangle_len(n: usize) -> Option<usize> {
        n.checked_add(1)?.checked_mul(n).map(|cells| cells / 2)
    }

    #[inline]
    fn offset(n: usize, row: usize) -> usize {
        row * (2 * n - row + 1) / 2
    }

    /// `A[row][col]`, zero whenever `row > col`.
    ///
    /// # Panics
    ///
    /// If `col` is not below the domain size.
    #[inline]
    pub fn coefficient(&self, row: usize, col: usize) -> f64 {
        debug_assert!(col < self.n, "index {col} out of range for {} variables", self.n);
        if row > col {
            return 0.0;
        }
        self.upper[Self::offset(self.n, row) + (col - row)]
    }

    /// Interaction between two variables: `A[min][max]`.
    #[inline]
    fn interaction(&self, a: usize, b: usize) -> f64 {
        if a <= b {
            self.coefficient(a, b)
        } else {
            self.coefficient(b, a)
        }
    }

    /// Gain of having `elem` selected next to every other member of `solution`.
    fn contribution(&self, elem: usize, solution: &Solution) -> f64 {
        let linear = self.coefficient(elem, elem);
        solution
            .iter()
            .filter(|&j| j != elem)
            .fold(linear, |acc, j| acc + self.interaction(elem, j))
    }
}

impl Evaluator for QuadraticModel {
    fn domain_size(&self) -> usize {
        self.n
    }

    fn evaluate(&self, solution: &Solution) -> f64 {
        let selected = solution.to_vec();
        let mut total = 0.0;
        for (k, &i) in selected.iter().enumerate() {
            for &j in &selected[k..] {
                total += self.coefficient(i, j);
            }
        }
        total
    }

    fn evaluate_insertion(&self, elem: usize, solution: &Solution) -> f64 {
        if solution.contains(elem) {
            return 0.0;
        }
        self.contribution(elem, solution)
    }

    fn evaluate_removal(&self, elem: usize, solution: &Solution) -> f64 {
        if !solution.contains(elem) {
            return 0.0;
        }
        -self.contribution(elem, solution)
    }

    fn evaluate_exchange(&self, elem_in: usize, elem_out: usize, solution: &Solution) -> f64 {
        if elem_in == elem_out {
            return 0.0;
        }
        if solution.contains(elem_in) {
            return self.evaluate_removal(elem_out, solution);
        }
        if !solution.contains(elem_out) {
            return self.evaluate_insertion(elem_in, solution);
        }
        self.contribution(elem_in, solution)
            - self.contribution(elem_out, solution)
            - self.interaction(elem_in, elem_out)
    }
}
