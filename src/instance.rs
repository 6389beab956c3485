//! Instance descriptions.
//!
//! Both variants are whitespace-separated numeric tokens:
//!
//! ```text
//! n
//! [SC-QBF only] len_0 len_1 ... len_{n-1}
//! [SC-QBF only] targets of subset 0 ... targets of subset n-1   (1-indexed)
//! A[0][0] A[0][1] ... A[0][n-1]
//!         A[1][1] ... A[1][n-1]
//!                 ...
//!                     A[n-1][n-1]
//! ```
//!
//! Only the upper triangle is present. Reading files is up to the caller.

use crate::error::{QbfError, Result};
use crate::eval::{CoverageModel, Evaluator, Inverted, Qbf, QuadraticModel, ScQbf, SetCover};

/// A loaded QBF or SC-QBF instance.
///
/// # Examples
///
/// ```
/// use u_tabu_qbf::Instance;
///
/// let text = "2\n1 1\n1\n2\n3 -1\n4\n";
/// let instance = Instance::parse_sc_qbf(text).unwrap();
/// assert_eq!(instance.domain_size(), 2);
/// assert!(instance.coverage_model().is_some());
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Instance {
    quadratic: QuadraticModel,
    cover: Option<SetCover>,
}

impl Instance {
    /// Assembles an instance from already built parts.
    pub fn new(quadratic: QuadraticModel, cover: Option<SetCover>) -> Result<Self> {
        if let Some(cover) = &cover {
            if cover.len() != quadratic.domain_size() {
                return Err(QbfError::MalformedInstance(format!(
                    "{} subsets for {} variables",
                    cover.len(),
                    quadratic.domain_size()
                )));
            }
        }
        Ok(Self { quadratic, cover })
    }

    /// Parses an unconstrained QBF description.
    pub fn parse_qbf(text: &str) -> Result<Self> {
        let mut tokens = Tokens::new(text);
        let n = tokens.next_count("domain size")?;
        let quadratic = read_matrix(&mut tokens, n)?;
        tokens.finish()?;
        Ok(Self {
            quadratic,
            cover: None,
        })
    }

    /// Parses a set-cover constrained QBF description.
    pub fn parse_sc_qbf(text: &str) -> Result<Self> {
        let mut tokens = Tokens::new(text);
        let n = tokens.next_count("domain size")?;

        let mut lengths = Vec::new();
        for i in 0..n {
            lengths.push(tokens.next_count(&format!("cover length of subset {i}"))?);
        }
        let mut subsets = Vec::new();
        for (i, &len) in lengths.iter().enumerate() {
            let mut subset = Vec::new();
            for _ in 0..len {
                subset.push(tokens.next_count(&format!("target of subset {i}"))?);
            }
            subsets.push(subset);
        }
        let cover = SetCover::new(subsets)?;

        let quadratic = read_matrix(&mut tokens, n)?;
        tokens.finish()?;
        Ok(Self {
            quadratic,
            cover: Some(cover),
        })
    }

    pub fn domain_size(&self) -> usize {
        self.quadratic.domain_size()
    }

    /// The raw maximize-sense matrix.
    pub fn quadratic(&self) -> &QuadraticModel {
        &self.quadratic
    }

    pub fn cover(&self) -> Option<&SetCover> {
        self.cover.as_ref()
    }

    /// Unconstrained objective, ready for the engine.
    pub fn objective(&self) -> Qbf {
        Inverted::new(self.quadratic.clone())
    }

    /// Constrained objective, or `None` for a plain QBF instance.
    pub fn coverage_model(&self) -> Option<ScQbf> {
        let cover = self.cover.clone()?;
        // Every constructor checks that the cover and matrix share a domain.
        let model = CoverageModel::new(self.objective(), cover);
        debug_assert!(model.is_ok(), "cover and matrix sizes diverged");
        model.ok()
    }
}

fn read_matrix(tokens: &mut Tokens<'_>, n: usize) -> Result<QuadraticModel> {
    if QuadraticModel::triangle_len(n).is_none() {
        return Err(QbfError::MalformedInstance(format!("domain size {n} is too large")));
    }
    // Counts come from the input, so storage grows with the tokens actually read.
    let mut upper = Vec::new();
    for i in 0..n {
        for j in i..n {
            upper.push(tokens.next_value(&format!("coefficient A[{i}][{j}]"))?);
        }
    }
    QuadraticModel::from_upper(n, upper)
}

struct Tokens<'a> {
    inner: std::str::SplitWhitespace<'a>,
    position: usize,
}

impl<'a> Tokens<'a> {
    fn new(text: &'a str) -> Self {
        Self {
            inner: text.split_whitespace(),
            position: 0,
        }
    }

    fn next_value(&mut self, what: &str) -> Result<f64> {
        let raw = self.inner.next().ok_or_else(|| {
            QbfError::MalformedInstance(format!(
                "unexpected end of input at token {} ({what})",
                self.position + 1
            ))
        })?;
        self.position += 1;
        raw.parse::<f64>().map_err(|_| {
            QbfError::MalformedInstance(format!(
                "token {} ({what}) is not a number: {raw:?}",
                self.position
            ))
        })
    }

    fn next_count(&mut self, what: &str) -> Result<usize> {
        let value = self.next_value(what)?;
        if value < 0.0 || value.fract() != 0.0 || !value.is_finite() {
            return Err(QbfError::MalformedInstance(format!(
                "token {} ({what}) must be a non-negative integer, found {value}",
                self.position
            )));
        }
        Ok(value as usize)
    }

    fn finish(mut self) -> Result<()> {
        match self.inner.next() {
            None => Ok(()),
            Some(extra) => Err(QbfError::MalformedInstance(format!(
                "trailing token {} ({extra:?}) after the coefficient matrix",
                self.position + 1
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::eval::Solution;

    #[test]
    fn test_parse_qbf() {
        let instance = Instance::parse_qbf("3\n1 -2 3\n4 -5\n6\n").unwrap();
        assert_eq!(instance.domain_size(), 3);
        assert!(instance.cover().is_none());
        assert!(instance.coverage_model().is_none());
        assert_eq!(instance.quadratic().coefficient(1, 2), -5.0);
        assert_eq!(instance.quadratic().coefficient(2, 1), 0.0);

        let objective = instance.objective();
        assert_eq!(objective.evaluate(&Solution::from_elements([0, 1, 2])), -7.0);
    }

    #[test]
    fn test_parse_sc_qbf() {
        let text = "3\n1 1 2\n1\n2\n3 1\n5 0 0\n3 0\n4\n";
        let instance = Instance::parse_sc_qbf(text).unwrap();
        let cover = instance.cover().unwrap();
        assert_eq!(cover.subset(0), &[1]);
        assert_eq!(cover.subset(2), &[1, 3]);

        let model = instance.coverage_model().unwrap();
        assert_eq!(model.evaluate(&Solution::from_elements([0, 1])), f64::INFINITY);
        assert_eq!(model.evaluate(&Solution::from_elements([1, 2])), -7.0);
    }

    #[test]
    fn test_decimal_tokens_accepted() {
        let instance = Instance::parse_qbf("2.0 1.5 0 -2.25").unwrap();
        assert_eq!(instance.quadratic().coefficient(1, 1), -2.25);
    }

    #[test]
    fn test_missing_matrix_entries() {
        let err = Instance::parse_qbf("3\n1 2 3\n4 5\n").unwrap_err();
        assert!(matches!(err, QbfError::MalformedInstance(msg) if msg.contains("A[2][2]")));
    }

    #[test]
    fn test_trailing_tokens() {
        let err = Instance::parse_qbf("1\n7\n8\n").unwrap_err();
        assert!(matches!(err, QbfError::MalformedInstance(msg) if msg.contains("trailing")));
    }

    #[test]
    fn test_bad_counts() {
        assert!(Instance::parse_qbf("-1").is_err());
        assert!(Instance::parse_qbf("2.5").is_err());
        assert!(Instance::parse_qbf("abc").is_err());
        assert!(Instance::parse_sc_qbf("2\n1 1.5\n1 2\n0 0 0").is_err());
    }

    #[test]
    fn test_target_out_of_range() {
        let err = Instance::parse_sc_qbf("2\n1 1\n1\n3\n0 0 0\n").unwrap_err();
        assert!(matches!(err, QbfError::MalformedInstance(msg) if msg.contains("target 3")));
    }

    #[test]
    fn test_huge_domain_size_is_rejected_without_allocating() {
        let err = Instance::parse_sc_qbf("1000000000000000000 1").unwrap_err();
        assert!(matches!(err, QbfError::MalformedInstance(_)));

        let err = Instance::parse_qbf("4000000000 1 2").unwrap_err();
        assert!(matches!(err, QbfError::MalformedInstance(msg) if msg.contains("end of input")));

        // n * (n + 1) / 2 overflows.
        let err = Instance::parse_qbf("18446744073709551615 1").unwrap_err();
        assert!(matches!(err, QbfError::MalformedInstance(msg) if msg.contains("too large")));
    }

    #[test]
    fn test_coverage_model_shares_the_domain() {
        let instance = Instance::parse_sc_qbf("2\n1 1\n1\n2\n3 -1\n4\n").unwrap();
        let model = instance.coverage_model().unwrap();
        assert_eq!(model.domain_size(), 2);
        assert_eq!(model.cover().len(), 2);
    }

    #[test]
    fn test_new_checks_sizes() {
        let quadratic = QuadraticModel::diagonal(&[1.0, 2.0]);
        let cover = SetCover::new(vec![vec![1]]).unwrap();
        assert!(Instance::new(quadratic.clone(), Some(cover)).is_err());
        assert!(Instance::new(quadratic, None).is_ok());
    }
}
