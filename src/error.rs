//! Error types.
//!
//! Only construction can fail. Once a [`TabuSearch`](crate::tabu::TabuSearch)
//! exists, admissibility and feasibility inside the search loop are plain
//! values, never errors.

use thiserror::Error;

/// Result alias for fallible construction steps.
pub type Result<T> = std::result::Result<T, QbfError>;

/// Fatal conditions detected before the first search iteration.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum QbfError {
    /// The instance description has inconsistent or unparsable tokens.
    #[error("malformed instance: {0}")]
    MalformedInstance(String),

    /// No selection of subsets can cover every target element.
    #[error("infeasible instance: targets {uncovered:?} cannot be covered by any subset")]
    InfeasibleInstance {
        /// Target identifiers (1-indexed) left uncovered after all candidates were tried.
        uncovered: Vec<usize>,
    },

    /// A configuration parameter is out of range.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}
