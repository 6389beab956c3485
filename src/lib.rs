//! Tabu search for quadratic binary functions.
//!
//! Maximizes a quadratic binary function (QBF), `f(x) = xᵀAx` over
//! `x ∈ {0, 1}ⁿ`, optionally subject to a set-cover constraint (SC-QBF):
//! every target element must be covered by some selected subset.
//!
//! - [`eval`]: objective and constraint evaluation, composed from a raw
//!   quadratic model, a sign-flipping decorator and a coverage gate.
//! - [`tabu`]: the search engine with insertion, removal and exchange
//!   moves, aspiration, first/best-improving selection and restart policies.
//! - [`instance`]: plain-text instance parsing.
//!
//! # Example
//!
//! ```
//! use u_tabu_qbf::tabu::{TabuConfig, TabuRunner};
//! use u_tabu_qbf::Instance;
//!
//! let instance = Instance::parse_sc_qbf("3\n1 1 1\n1\n2\n3\n5 0 0\n3 0\n4\n").unwrap();
//! let model = instance.coverage_model().unwrap();
//!
//! let config = TabuConfig::default().with_tabu_tenure(1).with_seed(1);
//! let result = TabuRunner::run(&model, &config).unwrap();
//! assert_eq!(result.best_value, 12.0);
//! ```

pub mod error;
pub mod eval;
pub mod instance;
pub mod tabu;

pub use error::{QbfError, Result};
pub use instance::Instance;
