//! Objective and constraint evaluation.
//!
//! The engine talks to a single capability, [`Evaluator`]. Concrete
//! behaviour is assembled by composition:
//!
//! - [`QuadraticModel`]: the raw QBF value `xᵀAx`, maximize sense.
//! - [`Inverted`]: flips the sign so the engine can minimize.
//! - [`CoverageModel`]: gates moves with the set-cover constraint.
//!
//! A set-cover QBF is therefore `CoverageModel<Inverted<QuadraticModel>>`.

mod coverage;
mod inverted;
mod quadratic;
mod types;

pub use coverage::{CoverageModel, SetCover, INFEASIBLE_INSERTION_COST};
pub use inverted::Inverted;
pub use quadratic::QuadraticModel;
pub use types::{Evaluator, Solution};

/// Unconstrained QBF in the engine's minimize sense.
pub type Qbf = Inverted<QuadraticModel>;

/// Set-cover constrained QBF in the engine's minimize sense.
pub type ScQbf = CoverageModel<Inverted<QuadraticModel>>;
