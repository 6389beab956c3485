//! Tabu Search (TS) over binary selections.
//!
//! A single-solution trajectory metaheuristic that uses a short-term memory
//! (the tabu list) to forbid recently touched variables, preventing cycling
//! and pushing the search into new regions of the solution space. Moves are
//! insertions, removals and exchanges of one variable; stalls are handled
//! by a pluggable restart policy.
//!
//! # References
//!
//! - Glover, F. (1989). "Tabu Search—Part I", *ORSA Journal on Computing* 1(3), 190-206.
//! - Glover, F. (1990). "Tabu Search—Part II", *ORSA Journal on Computing* 2(1), 4-32.

mod config;
pub mod construct;
mod memory;
mod restart;
mod runner;
mod types;

pub use config::{InitialSolution, RestartPolicy, RestartTrigger, SearchMethod, TabuConfig};
pub use memory::TabuList;
pub use runner::{TabuResult, TabuRunner, TabuSearch};
pub use types::{EngineState, StopReason, TabuMove};
