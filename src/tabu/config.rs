//! Tabu Search configuration.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::{QbfError, Result};

/// How a neighbourhood scan picks its move.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum SearchMethod {
    /// Take the first admissible move with a strictly negative delta.
    #[default]
    FirstImproving,
    /// Take the admissible move with the smallest delta, first seen on ties.
    BestImproving,
}

/// What to do when the search stalls.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum RestartPolicy {
    /// Leave the search state untouched.
    #[default]
    None,
    /// Jump back to the best-known solution, forget the tabu memory and
    /// run up to `burst` extra moves while they keep improving.
    Intensification {
        /// Upper bound on the extra moves after the jump.
        burst: usize,
    },
    /// Rebuild the working solution from the least-used variables of the
    /// best-known solution plus random extra variables.
    Diversification {
        /// Fraction in `[0, 1]` of the best-known solution's variables to keep.
        fixation_rate: f64,
        /// Probability in `[0, 1]` of adding each remaining variable.
        inclusion_probability: f64,
    },
    /// Drop one random selected variable and add one random unselected one.
    StrategicOscillation,
}

impl RestartPolicy {
    /// Intensification with a burst of 20 moves.
    pub fn intensification() -> Self {
        RestartPolicy::Intensification { burst: 20 }
    }

    /// Diversification keeping 20% of the best-known variables and adding
    /// every other variable with probability 0.5.
    pub fn diversification() -> Self {
        RestartPolicy::Diversification {
            fixation_rate: 0.2,
            inclusion_probability: 0.5,
        }
    }
}

/// When the restart policy fires.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum RestartTrigger {
    /// Whenever an iteration finds no admissible move.
    #[default]
    NoAdmissibleMove,
    /// After every `k`-th iteration, regardless of progress.
    Every(usize),
}

/// How the starting solution is built.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum InitialSolution {
    /// Start from the empty selection.
    Empty,
    /// Randomized greedy pass until every target is covered.
    #[default]
    GreedyCover,
}

/// Configuration parameters for Tabu Search.
///
/// # Examples
///
/// ```
/// use u_tabu_qbf::tabu::{RestartPolicy, SearchMethod, TabuConfig};
///
/// let config = TabuConfig::default()
///     .with_max_iterations(1000)
///     .with_tabu_tenure(7)
///     .with_method(SearchMethod::BestImproving)
///     .with_restart(RestartPolicy::intensification());
/// assert_eq!(config.max_iterations, 1000);
/// assert_eq!(config.tabu_tenure, 7);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct TabuConfig {
    /// Maximum number of iterations.
    pub max_iterations: usize,
    /// How many moves an element stays tabu after taking part in one.
    pub tabu_tenure: usize,
    /// Maximum iterations without improving the best-known cost before
    /// stopping. 0 disables the check.
    pub max_no_improve: usize,
    /// Wall-clock budget in milliseconds (None for no limit).
    pub time_limit_ms: Option<u64>,
    /// Move selection rule.
    pub method: SearchMethod,
    /// Stagnation response.
    pub restart: RestartPolicy,
    /// When [`restart`](Self::restart) fires.
    pub restart_trigger: RestartTrigger,
    /// Starting solution strategy.
    pub initial_solution: InitialSolution,
    /// Random seed (None for random).
    pub seed: Option<u64>,
}

impl Default for TabuConfig {
    fn default() -> Self {
        Self {
            max_iterations: 1000,
            tabu_tenure: 7,
            max_no_improve: 100,
            time_limit_ms: None,
            method: SearchMethod::FirstImproving,
            restart: RestartPolicy::None,
            restart_trigger: RestartTrigger::NoAdmissibleMove,
            initial_solution: InitialSolution::GreedyCover,
            seed: None,
        }
    }
}

impl TabuConfig {
    /// Sets the maximum number of iterations.
    pub fn with_max_iterations(mut self, n: usize) -> Self {
        self.max_iterations = n;
        self
    }

    /// Sets the tabu tenure.
    pub fn with_tabu_tenure(mut self, tenure: usize) -> Self {
        self.tabu_tenure = tenure;
        self
    }

    /// Sets maximum iterations without improvement.
    pub fn with_max_no_improve(mut self, n: usize) -> Self {
        self.max_no_improve = n;
        self
    }

    /// Sets the wall-clock budget.
    pub fn with_time_limit_ms(mut self, ms: u64) -> Self {
        self.time_limit_ms = Some(ms);
        self
    }

    pub fn with_method(mut self, method: SearchMethod) -> Self {
        self.method = method;
        self
    }

    pub fn with_restart(mut self, restart: RestartPolicy) -> Self {
        self.restart = restart;
        self
    }

    pub fn with_restart_trigger(mut self, trigger: RestartTrigger) -> Self {
        self.restart_trigger = trigger;
        self
    }

    pub fn with_initial_solution(mut self, initial: InitialSolution) -> Self {
        self.initial_solution = initial;
        self
    }

    /// Sets the random seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Returns `true` if restarts fire on a schedule, independent of
    /// whether the search is stuck.
    pub fn has_periodic_restart(&self) -> bool {
        matches!(self.restart_trigger, RestartTrigger::Every(_))
            && self.restart != RestartPolicy::None
    }

    /// Validates the configuration.
    pub fn validate(&self) -> Result<()> {
        if self.max_iterations == 0 {
            return Err(QbfError::InvalidConfig(
                "max_iterations must be at least 1".into(),
            ));
        }
        if self.time_limit_ms == Some(0) {
            return Err(QbfError::InvalidConfig(
                "time_limit_ms must be positive or None".into(),
            ));
        }
        if self.restart_trigger == RestartTrigger::Every(0) {
            return Err(QbfError::InvalidConfig(
                "restart interval must be at least 1".into(),
            ));
        }
        if let RestartPolicy::Diversification {
            fixation_rate,
            inclusion_probability,
        } = self.restart
        {
            if !(0.0..=1.0).contains(&fixation_rate) {
                return Err(QbfError::InvalidConfig(format!(
                    "fixation_rate must be in [0, 1], got {fixation_rate}"
                )));
            }
            if !(0.0..=1.0).contains(&inclusion_probability) {
                return Err(QbfError::InvalidConfig(format!(
                    "inclusion_probability must be in [0, 1], got {inclusion_probability}"
                )));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tabu_config_defaults() {
        let config = TabuConfig::default();
        assert_eq!(config.max_iterations, 1000);
        assert_eq!(config.tabu_tenure, 7);
        assert_eq!(config.max_no_improve, 100);
        assert_eq!(config.method, SearchMethod::FirstImproving);
        assert_eq!(config.restart, RestartPolicy::None);
        assert_eq!(config.initial_solution, InitialSolution::GreedyCover);
        assert!(config.time_limit_ms.is_none());
        assert!(config.seed.is_none());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_tabu_config_builder() {
        let config = TabuConfig::default()
            .with_max_iterations(50)
            .with_tabu_tenure(3)
            .with_max_no_improve(0)
            .with_time_limit_ms(250)
            .with_method(SearchMethod::BestImproving)
            .with_restart(RestartPolicy::StrategicOscillation)
            .with_restart_trigger(RestartTrigger::Every(10))
            .with_initial_solution(InitialSolution::Empty)
            .with_seed(123);

        assert_eq!(config.max_iterations, 50);
        assert_eq!(config.tabu_tenure, 3);
        assert_eq!(config.max_no_improve, 0);
        assert_eq!(config.time_limit_ms, Some(250));
        assert_eq!(config.method, SearchMethod::BestImproving);
        assert_eq!(config.restart_trigger, RestartTrigger::Every(10));
        assert_eq!(config.initial_solution, InitialSolution::Empty);
        assert_eq!(config.seed, Some(123));
        assert!(config.has_periodic_restart());
    }

    #[test]
    fn test_periodic_without_policy_is_not_periodic() {
        let config = TabuConfig::default().with_restart_trigger(RestartTrigger::Every(5));
        assert!(!config.has_periodic_restart());
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        assert!(TabuConfig::default().with_max_iterations(0).validate().is_err());
        assert!(TabuConfig::default().with_time_limit_ms(0).validate().is_err());
        assert!(TabuConfig::default()
            .with_restart_trigger(RestartTrigger::Every(0))
            .validate()
            .is_err());

        let bad_rate = TabuConfig::default().with_restart(RestartPolicy::Diversification {
            fixation_rate: 1.5,
            inclusion_probability: 0.5,
        });
        assert!(matches!(
            bad_rate.validate(),
            Err(QbfError::InvalidConfig(_))
        ));

        let bad_probability = TabuConfig::default().with_restart(RestartPolicy::Diversification {
            fixation_rate: 0.2,
            inclusion_probability: -0.1,
        });
        assert!(bad_probability.validate().is_err());
    }
}
