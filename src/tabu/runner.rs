//! Tabu Search execution engine.
//!
//! # Algorithm
//!
//! 1. Build the initial solution (empty or randomized greedy cover)
//! 2. At each iteration:
//!    a. Scan insertions, removals, then exchanges, in that order
//!    b. Select a move that is non-tabu, or tabu but beats the best-known
//!       cost (aspiration)
//!    c. Record the move in the tabu list, commit it, re-evaluate
//!    d. With no admissible move, fall back to the restart policy
//!    e. Update the best-known solution
//! 3. Terminate on iteration, time or stagnation budget, or once the
//!    search can no longer change state
//!
//! # Reference
//!
//! Glover, F. (1989). "Tabu Search—Part I", *ORSA Journal on Computing* 1(3), 190-206.
//! Glover, F. (1990). "Tabu Search—Part II", *ORSA Journal on Computing* 2(1), 4-32.

use std::time::{Duration, Instant};

use log::{debug, info, trace};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use super::config::{InitialSolution, RestartTrigger, SearchMethod, TabuConfig};
use super::construct;
use super::memory::TabuList;
use super::types::{EngineState, StopReason, TabuMove};
use crate::error::{QbfError, Result};
use crate::eval::{Evaluator, Solution};

/// Result of a Tabu Search run.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct TabuResult {
    /// Best solution found. Its cached cost is in the engine's minimize sense.
    pub best: Solution,
    /// Objective value of `best` in the natural maximize sense.
    pub best_value: f64,
    /// Total iterations executed.
    pub iterations: usize,
    /// Iteration at which the best solution was found (0 = initial solution).
    pub best_iteration: usize,
    /// Which stop condition fired.
    pub stop_reason: StopReason,
    /// Restarts that actually changed the search state.
    pub restarts: usize,
    /// How often each variable was inserted by a committed move.
    pub usage: Vec<usize>,
    /// Best value (maximize sense) after each iteration.
    pub cost_history: Vec<f64>,
}

/// Picks one move out of a scan, according to the search method.
struct Selection {
    method: SearchMethod,
    chosen: Option<(TabuMove, f64)>,
}

impl Selection {
    fn new(method: SearchMethod) -> Self {
        Self {
            method,
            chosen: None,
        }
    }

    /// Offers an admissible move. Returns `true` once scanning can stop.
    fn offer(&mut self, mv: TabuMove, delta: f64) -> bool {
        match self.method {
            SearchMethod::FirstImproving => {
                if delta < 0.0 {
                    self.chosen = Some((mv, delta));
                    return true;
                }
                false
            }
            SearchMethod::BestImproving => {
                if self.chosen.map_or(true, |(_, best)| delta < best) {
                    self.chosen = Some((mv, delta));
                }
                false
            }
        }
    }
}

/// A single tabu search run over a borrowed evaluator.
///
/// The engine owns its working solution, best-known solution, tabu memory,
/// usage counters and random generator. The evaluator must report costs in
/// minimize sense (see [`Inverted`](crate::eval::Inverted)).
///
/// # Examples
///
/// ```
/// use rand::rngs::StdRng;
/// use rand::SeedableRng;
/// use u_tabu_qbf::eval::{CoverageModel, Inverted, QuadraticModel, SetCover};
/// use u_tabu_qbf::tabu::{StopReason, TabuConfig, TabuSearch};
///
/// let qbf = Inverted::new(QuadraticModel::diagonal(&[5.0, 3.0, 4.0]));
/// let cover = SetCover::new(vec![vec![1], vec![2], vec![3]]).unwrap();
/// let model = CoverageModel::new(qbf, cover).unwrap();
///
/// let config = TabuConfig::default().with_tabu_tenure(1).with_max_iterations(10);
/// let mut search = TabuSearch::new(&model, config, StdRng::seed_from_u64(7)).unwrap();
/// let result = search.run();
///
/// assert_eq!(result.best_value, 12.0);
/// assert_eq!(result.stop_reason, StopReason::Completed);
/// ```
pub struct TabuSearch<'a, E: Evaluator + ?Sized, R: Rng> {
    pub(super) evaluator: &'a E,
    pub(super) config: TabuConfig,
    pub(super) rng: R,
    pub(super) current: Solution,
    pub(super) best: Solution,
    pub(super) memory: TabuList,
    pub(super) usage: Vec<usize>,
    state: EngineState,
    iterations: usize,
    best_iteration: usize,
    no_improve: usize,
    restarts: usize,
    stop_reason: Option<StopReason>,
    cost_history: Vec<f64>,
}

impl<'a, E: Evaluator + ?Sized, R: Rng> TabuSearch<'a, E, R> {
    /// Validates `config` and builds the initial solution.
    ///
    /// # Errors
    ///
    /// - [`QbfError::InvalidConfig`](crate::QbfError::InvalidConfig) for an invalid configuration.
    /// - [`QbfError::InfeasibleInstance`] if some target is covered by no
    ///   subset, whatever the initial solution strategy.
    pub fn new(evaluator: &'a E, config: TabuConfig, mut rng: R) -> Result<Self> {
        config.validate()?;
        let n = evaluator.domain_size();

        // Even selecting every variable leaves these targets bare.
        if let Some(cover) = evaluator.set_cover() {
            let uncovered = cover.uncovered(0..n);
            if !uncovered.is_empty() {
                return Err(QbfError::InfeasibleInstance { uncovered });
            }
        }

        let current = match config.initial_solution {
            InitialSolution::Empty => construct::empty(evaluator),
            InitialSolution::GreedyCover => construct::greedy_cover(evaluator, &mut rng)?,
        };

        Ok(Self {
            evaluator,
            memory: TabuList::new(config.tabu_tenure),
            best: current.clone(),
            current,
            usage: vec![0; n],
            state: EngineState::Init,
            iterations: 0,
            best_iteration: 0,
            no_improve: 0,
            restarts: 0,
            stop_reason: None,
            cost_history: Vec::with_capacity(config.max_iterations.min(1 << 16)),
            config,
            rng,
        })
    }

    pub fn state(&self) -> EngineState {
        self.state
    }

    /// The working solution.
    pub fn current(&self) -> &Solution {
        &self.current
    }

    /// The best-known solution.
    pub fn best(&self) -> &Solution {
        &self.best
    }

    pub fn memory(&self) -> &TabuList {
        &self.memory
    }

    pub fn iterations(&self) -> usize {
        self.iterations
    }

    /// Runs the search loop until a stop condition fires.
    ///
    /// Calling `run` again after termination returns the same result
    /// without iterating.
    pub fn run(&mut self) -> TabuResult {
        if let Some(reason) = self.stop_reason {
            return self.result(reason);
        }

        self.state = EngineState::Iterating;
        info!(
            "tabu search started: n = {}, tenure = {}, method = {:?}, restart = {:?}, initial value = {}",
            self.evaluator.domain_size(),
            self.config.tabu_tenure,
            self.config.method,
            self.config.restart,
            -self.best.cost()
        );

        let started = Instant::now();
        let time_limit = self.config.time_limit_ms.map(Duration::from_millis);

        let reason = loop {
            if let Some(reason) = self.check_limits(started, time_limit) {
                break reason;
            }
            self.iterations += 1;
            let best_before = self.best.cost();

            let moved = self.step();
            let mut changed = moved.is_some();

            match self.config.restart_trigger {
                RestartTrigger::NoAdmissibleMove if moved.is_none() => {
                    changed |= self.restart();
                }
                RestartTrigger::Every(k) if self.iterations % k == 0 => {
                    changed |= self.restart();
                }
                _ => {}
            }

            self.record_best();
            if self.best.cost() < best_before {
                self.no_improve = 0;
            } else {
                self.no_improve += 1;
            }
            self.cost_history.push(-self.best.cost());

            if !changed && !self.config.has_periodic_restart() {
                break StopReason::Completed;
            }
        };

        self.state = EngineState::Terminated;
        self.stop_reason = Some(reason);
        info!(
            "tabu search stopped ({reason}) after {} iterations: best value = {} at iteration {}",
            self.iterations,
            -self.best.cost(),
            self.best_iteration
        );
        self.result(reason)
    }

    fn check_limits(&self, started: Instant, time_limit: Option<Duration>) -> Option<StopReason> {
        if self.iterations >= self.config.max_iterations {
            return Some(StopReason::IterationLimit);
        }
        if time_limit.is_some_and(|limit| started.elapsed() >= limit) {
            return Some(StopReason::TimeLimit);
        }
        if self.config.max_no_improve > 0 && self.no_improve >= self.config.max_no_improve {
            return Some(StopReason::StagnationLimit);
        }
        None
    }

    /// Performs one neighbourhood move if an admissible one exists.
    ///
    /// Does not touch the best-known solution or trigger restarts.
    pub fn step(&mut self) -> Option<TabuMove> {
        let (mv, delta) = self.select_move()?;
        trace!("iteration {}: {mv:?} (delta {delta})", self.iterations);
        self.apply_move(mv);
        Some(mv)
    }

    /// Returns `true` if the move may be taken from the current solution.
    ///
    /// Non-finite deltas are forbidden outright. Tabu moves pass only when
    /// they would strictly beat the best-known cost.
    fn is_admissible(&self, mv: &TabuMove, delta: f64) -> bool {
        if !delta.is_finite() {
            return false;
        }
        let tabu = mv.elements().any(|e| self.memory.contains(e));
        !tabu || self.current.cost() + delta < self.best.cost()
    }

    fn select_move(&self) -> Option<(TabuMove, f64)> {
        let n = self.evaluator.domain_size();
        let selected = self.current.to_vec();
        let unselected: Vec<usize> = (0..n).filter(|&e| !self.current.contains(e)).collect();
        let mut selection = Selection::new(self.config.method);

        for &elem in &unselected {
            let mv = TabuMove::Insert(elem);
            let delta = self.evaluator.evaluate_insertion(elem, &self.current);
            if self.is_admissible(&mv, delta) && selection.offer(mv, delta) {
                return selection.chosen;
            }
        }

        for &elem in &selected {
            let mv = TabuMove::Remove(elem);
            let delta = self.evaluator.evaluate_removal(elem, &self.current);
            if self.is_admissible(&mv, delta) && selection.offer(mv, delta) {
                return selection.chosen;
            }
        }

        for &elem_in in &unselected {
            for &elem_out in &selected {
                let mv = TabuMove::Exchange { elem_in, elem_out };
                let delta = self
                    .evaluator
                    .evaluate_exchange(elem_in, elem_out, &self.current);
                if self.is_admissible(&mv, delta) && selection.offer(mv, delta) {
                    return selection.chosen;
                }
            }
        }

        selection.chosen
    }

    fn apply_move(&mut self, mv: TabuMove) {
        self.memory.record(mv.elem_out(), mv.elem_in());
        if let Some(out) = mv.elem_out() {
            self.current.remove(out);
        }
        if let Some(elem) = mv.elem_in() {
            self.current.insert(elem);
            self.usage[elem] += 1;
        }
        self.evaluator.evaluate_into(&mut self.current);
    }

    /// Copies the working solution into the best-known slot if strictly better.
    pub(super) fn record_best(&mut self) -> bool {
        if self.current.cost() < self.best.cost() {
            self.best = self.current.clone();
            self.best_iteration = self.iterations;
            debug!(
                "iteration {}: new best value {} ({} selected)",
                self.iterations,
                -self.best.cost(),
                self.best.len()
            );
            return true;
        }
        false
    }

    fn restart(&mut self) -> bool {
        let changed = self.apply_restart();
        if changed {
            self.restarts += 1;
            debug!(
                "iteration {}: {:?} restart, current value {}",
                self.iterations,
                self.config.restart,
                -self.current.cost()
            );
        }
        changed
    }

    fn result(&self, stop_reason: StopReason) -> TabuResult {
        TabuResult {
            best: self.best.clone(),
            best_value: -self.best.cost(),
            iterations: self.iterations,
            best_iteration: self.best_iteration,
            stop_reason,
            restarts: self.restarts,
            usage: self.usage.clone(),
            cost_history: self.cost_history.clone(),
        }
    }
}

/// Convenience entry points that seed their own generator.
pub struct TabuRunner;

impl TabuRunner {
    /// Executes one Tabu Search run with a `StdRng` seeded from
    /// `config.seed` (random when `None`).
    pub fn run<E: Evaluator + ?Sized>(evaluator: &E, config: &TabuConfig) -> Result<TabuResult> {
        let seed = config.seed.unwrap_or_else(rand::random);
        let mut search = TabuSearch::new(evaluator, config.clone(), StdRng::seed_from_u64(seed))?;
        Ok(search.run())
    }

    /// Executes one independent run per seed, results in seed order.
    ///
    /// With the `parallel` feature the runs share rayon's thread pool.
    pub fn run_seeds<E: Evaluator + ?Sized>(
        evaluator: &E,
        config: &TabuConfig,
        seeds: &[u64],
    ) -> Vec<Result<TabuResult>> {
        let run_one = |&seed: &u64| Self::run(evaluator, &config.clone().with_seed(seed));

        #[cfg(feature = "parallel")]
        {
            use rayon::prelude::*;
            seeds.par_iter().map(run_one).collect()
        }
        #[cfg(not(feature = "parallel"))]
        {
            seeds.iter().map(run_one).collect()
        }
    }
}
