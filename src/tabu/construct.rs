//! Starting solutions.

use log::debug;
use rand::seq::SliceRandom;
use rand::Rng;

use crate::error::{QbfError, Result};
use crate::eval::{Evaluator, Solution};

/// Randomized greedy cover.
///
/// Scans the domain in shuffled order and keeps every candidate that still
/// covers at least one uncovered target, stopping once all targets are
/// covered. Without a set-cover constraint there is nothing to cover and
/// the result is empty.
///
/// The returned solution is evaluated.
///
/// # Errors
///
/// [`QbfError::InfeasibleInstance`] if the candidates run out while some
/// targets are still uncovered.
pub fn greedy_cover<E, R>(evaluator: &E, rng: &mut R) -> Result<Solution>
where
    E: Evaluator + ?Sized,
    R: Rng + ?Sized,
{
    let mut solution = Solution::new();

    if let Some(cover) = evaluator.set_cover() {
        let mut uncovered = vec![true; cover.len() + 1];
        uncovered[0] = false;
        let mut remaining = cover.len();

        let mut candidates: Vec<usize> = (0..evaluator.domain_size()).collect();
        candidates.shuffle(rng);

        for candidate in candidates {
            if remaining == 0 {
                break;
            }
            let subset = cover.subset(candidate);
            if !subset.iter().any(|&t| uncovered[t]) {
                continue;
            }
            solution.insert(candidate);
            for &target in subset {
                if uncovered[target] {
                    uncovered[target] = false;
                    remaining -= 1;
                }
            }
        }

        if remaining > 0 {
            let uncovered: Vec<usize> = (1..uncovered.len()).filter(|&t| uncovered[t]).collect();
            return Err(QbfError::InfeasibleInstance { uncovered });
        }
        debug!(
            "greedy cover selected {} of {} subsets",
            solution.len(),
            cover.len()
        );
    }

    evaluator.evaluate_into(&mut solution);
    Ok(solution)
}

/// Empty starting solution, evaluated.
pub fn empty<E: Evaluator + ?Sized>(evaluator: &E) -> Solution {
    let mut solution = Solution::new();
    evaluator.evaluate_into(&mut solution);
    solution
}
