//! Moves, engine states and stop reasons.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// One neighbourhood move on a binary selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum TabuMove {
    /// Select an unselected element.
    Insert(usize),
    /// Drop a selected element.
    Remove(usize),
    /// Select `elem_in` and drop `elem_out` at once.
    Exchange { elem_in: usize, elem_out: usize },
}

impl TabuMove {
    /// Element that becomes selected, if any.
    pub fn elem_in(&self) -> Option<usize> {
        match *self {
            TabuMove::Insert(e) => Some(e),
            TabuMove::Remove(_) => None,
            TabuMove::Exchange { elem_in, .. } => Some(elem_in),
        }
    }

    /// Element that becomes unselected, if any.
    pub fn elem_out(&self) -> Option<usize> {
        match *self {
            TabuMove::Insert(_) => None,
            TabuMove::Remove(e) => Some(e),
            TabuMove::Exchange { elem_out, .. } => Some(elem_out),
        }
    }

    /// Every element the move touches.
    pub fn elements(&self) -> impl Iterator<Item = usize> {
        self.elem_in().into_iter().chain(self.elem_out())
    }
}

/// Lifecycle of a [`TabuSearch`](super::TabuSearch).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EngineState {
    /// Initial solution built, no iteration run yet.
    Init,
    /// Inside the search loop.
    Iterating,
    /// A stop condition fired.
    Terminated,
}

/// Why a run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum StopReason {
    /// The iteration budget was used up.
    IterationLimit,
    /// The wall-clock budget was used up.
    TimeLimit,
    /// Too many consecutive iterations without a new best-known solution.
    StagnationLimit,
    /// The search reached a state it can no longer leave: no admissible
    /// move, and nothing left that could perturb it.
    Completed,
}

impl std::fmt::Display for StopReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let tag = match self {
            StopReason::IterationLimit => "ITERATION_LIMIT",
            StopReason::TimeLimit => "TIME_LIMIT",
            StopReason::StagnationLimit => "STAGNATION_LIMIT",
            StopReason::Completed => "COMPLETED",
        };
        f.write_str(tag)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_move_participants() {
        let mv = TabuMove::Exchange {
            elem_in: 4,
            elem_out: 1,
        };
        assert_eq!(mv.elem_in(), Some(4));
        assert_eq!(mv.elem_out(), Some(1));
        assert_eq!(mv.elements().collect::<Vec<_>>(), vec![4, 1]);

        assert_eq!(TabuMove::Insert(2).elements().collect::<Vec<_>>(), vec![2]);
        assert_eq!(TabuMove::Remove(3).elem_in(), None);
    }

    #[test]
    fn test_stop_reason_tags() {
        assert_eq!(StopReason::IterationLimit.to_string(), "ITERATION_LIMIT");
        assert_eq!(StopReason::Completed.to_string(), "COMPLETED");
    }
}
