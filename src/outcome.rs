use std::time::Duration;

use crate::error::PuzzleError;
use crate::puzzle::{State, StateKey};

/// Which ceiling stopped an A* search.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Exhaustion {
    TimeLimit,
    NodeBudget,
}

/// How a search ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchOutcome {
    /// The goal was popped from the frontier.
    Found(State),
    /// The frontier drained without reaching the goal.
    NotFound,
    /// A time or node ceiling ended the search; no partial answer.
    ResourceExhausted(Exhaustion),
}

/// Counters gathered during one search.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchStats {
    /// States whose successors were generated.
    pub nodes_expanded: u64,
    /// Successor states produced, duplicates included.
    pub states_generated: u64,
    /// Largest frontier population seen after an expansion.
    pub peak_frontier: usize,
    /// Frontier entries dropped by the capacity ceiling.
    pub evicted: u64,
    /// Superseded A* entries discarded on pop.
    pub stale_skipped: u64,
    /// Times the A* node budget was grown and the search resumed.
    pub budget_resumes: u32,
    pub elapsed: Duration,
}

#[derive(Debug, Clone)]
pub struct SearchReport {
    pub outcome: SearchOutcome,
    /// Start-to-goal keys, present only when a path-storing search succeeded.
    pub solution_path: Option<Vec<StateKey>>,
    pub stats: SearchStats,
}

impl SearchReport {
    pub(crate) fn new(outcome: SearchOutcome, solution_path: Option<Vec<StateKey>>, stats: SearchStats) -> Self {
        Self {
            outcome,
            solution_path,
            stats,
        }
    }

    pub fn found(&self) -> Option<&State> {
        match &self.outcome {
            SearchOutcome::Found(state) => Some(state),
            _ => None,
        }
    }

    pub fn is_found(&self) -> bool {
        matches!(self.outcome, SearchOutcome::Found(_))
    }

    /// Number of moves in the stored solution path.
    pub fn move_count(&self) -> Option<usize> {
        self.solution_path.as_ref().map(|path| path.len().saturating_sub(1))
    }

    /// The stored path decoded back into board states.
    pub fn solution_states(&self, size: usize) -> Result<Vec<State>, PuzzleError> {
        self.solution_path
            .iter()
            .flatten()
            .map(|key| State::from_key(size, key))
            .collect()
    }
}
