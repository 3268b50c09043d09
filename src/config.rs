use std::path::Path;
use std::time::Duration;

use crate::error::{ConfigError, PuzzleError};
use crate::heuristic::Heuristic;

/// Search configuration loaded from TOML.
#[derive(Debug, Clone, serde::Deserialize)]
pub struct SearchConfig {
    /// BFS/DFS frontier ceiling; 0 leaves the frontier unbounded.
    #[serde(default = "default_frontier_capacity")]
    pub frontier_capacity: usize,

    /// Entries evicted per overflow, at most.
    #[serde(default = "default_eviction_batch")]
    pub eviction_batch: usize,

    /// DFS stops pushing successors at this depth.
    #[serde(default = "default_max_depth")]
    pub max_depth: u32,

    /// A* wall-clock ceiling in seconds.
    #[serde(default = "default_time_limit")]
    pub time_limit_secs: f64,

    /// Initial A* node budget.
    #[serde(default = "default_max_nodes")]
    pub max_nodes: u64,

    /// Fraction the node budget grows by on each resume; 0 makes the budget
    /// a hard ceiling.
    #[serde(default = "default_budget_growth")]
    pub budget_growth: f64,

    /// Resumes allowed before the node budget counts as exhausted.
    #[serde(default)]
    pub max_budget_rounds: Option<u32>,

    #[serde(default)]
    pub heuristic: Heuristic,

    /// Record parent links and report the solution path.
    #[serde(default)]
    pub store_path: bool,
}

fn default_frontier_capacity() -> usize {
    5_000_000
}
fn default_eviction_batch() -> usize {
    crate::deque::DEFAULT_BATCH_SIZE
}
fn default_max_depth() -> u32 {
    100_000
}
fn default_time_limit() -> f64 {
    60.0
}
fn default_max_nodes() -> u64 {
    1_000_000
}
fn default_budget_growth() -> f64 {
    0.15
}

impl SearchConfig {
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&text)
    }

    /// Rejects values no search can run with and warns about an
    /// inadmissible heuristic.
    pub fn validate(&self) -> Result<(), PuzzleError> {
        if self.eviction_batch == 0 {
            return Err(PuzzleError::InvalidConfig(
                "eviction_batch must be at least 1".to_string(),
            ));
        }
        if Duration::try_from_secs_f64(self.time_limit_secs).is_err() {
            return Err(PuzzleError::InvalidConfig(format!(
                "time_limit_secs must be a non-negative number of seconds a Duration can hold, got {}",
                self.time_limit_secs
            )));
        }
        if !self.budget_growth.is_finite() || self.budget_growth < 0.0 {
            return Err(PuzzleError::InvalidConfig(format!(
                "budget_growth must be a non-negative number, got {}",
                self.budget_growth
            )));
        }
        if !self.heuristic.is_admissible() {
            tracing::warn!(
                heuristic = ?self.heuristic,
                "heuristic is not admissible; A* may report non-shortest paths"
            );
        }
        Ok(())
    }

    pub fn frontier_capacity(&self) -> Option<usize> {
        (self.frontier_capacity > 0).then_some(self.frontier_capacity)
    }

    /// Saturates at `Duration::MAX` for values `validate` rejects.
    pub fn time_limit(&self) -> Duration {
        Duration::try_from_secs_f64(self.time_limit_secs).unwrap_or(Duration::MAX)
    }
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            frontier_capacity: default_frontier_capacity(),
            eviction_batch: default_eviction_batch(),
            max_depth: default_max_depth(),
            time_limit_secs: default_time_limit(),
            max_nodes: default_max_nodes(),
            budget_growth: default_budget_growth(),
            max_budget_rounds: None,
            heuristic: Heuristic::default(),
            store_path: false,
        }
    }
}
