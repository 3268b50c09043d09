use std::fmt;
use std::str::FromStr;

use crate::astar::astar_with;
use crate::config::SearchConfig;
use crate::error::PuzzleError;
use crate::outcome::SearchReport;
use crate::puzzle::{Puzzle, State};
use crate::uninformed::{bfs_with, dfs_with};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Strategy {
    Bfs,
    Dfs,
    AStar,
}

impl Strategy {
    pub const ALL: [Strategy; 3] = [Strategy::AStar, Strategy::Bfs, Strategy::Dfs];
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match *self {
            Strategy::Bfs => "BFS",
            Strategy::Dfs => "DFS",
            Strategy::AStar => "A*",
        };
        write!(f, "{}", s)
    }
}

impl FromStr for Strategy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "bfs" | "b" => Ok(Strategy::Bfs),
            "dfs" | "d" => Ok(Strategy::Dfs),
            "astar" | "a*" | "a" => Ok(Strategy::AStar),
            other => Err(format!("unknown strategy `{other}` (expected astar, bfs or dfs)")),
        }
    }
}

/// Runs any [`Strategy`] under one [`SearchConfig`].
#[derive(Debug, Clone)]
pub struct Solver {
    config: SearchConfig,
}

impl Solver {
    pub fn new(config: SearchConfig) -> Result<Self, PuzzleError> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &SearchConfig {
        &self.config
    }

    pub fn solve(
        &self,
        strategy: Strategy,
        puzzle: &Puzzle,
        start: &State,
        goal: &State,
    ) -> Result<SearchReport, PuzzleError> {
        tracing::debug!(%strategy, size = puzzle.size(), "starting search");
        match strategy {
            Strategy::Bfs => bfs_with(puzzle, start, goal, &self.config),
            Strategy::Dfs => dfs_with(puzzle, start, goal, &self.config),
            Strategy::AStar => astar_with(puzzle, start, goal, &self.config),
        }
    }
}
