//! Search engine for the k×k sliding-tile puzzle.
//!
//! - [`Puzzle`] — state-transition model: legal moves, goal test, solvability
//! - [`BoundedDeque`] — capacity-limited frontier behind [`bfs()`] and [`dfs()`]
//! - [`astar()`] — A* with time and node-budget ceilings
//! - [`reconstruct`] — start-to-goal path from a [`ParentMap`]
//! - [`Solver`] — runs any [`Strategy`] from a TOML-loaded [`SearchConfig`]

pub mod astar;
pub mod config;
pub mod deque;
pub mod error;
pub mod heuristic;
pub mod outcome;
pub mod path;
pub mod puzzle;
pub mod solver;
pub mod uninformed;

pub use astar::{astar, astar_with};
pub use config::SearchConfig;
pub use deque::BoundedDeque;
pub use error::{ConfigError, PuzzleError};
pub use heuristic::Heuristic;
pub use outcome::{Exhaustion, SearchOutcome, SearchReport, SearchStats};
pub use path::{reconstruct, ParentMap};
pub use puzzle::{Move, Puzzle, State, StateKey};
pub use solver::{Solver, Strategy};
pub use uninformed::{bfs, bfs_with, dfs, dfs_with};
