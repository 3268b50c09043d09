//! Breadth-first and depth-first search over a [`BoundedDeque`] frontier.
//!
//! Both drivers share one loop; they differ only in which end successors
//! are pushed on (back for BFS, front for DFS) and in the DFS depth ceiling.
//! States are marked visited when pushed, so each one enters the frontier at
//! most once.

use std::collections::HashSet;
use std::time::Instant;

use crate::config::SearchConfig;
use crate::deque::{BoundedDeque, DEFAULT_BATCH_SIZE};
use crate::error::PuzzleError;
use crate::outcome::{SearchOutcome, SearchReport, SearchStats};
use crate::path::{reconstruct, ParentMap};
use crate::puzzle::{Puzzle, State};

#[derive(Debug)]
struct FrontierNode {
    state: State,
    depth: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Order {
    Fifo,
    Lifo,
}

#[derive(Debug, Clone, Copy)]
struct Limits {
    capacity: Option<usize>,
    batch_size: usize,
    max_depth: Option<u32>,
}

/// Breadth-first search with an unbounded frontier.
pub fn bfs(puzzle: &Puzzle, start: &State, goal: &State, store_path: bool) -> Result<SearchReport, PuzzleError> {
    let limits = Limits {
        capacity: None,
        batch_size: DEFAULT_BATCH_SIZE,
        max_depth: None,
    };
    search(puzzle, start, goal, Order::Fifo, limits, store_path)
}

/// Depth-first search that stops descending at `max_depth`.
pub fn dfs(
    puzzle: &Puzzle,
    start: &State,
    goal: &State,
    max_depth: u32,
    store_path: bool,
) -> Result<SearchReport, PuzzleError> {
    let limits = Limits {
        capacity: None,
        batch_size: DEFAULT_BATCH_SIZE,
        max_depth: Some(max_depth),
    };
    search(puzzle, start, goal, Order::Lifo, limits, store_path)
}

/// BFS bounded by the configured frontier capacity.
pub fn bfs_with(
    puzzle: &Puzzle,
    start: &State,
    goal: &State,
    config: &SearchConfig,
) -> Result<SearchReport, PuzzleError> {
    config.validate()?;
    let limits = Limits {
        capacity: config.frontier_capacity(),
        batch_size: config.eviction_batch,
        max_depth: None,
    };
    search(puzzle, start, goal, Order::Fifo, limits, config.store_path)
}

/// DFS bounded by the configured frontier capacity and depth ceiling.
pub fn dfs_with(
    puzzle: &Puzzle,
    start: &State,
    goal: &State,
    config: &SearchConfig,
) -> Result<SearchReport, PuzzleError> {
    config.validate()?;
    let limits = Limits {
        capacity: config.frontier_capacity(),
        batch_size: config.eviction_batch,
        max_depth: Some(config.max_depth),
    };
    search(puzzle, start, goal, Order::Lifo, limits, config.store_path)
}

fn search(
    puzzle: &Puzzle,
    start: &State,
    goal: &State,
    order: Order,
    limits: Limits,
    store_path: bool,
) -> Result<SearchReport, PuzzleError> {
    puzzle.check(start)?;
    puzzle.check(goal)?;

    let started = Instant::now();
    let mut stats = SearchStats::default();
    let mut frontier = BoundedDeque::with_capacity(limits.capacity, limits.batch_size);
    let mut visited = HashSet::new();
    let mut parents = store_path.then(ParentMap::new);

    let start_key = start.key();
    visited.insert(start_key.clone());
    if let Some(parents) = parents.as_mut() {
        parents.insert(start_key, None);
    }
    push(&mut frontier, order, FrontierNode {
        state: start.clone(),
        depth: 0,
    });
    stats.peak_frontier = frontier.len();

    while let Some(FrontierNode { state, depth }) = frontier.pop_front() {
        if state == *goal {
            let solution_path = parents
                .as_ref()
                .map(|parents| reconstruct(parents, &state.key()))
                .transpose()?;
            stats.evicted = frontier.evicted();
            stats.elapsed = started.elapsed();
            tracing::info!(
                ?order,
                depth,
                expanded = stats.nodes_expanded,
                elapsed_ms = stats.elapsed.as_millis() as u64,
                "goal reached"
            );
            return Ok(SearchReport::new(SearchOutcome::Found(state), solution_path, stats));
        }

        if limits.max_depth.is_some_and(|max| depth >= max) {
            continue;
        }

        stats.nodes_expanded += 1;
        let current_key = parents.is_some().then(|| state.key());
        for next in puzzle.possible_moves(&state) {
            stats.states_generated += 1;
            let next_key = next.key();
            if visited.contains(&next_key) {
                continue;
            }
            visited.insert(next_key.clone());
            if let Some(parents) = parents.as_mut() {
                parents.insert(next_key, current_key.clone());
            }
            push(&mut frontier, order, FrontierNode {
                state: next,
                depth: depth + 1,
            });
        }
        stats.peak_frontier = stats.peak_frontier.max(frontier.len());
    }

    stats.evicted = frontier.evicted();
    stats.elapsed = started.elapsed();
    tracing::info!(
        ?order,
        expanded = stats.nodes_expanded,
        visited = visited.len(),
        evicted = stats.evicted,
        "frontier exhausted without reaching the goal"
    );
    Ok(SearchReport::new(SearchOutcome::NotFound, None, stats))
}

fn push(frontier: &mut BoundedDeque<FrontierNode>, order: Order, node: FrontierNode) {
    match order {
        Order::Fifo => frontier.push_back(node),
        Order::Lifo => frontier.push_front(node),
    }
}
