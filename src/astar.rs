//! A* with a cost-bucketed frontier and two resource ceilings.
//!
//! The frontier maps each f-cost to the nodes sharing it; popping the
//! minimum takes any node from the lowest bucket. A node superseded by a
//! cheaper route keeps sitting in its old bucket and is dropped when popped,
//! because its g no longer matches `g_costs`.
//!
//! Wall-clock time is a hard ceiling. The node count is a resumable budget:
//! when it runs out, the whole search state is parked as a deferred branch,
//! the oldest deferred branch is resumed, and the budget grows by
//! `budget_growth`. The search is sequential, so the queue holds a single
//! branch and resuming it continues exactly where the search stopped.

use std::collections::{BTreeMap, HashMap, HashSet, VecDeque};
use std::time::{Duration, Instant};

use crate::config::SearchConfig;
use crate::error::PuzzleError;
use crate::heuristic::Heuristic;
use crate::outcome::{Exhaustion, SearchOutcome, SearchReport, SearchStats};
use crate::path::{reconstruct, ParentMap};
use crate::puzzle::{Puzzle, State, StateKey};

#[derive(Debug, Clone)]
struct SearchNode {
    state: State,
    g: u32,
    f: u32,
}

/// f-cost -> key -> node.
#[derive(Debug, Default)]
struct CostBuckets {
    buckets: BTreeMap<u32, BTreeMap<StateKey, SearchNode>>,
    len: usize,
}

impl CostBuckets {
    /// Overwrites any node already queued for `key` at the same f-cost.
    fn insert(&mut self, key: StateKey, node: SearchNode) {
        if self.buckets.entry(node.f).or_default().insert(key, node).is_none() {
            self.len += 1;
        }
    }

    fn pop_min(&mut self) -> Option<(StateKey, SearchNode)> {
        let mut bucket = self.buckets.first_entry()?;
        let popped = bucket.get_mut().pop_first();
        if bucket.get().is_empty() {
            bucket.remove();
        }
        if popped.is_some() {
            self.len -= 1;
        }
        popped
    }

    fn len(&self) -> usize {
        self.len
    }
}

/// Everything a search needs to pick up where it left off.
#[derive(Debug, Default)]
struct Branch {
    frontier: CostBuckets,
    closed: HashSet<StateKey>,
    g_costs: HashMap<StateKey, u32>,
    parents: Option<ParentMap>,
}

impl Branch {
    fn is_stale(&self, key: &StateKey, node: &SearchNode) -> bool {
        self.closed.contains(key) || self.g_costs.get(key) != Some(&node.g)
    }

    /// Cheapest entry that still carries the best known g, dropping the
    /// superseded ones on the way.
    fn pop_live(&mut self, stale_skipped: &mut u64) -> Option<(StateKey, SearchNode)> {
        while let Some((key, node)) = self.frontier.pop_min() {
            if self.is_stale(&key, &node) {
                *stale_skipped += 1;
                continue;
            }
            return Some((key, node));
        }
        None
    }
}

#[derive(Debug, Clone, Copy)]
struct Limits {
    heuristic: Heuristic,
    time_limit: Duration,
    max_nodes: u64,
    budget_growth: f64,
    max_budget_rounds: Option<u32>,
}

/// A* under Manhattan distance with the default budget growth.
pub fn astar(
    puzzle: &Puzzle,
    start: &State,
    goal: &State,
    time_limit: Duration,
    max_nodes: u64,
    store_path: bool,
) -> Result<SearchReport, PuzzleError> {
    let defaults = SearchConfig::default();
    let limits = Limits {
        heuristic: Heuristic::Manhattan,
        time_limit,
        max_nodes,
        budget_growth: defaults.budget_growth,
        max_budget_rounds: defaults.max_budget_rounds,
    };
    search(puzzle, start, goal, limits, store_path)
}

pub fn astar_with(
    puzzle: &Puzzle,
    start: &State,
    goal: &State,
    config: &SearchConfig,
) -> Result<SearchReport, PuzzleError> {
    config.validate()?;
    let limits = Limits {
        heuristic: config.heuristic,
        time_limit: config.time_limit(),
        max_nodes: config.max_nodes,
        budget_growth: config.budget_growth,
        max_budget_rounds: config.max_budget_rounds,
    };
    search(puzzle, start, goal, limits, config.store_path)
}

/// Budget after one resume; equal to `budget` when it cannot grow.
fn grow_budget(budget: u64, growth: f64) -> u64 {
    let step = (budget as f64 * growth).ceil() as u64;
    budget.saturating_add(step)
}

fn search(
    puzzle: &Puzzle,
    start: &State,
    goal: &State,
    limits: Limits,
    store_path: bool,
) -> Result<SearchReport, PuzzleError> {
    puzzle.check(start)?;
    puzzle.check(goal)?;

    let started = Instant::now();
    let mut stats = SearchStats::default();
    let start_key = start.key();

    if start == goal {
        stats.elapsed = started.elapsed();
        let solution_path = store_path.then(|| vec![start_key]);
        return Ok(SearchReport::new(
            SearchOutcome::Found(start.clone()),
            solution_path,
            stats,
        ));
    }

    let mut branch = Branch {
        parents: store_path.then(ParentMap::new),
        ..Default::default()
    };
    branch.g_costs.insert(start_key.clone(), 0);
    if let Some(parents) = branch.parents.as_mut() {
        parents.insert(start_key.clone(), None);
    }
    branch.frontier.insert(
        start_key,
        SearchNode {
            state: start.clone(),
            g: 0,
            f: limits.heuristic.estimate(start),
        },
    );
    stats.peak_frontier = 1;

    let mut deferred: VecDeque<Branch> = VecDeque::new();
    let mut budget = limits.max_nodes;
    let mut nodes_explored: u64 = 0;

    loop {
        if started.elapsed() > limits.time_limit {
            stats.elapsed = started.elapsed();
            tracing::info!(
                expanded = stats.nodes_expanded,
                elapsed_ms = stats.elapsed.as_millis() as u64,
                "A* time limit exceeded"
            );
            return Ok(exhausted(Exhaustion::TimeLimit, stats));
        }

        if nodes_explored >= budget {
            let grown = grow_budget(budget, limits.budget_growth);
            let rounds_spent = limits
                .max_budget_rounds
                .is_some_and(|max| stats.budget_resumes >= max);
            if grown <= budget || rounds_spent {
                stats.elapsed = started.elapsed();
                tracing::info!(
                    budget,
                    resumes = stats.budget_resumes,
                    expanded = stats.nodes_expanded,
                    "A* node budget exhausted"
                );
                return Ok(exhausted(Exhaustion::NodeBudget, stats));
            }

            deferred.push_back(std::mem::take(&mut branch));
            if let Some(resumed) = deferred.pop_front() {
                branch = resumed;
            }
            tracing::debug!(
                from = budget,
                to = grown,
                frontier = branch.frontier.len(),
                "node budget reached; resuming deferred branch"
            );
            budget = grown;
            nodes_explored = 0;
            stats.budget_resumes += 1;
        }

        let Some((key, node)) = branch.pop_live(&mut stats.stale_skipped) else {
            stats.elapsed = started.elapsed();
            tracing::info!(
                expanded = stats.nodes_expanded,
                closed = branch.closed.len(),
                "A* frontier exhausted without reaching the goal"
            );
            return Ok(SearchReport::new(SearchOutcome::NotFound, None, stats));
        };

        if node.state == *goal {
            let solution_path = branch
                .parents
                .as_ref()
                .map(|parents| reconstruct(parents, &key))
                .transpose()?;
            stats.elapsed = started.elapsed();
            tracing::info!(
                cost = node.g,
                expanded = stats.nodes_expanded,
                resumes = stats.budget_resumes,
                elapsed_ms = stats.elapsed.as_millis() as u64,
                "goal reached"
            );
            return Ok(SearchReport::new(
                SearchOutcome::Found(node.state),
                solution_path,
                stats,
            ));
        }

        branch.closed.insert(key.clone());
        nodes_explored += 1;
        stats.nodes_expanded += 1;

        let next_g = node.g + 1;
        for next in puzzle.possible_moves(&node.state) {
            stats.states_generated += 1;
            let next_key = next.key();
            if branch.closed.contains(&next_key) {
                continue;
            }
            if branch.g_costs.get(&next_key).is_some_and(|&g| g <= next_g) {
                continue;
            }

            branch.g_costs.insert(next_key.clone(), next_g);
            if let Some(parents) = branch.parents.as_mut() {
                parents.insert(next_key.clone(), Some(key.clone()));
            }
            let f = next_g.saturating_add(limits.heuristic.estimate(&next));
            branch.frontier.insert(
                next_key,
                SearchNode {
                    state: next,
                    g: next_g,
                    f,
                },
            );
        }
        stats.peak_frontier = stats.peak_frontier.max(branch.frontier.len());
    }
}

fn exhausted(reason: Exhaustion, stats: SearchStats) -> SearchReport {
    SearchReport::new(SearchOutcome::ResourceExhausted(reason), None, stats)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::puzzle::Move;

    const LONG: Duration = Duration::from_secs(600);

    fn scrambled(puzzle: &Puzzle, moves: &[Move]) -> State {
        moves.iter().fold(puzzle.goal_state().clone(), |state, &mv| {
            puzzle.apply_move(&state, mv).unwrap()
        })
    }

    fn node(puzzle: &Puzzle, g: u32, f: u32) -> SearchNode {
        SearchNode {
            state: puzzle.goal_state().clone(),
            g,
            f,
        }
    }

    #[test]
    fn test_buckets_pop_lowest_cost_first() {
        let p = Puzzle::new(3).unwrap();
        let goal = p.goal_state();
        let states = p.possible_moves(goal);
        let mut frontier = CostBuckets::default();
        frontier.insert(states[0].key(), node(&p, 1, 7));
        frontier.insert(states[1].key(), node(&p, 1, 3));
        frontier.insert(goal.key(), node(&p, 0, 5));
        assert_eq!(frontier.len(), 3);

        let costs: Vec<u32> = std::iter::from_fn(|| frontier.pop_min())
            .map(|(_, n)| n.f)
            .collect();
        assert_eq!(costs, vec![3, 5, 7]);
        assert_eq!(frontier.len(), 0);
        assert!(frontier.buckets.is_empty());
    }

    #[test]
    fn test_buckets_overwrite_same_key() {
        let p = Puzzle::new(3).unwrap();
        let key = p.goal_state().key();
        let mut frontier = CostBuckets::default();
        frontier.insert(key.clone(), node(&p, 4, 6));
        frontier.insert(key.clone(), node(&p, 3, 6));
        assert_eq!(frontier.len(), 1);
        assert_eq!(frontier.pop_min().map(|(_, n)| n.g), Some(3));
    }

    #[test]
    fn test_grow_budget() {
        assert_eq!(grow_budget(0, 0.15), 0);
        assert_eq!(grow_budget(1, 0.15), 2);
        assert_eq!(grow_budget(100, 0.15), 115);
        assert_eq!(grow_budget(100, 0.0), 100);
    }

    #[test]
    fn test_start_is_goal_zero_expansions() {
        let p = Puzzle::new(3).unwrap();
        let goal = p.goal_state();
        let report = astar(&p, goal, goal, LONG, 0, true).unwrap();
        assert_eq!(report.outcome, SearchOutcome::Found(goal.clone()));
        assert_eq!(report.stats.nodes_expanded, 0);
        assert_eq!(report.solution_path, Some(vec![goal.key()]));
    }

    #[test]
    fn test_finds_optimal_path() {
        let p = Puzzle::new(3).unwrap();
        let start = scrambled(
            &p,
            &[Move::Up, Move::Left, Move::Down, Move::Left, Move::Up, Move::Up],
        );
        let report = astar(&p, &start, p.goal_state(), LONG, 1_000_000, true).unwrap();
        assert!(report.is_found());
        let bfs = crate::uninformed::bfs(&p, &start, p.goal_state(), true).unwrap();
        assert_eq!(report.move_count(), bfs.move_count());
    }

    #[test]
    fn test_zero_node_budget_exhausts() {
        let p = Puzzle::new(3).unwrap();
        let start = scrambled(&p, &[Move::Up, Move::Left]);
        let report = astar(&p, &start, p.goal_state(), LONG, 0, false).unwrap();
        assert_eq!(
            report.outcome,
            SearchOutcome::ResourceExhausted(Exhaustion::NodeBudget)
        );
    }

    #[test]
    fn test_time_limit_stops_unbounded_search() {
        // one swap away from the goal, so the space never runs dry
        let p = Puzzle::new(4).unwrap();
        let start = State::from_rows(&[
            [2, 1, 3, 4],
            [5, 6, 7, 8],
            [9, 10, 11, 12],
            [13, 14, 15, 0],
        ])
        .unwrap();
        assert!(!p.is_solvable(&start));

        let report = astar(
            &p,
            &start,
            p.goal_state(),
            Duration::from_millis(50),
            u64::MAX,
            false,
        )
        .unwrap();
        assert_eq!(
            report.outcome,
            SearchOutcome::ResourceExhausted(Exhaustion::TimeLimit)
        );
        assert!(report.stats.nodes_expanded > 0);
        assert!(report.stats.elapsed >= Duration::from_millis(50));
    }

    #[test]
    fn test_superseded_entries_are_skipped() {
        let p = Puzzle::new(3).unwrap();
        let goal = p.goal_state();
        let near = p.possible_moves(goal);
        let (a, b) = (&near[0], &near[1]);
        let entry = |state: &State, g, f| SearchNode {
            state: state.clone(),
            g,
            f,
        };

        let mut branch = Branch::default();
        branch.frontier.insert(a.key(), entry(a, 5, 9));
        branch.frontier.insert(b.key(), entry(b, 3, 7));
        branch.frontier.insert(b.key(), entry(b, 3, 8));
        branch.g_costs.insert(b.key(), 3);
        // cheaper route to `a` found after its first entry was queued
        branch.frontier.insert(a.key(), entry(a, 2, 6));
        branch.g_costs.insert(a.key(), 2);
        assert_eq!(branch.frontier.len(), 4);

        let mut stale = 0;
        let mut expanded = Vec::new();
        while let Some((key, node)) = branch.pop_live(&mut stale) {
            expanded.push((key.clone(), node.g));
            branch.closed.insert(key);
        }

        assert_eq!(expanded, vec![(a.key(), 2), (b.key(), 3)]);
        assert_eq!(stale, 2);
        assert_eq!(branch.frontier.len(), 0);
    }

    #[test]
    fn test_huge_penalty_still_finds_goal() {
        let p = Puzzle::new(3).unwrap();
        let start = scrambled(&p, &[Move::Up, Move::Left]);
        let config = SearchConfig {
            heuristic: Heuristic::MisplacedPenalty { penalty: u32::MAX },
            store_path: true,
            ..Default::default()
        };
        let report = astar_with(&p, &start, p.goal_state(), &config).unwrap();
        assert!(report.is_found());
        assert!(report.move_count().unwrap() >= 2);
    }

    #[test]
    fn test_small_budget_resumes_and_finds() {
        let p = Puzzle::new(3).unwrap();
        let start = scrambled(
            &p,
            &[Move::Up, Move::Left, Move::Up, Move::Left, Move::Down, Move::Right, Move::Down],
        );
        let report = astar(&p, &start, p.goal_state(), LONG, 1, true).unwrap();
        assert!(report.is_found());
        assert!(report.stats.budget_resumes > 0);

        let unlimited = astar(&p, &start, p.goal_state(), LONG, 1_000_000, true).unwrap();
        assert_eq!(report.move_count(), unlimited.move_count());
    }

    #[test]
    fn test_hard_node_ceiling() {
        let p = Puzzle::new(3).unwrap();
        let start = scrambled(
            &p,
            &[Move::Up, Move::Left, Move::Up, Move::Left, Move::Down, Move::Right, Move::Down],
        );
        let config = SearchConfig {
            max_nodes: 2,
            budget_growth: 0.0,
            ..Default::default()
        };
        let report = astar_with(&p, &start, p.goal_state(), &config).unwrap();
        assert_eq!(
            report.outcome,
            SearchOutcome::ResourceExhausted(Exhaustion::NodeBudget)
        );
        assert_eq!(report.stats.nodes_expanded, 2);
    }

    #[test]
    fn test_round_limit() {
        let p = Puzzle::new(3).unwrap();
        let start = scrambled(
            &p,
            &[Move::Up, Move::Left, Move::Up, Move::Left, Move::Down, Move::Right, Move::Down],
        );
        let config = SearchConfig {
            max_nodes: 1,
            max_budget_rounds: Some(1),
            ..Default::default()
        };
        let report = astar_with(&p, &start, p.goal_state(), &config).unwrap();
        assert_eq!(
            report.outcome,
            SearchOutcome::ResourceExhausted(Exhaustion::NodeBudget)
        );
        assert_eq!(report.stats.budget_resumes, 1);
        // budget 1, then 2
        assert_eq!(report.stats.nodes_expanded, 3);
    }

    #[test]
    fn test_unsolvable_reports_not_found() {
        let p = Puzzle::new(2).unwrap();
        let start = State::from_rows(&[[2, 1], [3, 0]]).unwrap();
        let report = astar(&p, &start, p.goal_state(), LONG, 1_000, false).unwrap();
        assert_eq!(report.outcome, SearchOutcome::NotFound);
        assert_eq!(report.stats.nodes_expanded, 12);
    }

    #[test]
    fn test_linear_conflict_matches_manhattan_cost() {
        let p = Puzzle::new(3).unwrap();
        let start = State::from_rows(&[[2, 1, 4], [3, 0, 5], [6, 7, 8]]).unwrap();
        let base = SearchConfig {
            store_path: true,
            ..Default::default()
        };
        let lc = SearchConfig {
            heuristic: Heuristic::LinearConflict,
            ..base.clone()
        };
        let a = astar_with(&p, &start, p.goal_state(), &base).unwrap();
        let b = astar_with(&p, &start, p.goal_state(), &lc).unwrap();
        assert!(a.is_found());
        assert_eq!(a.move_count(), Some(24));
        assert_eq!(b.move_count(), Some(24));
    }
}
