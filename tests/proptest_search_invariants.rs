//! Property-based invariant tests for the frontier deque and the searches.
//!
//! 1. Push/pop discipline decides order: FIFO from opposite ends, LIFO from one
//! 2. Overflow evicts exactly min(overflow, batch) entries, oldest first
//! 3. Swapping two non-blank tiles flips solvability
//! 4. BFS and A* agree on path length; DFS is never shorter
//! 5. Stored paths run from start to goal through legal moves

use std::collections::VecDeque;
use std::time::Duration;

use proptest::prelude::*;
use taquin::{astar, bfs, dfs, BoundedDeque, Move, Puzzle, State};

// ── Strategies ──────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy)]
enum Op {
    PushFront(u32),
    PushBack(u32),
    PopFront,
}

fn op_strategy() -> impl Strategy<Value = Op> {
    prop_oneof![
        any::<u32>().prop_map(Op::PushFront),
        any::<u32>().prop_map(Op::PushBack),
        Just(Op::PopFront),
    ]
}

fn move_strategy() -> impl Strategy<Value = Move> {
    prop_oneof![
        Just(Move::Up),
        Just(Move::Down),
        Just(Move::Left),
        Just(Move::Right),
    ]
}

/// Applies the legal moves of `moves` to the goal, skipping illegal ones.
fn scramble(puzzle: &Puzzle, moves: &[Move]) -> State {
    moves.iter().fold(puzzle.goal_state().clone(), |state, &mv| {
        puzzle.apply_move(&state, mv).unwrap_or(state)
    })
}

// ═══════════════════════════════════════════════════════════════════════
// 1–2. BoundedDeque ordering and eviction
// ═══════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn push_back_pop_front_preserves_order(items in prop::collection::vec(any::<u32>(), 0..200)) {
        let mut deque = BoundedDeque::new();
        for &item in &items {
            deque.push_back(item);
        }
        let popped: Vec<u32> = std::iter::from_fn(|| deque.pop_front()).collect();
        prop_assert_eq!(popped, items);
    }

    #[test]
    fn push_front_pop_front_reverses_order(items in prop::collection::vec(any::<u32>(), 0..200)) {
        let mut deque = BoundedDeque::new();
        for &item in &items {
            deque.push_front(item);
        }
        let popped: Vec<u32> = std::iter::from_fn(|| deque.pop_front()).collect();
        let mut reversed = items.clone();
        reversed.reverse();
        prop_assert_eq!(popped, reversed);
    }

    #[test]
    fn matches_reference_model(
        ops in prop::collection::vec(op_strategy(), 0..300),
        capacity in 1usize..40,
        batch in 1usize..12,
    ) {
        // reference keeps (insertion stamp, value) so eviction can pick the oldest
        let mut model: VecDeque<(u64, u32)> = VecDeque::new();
        let mut stamp = 0u64;
        let mut evicted = 0u64;
        let mut deque = BoundedDeque::with_capacity(Some(capacity), batch);

        for op in ops {
            match op {
                Op::PushFront(v) | Op::PushBack(v) => {
                    if matches!(op, Op::PushFront(_)) {
                        deque.push_front(v);
                        model.push_front((stamp, v));
                    } else {
                        deque.push_back(v);
                        model.push_back((stamp, v));
                    }
                    stamp += 1;

                    if model.len() > capacity {
                        let count = (model.len() - capacity).min(batch);
                        for _ in 0..count {
                            let oldest = model
                                .iter()
                                .enumerate()
                                .min_by_key(|(_, (s, _))| *s)
                                .map(|(i, _)| i)
                                .unwrap();
                            model.remove(oldest);
                        }
                        evicted += count as u64;
                    }
                }
                Op::PopFront => {
                    prop_assert_eq!(deque.pop_front(), model.pop_front().map(|(_, v)| v));
                }
            }
            prop_assert_eq!(deque.len(), model.len());
            prop_assert!(deque.len() <= capacity);
        }

        prop_assert_eq!(deque.evicted(), evicted);
        let remaining: Vec<u32> = deque.iter().copied().collect();
        let expected: Vec<u32> = model.iter().map(|&(_, v)| v).collect();
        prop_assert_eq!(remaining, expected);
    }

    #[test]
    fn overflow_never_drops_newest(
        items in prop::collection::vec(any::<u32>(), 1..100),
        capacity in 1usize..20,
        batch in 1usize..12,
    ) {
        let mut deque = BoundedDeque::with_capacity(Some(capacity), batch);
        for &item in &items {
            deque.push_back(item);
            prop_assert_eq!(deque.iter().last(), Some(&item));
        }
        let keep = items.len().min(capacity);
        let remaining: Vec<u32> = deque.iter().copied().collect();
        prop_assert_eq!(&remaining[..], &items[items.len() - keep..]);
    }
}

// ═══════════════════════════════════════════════════════════════════════
// 3. Solvability parity
// ═══════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn swapping_two_tiles_flips_solvability(
        size in 2usize..=5,
        moves in prop::collection::vec(move_strategy(), 0..60),
        a in any::<prop::sample::Index>(),
        b in any::<prop::sample::Index>(),
    ) {
        let puzzle = Puzzle::new(size).unwrap();
        let state = scramble(&puzzle, &moves);
        prop_assert!(puzzle.is_solvable(&state));

        let tiles = size * size - 1;
        let (ta, tb) = (a.index(tiles) as u32 + 1, b.index(tiles) as u32 + 1);
        prop_assume!(ta != tb);

        let mut positions: Vec<(usize, usize)> = (0..(size * size) as u32)
            .map(|tile| state.position(tile).unwrap())
            .collect();
        positions.swap(ta as usize, tb as usize);
        let swapped = State::from_positions(size, &positions).unwrap();
        prop_assert!(!puzzle.is_solvable(&swapped));
    }
}

// ═══════════════════════════════════════════════════════════════════════
// 4–5. Search agreement
// ═══════════════════════════════════════════════════════════════════════

proptest! {
    #![proptest_config(ProptestConfig::with_cases(12))]

    #[test]
    fn bfs_and_astar_agree_dfs_not_shorter(moves in prop::collection::vec(move_strategy(), 0..14)) {
        let puzzle = Puzzle::new(3).unwrap();
        let start = scramble(&puzzle, &moves);
        let goal = puzzle.goal_state();

        let by_bfs = bfs(&puzzle, &start, goal, true).unwrap();
        let by_astar = astar(&puzzle, &start, goal, Duration::from_secs(600), 1_000_000, true).unwrap();
        let by_dfs = dfs(&puzzle, &start, goal, 200_000, true).unwrap();

        prop_assert!(by_bfs.is_found());
        prop_assert!(by_astar.is_found());
        prop_assert!(by_dfs.is_found());

        let shortest = by_bfs.move_count().unwrap();
        prop_assert!(shortest <= moves.len());
        prop_assert_eq!(by_astar.move_count(), Some(shortest));
        prop_assert!(by_dfs.move_count().unwrap() >= shortest);

        for report in [&by_bfs, &by_astar, &by_dfs] {
            let states = report.solution_states(3).unwrap();
            prop_assert_eq!(states.first(), Some(&start));
            prop_assert_eq!(states.last(), Some(goal));
            for pair in states.windows(2) {
                prop_assert!(puzzle.move_between(&pair[0], &pair[1]).is_some());
            }
        }
    }
}
