//! Distance estimates that guide A*.

use serde::Deserialize;

use crate::puzzle::{goal_position, State};

/// Which remaining-distance estimate A* ranks states by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Heuristic {
    /// Sum of Manhattan distances of the non-blank tiles. Admissible and
    /// consistent, so the first goal popped is optimal.
    #[default]
    Manhattan,
    /// Manhattan plus two moves for every tile that must leave its goal row
    /// or column to let another tile pass. Admissible.
    LinearConflict,
    /// Manhattan plus `penalty` per misplaced tile. Not admissible: reported
    /// paths may be longer than the shortest one.
    MisplacedPenalty { penalty: u32 },
}

impl Heuristic {
    pub fn estimate(&self, state: &State) -> u32 {
        match *self {
            Heuristic::Manhattan => manhattan_distance(state),
            Heuristic::LinearConflict => manhattan_distance(state) + 2 * linear_conflicts(state),
            Heuristic::MisplacedPenalty { penalty } => {
                let weighted = penalty.saturating_mul(misplaced_tiles(state));
                manhattan_distance(state).saturating_add(weighted)
            }
        }
    }

    /// Whether the estimate never exceeds the true remaining distance.
    pub fn is_admissible(&self) -> bool {
        match *self {
            Heuristic::Manhattan | Heuristic::LinearConflict => true,
            Heuristic::MisplacedPenalty { penalty } => penalty == 0,
        }
    }
}

pub fn manhattan_distance(state: &State) -> u32 {
    let size = state.size();
    state
        .placed_tiles()
        .map(|(tile, row, col)| {
            let (target_row, target_col) = goal_position(tile, size);
            (row.abs_diff(target_row) + col.abs_diff(target_col)) as u32
        })
        .sum()
}

pub fn misplaced_tiles(state: &State) -> u32 {
    let size = state.size();
    state
        .placed_tiles()
        .filter(|&(tile, row, col)| goal_position(tile, size) != (row, col))
        .count() as u32
}

/// Tiles that have to step out of their goal line, summed over rows and
/// columns.
///
/// For each line, the tiles already in their goal line keep their relative
/// order only along a longest increasing run of targets; every other one must
/// leave and re-enter the line.
pub fn linear_conflicts(state: &State) -> u32 {
    let size = state.size();
    let mut conflicts = 0;
    let mut line = Vec::with_capacity(size);

    for row in 0..size {
        line.clear();
        for col in 0..size {
            if let Some(tile) = state.tile_at(row, col).filter(|&t| t != 0) {
                let (target_row, target_col) = goal_position(tile, size);
                if target_row == row {
                    line.push(target_col);
                }
            }
        }
        conflicts += line.len() - longest_increasing(&line);
    }

    for col in 0..size {
        line.clear();
        for row in 0..size {
            if let Some(tile) = state.tile_at(row, col).filter(|&t| t != 0) {
                let (target_row, target_col) = goal_position(tile, size);
                if target_col == col {
                    line.push(target_row);
                }
            }
        }
        conflicts += line.len() - longest_increasing(&line);
    }

    conflicts as u32
}

fn longest_increasing(values: &[usize]) -> usize {
    // patience sorting; targets within a line are distinct
    let mut tails: Vec<usize> = Vec::with_capacity(values.len());
    for &value in values {
        match tails.binary_search(&value) {
            Ok(_) => {}
            Err(pos) if pos == tails.len() => tails.push(value),
            Err(pos) => tails[pos] = value,
        }
    }
    tails.len()
}
