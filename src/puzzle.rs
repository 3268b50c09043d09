use rand::{seq::SliceRandom, thread_rng, Rng};
use std::fmt;

use crate::error::PuzzleError;

/// A move of the blank: it trades places with the tile next to it in this
/// direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Move {
    Up,
    Down,
    Left,
    Right,
}

impl Move {
    /// Successor generation order.
    pub const ALL: [Move; 4] = [Move::Up, Move::Down, Move::Left, Move::Right];

    pub fn as_offset(&self) -> (isize, isize) {
        match self {
            Move::Up => (-1, 0),
            Move::Down => (1, 0),
            Move::Left => (0, -1),
            Move::Right => (0, 1),
        }
    }

    pub fn opposite(&self) -> Self {
        match self {
            Move::Up => Move::Down,
            Move::Down => Move::Up,
            Move::Left => Move::Right,
            Move::Right => Move::Left,
        }
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match *self {
            Move::Up => "Up",
            Move::Down => "Down",
            Move::Left => "Left",
            Move::Right => "Right",
        };
        write!(f, "{}", s)
    }
}

/// Target coordinate of `tile` on a `size`x`size` board: tile `v` sits at
/// `((v-1)/size, (v-1)%size)` and the blank in the bottom-right corner.
pub fn goal_position(tile: u32, size: usize) -> (usize, usize) {
    if tile == 0 {
        (size - 1, size - 1)
    } else {
        let index = tile as usize - 1;
        (index / size, index % size)
    }
}

/// Canonical, totally ordered serialization of a [`State`]: the cell index
/// of every tile, ordered by tile value.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct StateKey(Box<[u16]>);

impl StateKey {
    /// Cell index (`row * size + col`) of each tile, blank first.
    pub fn cells(&self) -> &[u16] {
        &self.0
    }
}

/// An immutable board configuration.
///
/// Holds both directions of the tile/cell bijection; moves build a fresh
/// state and never touch the source.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct State {
    size: usize,
    /// tile -> cell index
    positions: Box<[u16]>,
    /// cell index -> tile
    cells: Box<[u16]>,
}

impl State {
    /// Builds a state from a row-major grid of tile values.
    pub fn from_rows<R: AsRef<[u32]>>(rows: &[R]) -> Result<Self, PuzzleError> {
        let size = rows.len();
        Puzzle::check_size(size)?;

        let mut flat = Vec::with_capacity(size * size);
        for row in rows {
            let row = row.as_ref();
            if row.len() != size {
                return Err(PuzzleError::TileCount {
                    size,
                    expected: size * size,
                    found: rows.iter().map(|r| r.as_ref().len()).sum(),
                });
            }
            flat.extend_from_slice(row);
        }
        Self::from_cells(size, &flat)
    }

    /// Builds a state from the coordinate of each tile, indexed by tile value.
    pub fn from_positions(size: usize, positions: &[(usize, usize)]) -> Result<Self, PuzzleError> {
        Puzzle::check_size(size)?;
        let count = size * size;
        if positions.len() != count {
            return Err(PuzzleError::TileCount {
                size,
                expected: count,
                found: positions.len(),
            });
        }

        let mut cells = vec![u16::MAX; count];
        for (tile, &(row, col)) in positions.iter().enumerate() {
            if row >= size || col >= size || cells[row * size + col] != u16::MAX {
                return Err(PuzzleError::InvalidCell { row, col });
            }
            cells[row * size + col] = tile as u16;
        }
        let positions = positions
            .iter()
            .map(|&(row, col)| (row * size + col) as u16)
            .collect();

        Ok(Self {
            size,
            positions,
            cells: cells.into_boxed_slice(),
        })
    }

    /// Rebuilds the state a key was taken from.
    pub fn from_key(size: usize, key: &StateKey) -> Result<Self, PuzzleError> {
        let positions: Vec<(usize, usize)> = key
            .cells()
            .iter()
            .map(|&cell| (cell as usize / size.max(1), cell as usize % size.max(1)))
            .collect();
        Self::from_positions(size, &positions)
    }

    fn from_cells(size: usize, flat: &[u32]) -> Result<Self, PuzzleError> {
        let count = size * size;
        if flat.len() != count {
            return Err(PuzzleError::TileCount {
                size,
                expected: count,
                found: flat.len(),
            });
        }
        if !flat.contains(&0) {
            return Err(PuzzleError::MissingBlank);
        }

        let mut positions = vec![u16::MAX; count];
        for (cell, &tile) in flat.iter().enumerate() {
            let slot = positions
                .get_mut(tile as usize)
                .filter(|slot| **slot == u16::MAX)
                .ok_or(PuzzleError::InvalidTile(tile))?;
            *slot = cell as u16;
        }

        Ok(Self {
            size,
            positions: positions.into_boxed_slice(),
            cells: flat.iter().map(|&tile| tile as u16).collect(),
        })
    }

    pub fn size(&self) -> usize {
        self.size
    }

    /// Coordinate of `tile`, or `None` if the tile is not on this board.
    pub fn position(&self, tile: u32) -> Option<(usize, usize)> {
        self.positions
            .get(tile as usize)
            .map(|&cell| (cell as usize / self.size, cell as usize % self.size))
    }

    /// Tile value at a coordinate.
    pub fn tile_at(&self, row: usize, col: usize) -> Option<u32> {
        if row >= self.size || col >= self.size {
            return None;
        }
        Some(self.cells[row * self.size + col] as u32)
    }

    pub fn blank(&self) -> (usize, usize) {
        let cell = self.positions[0] as usize;
        (cell / self.size, cell % self.size)
    }

    pub fn key(&self) -> StateKey {
        StateKey(self.positions.clone())
    }

    /// Tile values in row-major order.
    pub fn tiles(&self) -> impl Iterator<Item = u32> + '_ {
        self.cells.iter().map(|&tile| tile as u32)
    }

    /// `(tile, row, col)` for every non-blank tile.
    pub fn placed_tiles(&self) -> impl Iterator<Item = (u32, usize, usize)> + '_ {
        self.positions
            .iter()
            .enumerate()
            .skip(1)
            .map(move |(tile, &cell)| {
                (tile as u32, cell as usize / self.size, cell as usize % self.size)
            })
    }

    fn swapped(&self, blank_cell: usize, tile_cell: usize) -> Self {
        let mut next = self.clone();
        let tile = next.cells[tile_cell];
        next.cells[blank_cell] = tile;
        next.cells[tile_cell] = 0;
        next.positions[tile as usize] = blank_cell as u16;
        next.positions[0] = tile_cell as u16;
        next
    }
}

impl fmt::Display for State {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let width = (self.cells.len() - 1).to_string().len();
        for row in self.cells.chunks(self.size) {
            for &val in row {
                write!(f, "{:width$} ", val, width = width)?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

/// The state-transition model of a `size`x`size` sliding-tile puzzle.
///
/// Holds no cursor: every operation takes the state it works on.
#[derive(Debug, Clone)]
pub struct Puzzle {
    size: usize,
    goal: State,
}

impl Puzzle {
    pub const MIN_SIZE: usize = 2;
    pub const MAX_SIZE: usize = 255;

    pub fn new(size: usize) -> Result<Self, PuzzleError> {
        Self::check_size(size)?;

        let goal_positions: Vec<(usize, usize)> = (0..(size * size) as u32)
            .map(|tile| goal_position(tile, size))
            .collect();
        let goal = State::from_positions(size, &goal_positions)?;

        Ok(Self { size, goal })
    }

    fn check_size(size: usize) -> Result<(), PuzzleError> {
        if (Self::MIN_SIZE..=Self::MAX_SIZE).contains(&size) {
            Ok(())
        } else {
            Err(PuzzleError::InvalidSize {
                size,
                min: Self::MIN_SIZE,
                max: Self::MAX_SIZE,
            })
        }
    }

    pub fn size(&self) -> usize {
        self.size
    }

    pub fn goal_state(&self) -> &State {
        &self.goal
    }

    /// Fails when `state` was built for a different board size.
    pub fn check(&self, state: &State) -> Result<(), PuzzleError> {
        if state.size == self.size {
            Ok(())
        } else {
            Err(PuzzleError::SizeMismatch {
                expected: self.size,
                found: state.size,
            })
        }
    }

    pub fn apply_move(&self, state: &State, movement: Move) -> Option<State> {
        let (row, col) = state.blank();
        let (dr, dc) = movement.as_offset();

        let new_row = row as isize + dr;
        let new_col = col as isize + dc;
        let size = state.size as isize;

        if new_row >= 0 && new_row < size && new_col >= 0 && new_col < size {
            let target = new_row as usize * state.size + new_col as usize;
            Some(state.swapped(row * state.size + col, target))
        } else {
            None
        }
    }

    /// Every legal move from `state` with the state it leads to.
    pub fn successors<'a>(&'a self, state: &'a State) -> impl Iterator<Item = (Move, State)> + 'a {
        Move::ALL
            .into_iter()
            .filter_map(move |mv| self.apply_move(state, mv).map(|next| (mv, next)))
    }

    /// The 2 to 4 states one blank move away from `state`.
    pub fn possible_moves(&self, state: &State) -> Vec<State> {
        self.successors(state).map(|(_, next)| next).collect()
    }

    /// The move that turns `from` into `to`, if they are one move apart.
    pub fn move_between(&self, from: &State, to: &State) -> Option<Move> {
        Move::ALL
            .into_iter()
            .find(|&mv| self.apply_move(from, mv).as_ref() == Some(to))
    }

    pub fn is_goal(&self, state: &State) -> bool {
        *state == self.goal
    }

    /// Inversion-parity test.
    pub fn is_solvable(&self, state: &State) -> bool {
        let flattened: Vec<u32> = state.tiles().collect();
        let (empty_row, _) = state.blank();
        Self::parity_solvable(&flattened, state.size, empty_row)
    }

    fn parity_solvable(flattened: &[u32], size: usize, empty_row: usize) -> bool {
        let inversions = Self::count_inversions(flattened);

        if size % 2 == 1 {
            inversions % 2 == 0
        } else {
            (inversions + empty_row) % 2 == 1
        }
    }

    fn count_inversions(flattened: &[u32]) -> usize {
        flattened
            .iter()
            .enumerate()
            .filter(|&(_, &val)| val != 0)
            .map(|(i, &val)| {
                flattened[i + 1..]
                    .iter()
                    .filter(|&&next| next != 0 && next < val)
                    .count()
            })
            .sum()
    }

    pub fn random_solvable_state(&self) -> State {
        self.random_solvable_state_with(&mut thread_rng())
    }

    /// Resamples uniform permutations until one passes [`Self::is_solvable`].
    pub fn random_solvable_state_with<R: Rng + ?Sized>(&self, rng: &mut R) -> State {
        let mut positions: Vec<(usize, usize)> = (0..self.size)
            .flat_map(|row| (0..self.size).map(move |col| (row, col)))
            .collect();

        loop {
            positions.shuffle(rng);

            let candidate = match State::from_positions(self.size, &positions) {
                Ok(state) => state,
                Err(_) => continue,
            };
            if self.is_solvable(&candidate) {
                return candidate;
            }
        }
    }
}
