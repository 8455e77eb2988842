//! Core data types for the Minesweeper engine.
//!
//! All grid storage is flat and row-major: `cells[row * width + col]`.
//! The solver works on these indices directly; `Coord` is the public
//! addressing type.

use serde::{Deserialize, Serialize};

/// A cell position on the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Coord {
    pub row: usize,
    pub col: usize,
}

impl Coord {
    pub const fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }
}

impl From<(usize, usize)> for Coord {
    fn from((row, col): (usize, usize)) -> Self {
        Self { row, col }
    }
}

/// Player-visible state of a cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CellState {
    Default,
    Revealed,
    Flagged,
}

/// A single board cell.
///
/// `is_mine` and `adjacent_mines` are fixed once the board is built.
/// `probability` is `None` until the solver computes it in the current pass.
#[derive(Debug, Clone)]
pub struct Cell {
    pub(crate) is_mine: bool,
    pub(crate) state: CellState,
    pub(crate) adjacent_mines: u8,
    pub(crate) is_border: bool,
    pub(crate) probability: Option<u8>,
}

impl Cell {
    pub(crate) fn new(is_mine: bool) -> Self {
        Self {
            is_mine,
            state: CellState::Default,
            adjacent_mines: 0,
            is_border: false,
            probability: None,
        }
    }

    #[inline(always)]
    pub fn state(&self) -> CellState {
        self.state
    }

    #[inline(always)]
    pub fn adjacent_mines(&self) -> u8 {
        self.adjacent_mines
    }

    #[inline(always)]
    pub fn is_border(&self) -> bool {
        self.is_border
    }

    #[inline(always)]
    pub fn probability(&self) -> Option<u8> {
        self.probability
    }

    #[inline(always)]
    pub fn is_default(&self) -> bool {
        self.state == CellState::Default
    }

    #[inline(always)]
    pub fn is_revealed(&self) -> bool {
        self.state == CellState::Revealed
    }

    #[inline(always)]
    pub fn is_flagged(&self) -> bool {
        self.state == CellState::Flagged
    }

    /// A revealed cell carrying a numeric constraint.
    #[inline(always)]
    pub fn is_exposed(&self) -> bool {
        self.is_revealed() && self.adjacent_mines > 0
    }

    /// Flagged, or already judged certain to be a mine.
    #[inline(always)]
    pub fn counts_as_mine(&self) -> bool {
        self.is_flagged() || self.probability == Some(100)
    }
}

/// Result of a single player or solver action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Outcome {
    Continue,
    Win,
    Loss,
}

/// Overall status of a board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameState {
    Running,
    Won,
    Lost,
}

impl GameState {
    pub fn outcome(self) -> Outcome {
        match self {
            GameState::Running => Outcome::Continue,
            GameState::Won => Outcome::Win,
            GameState::Lost => Outcome::Loss,
        }
    }

    pub fn is_over(self) -> bool {
        self != GameState::Running
    }
}

/// One cell touched by a reveal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CellChange {
    pub coord: Coord,
    pub new_state: CellState,
    pub adjacent_mines: Option<u8>,
}

/// What a reveal did to the board.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RevealResult {
    pub outcome: Outcome,
    /// Cells opened by the flood fill, excluding the requested cell.
    pub cascaded: Vec<Coord>,
    pub changed_cells: Vec<CellChange>,
    /// The mine that went off, on a loss.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exploded: Option<Coord>,
}

impl RevealResult {
    pub(crate) fn loss(at: Coord) -> Self {
        Self { outcome: Outcome::Loss, cascaded: vec![], changed_cells: vec![], exploded: Some(at) }
    }
}

/// Read-only view of a cell for rendering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CellSnapshot {
    pub state: CellState,
    /// Only reported for revealed cells.
    pub adjacent_mines: Option<u8>,
    pub probability: Option<u8>,
    pub is_border: bool,
    /// The cell whose mine ended the game.
    pub exploded: bool,
}

/// Pre-computed neighbor cache for all cells.
///
/// Stores the 8-directional neighbors (clipped to grid bounds) of every cell
/// as flat indices. Order is deterministic: row offset -1..=1 outer,
/// column offset -1..=1 inner.
#[derive(Debug, Clone)]
pub struct NeighborCache {
    pub width: usize,
    pub height: usize,
    /// Flat storage of all neighbor indices.
    data: Vec<usize>,
    /// offsets[i]..offsets[i+1] is the neighbor range of cell i.
    offsets: Vec<usize>,
}

impl NeighborCache {
    pub fn new(width: usize, height: usize) -> Self {
        let total = width * height;
        let mut data = Vec::with_capacity(total * 8);
        let mut offsets = Vec::with_capacity(total + 1);

        for row in 0..height {
            for col in 0..width {
                offsets.push(data.len());
                for dr in -1i64..=1 {
                    for dc in -1i64..=1 {
                        if dr == 0 && dc == 0 {
                            continue;
                        }
                        let nr = row as i64 + dr;
                        let nc = col as i64 + dc;
                        if nr >= 0 && nr < height as i64 && nc >= 0 && nc < width as i64 {
                            data.push(nr as usize * width + nc as usize);
                        }
                    }
                }
            }
        }
        offsets.push(data.len()); // sentinel

        Self { width, height, data, offsets }
    }

    /// Neighbor indices of the cell at flat index `idx`.
    #[inline(always)]
    pub fn get(&self, idx: usize) -> &[usize] {
        &self.data[self.offsets[idx]..self.offsets[idx + 1]]
    }

    #[inline(always)]
    pub fn index(&self, coord: Coord) -> usize {
        coord.row * self.width + coord.col
    }

    #[inline(always)]
    pub fn coord(&self, idx: usize) -> Coord {
        Coord { row: idx / self.width, col: idx % self.width }
    }

    #[inline(always)]
    pub fn in_bounds(&self, coord: Coord) -> bool {
        coord.row < self.height && coord.col < self.width
    }
}
