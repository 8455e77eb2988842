//! Board model: mine placement, number calculation, reveal cascade and flags.
//!
//! The board owns every cell exclusively. `is_mine` and `adjacent_mines` are
//! written once while the board is built and never touched again; only
//! `reveal`, `flag` and `unflag` move cells between states.

use std::collections::VecDeque;

use log::{info, trace};

use crate::config::GameConfig;
use crate::error::{GameError, Result};
use crate::rng::GameRng;
use crate::types::{Cell, CellChange, CellSnapshot, CellState, Coord, GameState, NeighborCache, Outcome, RevealResult};

/// Place `mine_count` mines uniformly at random.
///
/// Rejection sampling: a coordinate that is already mined is redrawn.
/// The caller guarantees `mine_count < width * height`.
pub fn place_mines_random(width: usize, height: usize, mine_count: usize, rng: &mut GameRng) -> Vec<bool> {
    let mut mines = vec![false; width * height];
    let mut placed = 0;

    while placed < mine_count {
        let row = rng.gen_range(height);
        let col = rng.gen_range(width);
        let idx = row * width + col;
        if !mines[idx] {
            mines[idx] = true;
            placed += 1;
        }
    }

    mines
}

/// Count the mine neighbors of every cell (mine cells included).
pub fn calculate_numbers(mines: &[bool], neighbor_cache: &NeighborCache) -> Vec<u8> {
    (0..mines.len())
        .map(|idx| neighbor_cache.get(idx).iter().filter(|&&n| mines[n]).count() as u8)
        .collect()
}

pub struct Board {
    width: usize,
    height: usize,
    mine_count: usize,
    cells: Vec<Cell>,
    neighbors: NeighborCache,
    flagged_count: usize,
    correct_flag_count: usize,
    revealed_count: usize,
    state: GameState,
    exploded: Option<Coord>,
}

impl Board {
    /// Build a random board from `config`, drawing mine positions from `rng`.
    pub fn new(config: &GameConfig, rng: &mut GameRng) -> Result<Self> {
        config.validate()?;
        let mines = place_mines_random(config.width, config.height, config.mines, rng);
        Self::from_mines(config.width, config.height, mines)
    }

    /// Build a board with a fixed mine layout (`mines` is row-major).
    pub fn from_mines(width: usize, height: usize, mines: Vec<bool>) -> Result<Self> {
        if width == 0 || height == 0 {
            return Err(GameError::ZeroAreaBoard { width, height });
        }
        if mines.len() != width * height {
            return Err(GameError::InvalidLayout(format!(
                "expected {} cells, got {}",
                width * height,
                mines.len()
            )));
        }
        let mine_count = mines.iter().filter(|&&m| m).count();
        if mine_count >= mines.len() {
            return Err(GameError::TooManyMines { requested: mine_count, cells: mines.len() });
        }

        let neighbors = NeighborCache::new(width, height);
        let numbers = calculate_numbers(&mines, &neighbors);
        let cells = mines
            .into_iter()
            .zip(numbers)
            .map(|(is_mine, adjacent)| {
                let mut cell = Cell::new(is_mine);
                cell.adjacent_mines = adjacent;
                cell
            })
            .collect();

        Ok(Self {
            width,
            height,
            mine_count,
            cells,
            neighbors,
            flagged_count: 0,
            correct_flag_count: 0,
            revealed_count: 0,
            state: GameState::Running,
            exploded: None,
        })
    }

    /// Build a board from ASCII rows: `*` is a mine, `.` is safe.
    pub fn from_layout(rows: &[&str]) -> Result<Self> {
        let height = rows.len();
        let width = rows.first().map_or(0, |r| r.chars().count());
        let mut mines = Vec::with_capacity(width * height);
        for (row, line) in rows.iter().enumerate() {
            if line.chars().count() != width {
                return Err(GameError::InvalidLayout(format!("row {row} is not {width} cells wide")));
            }
            for ch in line.chars() {
                match ch {
                    '*' => mines.push(true),
                    '.' => mines.push(false),
                    other => {
                        return Err(GameError::InvalidLayout(format!("unexpected character {other:?} in row {row}")))
                    }
                }
            }
        }
        Self::from_mines(width, height, mines)
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn mine_count(&self) -> usize {
        self.mine_count
    }

    pub fn cell_count(&self) -> usize {
        self.cells.len()
    }

    pub fn flagged_count(&self) -> usize {
        self.flagged_count
    }

    pub fn correct_flag_count(&self) -> usize {
        self.correct_flag_count
    }

    pub fn revealed_count(&self) -> usize {
        self.revealed_count
    }

    pub fn default_count(&self) -> usize {
        self.cells.iter().filter(|c| c.is_default()).count()
    }

    pub fn game_state(&self) -> GameState {
        self.state
    }

    pub fn is_over(&self) -> bool {
        self.state.is_over()
    }

    /// The mine that ended the game, if any.
    pub fn exploded(&self) -> Option<Coord> {
        self.exploded
    }

    pub fn cell(&self, coord: Coord) -> Result<&Cell> {
        let idx = self.check(coord)?;
        Ok(&self.cells[idx])
    }

    /// In-bounds Moore neighbors of `coord`, in a fixed row-major order.
    pub fn neighbors(&self, coord: Coord) -> Result<Vec<Coord>> {
        let idx = self.check(coord)?;
        Ok(self.neighbors.get(idx).iter().map(|&n| self.neighbors.coord(n)).collect())
    }

    pub fn snapshot(&self, coord: Coord) -> Result<CellSnapshot> {
        let cell = self.cell(coord)?;
        Ok(CellSnapshot {
            state: cell.state,
            adjacent_mines: cell.is_revealed().then_some(cell.adjacent_mines),
            probability: cell.probability,
            is_border: cell.is_border,
            exploded: self.exploded == Some(coord),
        })
    }

    pub(crate) fn cells(&self) -> &[Cell] {
        &self.cells
    }

    pub(crate) fn neighbor_cache(&self) -> &NeighborCache {
        &self.neighbors
    }

    pub(crate) fn neighbor_indices(&self, idx: usize) -> &[usize] {
        self.neighbors.get(idx)
    }

    pub(crate) fn coord_of(&self, idx: usize) -> Coord {
        self.neighbors.coord(idx)
    }

    pub(crate) fn set_probability(&mut self, idx: usize, probability: Option<u8>) {
        self.cells[idx].probability = probability;
    }

    /// Forget every probability computed for cells that are still undecided.
    pub(crate) fn clear_probabilities(&mut self) {
        for cell in self.cells.iter_mut().filter(|c| c.is_default()) {
            cell.probability = None;
        }
    }

    /// Revealed cells with a non-zero number, row-major.
    pub(crate) fn exposed_indices(&self) -> Vec<usize> {
        (0..self.cells.len()).filter(|&i| self.cells[i].is_exposed()).collect()
    }

    /// Default cells marked as border, row-major.
    pub(crate) fn border_indices(&self) -> Vec<usize> {
        (0..self.cells.len())
            .filter(|&i| self.cells[i].is_default() && self.cells[i].is_border)
            .collect()
    }

    /// Default cells not touching any revealed cell, row-major.
    pub(crate) fn unbordered_indices(&self) -> Vec<usize> {
        (0..self.cells.len())
            .filter(|&i| self.cells[i].is_default() && !self.cells[i].is_border)
            .collect()
    }

    pub(crate) fn count_neighbors(&self, idx: usize, pred: impl Fn(&Cell) -> bool) -> usize {
        self.neighbors.get(idx).iter().filter(|&&n| pred(&self.cells[n])).count()
    }

    fn check(&self, coord: Coord) -> Result<usize> {
        if !self.neighbors.in_bounds(coord) {
            return Err(GameError::InvalidCoordinate {
                row: coord.row,
                col: coord.col,
                height: self.height,
                width: self.width,
            });
        }
        Ok(self.neighbors.index(coord))
    }

    fn ensure_running(&self) -> Result<()> {
        if self.is_over() {
            return Err(GameError::GameOver);
        }
        Ok(())
    }

    /// Reveal a Default cell.
    ///
    /// A zero cell floods breadth-first through its zero-numbered neighbors;
    /// non-zero cells are opened but never seed the flood. Every Default
    /// neighbor of an opened cell becomes a border cell.
    pub fn reveal(&mut self, coord: Coord) -> Result<RevealResult> {
        let idx = self.check(coord)?;
        self.ensure_running()?;
        match self.cells[idx].state {
            CellState::Revealed => return Err(GameError::AlreadyRevealed(coord)),
            CellState::Flagged => return Err(GameError::AlreadyFlagged(coord)),
            CellState::Default => {}
        }
        Ok(self.reveal_index(idx))
    }

    pub(crate) fn reveal_index(&mut self, idx: usize) -> RevealResult {
        if self.cells[idx].is_mine {
            let coord = self.coord_of(idx);
            info!("Mine triggered at ({}, {})", coord.row, coord.col);
            self.state = GameState::Lost;
            self.exploded = Some(coord);
            return RevealResult::loss(coord);
        }

        let mut changed = Vec::new();
        let mut cascaded = Vec::new();
        self.open(idx, &mut changed);

        if self.cells[idx].adjacent_mines == 0 {
            let mut queue = VecDeque::from([idx]);
            while let Some(current) = queue.pop_front() {
                let around = self.neighbors.get(current).to_vec();
                for n in around {
                    let cell = &self.cells[n];
                    if !cell.is_default() || cell.is_mine {
                        continue;
                    }
                    if cell.adjacent_mines == 0 {
                        queue.push_back(n);
                    }
                    self.open(n, &mut changed);
                    cascaded.push(self.coord_of(n));
                }
            }
            trace!("Cascade opened {} cells", cascaded.len());
        }

        if self.revealed_count == self.cells.len() - self.mine_count {
            info!("Board cleared with {} flags placed", self.flagged_count);
            self.state = GameState::Won;
        }

        RevealResult { outcome: self.state.outcome(), cascaded, changed_cells: changed, exploded: None }
    }

    fn open(&mut self, idx: usize, changed: &mut Vec<CellChange>) {
        let cell = &mut self.cells[idx];
        cell.state = CellState::Revealed;
        cell.is_border = false;
        cell.probability = None;
        let adjacent = cell.adjacent_mines;
        self.revealed_count += 1;

        for &n in self.neighbors.get(idx) {
            if self.cells[n].is_default() {
                self.cells[n].is_border = true;
            }
        }

        changed.push(CellChange {
            coord: self.neighbors.coord(idx),
            new_state: CellState::Revealed,
            adjacent_mines: Some(adjacent),
        });
    }

    pub fn flag(&mut self, coord: Coord) -> Result<()> {
        let idx = self.check(coord)?;
        self.ensure_running()?;
        match self.cells[idx].state {
            CellState::Revealed => Err(GameError::AlreadyRevealed(coord)),
            CellState::Flagged => Err(GameError::AlreadyFlagged(coord)),
            CellState::Default => {
                self.flag_index(idx);
                Ok(())
            }
        }
    }

    pub(crate) fn flag_index(&mut self, idx: usize) {
        let cell = &mut self.cells[idx];
        cell.state = CellState::Flagged;
        cell.is_border = false;
        cell.probability = Some(100);
        if cell.is_mine {
            self.correct_flag_count += 1;
        }
        self.flagged_count += 1;
    }

    pub fn unflag(&mut self, coord: Coord) -> Result<()> {
        let idx = self.check(coord)?;
        self.ensure_running()?;
        let touches_revealed = self.count_neighbors(idx, |c| c.is_revealed()) > 0;
        let cell = &mut self.cells[idx];
        match cell.state {
            CellState::Flagged => {
                cell.state = CellState::Default;
                cell.is_border = touches_revealed;
                cell.probability = None;
                if cell.is_mine {
                    self.correct_flag_count -= 1;
                }
                self.flagged_count -= 1;
                Ok(())
            }
            CellState::Revealed => Err(GameError::AlreadyRevealed(coord)),
            CellState::Default => Err(GameError::NotFlagged(coord)),
        }
    }

    /// Flag a Default cell or unflag a Flagged one. Returns the new flag state.
    pub fn toggle_flag(&mut self, coord: Coord) -> Result<bool> {
        if self.cell(coord)?.is_flagged() {
            self.unflag(coord)?;
            Ok(false)
        } else {
            self.flag(coord)?;
            Ok(true)
        }
    }

    /// Outcome implied by the current state.
    pub fn outcome(&self) -> Outcome {
        self.state.outcome()
    }
}
