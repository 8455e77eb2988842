//! Owned game handle.
//!
//! A `Game` bundles a board with its RNG and solver settings. Every game
//! is an independent value, so any number can live side by side.

use log::debug;
use serde::{Deserialize, Serialize};

use crate::board::Board;
use crate::config::{GameConfig, SolverConfig};
use crate::error::Result;
use crate::rng::GameRng;
use crate::solver::{self, SolveReport};
use crate::types::{CellSnapshot, Coord, GameState, RevealResult};

/// Result of a flag toggle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlagResult {
    pub flagged: bool,
}

pub struct Game {
    board: Board,
    rng: GameRng,
    config: GameConfig,
    solver: SolverConfig,
}

impl Game {
    pub fn new(config: GameConfig) -> Result<Self> {
        let mut rng = GameRng::from_optional_seed(config.seed);
        let board = Board::new(&config, &mut rng)?;
        debug!(
            "New {}x{} game with {} mines (seed {:?})",
            config.width, config.height, config.mines, config.seed
        );
        Ok(Self { board, rng, config, solver: SolverConfig::default() })
    }

    pub fn new_game(width: usize, height: usize, mines: usize, seed: Option<u64>) -> Result<Self> {
        Self::new(GameConfig { width, height, mines, seed })
    }

    pub fn with_solver(mut self, solver: SolverConfig) -> Self {
        self.solver = solver;
        self
    }

    /// Discard the board and deal a new one with the same settings.
    ///
    /// The RNG carries on from its current state, so a seeded game restarts
    /// onto a different, still reproducible, board.
    pub fn restart(&mut self) -> Result<()> {
        self.board = Board::new(&self.config, &mut self.rng)?;
        Ok(())
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn solver_config(&self) -> &SolverConfig {
        &self.solver
    }

    pub fn state(&self) -> GameState {
        self.board.game_state()
    }

    pub fn reveal_cell(&mut self, row: usize, col: usize) -> Result<RevealResult> {
        self.board.reveal(Coord::new(row, col))
    }

    pub fn toggle_flag(&mut self, row: usize, col: usize) -> Result<FlagResult> {
        let flagged = self.board.toggle_flag(Coord::new(row, col))?;
        Ok(FlagResult { flagged })
    }

    /// Let the solver play until the game ends or it runs out of moves.
    pub fn run_auto_solve(&mut self) -> SolveReport {
        solver::run_auto_solve(&mut self.board, &mut self.rng, &self.solver)
    }

    pub fn cell_state(&self, row: usize, col: usize) -> Result<CellSnapshot> {
        self.board.snapshot(Coord::new(row, col))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ValidationMode;
    use crate::error::GameError;
    use crate::types::{CellState, Outcome};

    #[test]
    fn test_new_game_validates_config() {
        assert!(matches!(
            Game::new_game(0, 9, 1, None),
            Err(GameError::ZeroAreaBoard { .. })
        ));
        assert!(matches!(
            Game::new_game(3, 3, 9, Some(1)),
            Err(GameError::TooManyMines { .. })
        ));
        let game = Game::new_game(9, 9, 10, Some(1)).unwrap();
        assert_eq!(game.board().mine_count(), 10);
        assert_eq!(game.state(), GameState::Running);
    }

    #[test]
    fn test_invalid_reveal_changes_nothing() {
        let mut game = Game::new_game(9, 9, 10, Some(5)).unwrap();
        let err = game.reveal_cell(9, 0).unwrap_err();
        assert_eq!(err, GameError::InvalidCoordinate { row: 9, col: 0, height: 9, width: 9 });
        assert_eq!(game.board().revealed_count(), 0);
        assert_eq!(game.board().default_count(), 81);
    }

    #[test]
    fn test_toggle_flag_round_trip() {
        let mut game = Game::new_game(9, 9, 10, Some(5)).unwrap();
        assert_eq!(game.toggle_flag(4, 4).unwrap(), FlagResult { flagged: true });
        assert_eq!(game.cell_state(4, 4).unwrap().state, CellState::Flagged);
        assert_eq!(game.cell_state(4, 4).unwrap().probability, Some(100));
        assert_eq!(game.board().flagged_count(), 1);

        assert_eq!(game.toggle_flag(4, 4).unwrap(), FlagResult { flagged: false });
        assert_eq!(game.cell_state(4, 4).unwrap().state, CellState::Default);
        assert_eq!(game.cell_state(4, 4).unwrap().probability, None);
        assert_eq!(game.board().flagged_count(), 0);
    }

    #[test]
    fn test_seeded_games_replay_identically() {
        for validation in [ValidationMode::LocalOnly, ValidationMode::Full] {
            let solver = SolverConfig { validation };
            let mut a = Game::new(GameConfig::beginner().with_seed(99)).unwrap().with_solver(solver);
            let mut b = Game::new(GameConfig::beginner().with_seed(99)).unwrap().with_solver(solver);
            assert_eq!(a.run_auto_solve(), b.run_auto_solve());
            assert_eq!(a.board().exploded(), b.board().exploded());
        }
    }

    #[test]
    fn test_auto_solve_ends_the_game() {
        let mut game = Game::new(GameConfig::beginner().with_seed(2024)).unwrap();
        let report = game.run_auto_solve();
        assert!(game.board().is_over());
        assert_eq!(report.outcome, game.board().outcome());
        assert_eq!(report.flags_placed_at_end, game.board().flagged_count());

        // Nothing left to play: further actions are rejected.
        let second = game.run_auto_solve();
        assert_eq!(second.elapsed_ticks, 0);
        assert!(matches!(game.toggle_flag(0, 0), Err(GameError::GameOver)));
        assert_ne!(report.outcome, Outcome::Continue);
    }

    #[test]
    fn test_restart_deals_a_fresh_board() {
        let mut game = Game::new(GameConfig::beginner().with_seed(3)).unwrap();
        game.run_auto_solve();
        game.restart().unwrap();
        assert_eq!(game.state(), GameState::Running);
        assert_eq!(game.board().revealed_count(), 0);
        assert_eq!(game.board().flagged_count(), 0);
        assert_eq!(game.board().mine_count(), 10);
    }
}
