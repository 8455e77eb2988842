//! Autonomous Minesweeper player.
//!
//! The solver plays a board the way a careful human would: sound local
//! deductions first, then an exhaustive enumeration of the mine
//! arrangements along the revealed frontier, weighted by exact binomial
//! coefficients, and finally a reveal of the least risky cell.
//!
//! All grid data is flat and row-major: `cells[row * width + col]`.
//! Under `wasm32` the same operations are exported to JavaScript.

pub mod board;
pub mod config;
pub mod enumerate;
pub mod error;
pub mod game;
pub mod harness;
pub mod probability;
pub mod rng;
pub mod rules;
pub mod solver;
pub mod types;

pub use board::Board;
pub use config::{GameConfig, SolverConfig, ValidationMode};
pub use error::{GameError, Result};
pub use game::{FlagResult, Game};
pub use harness::{run_batch, BatchConfig, BatchStats};
pub use rng::GameRng;
pub use solver::{run_auto_solve, solve_pass, SolveReport};
pub use types::{CellChange, CellSnapshot, CellState, Coord, GameState, Outcome, RevealResult};

// ─── WASM Exports (only compiled for wasm32 target) ─────────────────────────

#[cfg(target_arch = "wasm32")]
mod wasm_exports {
    use wasm_bindgen::prelude::*;

    use crate::config::{GameConfig, SolverConfig};
    use crate::game::Game;
    use crate::harness::{self, BatchConfig};

    fn set(obj: &js_sys::Object, key: &str, value: JsValue) -> Result<(), JsError> {
        js_sys::Reflect::set(obj, &key.into(), &value)
            .map(|_| ())
            .map_err(|_| JsError::new(&format!("could not set `{key}` on result object")))
    }

    fn solver_from(value: JsValue) -> Result<SolverConfig, JsError> {
        if value.is_undefined() || value.is_null() {
            return Ok(SolverConfig::default());
        }
        Ok(serde_wasm_bindgen::from_value(value)?)
    }

    /// A game handle owned by JavaScript.
    #[wasm_bindgen]
    pub struct SweeperGame {
        inner: Game,
    }

    #[wasm_bindgen]
    impl SweeperGame {
        #[wasm_bindgen(constructor)]
        pub fn new(width: usize, height: usize, mines: usize, seed: Option<u32>) -> Result<SweeperGame, JsError> {
            let inner = Game::new_game(width, height, mines, seed.map(u64::from))?;
            Ok(SweeperGame { inner })
        }

        /// Build from `{ width, height, mines, seed }` plus optional solver
        /// settings `{ validation: "LocalOnly" | "Full" }`.
        #[wasm_bindgen(js_name = "fromConfig")]
        pub fn from_config(config: JsValue, solver: JsValue) -> Result<SweeperGame, JsError> {
            let config: GameConfig = serde_wasm_bindgen::from_value(config)?;
            let inner = Game::new(config)?.with_solver(solver_from(solver)?);
            Ok(SweeperGame { inner })
        }

        /// Returns `{ outcome, cascaded, changedCells }`.
        #[wasm_bindgen(js_name = "revealCell")]
        pub fn reveal_cell(&mut self, row: usize, col: usize) -> Result<JsValue, JsError> {
            let result = self.inner.reveal_cell(row, col)?;
            Ok(serde_wasm_bindgen::to_value(&result)?)
        }

        /// Returns `{ flagged }`.
        #[wasm_bindgen(js_name = "toggleFlag")]
        pub fn toggle_flag(&mut self, row: usize, col: usize) -> Result<JsValue, JsError> {
            let result = self.inner.toggle_flag(row, col)?;
            let obj = js_sys::Object::new();
            set(&obj, "flagged", result.flagged.into())?;
            Ok(obj.into())
        }

        /// Returns `{ outcome, flagsPlacedAtEnd, elapsedTicks }`.
        #[wasm_bindgen(js_name = "runAutoSolve")]
        pub fn run_auto_solve(&mut self) -> Result<JsValue, JsError> {
            let report = self.inner.run_auto_solve();
            Ok(serde_wasm_bindgen::to_value(&report)?)
        }

        /// Returns `{ state, adjacentMines, probability, isBorder }`.
        #[wasm_bindgen(js_name = "cellState")]
        pub fn cell_state(&self, row: usize, col: usize) -> Result<JsValue, JsError> {
            let snapshot = self.inner.cell_state(row, col)?;
            Ok(serde_wasm_bindgen::to_value(&snapshot)?)
        }

        /// Returns `{ width, height, mines, flagged, revealed, state }`.
        #[wasm_bindgen(js_name = "summary")]
        pub fn summary(&self) -> Result<JsValue, JsError> {
            let board = self.inner.board();
            let obj = js_sys::Object::new();
            set(&obj, "width", (board.width() as u32).into())?;
            set(&obj, "height", (board.height() as u32).into())?;
            set(&obj, "mines", (board.mine_count() as u32).into())?;
            set(&obj, "flagged", (board.flagged_count() as u32).into())?;
            set(&obj, "revealed", (board.revealed_count() as u32).into())?;
            set(&obj, "state", serde_wasm_bindgen::to_value(&board.game_state())?)?;
            Ok(obj.into())
        }

        pub fn restart(&mut self) -> Result<(), JsError> {
            Ok(self.inner.restart()?)
        }
    }

    /// Play `config.games` games and return the aggregated statistics.
    #[wasm_bindgen(js_name = "runBatch")]
    pub fn wasm_run_batch(config: JsValue, solver: JsValue) -> Result<JsValue, JsError> {
        let batch: BatchConfig = serde_wasm_bindgen::from_value(config)?;
        let stats = harness::run_batch(&batch, &solver_from(solver)?)?;

        let obj = serde_wasm_bindgen::to_value(&stats)?.unchecked_into::<js_sys::Object>();
        set(&obj, "winRate", stats.win_rate().into())?;
        set(&obj, "averageTicks", stats.average_ticks().into())?;
        Ok(obj.into())
    }

    /// Ping function to verify WASM is loaded.
    #[wasm_bindgen(js_name = "ping")]
    pub fn wasm_ping() -> String {
        "Sweeper solver ready".to_string()
    }
}
