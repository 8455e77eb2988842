//! Batch self-play.
//!
//! Plays many seeded games back to back and tallies how the solver did.
//! Losses are split by how far the game had progressed, measured in flags.

use log::info;
use serde::{Deserialize, Serialize};

use crate::config::{GameConfig, SolverConfig};
use crate::error::Result;
use crate::game::Game;
use crate::types::Outcome;

/// Losses with fewer flags than this count as early.
pub const EARLY_LOSS_FLAGS: usize = 20;
/// Losses with at least this many flags count as late.
pub const LATE_LOSS_FLAGS: usize = 80;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BatchConfig {
    pub games: usize,
    /// Game `i` is seeded with `game.seed + i` when a seed is set.
    pub game: GameConfig,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self { games: 100, game: GameConfig::default() }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchStats {
    pub games: usize,
    pub wins: usize,
    pub losses: usize,
    pub early_losses: usize,
    pub late_losses: usize,
    pub total_ticks: usize,
}

impl BatchStats {
    pub fn win_rate(&self) -> f64 {
        if self.games == 0 {
            return 0.0;
        }
        self.wins as f64 / self.games as f64
    }

    pub fn average_ticks(&self) -> f64 {
        if self.games == 0 {
            return 0.0;
        }
        self.total_ticks as f64 / self.games as f64
    }

    fn record(&mut self, outcome: Outcome, flags: usize, ticks: usize) {
        self.games += 1;
        self.total_ticks += ticks;
        match outcome {
            Outcome::Win => self.wins += 1,
            Outcome::Loss => {
                self.losses += 1;
                if flags < EARLY_LOSS_FLAGS {
                    self.early_losses += 1;
                } else if flags >= LATE_LOSS_FLAGS {
                    self.late_losses += 1;
                }
            }
            Outcome::Continue => {}
        }
    }
}

pub fn run_batch(batch: &BatchConfig, solver: &SolverConfig) -> Result<BatchStats> {
    batch.game.validate()?;
    let mut stats = BatchStats::default();

    for i in 0..batch.games {
        let mut config = batch.game.clone();
        config.seed = batch.game.seed.map(|s| s.wrapping_add(i as u64));
        let mut game = Game::new(config)?.with_solver(*solver);
        let report = game.run_auto_solve();
        stats.record(report.outcome, report.flags_placed_at_end, report.elapsed_ticks);
    }

    info!(
        "{} games: {} wins ({:.1}%), {} early / {} late losses, {:.1} passes on average",
        stats.games,
        stats.wins,
        stats.win_rate() * 100.0,
        stats.early_losses,
        stats.late_losses,
        stats.average_ticks()
    );
    Ok(stats)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::GameError;

    #[test]
    fn test_record_classifies_losses() {
        let mut stats = BatchStats::default();
        stats.record(Outcome::Loss, 3, 5);
        stats.record(Outcome::Loss, 50, 40);
        stats.record(Outcome::Loss, 80, 90);
        stats.record(Outcome::Win, 99, 120);
        assert_eq!(stats.games, 4);
        assert_eq!(stats.wins, 1);
        assert_eq!(stats.losses, 3);
        assert_eq!(stats.early_losses, 1);
        assert_eq!(stats.late_losses, 1);
        assert_eq!(stats.total_ticks, 255);
        assert_eq!(stats.win_rate(), 0.25);
        assert_eq!(stats.average_ticks(), 63.75);
    }

    #[test]
    fn test_empty_batch() {
        let stats = run_batch(&BatchConfig { games: 0, game: GameConfig::beginner() }, &SolverConfig::default()).unwrap();
        assert_eq!(stats, BatchStats::default());
        assert_eq!(stats.win_rate(), 0.0);
    }

    #[test]
    fn test_seeded_batch_is_reproducible() {
        let batch = BatchConfig { games: 10, game: GameConfig::beginner().with_seed(1000) };
        let solver = SolverConfig::default();
        let first = run_batch(&batch, &solver).unwrap();
        let second = run_batch(&batch, &solver).unwrap();
        assert_eq!(first, second);
        assert_eq!(first.games, 10);
        assert_eq!(first.wins + first.losses, 10);
        assert!(first.early_losses + first.late_losses <= first.losses);
    }

    #[test]
    fn test_invalid_game_config_is_rejected() {
        let batch = BatchConfig { games: 3, game: GameConfig::new(4, 4, 16) };
        assert_eq!(
            run_batch(&batch, &SolverConfig::default()),
            Err(GameError::TooManyMines { requested: 16, cells: 16 })
        );
    }
}
