//! Game and solver settings.

use serde::{Deserialize, Serialize};

use crate::error::{GameError, Result};

/// Board dimensions, mine count and optional seed.
///
/// Defaults to the classic expert board.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub width: usize,
    pub height: usize,
    pub mines: usize,
    /// `None` draws entropy from the OS.
    pub seed: Option<u64>,
}

impl GameConfig {
    pub fn new(width: usize, height: usize, mines: usize) -> Self {
        Self { width, height, mines, seed: None }
    }

    pub fn beginner() -> Self {
        Self::new(9, 9, 10)
    }

    pub fn intermediate() -> Self {
        Self::new(16, 16, 40)
    }

    pub fn expert() -> Self {
        Self::new(30, 16, 99)
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.width == 0 || self.height == 0 {
            return Err(GameError::ZeroAreaBoard { width: self.width, height: self.height });
        }
        let cells = self.width * self.height;
        if self.mines >= cells {
            return Err(GameError::TooManyMines { requested: self.mines, cells });
        }
        Ok(())
    }
}

impl Default for GameConfig {
    fn default() -> Self {
        Self::expert()
    }
}

/// How strictly the enumerator checks a complete arrangement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ValidationMode {
    /// Only the per-cell pruning checks run; every leaf is accepted.
    #[default]
    LocalOnly,
    /// Every exposed cell's remaining quota must match the leaf exactly.
    Full,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SolverConfig {
    pub validation: ValidationMode,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_expert() {
        let config = GameConfig::default();
        assert_eq!((config.width, config.height, config.mines), (30, 16, 99));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_bad_boards() {
        assert_eq!(
            GameConfig::new(0, 5, 1).validate(),
            Err(GameError::ZeroAreaBoard { width: 0, height: 5 })
        );
        assert_eq!(
            GameConfig::new(3, 3, 9).validate(),
            Err(GameError::TooManyMines { requested: 9, cells: 9 })
        );
    }

    #[test]
    fn test_solver_config_defaults_to_local_only() {
        assert_eq!(SolverConfig::default().validation, ValidationMode::LocalOnly);
    }
}
