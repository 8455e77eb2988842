use crate::types::Coord;

/// Rejected board operations.
///
/// Stepping on a mine is not an error; it is reported as
/// [`Outcome::Loss`](crate::types::Outcome::Loss).
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GameError {
    #[error("Cell ({row}, {col}) is outside the {height}x{width} board")]
    InvalidCoordinate { row: usize, col: usize, height: usize, width: usize },
    #[error("Cell ({}, {}) is already revealed", .0.row, .0.col)]
    AlreadyRevealed(Coord),
    #[error("Cell ({}, {}) is already flagged", .0.row, .0.col)]
    AlreadyFlagged(Coord),
    #[error("Cell ({}, {}) is not flagged", .0.row, .0.col)]
    NotFlagged(Coord),
    #[error("The game is already over")]
    GameOver,
    #[error("Tried to create a board with zero cells ( {width} x {height} )")]
    ZeroAreaBoard { width: usize, height: usize },
    #[error("Tried to place {requested} mines on a board with {cells} cells")]
    TooManyMines { requested: usize, cells: usize },
    #[error("Invalid board layout: {0}")]
    InvalidLayout(String),
}

pub type Result<T, E = GameError> = std::result::Result<T, E>;
