use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GameError {
    #[error("Invalid coordinates ({row}, {col}) for a {rows}x{cols} board")]
    InvalidCoords { row: usize, col: usize, rows: usize, cols: usize },
    #[error("Too many mines: {mines} mines need more than {cells} cells")]
    TooManyMines { mines: usize, cells: usize },
    #[error("Board dimensions must be positive")]
    EmptyBoard,
    #[error("Unknown difficulty '{0}', expected easy, medium or hard")]
    InvalidDifficulty(String),
}

pub type Result<T> = core::result::Result<T, GameError>;
