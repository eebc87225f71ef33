use thiserror::Error;

#[derive(Error, Debug, Copy, Clone, PartialEq, Eq)]
pub enum GameError {
    #[error("Cell index out of range")]
    InvalidIndex,
    #[error("Board dimensions must be positive")]
    InvalidDimensions,
    #[error("Mine count must be at least 1 and below the cell count")]
    MineCountOutOfRange,
}

pub type Result<T> = std::result::Result<T, GameError>;
