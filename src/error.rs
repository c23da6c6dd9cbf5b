/// Precondition violations raised by the grid engine.
///
/// None of these are user-facing: a well-behaved driver never triggers them,
/// so they signal a bug in the caller rather than bad input.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum EngineError {
    #[error("cannot spawn a tile: the grid has no empty slot")]
    FullGrid,
    #[error("cannot undo: history is empty")]
    EmptyHistory,
    #[error("grid size must be at least 1")]
    InvalidSize,
    #[error("row {row} has {len} slots, expected {size}")]
    ShapeMismatch { size: usize, row: usize, len: usize },
    #[error("invalid tile value {0}: must be a power of two >= 2")]
    InvalidTile(u32),
}

pub type Result<T> = std::result::Result<T, EngineError>;
