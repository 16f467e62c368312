//! Grid construction errors

/// Errors raised while building a grid topology or shape.
///
/// All of these are configuration mistakes; a topology is never built from
/// invalid parameters.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GridError {
    #[error("Invalid grid size: {reels} reels × {rows} rows")]
    InvalidSize { reels: usize, rows: usize },

    #[error("Grid mask has {got} entries, expected {expected}")]
    MaskLength { expected: usize, got: usize },

    #[error("Grid mask entry {value} for reel {reel} must be within 1..={rows}")]
    MaskEntry { reel: usize, value: u8, rows: usize },

    #[error("Shape must contain at least one offset")]
    EmptyShape,
}

pub type Result<T> = std::result::Result<T, GridError>;
