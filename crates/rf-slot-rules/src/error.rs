//! Configuration errors
//!
//! Every constructor that validates game configuration returns these. A rule
//! that merely fails to trigger at runtime is never an error.

use rf_slot_grid::GridError;

use crate::symbols::SymbolId;

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ConfigError {
    #[error(transparent)]
    Grid(#[from] GridError),

    #[error("Invalid symbol id: {0}")]
    InvalidSymbol(SymbolId),

    #[error("Duplicate symbol id: {0}")]
    DuplicateSymbol(SymbolId),

    #[error("Unknown symbol id: {0}")]
    UnknownSymbol(SymbolId),

    #[error("Symbol set must contain at least one symbol")]
    EmptySymbolSet,

    #[error("Weighting must contain at least one entry")]
    EmptyWeighting,

    #[error("Weighting has a zero total weight")]
    ZeroWeights,

    #[error("Duplicate payline id: {0}")]
    DuplicatePayline(u8),

    #[error("Payline {id} has {got} rows, expected {expected}")]
    PaylineLength { id: u8, expected: usize, got: usize },

    #[error("Payline {id} row {row} is not valid on reel {reel}")]
    PaylineRow { id: u8, reel: usize, row: u8 },

    #[error("Payline id must be greater than zero")]
    PaylineId,

    #[error("Grid data has {got} tiles, expected {expected}")]
    GridLength { expected: usize, got: usize },

    #[error("Invalid jump parameters: {0}")]
    InvalidJump(&'static str),

    #[error("Missing required parameter: {0}")]
    MissingParameter(&'static str),

    #[error("Invalid parameter for {action}: {reason}")]
    InvalidParameter {
        action: &'static str,
        reason: &'static str,
    },

    #[error("Invalid engine configuration: {0}")]
    InvalidEngine(&'static str),
}

pub type Result<T> = std::result::Result<T, ConfigError>;
