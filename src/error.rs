use std::collections::TryReserveError;

use thiserror::Error;

use crate::types::Color;

/// Errors raised while building or running a principal variation.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SolverError {
    #[error("illegal move {position} for {color} at ply {ply}")]
    IllegalMove { ply: usize, position: u8, color: Color },

    #[error("square {0} is outside the board")]
    OutOfRange(i32),

    #[error("no legal move for either side at ply {0}, game is already over")]
    GameOver(usize),

    #[error("unknown algorithm id {0} (expected 1-4)")]
    UnknownAlgorithm(u8),

    #[error("principal variation is not terminated by -1")]
    MissingSentinel,
}

/// Resource exhaustion in the transposition cache.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CacheError {
    #[error("transposition cache is full ({capacity} entries)")]
    Exhausted { capacity: usize },

    #[error("transposition cache allocation failed: {0}")]
    Allocation(#[from] TryReserveError),
}
