//! Error types for the simulation core

use thiserror::Error;

/// Errors raised by the rule parser and the grid accessors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LifeError {
    /// The rule text matches neither `B<digits>/S<digits>` nor `<digits>/<digits>`.
    #[error("Invalid rulestring: {0:?}")]
    InvalidRule(String),

    /// Width or height was zero at construction.
    #[error("Invalid grid dimensions {width}x{height}: both must be positive")]
    InvalidDimension { width: usize, height: usize },

    /// Rows of a cell matrix have differing lengths.
    #[error("Row {row} has length {len}, expected {expected}")]
    RaggedRow {
        row: usize,
        len: usize,
        expected: usize,
    },

    /// Coordinate access outside the grid extent.
    #[error("Coordinates ({row}, {col}) out of bounds for {height}x{width} grid")]
    OutOfBounds {
        row: usize,
        col: usize,
        height: usize,
        width: usize,
    },
}

pub type Result<T, E = LifeError> = std::result::Result<T, E>;
