// crates/puli-core/src/error.rs - Rendering errors
//
// Every variant here is a usage error: the caller handed the renderer data
// that breaks its contract. Nothing is coerced or truncated to recover.

use thiserror::Error;

/// Errors raised by the table, grid and listing renderers
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RenderError {
    #[error("Row {row} has {found} cells, expected {expected}")]
    ColumnCountMismatch {
        row: usize,
        expected: usize,
        found: usize,
    },

    #[error("Cell in row {row}, column {column} contains a line break")]
    MultilineCell { row: usize, column: usize },

    #[error("State selected more than once: {0}")]
    DuplicateState(String),

    #[error("No header registered for state: {0}")]
    MissingStateHeader(String),
}

/// Result type for rendering operations
pub type RenderResult<T> = Result<T, RenderError>;
