//! Error types shared by every multiplication strategy.

use thiserror::Error;

/// Result type alias using this crate's [`Error`].
pub type Result<T> = std::result::Result<T, Error>;

/// Errors surfaced by matrix construction and multiplication.
///
/// Every strategy raises the same [`Error::ShapeMismatch`] for the same
/// malformed operands, before any computation starts, so callers see a
/// uniform contract regardless of which strategy is selected.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// Operand dimensions are incompatible for multiplication.
    #[error("shape mismatch: {lhs_rows}x{lhs_cols} cannot multiply with {rhs_rows}x{rhs_cols}")]
    ShapeMismatch {
        /// Rows of the left operand
        lhs_rows: usize,
        /// Columns of the left operand
        lhs_cols: usize,
        /// Rows of the right operand
        rhs_rows: usize,
        /// Columns of the right operand
        rhs_cols: usize,
    },

    /// A strategy or generator parameter is out of range.
    #[error("invalid configuration: {reason}")]
    InvalidConfiguration {
        /// Human-readable description of the rejected parameter
        reason: String,
    },

    /// Backing data length does not match the requested dimensions.
    #[error("data length {len} does not match matrix dimensions {rows}x{cols}")]
    DataLength {
        /// Length of the supplied buffer
        len: usize,
        /// Requested row count
        rows: usize,
        /// Requested column count
        cols: usize,
    },

    /// An element access was outside the matrix bounds.
    #[error("index out of bounds: ({row}, {col})")]
    IndexOutOfBounds {
        /// Requested row
        row: usize,
        /// Requested column
        col: usize,
    },
}

impl Error {
    pub(crate) fn invalid_configuration(reason: impl Into<String>) -> Self {
        Error::InvalidConfiguration {
            reason: reason.into(),
        }
    }
}
