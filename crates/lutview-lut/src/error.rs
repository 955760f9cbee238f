//! LUT error types.

use lutview_icc::IccError;
use thiserror::Error;

/// Result type for LUT operations.
pub type LutResult<T> = Result<T, LutError>;

/// Errors that can occur during LUT operations.
#[derive(Debug, Error)]
pub enum LutError {
    /// Cube edge resolution outside 2..=256.
    #[error("invalid LUT size {0}: edge resolution must be between 2 and 256")]
    InvalidSize(usize),

    /// Byte buffer does not hold exactly N³ RGB triples.
    #[error("LUT data length mismatch for size {size}: expected {expected} bytes, got {actual}")]
    DataLength {
        /// Edge resolution
        size: usize,
        /// Expected byte count
        expected: usize,
        /// Actual byte count
        actual: usize,
    },

    /// Color transform failed (unreadable, corrupt or non-RGB profile).
    #[error("color transform failed: {0}")]
    Transform(#[from] IccError),

    /// Parse error when loading `.cube` files.
    #[error("parse error: {0}")]
    ParseError(String),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
