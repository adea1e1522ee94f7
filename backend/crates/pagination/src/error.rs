//! Error types for pagination windows and cursors.

use thiserror::Error;

/// Errors raised when constructing page requests or decoding cursors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PaginationError {
    /// The requested limit was zero.
    #[error("page limit must be at least 1")]
    ZeroLimit,

    /// The requested limit exceeds the supported maximum.
    #[error("page limit must be at most {max} (got {actual})")]
    LimitTooLarge {
        /// Largest accepted limit.
        max: usize,
        /// Limit supplied by the caller.
        actual: usize,
    },

    /// The cursor token could not be decoded.
    #[error("invalid page cursor: {message}")]
    InvalidCursor {
        /// Description of the decoding failure.
        message: String,
    },
}

impl PaginationError {
    pub(crate) fn invalid_cursor(message: impl Into<String>) -> Self {
        Self::InvalidCursor {
            message: message.into(),
        }
    }
}
