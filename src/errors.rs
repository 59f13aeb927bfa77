//! Error types for combinator construction

use thiserror::Error;

/// Errors that can occur when constructing combinators
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CombinatorError {
    /// Negative delay passed to a timing-primitive constructor
    #[error("Invalid delay: {0}ms is negative")]
    InvalidDelay(i64),
}

/// Result type for combinator construction
pub type CombinatorResult<T> = Result<T, CombinatorError>;
