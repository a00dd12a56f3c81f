//! Domain-level errors (no external dependencies)

use thiserror::Error;

/// Domain errors represent invalid input or malformed data.
/// These are independent of infrastructure concerns.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum DomainError {
    #[error("Expected a boolean, got {0}.")]
    InvalidBool(String),

    #[error("invalid node type: {0}")]
    InvalidNodeType(String),

    #[error("invalid relation type: {0}")]
    InvalidRelationType(String),

    #[error("malformed {what}: expected {expected} bytes, got {actual}")]
    Malformed {
        what: &'static str,
        expected: usize,
        actual: usize,
    },

    #[error("unexpected {what}: {value:?}")]
    UnexpectedValue { what: &'static str, value: String },
}
