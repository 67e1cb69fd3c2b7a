//! Domain-level errors (no external dependencies)

use thiserror::Error;

/// Domain errors represent violations of the outline's structural rules.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("no node at outline position {0}")]
    InvalidPath(String),

    #[error("duplicate node id: {id} (at {first} and {second})")]
    DuplicateId {
        id: String,
        first: String,
        second: String,
    },

    #[error("invalid title qualifier: {0}")]
    InvalidQualifier(String),
}

/// Result type for domain operations.
pub type DomainResult<T> = Result<T, DomainError>;
