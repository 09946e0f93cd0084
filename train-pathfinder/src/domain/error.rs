//! Domain error types.
//!
//! These errors represent validation failures in the domain layer. They are
//! distinct from network lookup and search errors.

/// Domain-level errors for validation and data consistency.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum DomainError {
    /// A train path violates one of its structural invariants
    #[error("malformed train path: {0}")]
    MalformedPath(String),

    /// A train service has physically impossible parameters
    #[error("invalid train {train}: {reason}")]
    InvalidTrain { train: String, reason: &'static str },
}
