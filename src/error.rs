//! Error types for the payload validation engine
//!
//! Field-level validation failures are reported through
//! [`ValidationResult`](crate::ValidationResult), never through these
//! errors. This enum covers the two hard-failure cases: a schema that
//! cannot be constructed, and a collaborator fault during contract
//! evaluation.

use thiserror::Error;

/// Main error type for schema construction and contract evaluation
#[derive(Error, Debug)]
pub enum ValidationError {
    /// Schema construction error (e.g. duplicate field name)
    #[error("Schema error: {0}")]
    Schema(String),

    /// A collaborator call failed during rule evaluation
    #[error("Collaborator error: {0}")]
    Collaborator(String),
}

impl ValidationError {
    /// Create a schema construction error
    pub fn schema(msg: impl Into<String>) -> Self {
        ValidationError::Schema(msg.into())
    }

    /// Create a collaborator error
    pub fn collaborator(msg: impl Into<String>) -> Self {
        ValidationError::Collaborator(msg.into())
    }
}

/// Result type alias for validation operations
pub type Result<T> = std::result::Result<T, ValidationError>;
