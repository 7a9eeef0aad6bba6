//! Domain-level error types.

use thiserror::Error;
use uuid::Uuid;

use crate::domain::InvalidTransition;
use crate::ports::AuthError;

/// Pipeline errors - everything a generation or scheduling call can report.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("Unauthenticated: {0}")]
    Unauthenticated(String),

    #[error("No brand profile exists for organization {0}")]
    ProfileNotFound(Uuid),

    #[error("Text generation is not configured: {0}")]
    Configuration(String),

    #[error("Text generation failed (status {status:?}): {message}")]
    Upstream { status: Option<u16>, message: String },

    #[error("Persistence failed: {0}")]
    Persistence(#[from] RepoError),

    #[error("Post not found: {0}")]
    PostNotFound(Uuid),

    #[error(transparent)]
    InvalidTransition(#[from] InvalidTransition),
}

impl From<GenerationError> for PipelineError {
    fn from(err: GenerationError) -> Self {
        match err {
            GenerationError::Configuration(msg) => PipelineError::Configuration(msg),
            GenerationError::Upstream { status, message } => {
                PipelineError::Upstream { status, message }
            }
        }
    }
}

impl From<AuthError> for PipelineError {
    fn from(err: AuthError) -> Self {
        PipelineError::Unauthenticated(err.to_string())
    }
}

/// Failures of the external text-generation capability.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GenerationError {
    #[error("Missing configuration: {0}")]
    Configuration(String),

    #[error("Upstream error (status {status:?}): {message}")]
    Upstream { status: Option<u16>, message: String },
}

/// Repository-level errors.
#[derive(Debug, Error)]
pub enum RepoError {
    #[error("Database connection failed: {0}")]
    Connection(String),

    #[error("Query execution failed: {0}")]
    Query(String),

    #[error("Entity not found")]
    NotFound,

    #[error("Constraint violation: {0}")]
    Constraint(String),

    #[error("Stored value could not be decoded: {0}")]
    Decode(String),
}
