//! Error type shared by all collaborator traits.

use thiserror::Error;

/// Failure reported by an external collaborator.
///
/// Callers decide recovery by stage: storage calls retry retryable errors
/// with bounded backoff, a retryable synthesis failure consumes one fit
/// attempt, and everything else is fatal for the task.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ServiceError {
    /// The call exceeded its deadline.
    #[error("{service} call timed out: {message}")]
    Timeout { service: String, message: String },

    /// The collaborator could not be reached or refused the connection.
    #[error("{service} is unavailable: {message}")]
    Unavailable { service: String, message: String },

    /// The collaborator answered with data the core cannot use.
    #[error("{service} returned invalid data: {message}")]
    InvalidResponse { service: String, message: String },

    /// The collaborator rejected the request itself.
    #[error("{service} rejected the request: {message}")]
    Rejected { service: String, message: String },
}

impl ServiceError {
    /// Create a timeout error.
    pub fn timeout(service: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Timeout {
            service: service.into(),
            message: message.into(),
        }
    }

    /// Create an unavailable error.
    pub fn unavailable(service: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Unavailable {
            service: service.into(),
            message: message.into(),
        }
    }

    /// Create an invalid-response error.
    pub fn invalid_response(service: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidResponse {
            service: service.into(),
            message: message.into(),
        }
    }

    /// Create a rejected error.
    pub fn rejected(service: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Rejected {
            service: service.into(),
            message: message.into(),
        }
    }

    /// Whether retrying the same call can reasonably succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            ServiceError::Timeout { .. } | ServiceError::Unavailable { .. }
        )
    }
}

/// Result type for collaborator calls.
pub type ServiceResult<T> = Result<T, ServiceError>;
