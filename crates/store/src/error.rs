//! Store-boundary error model.

use thiserror::Error;

/// Error surfaced by any store/identity operation.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// The addressed row does not exist.
    #[error("not found")]
    NotFound,

    /// A business-rule conflict (duplicate email, insufficient balance,
    /// optimistic-concurrency retries exhausted).
    #[error("conflict: {0}")]
    Conflict(String),

    /// Credentials did not match an account.
    #[error("invalid credentials")]
    InvalidCredentials,

    /// Input rejected before touching the backend.
    #[error("validation failed: {0}")]
    Validation(String),

    /// The backing store could not be reached or rejected the query.
    /// Retryable: the caller may re-trigger the action.
    #[error("store unavailable: {0}")]
    Unavailable(String),
}

impl StoreError {
    pub fn conflict(msg: impl Into<String>) -> Self {
        Self::Conflict(msg.into())
    }

    pub fn unavailable(msg: impl Into<String>) -> Self {
        Self::Unavailable(msg.into())
    }

    /// Whether re-issuing the same call may succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(self, StoreError::Unavailable(_))
    }
}

impl From<coffeedocket_core::DomainError> for StoreError {
    fn from(err: coffeedocket_core::DomainError) -> Self {
        use coffeedocket_core::DomainError;
        match err {
            DomainError::NotFound => StoreError::NotFound,
            DomainError::Conflict(msg) => StoreError::Conflict(msg),
            DomainError::Validation(msg)
            | DomainError::InvalidId(msg)
            | DomainError::InvariantViolation(msg) => StoreError::Validation(msg),
            DomainError::Unauthorized => StoreError::InvalidCredentials,
        }
    }
}

#[cfg(feature = "postgres")]
impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::RowNotFound => StoreError::NotFound,
            other => StoreError::Unavailable(other.to_string()),
        }
    }
}
