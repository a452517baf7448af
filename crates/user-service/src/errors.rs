//! Centralized error handling.
//!
//! One tagged enum for every failure the service and repository can
//! surface, so the console branches on kind without string matching.
//! Raw `DbErr` values never cross the repository boundary un-wrapped.

use thiserror::Error;

/// Application error types.
#[derive(Error, Debug)]
pub enum AppError {
    /// Input fails a validation rule or an id/email precondition.
    /// Recoverable by re-prompting; never touches the store.
    #[error("invalid {field}: {reason}")]
    Validation { field: &'static str, reason: String },

    /// Email uniqueness violated at register/modify time.
    #[error("email already registered: {0}")]
    Conflict(String),

    /// Referenced record does not exist for an operation that
    /// requires it to exist.
    #[error("user not found with id {0}")]
    NotFound(i64),

    /// Optimistic version check failed on update. The caller should
    /// re-fetch and retry; never auto-retried internally.
    #[error("user {0} was modified concurrently")]
    Concurrency(i64),

    /// Any other storage-layer failure, wrapping the cause.
    #[error("database error")]
    Database(#[from] sea_orm::DbErr),
}

impl AppError {
    pub fn validation(field: &'static str, reason: impl Into<String>) -> Self {
        AppError::Validation {
            field,
            reason: reason.into(),
        }
    }
}

impl From<sea_orm::TransactionError<sea_orm::DbErr>> for AppError {
    fn from(err: sea_orm::TransactionError<sea_orm::DbErr>) -> Self {
        match err {
            sea_orm::TransactionError::Connection(e) => AppError::Database(e),
            sea_orm::TransactionError::Transaction(e) => AppError::Database(e),
        }
    }
}

/// Result type alias
pub type AppResult<T> = Result<T, AppError>;
