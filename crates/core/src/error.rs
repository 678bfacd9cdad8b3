// Central Error Type for the Application

use thiserror::Error;

/// Application-level error type
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Domain error: {0}")]
    Domain(#[from] crate::domain::DomainError),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Configuration error: {0}")]
    Config(String),

    /// Shutdown was requested while an operation was suspended.
    /// Not a failure: callers stop cleanly instead of logging it as an error.
    #[error("Operation cancelled by shutdown")]
    Cancelled,

    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    pub fn is_cancelled(&self) -> bool {
        matches!(self, AppError::Cancelled)
    }
}

/// Result type alias using AppError
pub type Result<T> = std::result::Result<T, AppError>;

// Note: sqlx::Error conversion is handled in infra-postgres
// by converting to AppError::Database(String)
