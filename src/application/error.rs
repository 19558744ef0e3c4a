//! Application-level errors (wraps domain errors)

use thiserror::Error;

use crate::domain::DomainError;

/// Application errors wrap domain errors and add application-level context.
#[derive(Error, Debug)]
pub enum ApplicationError {
    #[error("{0}")]
    Domain(#[from] DomainError),

    #[error("config error: {message}")]
    Config { message: String },

    #[error("company not found: {0}")]
    CompanyNotFound(String),

    #[error("search request failed")]
    SearchFailed,

    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("view is not ready: {0}")]
    ViewNotReady(String),

    #[error("something went wrong, please reload")]
    Render,

    #[error("operation failed: {context}")]
    OperationFailed {
        context: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
}

/// Result type for application layer operations.
pub type ApplicationResult<T> = Result<T, ApplicationError>;
