//! CLI-level errors (wraps infrastructure errors)

use thiserror::Error;

use crate::application::ApplicationError;
use crate::domain::DomainError;
use crate::infrastructure::InfraError;

/// CLI errors are the top-level error type.
/// These are what get displayed to the user.
#[derive(Error, Debug)]
pub enum CliError {
    #[error("{0}")]
    Infra(#[from] InfraError),

    #[error("invalid arguments: {0}")]
    InvalidArgs(String),

    #[error("{0}")]
    Usage(String),
}

impl From<ApplicationError> for CliError {
    fn from(e: ApplicationError) -> Self {
        CliError::Infra(InfraError::Application(e))
    }
}

impl From<DomainError> for CliError {
    fn from(e: DomainError) -> Self {
        CliError::from(ApplicationError::Domain(e))
    }
}

/// Result type for CLI operations.
pub type CliResult<T> = Result<T, CliError>;

impl CliError {
    /// Get the appropriate exit code for this error.
    pub fn exit_code(&self) -> i32 {
        match self {
            CliError::InvalidArgs(_) | CliError::Usage(_) => crate::exitcode::USAGE,
            CliError::Infra(e) => match e {
                InfraError::Io { .. } => crate::exitcode::IOERR,
                InfraError::Http { .. } => crate::exitcode::UNAVAILABLE,
                InfraError::Application(e) => application_exit_code(e),
            },
        }
    }
}

fn application_exit_code(e: &ApplicationError) -> i32 {
    match e {
        ApplicationError::Config { .. } => crate::exitcode::CONFIG,
        ApplicationError::CompanyNotFound(_) | ApplicationError::ViewNotReady(_) => {
            crate::exitcode::NOINPUT
        }
        ApplicationError::SearchFailed => crate::exitcode::UNAVAILABLE,
        ApplicationError::InvalidInput(_) => crate::exitcode::USAGE,
        ApplicationError::Render | ApplicationError::OperationFailed { .. } => {
            crate::exitcode::SOFTWARE
        }
        ApplicationError::Domain(d) => match d {
            DomainError::InvalidOrgData { .. } => crate::exitcode::DATAERR,
            DomainError::InvalidLayout(_) | DomainError::UnknownOrphanPolicy(_) => {
                crate::exitcode::CONFIG
            }
            DomainError::NodeNotFound(_)
            | DomainError::NodeNotVisible(_)
            | DomainError::UnknownCategory(_) => crate::exitcode::USAGE,
        },
    }
}
