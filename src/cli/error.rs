//! CLI-level errors (wraps infrastructure errors)

use thiserror::Error;

use crate::application::ApplicationError;
use crate::domain::DomainError;
use crate::exitcode;
use crate::infrastructure::InfraError;

/// CLI errors are the top-level error type.
/// These are what get displayed to the user.
#[derive(Error, Debug)]
pub enum CliError {
    #[error("{0}")]
    Infra(#[from] InfraError),

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
    ///
    /// Malformed booleans and failed control calls only print a diagnostic
    /// unless `strict` is set.
    pub fn exit_code(&self, strict: bool) -> i32 {
        let soft = |code| if strict { code } else { exitcode::OK };
        match self {
            CliError::Usage(_) => exitcode::USAGE,
            CliError::Infra(InfraError::Io { .. }) => exitcode::IOERR,
            CliError::Infra(InfraError::Application(e)) => match e {
                ApplicationError::Domain(DomainError::InvalidBool(_)) => soft(exitcode::DATAERR),
                ApplicationError::Domain(_) => exitcode::DATAERR,
                ApplicationError::Config { .. } => exitcode::CONFIG,
                ApplicationError::ControlFailed { .. } => soft(exitcode::IOERR),
            },
        }
    }

    /// Whether the usage text should accompany the diagnostic.
    pub fn shows_usage(&self) -> bool {
        matches!(self, CliError::Usage(_))
    }
}
