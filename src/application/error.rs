//! Application-level errors (wraps domain errors)

use thiserror::Error;

use crate::application::services::CallFailure;
use crate::domain::DomainError;

/// Application errors wrap domain errors and add application-level context.
#[derive(Error, Debug)]
pub enum ApplicationError {
    #[error("{0}")]
    Domain(#[from] DomainError),

    #[error("config error: {message}")]
    Config { message: String },

    /// One or more control calls failed. Every failed call is kept.
    #[error("{context}: {}", render_failures(.failures))]
    ControlFailed {
        context: String,
        failures: Vec<CallFailure>,
    },
}

fn render_failures(failures: &[CallFailure]) -> String {
    match failures {
        [single] => single.source.to_string(),
        many => many
            .iter()
            .map(|f| format!("{}: {}", f.call, f.source))
            .collect::<Vec<_>>()
            .join("; "),
    }
}

/// Result type for application layer operations.
pub type ApplicationResult<T> = Result<T, ApplicationError>;
