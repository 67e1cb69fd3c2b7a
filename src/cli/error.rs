//! CLI-level errors (wraps infrastructure errors)

use thiserror::Error;

use crate::application::ApplicationError;
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

    /// Strict import failed; the individual lines were already reported.
    #[error("{count} line(s) could not be imported")]
    Rejected { count: usize },
}

/// Result type for CLI operations.
pub type CliResult<T> = Result<T, CliError>;

impl From<ApplicationError> for CliError {
    fn from(e: ApplicationError) -> Self {
        CliError::Infra(InfraError::Application(e))
    }
}

impl CliError {
    /// Get the appropriate exit code for this error.
    pub fn exit_code(&self) -> i32 {
        match self {
            CliError::InvalidArgs(_) | CliError::Usage(_) => crate::exitcode::USAGE,
            CliError::Rejected { .. } => crate::exitcode::DATAERR,
            CliError::Infra(e) => match e {
                InfraError::Io { .. } => crate::exitcode::IOERR,
                InfraError::Application(e) => match e {
                    ApplicationError::TemplateUnavailable { .. } => crate::exitcode::NOINPUT,
                    ApplicationError::Config { .. } => crate::exitcode::CONFIG,
                    ApplicationError::Domain(_) | ApplicationError::Serialization { .. } => {
                        crate::exitcode::DATAERR
                    }
                    ApplicationError::OperationFailed { .. } => crate::exitcode::IOERR,
                    ApplicationError::Flow(_) => crate::exitcode::SOFTWARE,
                },
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::exitcode;

    #[test]
    fn given_rejected_import_then_data_error_exit() {
        assert_eq!(CliError::Rejected { count: 2 }.exit_code(), exitcode::DATAERR);
    }

    #[test]
    fn given_missing_template_then_no_input_exit() {
        let err: CliError = ApplicationError::TemplateUnavailable {
            path: "t.txt".into(),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "gone"),
        }
        .into();
        assert_eq!(err.exit_code(), exitcode::NOINPUT);
    }

    #[test]
    fn given_config_error_then_config_exit() {
        let err: CliError = ApplicationError::Config {
            message: "bad".into(),
        }
        .into();
        assert_eq!(err.exit_code(), exitcode::CONFIG);
    }
}
