//! Application-level errors (wraps domain errors)

use std::path::PathBuf;

use serde::Serialize;
use thiserror::Error;

use crate::application::flow::FlowError;
use crate::domain::DomainError;

/// Application errors wrap domain errors and add application-level context.
///
/// Malformed outline text is not an error at this level: it is reported as a
/// list of [`LineError`] values.
#[derive(Error, Debug)]
pub enum ApplicationError {
    #[error("{0}")]
    Domain(#[from] DomainError),

    #[error("template unavailable: {path}")]
    TemplateUnavailable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{0}")]
    Flow(#[from] FlowError),

    #[error("config error: {message}")]
    Config { message: String },

    #[error("invalid document {context}: {source}")]
    Serialization {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("operation failed: {context}")]
    OperationFailed {
        context: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
}

/// Result type for application layer operations.
pub type ApplicationResult<T> = Result<T, ApplicationError>;

/// A structural problem on one line of outline text (1-based line number).
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize)]
#[error("line {line}: {message}")]
pub struct LineError {
    pub line: usize,
    pub message: String,
}

impl LineError {
    pub fn new(line: usize, message: impl Into<String>) -> Self {
        Self {
            line,
            message: message.into(),
        }
    }
}
