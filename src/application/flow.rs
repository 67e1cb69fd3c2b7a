//! Generate-from-template session state
//!
//! ```text
//! Preview --edit--> Edit --submit--> Success --confirm--> document
//!                    ^                  |
//!                    |                  +--edit--> Edit
//!                    +------edit------ Error
//! ```
//!
//! There is no way from `Preview` straight to a result: text is always
//! submitted from `Edit`. Going back to `Edit` keeps the current text.

use std::fmt;

use thiserror::Error;
use tracing::debug;

use crate::application::error::LineError;
use crate::application::parser::OutlineParser;
use crate::domain::TocDocument;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FlowError {
    #[error("cannot {action} in {state} state")]
    IllegalTransition {
        state: &'static str,
        action: &'static str,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FlowState {
    /// Template and substituted text shown, nothing parsed yet.
    Preview { template: String, text: String },
    /// Text open for changes.
    Edit { text: String },
    /// Parsed; waiting for confirmation before replacing the live document.
    Success { text: String, document: TocDocument },
    /// Parse failed; every offending line is listed.
    Error { text: String, errors: Vec<LineError> },
}

impl FlowState {
    pub fn name(&self) -> &'static str {
        match self {
            FlowState::Preview { .. } => "preview",
            FlowState::Edit { .. } => "edit",
            FlowState::Success { .. } => "success",
            FlowState::Error { .. } => "error",
        }
    }

    pub fn text(&self) -> &str {
        match self {
            FlowState::Preview { text, .. }
            | FlowState::Edit { text }
            | FlowState::Success { text, .. }
            | FlowState::Error { text, .. } => text,
        }
    }

    fn into_text(self) -> String {
        match self {
            FlowState::Preview { text, .. }
            | FlowState::Edit { text }
            | FlowState::Success { text, .. }
            | FlowState::Error { text, .. } => text,
        }
    }
}

impl fmt::Display for FlowState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemplateFlow {
    state: FlowState,
}

impl TemplateFlow {
    pub fn preview(template: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            state: FlowState::Preview {
                template: template.into(),
                text: text.into(),
            },
        }
    }

    pub fn state(&self) -> &FlowState {
        &self.state
    }

    pub fn text(&self) -> &str {
        self.state.text()
    }

    /// Enters `Edit` from `Preview`, `Error` or an unconfirmed `Success`.
    pub fn edit(&mut self) -> Result<(), FlowError> {
        if matches!(self.state, FlowState::Edit { .. }) {
            return Err(self.illegal("edit"));
        }
        let text = std::mem::replace(&mut self.state, FlowState::Edit { text: String::new() })
            .into_text();
        debug!("flow: -> edit");
        self.state = FlowState::Edit { text };
        Ok(())
    }

    /// Replaces the text being edited.
    pub fn set_text(&mut self, new_text: impl Into<String>) -> Result<(), FlowError> {
        match &mut self.state {
            FlowState::Edit { text } => {
                *text = new_text.into();
                Ok(())
            }
            _ => Err(self.illegal("change text")),
        }
    }

    /// Parses the edited text, moving to `Success` or `Error`.
    pub fn submit(&mut self, parser: &OutlineParser) -> Result<&FlowState, FlowError> {
        let text = match &self.state {
            FlowState::Edit { text } => text.clone(),
            _ => return Err(self.illegal("submit")),
        };
        self.state = match parser.parse(&text) {
            Ok(document) => FlowState::Success { text, document },
            Err(errors) => FlowState::Error { text, errors },
        };
        debug!("flow: -> {}", self.state);
        Ok(&self.state)
    }

    /// Accepts a successful parse and hands out the document.
    pub fn confirm(self) -> Result<TocDocument, FlowError> {
        let state = self.state.name();
        match self.state {
            FlowState::Success { document, .. } => Ok(document),
            _ => Err(FlowError::IllegalTransition {
                state,
                action: "confirm",
            }),
        }
    }

    fn illegal(&self, action: &'static str) -> FlowError {
        FlowError::IllegalTransition {
            state: self.state.name(),
            action,
        }
    }
}
