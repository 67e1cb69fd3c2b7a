//! Application layer: grammar, parsing, serialization and the template engine
//!
//! This layer turns outline text into documents and back. Only the services
//! module touches I/O, through the boundary traits.

pub mod error;
pub mod error_ext;
pub mod flow;
pub mod grammar;
pub mod parser;
pub mod serializer;
pub mod services;
pub mod template;

pub use error::{ApplicationError, ApplicationResult, LineError};
pub use error_ext::IoResultExt;
pub use flow::{FlowError, FlowState, TemplateFlow};
pub use grammar::{ChapterStyle, Dialect, Grammar, Heading, Indentation, Strictness};
pub use parser::{parse_text, OutlineParser, ParseOutcome};
pub use serializer::{serialize, serialize_with};
pub use services::TocService;
pub use template::{
    default_template, parse_template_to_toc, replace_template_placeholders, TemplateEngine,
    DEFAULT_PLACEHOLDER,
};
