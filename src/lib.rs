//! tocsmith: table-of-contents outlines for market reports
//!
//! A document is a tree of chapters, sections and subsections (templates add
//! a fourth tier). It moves between three forms:
//! - the tree itself ([`TocDocument`], JSON via serde),
//! - indented editor text ([`serialize`] / [`parse_text`]),
//! - report templates with a market-name placeholder
//!   ([`default_template`], [`replace_template_placeholders`], [`parse_template_to_toc`]).

pub mod application;
pub mod cli;
pub mod config;
pub mod domain;
pub mod exitcode;
pub mod infrastructure;
pub mod tree_traits;
pub mod util;

pub use application::{
    default_template, parse_template_to_toc, parse_text, replace_template_placeholders,
    serialize, LineError, ParseOutcome,
};
pub use domain::{extract_market_name, TocDocument, TocNode};
