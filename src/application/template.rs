//! Report template engine
//!
//! Generating a TOC from a template runs in four steps: take the boilerplate
//! text, derive the market name from the report title, substitute it for the
//! placeholder, and parse the result with the strict template grammar.

use std::sync::Arc;

use tracing::{debug, instrument};

use crate::application::flow::TemplateFlow;
use crate::application::parser::{OutlineParser, ParseOutcome};
use crate::domain::{IdGenerator, MarketNameExtractor, UuidIdGenerator};

/// Token standing in for the market name in template text.
pub const DEFAULT_PLACEHOLDER: &str = "XXX";

const DEFAULT_TEMPLATE: &str = include_str!("../../assets/default_template.txt");

/// The built-in boilerplate TOC, with `XXX` wherever the market name belongs.
pub fn default_template() -> &'static str {
    DEFAULT_TEMPLATE
}

/// Replaces every `XXX` in `template` with `market_name`.
pub fn replace_template_placeholders(template: &str, market_name: &str) -> String {
    replace_placeholder(template, DEFAULT_PLACEHOLDER, market_name)
}

/// Literal, case-sensitive, single-pass substitution.
///
/// Replacement text is never rescanned, so a value containing the placeholder
/// stays as given. An empty placeholder leaves the template unchanged.
pub fn replace_placeholder(template: &str, placeholder: &str, value: &str) -> String {
    if placeholder.is_empty() {
        return template.to_string();
    }
    template.replace(placeholder, value)
}

/// Parses template text with the strict grammar and UUID ids.
pub fn parse_template_to_toc(text: &str) -> ParseOutcome {
    OutlineParser::template(Arc::new(UuidIdGenerator)).parse(text)
}

/// Template steps bundled with their configuration.
pub struct TemplateEngine {
    placeholder: String,
    extractor: MarketNameExtractor,
    parser: OutlineParser,
}

impl TemplateEngine {
    pub fn new(
        placeholder: impl Into<String>,
        extractor: MarketNameExtractor,
        parser: OutlineParser,
    ) -> Self {
        Self {
            placeholder: placeholder.into(),
            extractor,
            parser,
        }
    }

    /// Default placeholder, qualifiers and template grammar, with the given ids.
    pub fn with_ids(ids: Arc<dyn IdGenerator>) -> Self {
        Self::new(
            DEFAULT_PLACEHOLDER,
            MarketNameExtractor::default(),
            OutlineParser::template(ids),
        )
    }

    pub fn placeholder(&self) -> &str {
        &self.placeholder
    }

    pub fn parser(&self) -> &OutlineParser {
        &self.parser
    }

    pub fn market_name(&self, document_title: &str) -> String {
        self.extractor.extract(document_title)
    }

    /// Fills `template` with the market name derived from `document_title`.
    #[instrument(level = "debug", skip(self, template))]
    pub fn render(&self, template: &str, document_title: &str) -> String {
        let market = self.market_name(document_title);
        debug!("market name: {:?}", market);
        replace_placeholder(template, &self.placeholder, &market)
    }

    pub fn parse(&self, text: &str) -> ParseOutcome {
        self.parser.parse(text)
    }

    /// Opens a generate-from-template session in the preview state.
    pub fn start(&self, template: &str, document_title: &str) -> TemplateFlow {
        TemplateFlow::preview(template, self.render(template, document_title))
    }
}

impl Default for TemplateEngine {
    fn default() -> Self {
        Self::with_ids(Arc::new(UuidIdGenerator))
    }
}
