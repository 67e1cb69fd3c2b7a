//! Outline document service
//!
//! Moves a [`TocDocument`] between its stored JSON form, editor text and
//! report templates, using the configured grammars and id strategy.

use std::path::Path;
use std::sync::Arc;

use tracing::{debug, info, instrument};

use crate::application::error_ext::IoResultExt;
use crate::application::flow::TemplateFlow;
use crate::application::parser::{OutlineParser, ParseOutcome};
use crate::application::serializer::serialize_with;
use crate::application::template::{default_template, TemplateEngine};
use crate::application::{ApplicationError, ApplicationResult};
use crate::config::Settings;
use crate::domain::{IdGenerator, TocDocument};
use crate::infrastructure::traits::FileSystem;

/// Service for loading, converting and generating outlines.
pub struct TocService {
    fs: Arc<dyn FileSystem>,
    settings: Arc<Settings>,
    ids: Arc<dyn IdGenerator>,
}

impl TocService {
    pub fn new(
        fs: Arc<dyn FileSystem>,
        settings: Arc<Settings>,
        ids: Arc<dyn IdGenerator>,
    ) -> Self {
        Self { fs, settings, ids }
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    // ============================================================
    // Interchange JSON
    // ============================================================

    /// Decodes interchange JSON and rejects documents with duplicate ids.
    pub fn document_from_json(&self, json: &str, source: &str) -> ApplicationResult<TocDocument> {
        let document: TocDocument =
            serde_json::from_str(json).map_err(|e| ApplicationError::Serialization {
                context: source.to_string(),
                source: e,
            })?;
        document.validate()?;
        debug!(
            "document_from_json: {} chapters, {} nodes",
            document.chapters.len(),
            document.node_count()
        );
        Ok(document)
    }

    pub fn to_json(&self, document: &TocDocument) -> ApplicationResult<String> {
        serde_json::to_string_pretty(document).map_err(|e| ApplicationError::Serialization {
            context: "encode".to_string(),
            source: e,
        })
    }

    #[instrument(level = "debug", skip(self))]
    pub fn load_document(&self, path: &Path) -> ApplicationResult<TocDocument> {
        let json = self
            .fs
            .read_to_string(path)
            .with_path_context("read document", path)?;
        self.document_from_json(&json, &path.display().to_string())
    }

    /// Writes `document` as pretty JSON, creating parent directories.
    #[instrument(level = "debug", skip(self, document))]
    pub fn save_document(&self, document: &TocDocument, path: &Path) -> ApplicationResult<()> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            if !self.fs.exists(parent) {
                self.fs
                    .create_dir_all(parent)
                    .with_path_context("create directory", parent)?;
            }
        }
        let json = self.to_json(document)?;
        self.fs
            .write(path, &format!("{json}\n"))
            .with_path_context("write document", path)?;
        info!("saved {} nodes to {}", document.node_count(), path.display());
        Ok(())
    }

    // ============================================================
    // Editor text
    // ============================================================

    /// Lenient parser with the configured text depth.
    pub fn text_parser(&self) -> OutlineParser {
        OutlineParser::new(self.settings.text_dialect(), Arc::clone(&self.ids))
    }

    /// Parses editor text; lines that do not fit are dropped.
    pub fn parse_text(&self, text: &str) -> TocDocument {
        self.text_parser().parse_document(text)
    }

    pub fn read_text(&self, path: &Path) -> ApplicationResult<String> {
        self.fs
            .read_to_string(path)
            .with_path_context("read text", path)
    }

    pub fn parse_text_file(&self, path: &Path) -> ApplicationResult<TocDocument> {
        let text = self.read_text(path)?;
        Ok(self.parse_text(&text))
    }

    /// Renders `document` as editor text, or in template style (`Chapter no. N`).
    pub fn render_text(&self, document: &TocDocument, template_style: bool) -> String {
        let dialect = if template_style {
            self.settings.template_dialect()
        } else {
            self.settings.text_dialect()
        };
        serialize_with(document, &dialect)
    }

    // ============================================================
    // Templates
    // ============================================================

    /// Strict parser with the configured template depth.
    pub fn template_parser(&self) -> OutlineParser {
        OutlineParser::new(self.settings.template_dialect(), Arc::clone(&self.ids))
    }

    pub fn template_engine(&self) -> ApplicationResult<TemplateEngine> {
        Ok(TemplateEngine::new(
            self.settings.template.placeholder.clone(),
            self.settings.market_extractor()?,
            self.template_parser(),
        ))
    }

    /// The configured template file, or the built-in template when none is set.
    pub fn load_template(&self) -> ApplicationResult<String> {
        match &self.settings.template.path {
            Some(path) => self.read_template(path),
            None => Ok(default_template().to_string()),
        }
    }

    fn read_template(&self, path: &Path) -> ApplicationResult<String> {
        debug!("read_template: {}", path.display());
        self.fs
            .read_to_string(path)
            .map_err(|e| ApplicationError::TemplateUnavailable {
                path: path.to_path_buf(),
                source: e,
            })
    }

    /// Opens a generate-from-template session for a report title.
    #[instrument(level = "debug", skip(self))]
    pub fn generate(&self, document_title: &str) -> ApplicationResult<TemplateFlow> {
        let template = self.load_template()?;
        let engine = self.template_engine()?;
        Ok(engine.start(&template, document_title))
    }

    /// Parses template text with the strict grammar.
    pub fn import_template_text(&self, text: &str) -> ParseOutcome {
        let outcome = self.template_parser().parse(text);
        if let Err(errors) = &outcome {
            debug!("import: {} line errors", errors.len());
        }
        outcome
    }

    /// Reads and parses a template file; the outer error is the read failure.
    pub fn import_template_file(&self, path: &Path) -> ApplicationResult<ParseOutcome> {
        let text = self.read_text(path)?;
        Ok(self.import_template_text(&text))
    }
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use super::*;
    use crate::domain::SequentialIdGenerator;
    use crate::infrastructure::traits::RealFileSystem;

    fn service(settings: Settings) -> TocService {
        TocService::new(
            Arc::new(RealFileSystem),
            Arc::new(settings),
            Arc::new(SequentialIdGenerator::new("t")),
        )
    }

    #[test]
    fn given_duplicate_ids_when_decoding_then_rejected() {
        let json = r#"{"chapters":[
            {"id":"a","title":"A","sections":[]},
            {"id":"a","title":"B","sections":[]}
        ]}"#;
        let err = service(Settings::default())
            .document_from_json(json, "inline")
            .unwrap_err();
        assert!(matches!(err, ApplicationError::Domain(_)));
    }

    #[test]
    fn given_malformed_json_when_decoding_then_serialization_error() {
        let err = service(Settings::default())
            .document_from_json("{", "inline")
            .unwrap_err();
        assert!(matches!(err, ApplicationError::Serialization { .. }));
    }

    #[test]
    fn given_template_style_when_rendering_then_uses_numbered_chapters() {
        let svc = service(Settings::default());
        let doc = svc.parse_text("Chapter 1. A\n  1.1 B");
        assert_eq!(svc.render_text(&doc, true), "Chapter no. 1 A\n  1.1 B");
        assert_eq!(svc.render_text(&doc, false), "Chapter 1. A\n  1.1 B");
    }

    #[test]
    fn given_no_template_path_when_loading_then_built_in_template() {
        let svc = service(Settings::default());
        assert_eq!(svc.load_template().unwrap(), default_template());
    }

    #[test]
    fn given_missing_template_path_when_loading_then_template_unavailable() {
        let mut settings = Settings::default();
        settings.template.path = Some(PathBuf::from("/nonexistent/tocsmith/template.txt"));
        let err = service(settings).load_template().unwrap_err();
        assert!(matches!(err, ApplicationError::TemplateUnavailable { .. }));
    }

    #[test]
    fn given_template_text_when_importing_then_outcome_carries_line_errors() {
        let svc = service(Settings::default());

        let errors = svc
            .import_template_text("Chapter no. 1 A\n  1.1. Scope")
            .unwrap_err();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].line, 2);

        let doc = svc.import_template_text("Chapter no. 1 A\n  1.1 Scope").unwrap();
        assert_eq!(doc.node_count(), 2);
    }

    #[test]
    fn given_missing_file_when_importing_then_outer_error() {
        let svc = service(Settings::default());
        let result = svc.import_template_file(Path::new("/nonexistent/tocsmith/import.txt"));
        assert!(result.is_err());
    }
}
