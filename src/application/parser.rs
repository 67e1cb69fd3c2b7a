//! Outline text parser
//!
//! One forward pass over the non-blank lines. Each line is classified by the
//! dialect's grammar and attached below the most recent heading one tier up.
//! A lenient dialect drops whatever does not fit; a strict one collects a
//! [`LineError`] per offending line and reports them all at the end.

use std::sync::Arc;

use tracing::{debug, instrument, trace};

use crate::application::error::LineError;
use crate::application::grammar::{Dialect, Grammar, Heading, Strictness};
use crate::domain::{IdGenerator, Level, TocDocument, TocNode, UuidIdGenerator};

/// Outcome of a parse: the document, or every line-level problem found.
pub type ParseOutcome = Result<TocDocument, Vec<LineError>>;

/// Parses outline text into a [`TocDocument`].
pub struct OutlineParser {
    grammar: Grammar,
    ids: Arc<dyn IdGenerator>,
}

impl OutlineParser {
    pub fn new(dialect: Dialect, ids: Arc<dyn IdGenerator>) -> Self {
        Self {
            grammar: Grammar::new(dialect),
            ids,
        }
    }

    pub fn text_editor(ids: Arc<dyn IdGenerator>) -> Self {
        Self::new(Dialect::text_editor(), ids)
    }

    pub fn template(ids: Arc<dyn IdGenerator>) -> Self {
        Self::new(Dialect::template(), ids)
    }

    pub fn dialect(&self) -> &Dialect {
        self.grammar.dialect()
    }

    /// Parses `text`; lenient dialects always succeed.
    pub fn parse(&self, text: &str) -> ParseOutcome {
        let (document, errors) = self.run(text);
        if errors.is_empty() {
            Ok(document)
        } else {
            Err(errors)
        }
    }

    /// Parses `text` and keeps whatever could be built, ignoring errors.
    pub fn parse_document(&self, text: &str) -> TocDocument {
        self.run(text).0
    }

    #[instrument(
        level = "debug",
        skip_all,
        fields(strictness = ?self.dialect().strictness, lines = text.lines().count())
    )]
    fn run(&self, text: &str) -> (TocDocument, Vec<LineError>) {
        let strict = self.dialect().strictness == Strictness::Strict;
        let mut builder = OutlineBuilder::default();
        let mut errors = Vec::new();
        // Depth of the last rejected heading; its descendants are skipped
        // without further errors.
        let mut orphaned: Option<usize> = None;

        for (index, raw) in text.lines().enumerate() {
            let line_no = index + 1;
            let line = raw.trim_end();
            if line.trim().is_empty() {
                continue;
            }
            let indent = line.len() - line.trim_start_matches(' ').len();
            let content = line.trim();

            let heading = match self.grammar.classify(content) {
                Some(heading) => heading,
                None => {
                    let diagnosis = self.grammar.diagnose(content);
                    if !strict {
                        trace!("line {}: dropped: {}", line_no, diagnosis.message);
                        continue;
                    }
                    match diagnosis.depth {
                        Some(depth) if is_orphaned(orphaned, depth) => {
                            debug!("line {}: skipped below rejected heading", line_no);
                        }
                        Some(depth) => {
                            builder.close_from(depth);
                            orphaned = Some(depth);
                            errors.push(LineError::new(line_no, diagnosis.message));
                        }
                        None => errors.push(LineError::new(line_no, diagnosis.message)),
                    }
                    continue;
                }
            };

            if strict && is_orphaned(orphaned, heading.depth) {
                debug!("line {}: skipped below rejected heading", line_no);
                continue;
            }
            orphaned = None;

            if let Err(message) = self.check_placement(&builder, &heading, indent) {
                if strict {
                    builder.close_from(heading.depth);
                    orphaned = Some(heading.depth);
                    errors.push(LineError::new(line_no, message));
                } else {
                    trace!("line {}: dropped: {}", line_no, message);
                }
                continue;
            }

            let node = TocNode::new(self.ids.next(), heading.title);
            trace!(
                "line {}: {} {} -> {}",
                line_no,
                heading.number,
                node.title,
                node.id
            );
            builder.push(heading.depth, node);
        }

        let document = builder.finish();
        if strict && errors.is_empty() && document.is_empty() {
            errors.push(LineError::new(1, "no chapters found"));
        }
        debug!(
            "parsed {} chapters, {} nodes, {} errors",
            document.chapters.len(),
            document.node_count(),
            errors.len()
        );
        (document, errors)
    }

    fn check_placement(
        &self,
        builder: &OutlineBuilder,
        heading: &Heading,
        indent: usize,
    ) -> Result<(), String> {
        if !self.dialect().accepts_indent(heading.depth, indent) {
            return Err(format!(
                "{} '{}' cannot be indented by {} spaces",
                heading.label(),
                heading.number,
                indent
            ));
        }
        if !builder.has_parent(heading.depth) {
            let parent = heading
                .depth
                .checked_sub(1)
                .and_then(Level::from_depth)
                .map(|level| level.to_string())
                .unwrap_or_else(|| "heading".to_string());
            return Err(format!(
                "{} '{}' has no enclosing {}",
                heading.label(),
                heading.number,
                parent
            ));
        }
        Ok(())
    }
}

fn is_orphaned(orphaned: Option<usize>, depth: usize) -> bool {
    orphaned.is_some_and(|rejected| depth > rejected)
}

/// Appends nodes below the currently open path.
#[derive(Debug, Default)]
struct OutlineBuilder {
    chapters: Vec<TocNode>,
    /// Sibling indices of the most recent node at each depth.
    open: Vec<usize>,
}

impl OutlineBuilder {
    fn has_parent(&self, depth: usize) -> bool {
        self.open.len() >= depth
    }

    fn close_from(&mut self, depth: usize) {
        self.open.truncate(depth);
    }

    /// Requires `has_parent(depth)`.
    fn push(&mut self, depth: usize, node: TocNode) {
        self.open.truncate(depth);
        let mut siblings = &mut self.chapters;
        for &i in &self.open {
            siblings = &mut siblings[i].children;
        }
        siblings.push(node);
        let index = siblings.len() - 1;
        self.open.push(index);
    }

    fn finish(self) -> TocDocument {
        TocDocument::from_chapters(self.chapters)
    }
}

/// Parses editor text with the lenient three-tier grammar and UUID ids.
///
/// Never fails: lines that do not fit are dropped.
pub fn parse_text(text: &str) -> TocDocument {
    OutlineParser::text_editor(Arc::new(UuidIdGenerator)).parse_document(text)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::SequentialIdGenerator;

    fn lenient() -> OutlineParser {
        OutlineParser::text_editor(Arc::new(SequentialIdGenerator::new("n")))
    }

    fn strict() -> OutlineParser {
        OutlineParser::template(Arc::new(SequentialIdGenerator::new("n")))
    }

    fn titles(doc: &TocDocument) -> Vec<(String, String)> {
        doc.iter()
            .map(|(path, node)| (path.number(), node.title.clone()))
            .collect()
    }

    #[test]
    fn given_outline_text_when_parsing_then_builds_three_tiers() {
        let text = "Chapter 1. Intro\n  1.1 Scope\n    1.1.1 Limits\n  1.2 Method\n\
                    Chapter 2. Outlook";
        let doc = lenient().parse(text).unwrap();
        assert_eq!(
            titles(&doc),
            vec![
                ("1".into(), "Intro".into()),
                ("1.1".into(), "Scope".into()),
                ("1.1.1".into(), "Limits".into()),
                ("1.2".into(), "Method".into()),
                ("2".into(), "Outlook".into()),
            ]
        );
    }

    #[test]
    fn given_sequential_ids_when_parsing_then_ids_follow_line_order() {
        let doc = lenient().parse("1. A\n  1.1 B").unwrap();
        assert_eq!(doc.chapters[0].id, "n-1");
        assert_eq!(doc.chapters[0].children[0].id, "n-2");
    }

    #[test]
    fn given_dropped_section_when_subsection_follows_then_attaches_to_previous_section() {
        let text = "1. A\n  1.1 B\n      1.2 misplaced\n    1.1.1 C";
        let doc = lenient().parse(text).unwrap();
        assert_eq!(doc.chapters[0].children.len(), 1);
        assert_eq!(doc.chapters[0].children[0].children[0].title, "C");
    }

    #[test]
    fn given_new_chapter_when_subsection_follows_then_subsection_dropped() {
        let text = "1. A\n  1.1 B\n2. C\n    2.1.1 orphan";
        let doc = lenient().parse(text).unwrap();
        assert_eq!(doc.chapters.len(), 2);
        assert!(doc.chapters[1].children.is_empty());
    }

    #[test]
    fn given_strict_dialect_when_section_precedes_chapter_then_reports_line() {
        let errors = strict()
            .parse("\n  1.1 Early\nChapter no. 1 Late")
            .unwrap_err();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].line, 2);
        assert!(errors[0].message.contains("no enclosing chapter"));
    }

    #[test]
    fn given_strict_dialect_when_many_problems_then_collects_all() {
        let text = "Chapter no. 1 A\nnonsense\n  1.1 B\n1.1.1.1.1 deep\n???";
        let errors = strict().parse(text).unwrap_err();
        let lines: Vec<usize> = errors.iter().map(|e| e.line).collect();
        assert_eq!(lines, vec![2, 4, 5]);
    }

    #[test]
    fn given_strict_dialect_when_text_blank_then_reports_no_chapters() {
        let errors = strict().parse("   \n\n").unwrap_err();
        assert_eq!(errors, vec![LineError::new(1, "no chapters found")]);
    }

    #[test]
    fn given_strict_dialect_when_errors_then_partial_document_still_available() {
        let doc = strict().parse_document("Chapter no. 1 A\nbad line\n  1.1 B");
        assert_eq!(doc.node_count(), 2);
    }

    #[test]
    fn given_malformed_section_number_when_parsing_strict_then_later_errors_still_reported() {
        let text = [
            "Chapter no. 1 A",
            "  1.1. Scope",
            "  1.2 Method",
            "  1.3 Data",
            "    1.3.1.1.1.1 Too deep",
            "Chapter no. 2 B",
        ]
        .join("\n");
        let errors = strict().parse(&text).unwrap_err();
        let lines: Vec<usize> = errors.iter().map(|e| e.line).collect();
        assert_eq!(lines, vec![2, 5]);
        assert!(!errors[0].message.contains("Chapter no."));

        let doc = strict().parse_document(&text);
        assert_eq!(doc.chapters.len(), 2);
        assert_eq!(doc.chapters[0].children.len(), 2);
    }
}
