//! Outline serializer: document to indented text
//!
//! One line per node in document order. Numbers are recomputed from tree
//! positions; a number that happens to appear inside a title is just text.

use itertools::Itertools;

use crate::application::grammar::{Dialect, INDENT_WIDTH};
use crate::domain::{NodePath, TocDocument};

/// Renders `doc` in the editor text form (`Chapter 1. Title`, two-space indents).
///
/// An empty document renders to the empty string.
pub fn serialize(doc: &TocDocument) -> String {
    serialize_with(doc, &Dialect::text_editor())
}

/// Renders `doc` with the chapter style of `dialect`.
pub fn serialize_with(doc: &TocDocument, dialect: &Dialect) -> String {
    doc.iter()
        .map(|(path, node)| render_line(dialect, &path, &node.title))
        .join("\n")
}

fn render_line(dialect: &Dialect, path: &NodePath, title: &str) -> String {
    let depth = path.depth();
    if depth == 0 {
        dialect.chapter_style.render(&path.number(), title)
    } else {
        format!(
            "{:indent$}{} {}",
            "",
            path.number(),
            title,
            indent = depth * INDENT_WIDTH
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::TocNode;

    fn doc() -> TocDocument {
        TocDocument::from_chapters(vec![
            TocNode::new("a", "Intro").with_children(vec![
                TocNode::new("b", "Scope").with_children(vec![TocNode::new("c", "Limits")]),
            ]),
            TocNode::new("d", "Outlook"),
        ])
    }

    #[test]
    fn given_document_when_serializing_then_indents_by_tier() {
        assert_eq!(
            serialize(&doc()),
            "Chapter 1. Intro\n  1.1 Scope\n    1.1.1 Limits\nChapter 2. Outlook"
        );
    }

    #[test]
    fn given_template_dialect_when_serializing_then_uses_numbered_chapters() {
        assert_eq!(
            serialize_with(&doc(), &Dialect::template()),
            "Chapter no. 1 Intro\n  1.1 Scope\n    1.1.1 Limits\nChapter no. 2 Outlook"
        );
    }

    #[test]
    fn given_empty_document_when_serializing_then_empty_string() {
        assert_eq!(serialize(&TocDocument::new()), "");
    }

    #[test]
    fn given_fourth_tier_when_serializing_then_indents_six_spaces() {
        let deep = TocDocument::from_chapters(vec![TocNode::new("a", "A").with_children(vec![
            TocNode::new("b", "B").with_children(vec![
                TocNode::new("c", "C").with_children(vec![TocNode::new("d", "D")]),
            ]),
        ])]);
        assert!(serialize(&deep).ends_with("\n      1.1.1.1 D"));
    }
}
