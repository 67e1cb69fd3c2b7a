//! Editor text: serializer and lenient parser working together.

use std::sync::Arc;

use rstest::rstest;

use tocsmith::application::OutlineParser;
use tocsmith::domain::{SequentialIdGenerator, TocDocument, TocNode};
use tocsmith::util::testing::init_test_setup;
use tocsmith::{parse_text, serialize};

/// Titles and child counts in document order; ids are ignored.
fn shape(doc: &TocDocument) -> Vec<(String, String, usize)> {
    doc.iter()
        .map(|(path, node)| (path.number(), node.title.clone(), node.children.len()))
        .collect()
}

fn report() -> TocDocument {
    TocDocument::from_chapters(vec![
        TocNode::new("c1", "Methodology").with_children(vec![
            TocNode::new("s1", "Scope"),
            TocNode::new("s2", "Sources").with_children(vec![
                TocNode::new("u1", "Primary"),
                TocNode::new("u2", "Secondary"),
            ]),
        ]),
        TocNode::new("c2", "Executive Summary"),
        TocNode::new("c3", "Outlook 2030").with_children(vec![TocNode::new("s3", "1.5 Trends")]),
    ])
}

fn wide_report() -> TocDocument {
    let chapters = (1..=4)
        .map(|c| {
            let sections = (1..=3)
                .map(|s| {
                    let subsections = (1..=s)
                        .map(|u| TocNode::new(format!("u{c}{s}{u}"), format!("Detail {u}")))
                        .collect();
                    TocNode::new(format!("s{c}{s}"), format!("Section {s}"))
                        .with_children(subsections)
                })
                .collect();
            TocNode::new(format!("c{c}"), format!("Chapter Title {c}")).with_children(sections)
        })
        .collect();
    TocDocument::from_chapters(chapters)
}

#[rstest]
#[case::three_tiers(report())]
#[case::chapters_only(TocDocument::from_chapters(vec![
    TocNode::new("a", "One"),
    TocNode::new("b", "Two"),
]))]
#[case::empty(TocDocument::new())]
#[case::empty_sections(TocDocument::from_chapters(vec![
    TocNode::new("a", "Overview").with_children(vec![
        TocNode::new("a1", "Background"),
        TocNode::new("a2", "Definitions"),
    ]),
    TocNode::new("b", "Appendix"),
    TocNode::new("c", "Glossary"),
]))]
#[case::many_chapters_many_sections(wide_report())]
#[case::digit_titles_every_tier(TocDocument::from_chapters(vec![
    TocNode::new("a", "2030 Outlook").with_children(vec![
        TocNode::new("a1", "5G Rollout").with_children(vec![
            TocNode::new("a11", "3.5 Inch Drives"),
            TocNode::new("a12", "2.4.6 Sizing"),
        ]),
        TocNode::new("a2", "10. Years Ahead"),
    ]),
    TocNode::new("b", "3.5 Inch Market"),
]))]
fn given_document_when_serialized_and_parsed_then_shape_survives(#[case] doc: TocDocument) {
    init_test_setup();

    let reparsed = parse_text(&serialize(&doc));

    assert_eq!(shape(&reparsed), shape(&doc));
}

#[test]
fn given_document_when_serializing_twice_then_identical_text() {
    let doc = report();
    assert_eq!(serialize(&doc), serialize(&doc));
}

#[test]
fn given_report_when_serializing_then_numbers_come_from_positions() {
    let text = serialize(&report());
    let lines: Vec<&str> = text.lines().collect();

    assert_eq!(lines[0], "Chapter 1. Methodology");
    assert_eq!(lines[3], "    1.2.1 Primary");
    assert_eq!(lines[6], "Chapter 3. Outlook 2030");
    assert_eq!(lines[7], "  3.1 1.5 Trends");
}

#[rstest]
#[case::empty("")]
#[case::blank_lines("   \n\n")]
fn given_blank_text_when_parsing_then_no_chapters(#[case] text: &str) {
    assert!(parse_text(text).is_empty());
}

#[test]
fn given_two_space_section_then_attached_and_four_space_section_dropped() {
    let doc = parse_text("Chapter 1. A\n  1.1 Kept\n    1.2 Dropped");

    let sections: Vec<&str> = doc.chapters[0]
        .children
        .iter()
        .map(|s| s.title.as_str())
        .collect();
    assert_eq!(sections, vec!["Kept"]);
    assert!(doc.chapters[0].children[0].children.is_empty());
}

#[test]
fn given_three_space_subsection_when_parsing_then_dropped() {
    let doc = parse_text("1. A\n  1.1 B\n   1.1.1 C");
    assert!(doc.chapters[0].children[0].children.is_empty());
}

#[rstest]
#[case::word_optional("1. Intro", "Intro")]
#[case::lowercase_word("chapter 2. Intro", "Intro")]
#[case::no_space_after_dot("3.Intro", "Intro")]
fn given_chapter_variants_when_parsing_then_recognized(#[case] line: &str, #[case] title: &str) {
    let doc = parse_text(line);
    assert_eq!(doc.chapters.len(), 1);
    assert_eq!(doc.chapters[0].title, title);
}

#[test]
fn given_noise_lines_when_parsing_then_silently_dropped() {
    let doc = parse_text("Table of contents\n1. A\n- bullet\n  1.1 B\n\tTab indented");
    assert_eq!(doc.node_count(), 2);
}

#[test]
fn given_same_text_when_parsed_twice_then_same_shape_fresh_ids() {
    let ids = Arc::new(SequentialIdGenerator::new("n"));
    let parser = OutlineParser::text_editor(ids.clone());
    let text = "1. A\n  1.1 B";

    let first = parser.parse_document(text);
    let second = parser.parse_document(text);

    assert_eq!(shape(&first), shape(&second));
    assert_ne!(first.chapters[0].id, second.chapters[0].id);
    assert_eq!(ids.issued(), 4);
}

#[test]
fn given_uuid_ids_when_parsing_then_document_validates() {
    let doc = parse_text(&serialize(&report()));
    assert!(doc.validate().is_ok());
}
