//! Line grammar shared by the text editor and template dialects
//!
//! A line is either a chapter heading or a numbered heading whose number has
//! one dot-separated segment per tier (`2.1` is a section, `2.1.3` a
//! subsection). Dialects differ in how chapter lines look, how deep the
//! outline may go, whether indentation matters and what happens to lines that
//! do not fit.

use std::sync::LazyLock;

use regex::Regex;

use crate::domain::Level;

/// Spaces per nesting tier.
pub const INDENT_WIDTH: usize = 2;
pub const TEXT_MAX_DEPTH: usize = 3;
pub const TEMPLATE_MAX_DEPTH: usize = 4;
/// Deepest outline any dialect may be configured for.
pub const MAX_DEPTH_LIMIT: usize = 16;

static PLAIN_CHAPTER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^(?:Chapter\s+)?(\d+)\.\s*(.+)$").expect("chapter pattern is valid")
});
static NUMBERED_CHAPTER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^Chapter\s+no\.\s*(\d+)\.?\s+(.+)$").expect("chapter pattern is valid")
});
/// Dotted number, whitespace, title; the segment count gives the tier.
static NUMBERED_HEADING: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(\d+(?:\.\d+)+)\s+(.+)$").expect("heading pattern is valid")
});
/// Leading dotted number of a line that failed `NUMBERED_HEADING`.
static DOTTED_PREFIX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d+(?:\.\d+)+").expect("number pattern is valid"));

/// Failure policy for lines that do not fit the grammar.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Strictness {
    /// Drop the line and keep going.
    Lenient,
    /// Record a line-numbered error and keep going.
    Strict,
}

/// Shape of chapter lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChapterStyle {
    /// `Chapter 1. Title`; the `Chapter` word is optional when parsing.
    Plain,
    /// `Chapter no. 1 Title`; the prefix is mandatory.
    Numbered,
}

impl ChapterStyle {
    fn pattern(self) -> &'static Regex {
        match self {
            ChapterStyle::Plain => &PLAIN_CHAPTER,
            ChapterStyle::Numbered => &NUMBERED_CHAPTER,
        }
    }

    pub fn render(self, number: &str, title: &str) -> String {
        match self {
            ChapterStyle::Plain => format!("Chapter {}. {}", number, title),
            ChapterStyle::Numbered => format!("Chapter no. {} {}", number, title),
        }
    }

    fn example(self) -> &'static str {
        match self {
            ChapterStyle::Plain => "Chapter <n>. <title>",
            ChapterStyle::Numbered => "Chapter no. <n> <title>",
        }
    }
}

/// Whether leading spaces decide which tier a heading may occupy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Indentation {
    Enforced,
    Ignored,
}

/// A complete grammar configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Dialect {
    pub chapter_style: ChapterStyle,
    /// Number of tiers recognized (3 = chapter, section, subsection).
    pub max_depth: usize,
    pub indentation: Indentation,
    pub strictness: Strictness,
}

impl Dialect {
    /// Best-effort grammar for text typed into the outline editor.
    pub fn text_editor() -> Self {
        Self {
            chapter_style: ChapterStyle::Plain,
            max_depth: TEXT_MAX_DEPTH,
            indentation: Indentation::Enforced,
            strictness: Strictness::Lenient,
        }
    }

    /// Strict grammar for imported report templates.
    pub fn template() -> Self {
        Self {
            chapter_style: ChapterStyle::Numbered,
            max_depth: TEMPLATE_MAX_DEPTH,
            indentation: Indentation::Ignored,
            strictness: Strictness::Strict,
        }
    }

    /// Clamped to `1..=MAX_DEPTH_LIMIT`.
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth.clamp(1, MAX_DEPTH_LIMIT);
        self
    }

    pub fn with_strictness(mut self, strictness: Strictness) -> Self {
        self.strictness = strictness;
        self
    }

    /// Whether a line indented by `indent` spaces may hold a heading at `depth`.
    ///
    /// Chapters sit at column 0, an inner tier `d` needs `2d <= indent < 2d + 2`
    /// and the deepest tier accepts anything from `2d` on.
    pub fn accepts_indent(&self, depth: usize, indent: usize) -> bool {
        if self.indentation == Indentation::Ignored {
            return true;
        }
        let min = depth * INDENT_WIDTH;
        if depth == 0 {
            indent == 0
        } else if depth + 1 >= self.max_depth {
            indent >= min
        } else {
            indent >= min && indent < min + INDENT_WIDTH
        }
    }
}

/// A classified heading line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Heading {
    /// 0-based tier (chapters are 0).
    pub depth: usize,
    /// Number as written; incidental, the tree position decides numbering.
    pub number: String,
    pub title: String,
}

impl Heading {
    pub fn label(&self) -> String {
        label_for(self.depth)
    }
}

fn label_for(depth: usize) -> String {
    match Level::from_depth(depth) {
        Some(level) => level.to_string(),
        None => format!("level-{} heading", depth + 1),
    }
}

/// Tier of a dotted number: `2.1` is 1, `2.1.3` is 2.
fn number_depth(number: &str) -> usize {
    number.split('.').count() - 1
}

/// Why a line did not classify, and at which tier it was aiming if that is known.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnosis {
    pub depth: Option<usize>,
    pub message: String,
}

/// Line classification for one dialect.
#[derive(Debug, Clone, Copy)]
pub struct Grammar {
    dialect: Dialect,
}

impl Grammar {
    pub fn new(dialect: Dialect) -> Self {
        Self { dialect }
    }

    pub fn dialect(&self) -> &Dialect {
        &self.dialect
    }

    /// Classifies trimmed line content.
    ///
    /// A line starting with a dotted number is a numbered heading or nothing;
    /// it is never read as a chapter. Headings deeper than the dialect allows
    /// do not classify.
    pub fn classify(&self, content: &str) -> Option<Heading> {
        if let Some(caps) = NUMBERED_HEADING.captures(content) {
            let depth = number_depth(&caps[1]);
            return (depth < self.dialect.max_depth).then(|| Heading {
                depth,
                number: caps[1].to_string(),
                title: caps[2].to_string(),
            });
        }
        if DOTTED_PREFIX.is_match(content) {
            return None;
        }
        self.dialect
            .chapter_style
            .pattern()
            .captures(content)
            .map(|caps| Heading {
                depth: 0,
                number: caps[1].to_string(),
                title: caps[2].to_string(),
            })
    }

    /// Explains why `content` did not classify.
    pub fn diagnose(&self, content: &str) -> Diagnosis {
        if let Some(caps) = NUMBERED_HEADING.captures(content) {
            let number = &caps[1];
            let depth = number_depth(number);
            return Diagnosis {
                depth: Some(depth),
                message: format!(
                    "heading '{}' is nested {} levels deep; at most {} levels are supported",
                    number,
                    depth + 1,
                    self.dialect.max_depth
                ),
            };
        }

        if let Some(found) = DOTTED_PREFIX.find(content) {
            let depth = number_depth(found.as_str());
            return Diagnosis {
                depth: Some(depth),
                message: format!(
                    "malformed {} '{}': expected '<number> <title>' such as '1.1 <title>'",
                    label_for(depth),
                    shorten(content, 40)
                ),
            };
        }

        if self.dialect.chapter_style == ChapterStyle::Numbered && PLAIN_CHAPTER.is_match(content)
        {
            return Diagnosis {
                depth: Some(0),
                message: format!(
                    "chapter line must start with 'Chapter no.' (expected '{}')",
                    ChapterStyle::Numbered.example()
                ),
            };
        }

        Diagnosis {
            depth: None,
            message: format!(
                "unrecognized line '{}': expected '{}' or a numbered heading such as '1.1 <title>'",
                shorten(content, 40),
                self.dialect.chapter_style.example()
            ),
        }
    }
}

fn shorten(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        text.to_string()
    } else {
        let head: String = text.chars().take(max_chars).collect();
        format!("{}...", head)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("Chapter 1. Introduction", 0, "Introduction")]
    #[case("chapter 12.Scope", 0, "Scope")]
    #[case("3. Outlook", 0, "Outlook")]
    #[case("1.2 Market Size", 1, "Market Size")]
    #[case("1.2.3 Drivers", 2, "Drivers")]
    #[case("1.1 3.5 Inch Drives", 1, "3.5 Inch Drives")]
    fn given_text_dialect_when_classifying_then_detects_tier(
        #[case] content: &str,
        #[case] depth: usize,
        #[case] title: &str,
    ) {
        let grammar = Grammar::new(Dialect::text_editor());
        let heading = grammar.classify(content).expect("classifies");
        assert_eq!(heading.depth, depth);
        assert_eq!(heading.title, title);
    }

    #[rstest]
    #[case("Chapter no. 1 XXX Overview", 0, "XXX Overview")]
    #[case("CHAPTER NO. 2. Scope", 0, "Scope")]
    #[case("Chapter no.3 Outlook", 0, "Outlook")]
    #[case("3.3.1.2 Bargaining Power of Buyers", 3, "Bargaining Power of Buyers")]
    fn given_template_dialect_when_classifying_then_detects_tier(
        #[case] content: &str,
        #[case] depth: usize,
        #[case] title: &str,
    ) {
        let grammar = Grammar::new(Dialect::template());
        let heading = grammar.classify(content).expect("classifies");
        assert_eq!(heading.depth, depth);
        assert_eq!(heading.title, title);
    }

    #[test]
    fn given_template_dialect_when_chapter_lacks_prefix_then_not_classified() {
        let grammar = Grammar::new(Dialect::template());
        assert_eq!(grammar.classify("1. Introduction"), None);
        let diagnosis = grammar.diagnose("1. Introduction");
        assert_eq!(diagnosis.depth, Some(0));
        assert!(diagnosis.message.contains("Chapter no."));
    }

    #[test]
    fn given_heading_too_deep_when_diagnosing_then_reports_depth() {
        let grammar = Grammar::new(Dialect::template());
        assert_eq!(grammar.classify("1.1.1.1.1 Too deep"), None);
        let diagnosis = grammar.diagnose("1.1.1.1.1 Too deep");
        assert_eq!(diagnosis.depth, Some(4));
        assert!(diagnosis.message.contains("at most 4 levels"));
    }

    #[rstest]
    #[case::trailing_dot("1.1. Scope", 1)]
    #[case::missing_title("1.1", 1)]
    #[case::subsection_trailing_dot("2.3.1. Drivers", 2)]
    fn given_malformed_numbered_heading_when_diagnosing_then_keeps_its_tier(
        #[case] content: &str,
        #[case] depth: usize,
    ) {
        let grammar = Grammar::new(Dialect::template());
        assert_eq!(grammar.classify(content), None);
        let diagnosis = grammar.diagnose(content);
        assert_eq!(diagnosis.depth, Some(depth));
        assert!(diagnosis.message.starts_with("malformed"));
        assert!(!diagnosis.message.contains("Chapter no."));
    }

    #[test]
    fn given_dotted_number_in_text_dialect_then_never_a_chapter() {
        let grammar = Grammar::new(Dialect::text_editor());
        assert_eq!(grammar.classify("1.1. Scope"), None);
        assert_eq!(grammar.classify("1.1.1.1 Too deep"), None);
    }

    #[test]
    fn given_huge_max_depth_when_building_dialect_then_clamped() {
        let dialect = Dialect::template().with_max_depth(5000);
        assert_eq!(dialect.max_depth, MAX_DEPTH_LIMIT);
        let grammar = Grammar::new(dialect);
        let deep = format!("{} Deep", vec!["1"; MAX_DEPTH_LIMIT].join("."));
        assert_eq!(grammar.classify(&deep).map(|h| h.depth), Some(MAX_DEPTH_LIMIT - 1));
    }

    #[test]
    fn given_prose_when_diagnosing_then_unrecognized_without_depth() {
        let grammar = Grammar::new(Dialect::template());
        let diagnosis = grammar.diagnose("just some words");
        assert_eq!(diagnosis.depth, None);
        assert!(diagnosis.message.starts_with("unrecognized line"));
    }

    #[rstest]
    #[case(0, 0, true)]
    #[case(0, 1, false)]
    #[case(1, 2, true)]
    #[case(1, 3, true)]
    #[case(1, 4, false)]
    #[case(1, 1, false)]
    #[case(2, 4, true)]
    #[case(2, 9, true)]
    #[case(2, 3, false)]
    fn given_text_dialect_when_checking_indent_then_applies_thresholds(
        #[case] depth: usize,
        #[case] indent: usize,
        #[case] accepted: bool,
    ) {
        assert_eq!(Dialect::text_editor().accepts_indent(depth, indent), accepted);
    }

    #[test]
    fn given_template_dialect_then_indentation_is_ignored() {
        assert!(Dialect::template().accepts_indent(0, 6));
        assert!(Dialect::template().accepts_indent(3, 0));
    }
}
