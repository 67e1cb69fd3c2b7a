//! Market name extraction from report titles

use std::sync::LazyLock;

use regex::Regex;

use crate::domain::error::{DomainError, DomainResult};

/// Qualifier words stripped by default.
pub const DEFAULT_QUALIFIERS: &[&str] = &["Market"];

static DEFAULT_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\bMarket\b").expect("default qualifier pattern is valid"));

/// Derives a short subject label from a document title.
///
/// The first whole-word, case-insensitive occurrence of a qualifier and
/// everything after it are removed; the rest is trimmed.
#[derive(Debug, Clone)]
pub struct MarketNameExtractor {
    pattern: Option<Regex>,
}

impl Default for MarketNameExtractor {
    fn default() -> Self {
        Self {
            pattern: Some(DEFAULT_PATTERN.clone()),
        }
    }
}

impl MarketNameExtractor {
    /// Builds an extractor for the given qualifier words.
    ///
    /// Blank qualifiers are ignored; with none left, titles pass through unchanged.
    pub fn new<I, S>(qualifiers: I) -> DomainResult<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let alternatives: Vec<String> = qualifiers
            .into_iter()
            .map(|q| q.as_ref().trim().to_string())
            .filter(|q| !q.is_empty())
            .map(|q| regex::escape(&q))
            .collect();
        if alternatives.is_empty() {
            return Ok(Self { pattern: None });
        }

        let source = format!(r"(?i)\b(?:{})\b", alternatives.join("|"));
        let pattern =
            Regex::new(&source).map_err(|e| DomainError::InvalidQualifier(e.to_string()))?;
        Ok(Self {
            pattern: Some(pattern),
        })
    }

    pub fn extract(&self, title: &str) -> String {
        let Some(found) = self.pattern.as_ref().and_then(|p| p.find(title)) else {
            return title.to_string();
        };

        let name = title[..found.start()]
            .trim_end_matches(|c: char| c.is_whitespace() || matches!(c, '-' | ':' | ',' | '|'))
            .trim();
        if name.is_empty() {
            // Qualifier leads the title: nothing sensible to strip
            title.trim().to_string()
        } else {
            name.to_string()
        }
    }
}

/// Extracts the market name using the default qualifiers.
pub fn extract_market_name(title: &str) -> String {
    MarketNameExtractor::default().extract(title)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("Electric Vehicle Market", "Electric Vehicle")]
    #[case("3D Printing in Healthcare Market", "3D Printing in Healthcare")]
    #[case("Global Drone Market Size, Share & Trends Report 2030", "Global Drone")]
    #[case("  Solar Panels market  ", "Solar Panels")]
    #[case("Smart Home - Market Outlook", "Smart Home")]
    #[case("Wearables", "Wearables")]
    #[case("Supermarket Chains", "Supermarket Chains")]
    #[case("Market Overview", "Market Overview")]
    #[case("", "")]
    fn given_title_when_extracting_then_strips_qualifier(
        #[case] title: &str,
        #[case] expected: &str,
    ) {
        assert_eq!(extract_market_name(title), expected);
    }

    #[test]
    fn given_custom_qualifiers_when_extracting_then_uses_first_match() {
        let extractor = MarketNameExtractor::new(["Industry", "Sector"]).unwrap();
        assert_eq!(extractor.extract("Aerospace Industry Analysis"), "Aerospace");
        assert_eq!(extractor.extract("Banking Sector"), "Banking");
        assert_eq!(extractor.extract("Drone Market"), "Drone Market");
    }

    #[test]
    fn given_qualifier_with_regex_metacharacters_then_matches_literally() {
        let extractor = MarketNameExtractor::new(["Report."]).unwrap();
        assert_eq!(extractor.extract("Robotics Report.x"), "Robotics");
        assert_eq!(extractor.extract("Robotics ReportAx"), "Robotics ReportAx");
    }

    #[test]
    fn given_no_qualifiers_then_title_passes_through() {
        let extractor = MarketNameExtractor::new(Vec::<String>::new()).unwrap();
        assert_eq!(extractor.extract(" Drone Market "), " Drone Market ");
    }
}
