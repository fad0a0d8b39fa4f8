//! Match records as read from the page and after normalization.

use crate::sanitize::{clean_field, clean_text, strip_breadcrumb};
use serde::Serialize;

/// One result entry as read from the page, before normalization.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawRecord {
    /// Title link text
    pub title: Option<String>,
    /// Title link target, resolved against the site URL
    pub url: Option<String>,
    /// Snippet text
    pub description: Option<String>,
    /// Percentage badge text
    pub percent_text: Option<String>,
    /// Occurrence count badge text
    pub count_text: Option<String>,
}

/// A normalized similarity match.
///
/// `None` in either similarity field means the badge was missing or not a
/// number. Serialized as `null`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MatchRecord {
    title: String,
    source_url: String,
    description: String,
    similarity_percent: Option<u8>,
    similarity_count: Option<u64>,
}

impl MatchRecord {
    /// Normalize a raw record. Never fails; unreadable parts become empty or `None`.
    pub fn from_raw(raw: RawRecord) -> Self {
        Self {
            title: strip_breadcrumb(&clean_field(raw.title.as_deref())),
            source_url: clean_field(raw.url.as_deref()),
            description: clean_field(raw.description.as_deref()),
            similarity_percent: parse_percent(raw.percent_text.as_deref()),
            similarity_count: parse_count(raw.count_text.as_deref()),
        }
    }

    /// Title with any breadcrumb trail removed.
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Address of the matching document; empty when the page had no link.
    pub fn source_url(&self) -> &str {
        &self.source_url
    }

    /// Snippet the site showed for the match.
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Similarity percentage, 0-100.
    pub fn similarity_percent(&self) -> Option<u8> {
        self.similarity_percent
    }

    /// Number of similar passages the site counted.
    pub fn similarity_count(&self) -> Option<u64> {
        self.similarity_count
    }
}

/// Parse a percentage badge such as `87%` or `87 %`.
pub fn parse_percent(text: Option<&str>) -> Option<u8> {
    let text = clean_text(text?);
    let digits = text.strip_suffix('%').unwrap_or(&text).trim_end();
    digits.parse::<u8>().ok().filter(|p| *p <= 100)
}

/// Parse an occurrence count badge; thousands separators are accepted.
pub fn parse_count(text: Option<&str>) -> Option<u64> {
    let text = clean_text(text?);
    let digits: String = text.chars().filter(|c| *c != ',').collect();
    digits.parse::<u64>().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_percent() {
        assert_eq!(parse_percent(Some("87%")), Some(87));
        assert_eq!(parse_percent(Some(" 87 % ")), Some(87));
        assert_eq!(parse_percent(Some("100%")), Some(100));
        assert_eq!(parse_percent(Some("0%")), Some(0));
        assert_eq!(parse_percent(Some("")), None);
        assert_eq!(parse_percent(Some("n/a")), None);
        assert_eq!(parse_percent(Some("140%")), None);
        assert_eq!(parse_percent(Some("-5%")), None);
        assert_eq!(parse_percent(None), None);
    }

    #[test]
    fn test_parse_count() {
        assert_eq!(parse_count(Some("3")), Some(3));
        assert_eq!(parse_count(Some(" 1,204 ")), Some(1204));
        assert_eq!(parse_count(Some("")), None);
        assert_eq!(parse_count(Some("many")), None);
        assert_eq!(parse_count(None), None);
    }

    #[test]
    fn test_from_raw_normalizes_fields() {
        let record = MatchRecord::from_raw(RawRecord {
            title: Some("example.com ›  blog › Deep\u{200B} Learning\n Basics".to_string()),
            url: Some(" https://example.com/blog/deep ".to_string()),
            description: Some("\n  A primer on\tneural networks. ".to_string()),
            percent_text: Some("42%".to_string()),
            count_text: Some("7".to_string()),
        });

        assert_eq!(record.title(), "Deep Learning Basics");
        assert_eq!(record.source_url(), "https://example.com/blog/deep");
        assert_eq!(record.description(), "A primer on neural networks.");
        assert_eq!(record.similarity_percent(), Some(42));
        assert_eq!(record.similarity_count(), Some(7));
    }

    #[test]
    fn test_from_raw_missing_fields() {
        let record = MatchRecord::from_raw(RawRecord::default());
        assert_eq!(record.title(), "");
        assert_eq!(record.source_url(), "");
        assert_eq!(record.description(), "");
        assert_eq!(record.similarity_percent(), None);
        assert_eq!(record.similarity_count(), None);
    }

    #[test]
    fn test_unknown_similarity_serializes_as_null() {
        let record = MatchRecord::from_raw(RawRecord {
            title: Some("Title".to_string()),
            ..RawRecord::default()
        });
        let json = serde_json::to_value(&record).expect("serialize");
        assert!(json["similarity_percent"].is_null());
        assert!(json["similarity_count"].is_null());
        assert_eq!(json["title"], "Title");
    }
}
