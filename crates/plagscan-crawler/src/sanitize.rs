//! Text normalization for request input and extracted fields.

use regex::Regex;
use std::sync::OnceLock;

/// Leading `segment › segment › ` (or `»`) navigation trail.
fn breadcrumb_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^(?:[^›»]+?\s+[›»]\s+)+").expect("valid regex"))
}

/// Zero-width and other invisible formatting characters.
fn is_invisible(c: char) -> bool {
    c.is_control()
        || matches!(
            c,
            '\u{00AD}' | '\u{200B}'..='\u{200F}' | '\u{202A}'..='\u{202E}' | '\u{2060}'..='\u{2064}' | '\u{FEFF}'
        )
}

/// Collapse whitespace runs to one space, drop invisible characters and trim.
///
/// Idempotent: `clean_text(&clean_text(s)) == clean_text(s)`.
pub fn clean_text(s: &str) -> String {
    let visible: String = s
        .chars()
        .filter_map(|c| {
            if c.is_whitespace() {
                Some(' ')
            } else if is_invisible(c) {
                None
            } else {
                Some(c)
            }
        })
        .collect();

    visible.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// [`clean_text`] for a field that may be absent; absent becomes empty.
pub fn clean_field(s: Option<&str>) -> String {
    s.map(clean_text).unwrap_or_default()
}

/// Remove a leading breadcrumb trail such as `example.com › blog › `.
///
/// Strings without one come back unchanged. A title made only of breadcrumb
/// segments is also returned unchanged rather than emptied.
pub fn strip_breadcrumb(s: &str) -> String {
    match breadcrumb_regex().find(s) {
        Some(m) if m.end() < s.len() => s[m.end()..].trim_start().to_string(),
        _ => s.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clean_text_collapses_whitespace() {
        assert_eq!(clean_text("  hello \n\t world  "), "hello world");
        assert_eq!(clean_text("a\u{00A0}\u{00A0}b"), "a b");
        assert_eq!(clean_text(""), "");
        assert_eq!(clean_text(" \n "), "");
    }

    #[test]
    fn test_clean_text_drops_invisible_characters() {
        assert_eq!(clean_text("zero\u{200B}width"), "zerowidth");
        assert_eq!(clean_text("\u{FEFF}bom"), "bom");
        assert_eq!(clean_text("bell\u{0007}"), "bell");
        assert_eq!(clean_text("soft\u{00AD}hyphen"), "softhyphen");
    }

    #[test]
    fn test_clean_text_is_idempotent() {
        let samples = [
            "plain text",
            "  leading and trailing  ",
            "tabs\tand\nnewlines\r\n",
            "mixed \u{200B} \u{200B} invisible",
            "\u{2003}em\u{2003}space",
            "ünïcödé  text",
            "",
        ];
        for sample in samples {
            let once = clean_text(sample);
            assert_eq!(clean_text(&once), once, "not idempotent for {sample:?}");
        }
    }

    #[test]
    fn test_clean_field_absent() {
        assert_eq!(clean_field(None), "");
        assert_eq!(clean_field(Some(" x ")), "x");
    }

    #[test]
    fn test_strip_breadcrumb() {
        assert_eq!(
            strip_breadcrumb("example.com › blog › Deep Learning Basics"),
            "Deep Learning Basics"
        );
        assert_eq!(strip_breadcrumb("Home » Articles » Title"), "Title");
    }

    #[test]
    fn test_strip_breadcrumb_is_noop_without_trail() {
        let samples = [
            "Deep Learning Basics",
            "",
            "He said »hello« twice",
            "price: 5 > 3",
            "trailing ›",
        ];
        for sample in samples {
            assert_eq!(strip_breadcrumb(sample), sample);
        }
    }

    #[test]
    fn test_strip_breadcrumb_keeps_pure_trail() {
        assert_eq!(strip_breadcrumb("a › b › "), "a › b › ");
    }
}
