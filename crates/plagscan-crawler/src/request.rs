//! Validated crawl input.

use crate::error::InputViolation;
use crate::sanitize::clean_text;
use std::time::Duration;

/// Fewest characters the target site can work with.
pub const MIN_TEXT_CHARS: usize = 50;

/// Most characters the target site accepts in one submission.
pub const MAX_TEXT_CHARS: usize = 1000;

/// Check the character count of an already-sanitized text.
pub fn validate_length(text: &str) -> Result<usize, InputViolation> {
    let len = text.chars().count();
    if len < MIN_TEXT_CHARS {
        return Err(InputViolation::TooShort {
            len,
            min: MIN_TEXT_CHARS,
        });
    }
    if len > MAX_TEXT_CHARS {
        return Err(InputViolation::TooLong {
            len,
            max: MAX_TEXT_CHARS,
        });
    }
    Ok(len)
}

/// A validated crawl request.
///
/// The text is sanitized on construction and its length is always within
/// `MIN_TEXT_CHARS..=MAX_TEXT_CHARS`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CrawlRequest {
    text: String,
    deadline: Duration,
}

impl CrawlRequest {
    /// Sanitize `text` and check its length.
    pub fn new(text: &str, deadline: Duration) -> Result<Self, InputViolation> {
        let text = clean_text(text);
        validate_length(&text)?;
        Ok(Self { text, deadline })
    }

    /// Sanitized text that will be submitted.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Character count of the submitted text.
    pub fn len(&self) -> usize {
        self.text.chars().count()
    }

    /// Always false; kept for clippy's `len_without_is_empty`.
    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    /// Overall time budget for the crawl.
    pub fn deadline(&self) -> Duration {
        self.deadline
    }
}
