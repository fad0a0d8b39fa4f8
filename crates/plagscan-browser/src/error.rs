use thiserror::Error;

pub type Result<T> = std::result::Result<T, BrowserError>;

#[derive(Debug, Error)]
pub enum BrowserError {
    #[error("chromium error: {0}")]
    ChromiumError(String),

    #[error("navigation failed: {0}")]
    NavigationError(String),

    #[error("selector not found: {0}")]
    SelectorNotFound(String),

    #[error("script evaluation failed: {0}")]
    ScriptError(String),
}

impl BrowserError {
    /// Whether the error means the page layout didn't match the selector.
    #[must_use]
    pub fn is_selector_missing(&self) -> bool {
        matches!(self, Self::SelectorNotFound(_))
    }
}
