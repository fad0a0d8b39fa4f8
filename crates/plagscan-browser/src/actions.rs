use crate::error::{BrowserError, Result};
use std::time::Duration;

/// Interval between presence checks in [`BrowserActions::wait_for_selector`].
const SELECTOR_POLL_INTERVAL: Duration = Duration::from_millis(100);

/// Browser actions for automation of a single page.
#[async_trait::async_trait]
pub trait BrowserActions: Send + Sync {
    /// Navigate to a URL and wait for the load to settle
    async fn navigate(&self, url: &str) -> Result<()>;

    /// Override the viewport dimensions
    async fn set_viewport(&self, width: u32, height: u32) -> Result<()>;

    /// Focus a form field by selector and type a value into it
    async fn fill_field(&self, selector: &str, value: &str) -> Result<()>;

    /// Click an element by selector
    async fn click(&self, selector: &str) -> Result<()>;

    /// Whether at least one element matches the selector
    async fn is_present(&self, selector: &str) -> Result<bool>;

    /// Whether at least one matching element is rendered with a non-empty box
    async fn is_visible(&self, selector: &str) -> Result<bool>;

    /// Text content of the first matching element, `None` if nothing matches
    async fn text_content(&self, selector: &str) -> Result<Option<String>>;

    /// Serialized rendered document
    async fn content(&self) -> Result<String>;

    /// Wait for a selector to appear
    async fn wait_for_selector(&self, selector: &str, timeout_ms: u64) -> Result<()> {
        let deadline = tokio::time::Instant::now() + Duration::from_millis(timeout_ms);

        loop {
            if self.is_present(selector).await? {
                return Ok(());
            }

            if tokio::time::Instant::now() >= deadline {
                return Err(BrowserError::SelectorNotFound(format!(
                    "{selector} (waited {timeout_ms}ms)"
                )));
            }

            tokio::time::sleep(SELECTOR_POLL_INTERVAL).await;
        }
    }
}

/// Helper to extract domain from URL
pub fn extract_domain(url: &str) -> Result<String> {
    let url = url::Url::parse(url)
        .map_err(|e| BrowserError::NavigationError(format!("Invalid URL: {}", e)))?;

    url.host_str()
        .ok_or_else(|| BrowserError::NavigationError("No host in URL".to_string()))
        .map(|s| s.to_string())
}
