use crate::actions::{extract_domain, BrowserActions};
use crate::error::{BrowserError, Result};
use chromiumoxide::cdp::browser_protocol::browser::BrowserContextId;
use chromiumoxide::cdp::browser_protocol::emulation::SetDeviceMetricsOverrideParams;
use chromiumoxide::cdp::js_protocol::runtime::EvaluateParams;
use chromiumoxide::page::Page;
use serde::de::DeserializeOwned;
use serde::Deserialize;

/// A page living in its own browser context.
///
/// Created by [`crate::BrowserEngine::open_isolated_page`] and handed back to
/// [`crate::BrowserEngine::close_isolated_page`] when the crawl ends.
pub struct IsolatedPage {
    pub(crate) page: Page,
    pub(crate) context_id: BrowserContextId,
}

#[derive(Deserialize)]
struct TextProbe {
    found: bool,
    text: String,
}

#[derive(Deserialize)]
struct StatusProbe {
    status: u16,
}

impl IsolatedPage {
    /// Browser context backing this page.
    pub fn context_id(&self) -> &BrowserContextId {
        &self.context_id
    }

    /// Evaluate an expression and deserialize its value.
    ///
    /// Scripts must return a non-null value; CDP drops `null` results.
    async fn eval<T: DeserializeOwned>(&self, script: String) -> Result<T> {
        let params = EvaluateParams::builder()
            .expression(script)
            .return_by_value(true)
            .await_promise(true)
            .build()
            .map_err(BrowserError::ScriptError)?;

        self.page
            .evaluate_expression(params)
            .await
            .map_err(|e| BrowserError::ScriptError(e.to_string()))?
            .into_value::<T>()
            .map_err(|e| BrowserError::ScriptError(e.to_string()))
    }

    /// HTTP status of the main document, 0 when the browser doesn't expose it.
    async fn navigation_status(&self) -> Result<u16> {
        let probe: StatusProbe = self
            .eval(
                r"(function () {
                    const nav = performance.getEntriesByType('navigation')[0];
                    return { status: nav && nav.responseStatus ? nav.responseStatus : 0 };
                })()"
                    .to_string(),
            )
            .await?;
        Ok(probe.status)
    }
}

/// Encode a selector as a JavaScript string literal.
fn js_string(selector: &str) -> String {
    serde_json::to_string(selector).unwrap_or_else(|_| "\"\"".to_string())
}

#[async_trait::async_trait]
impl BrowserActions for IsolatedPage {
    async fn navigate(&self, url: &str) -> Result<()> {
        let domain = extract_domain(url)?;
        tracing::debug!(domain = %domain, "navigating");

        self.page
            .goto(url)
            .await
            .map_err(|e| BrowserError::NavigationError(format!("{url}: {e}")))?;

        match self.navigation_status().await {
            Ok(0) => {}
            Ok(status) if (200..300).contains(&status) => {}
            Ok(status) => {
                return Err(BrowserError::NavigationError(format!(
                    "{url} answered HTTP {status}"
                )));
            }
            Err(e) => tracing::debug!(error = %e, "navigation status unavailable"),
        }

        Ok(())
    }

    async fn set_viewport(&self, width: u32, height: u32) -> Result<()> {
        self.page
            .execute(SetDeviceMetricsOverrideParams::new(
                i64::from(width),
                i64::from(height),
                1.0,
                false,
            ))
            .await
            .map_err(|e| BrowserError::ChromiumError(e.to_string()))?;
        Ok(())
    }

    async fn fill_field(&self, selector: &str, value: &str) -> Result<()> {
        let element = self
            .page
            .find_element(selector)
            .await
            .map_err(|_| BrowserError::SelectorNotFound(selector.to_string()))?;

        element
            .click()
            .await
            .map_err(|e| BrowserError::ChromiumError(e.to_string()))?;
        element
            .type_str(value)
            .await
            .map_err(|e| BrowserError::ChromiumError(e.to_string()))?;
        Ok(())
    }

    async fn click(&self, selector: &str) -> Result<()> {
        let element = self
            .page
            .find_element(selector)
            .await
            .map_err(|_| BrowserError::SelectorNotFound(selector.to_string()))?;

        element
            .click()
            .await
            .map_err(|e| BrowserError::ChromiumError(e.to_string()))?;
        Ok(())
    }

    async fn is_present(&self, selector: &str) -> Result<bool> {
        self.eval(format!(
            "document.querySelector({}) !== null",
            js_string(selector)
        ))
        .await
    }

    async fn is_visible(&self, selector: &str) -> Result<bool> {
        self.eval(format!(
            r"(function () {{
                for (const el of document.querySelectorAll({})) {{
                    const style = window.getComputedStyle(el);
                    const rect = el.getBoundingClientRect();
                    if (style.visibility !== 'hidden' && style.display !== 'none'
                        && rect.width > 0 && rect.height > 0) {{
                        return true;
                    }}
                }}
                return false;
            }})()",
            js_string(selector)
        ))
        .await
    }

    async fn text_content(&self, selector: &str) -> Result<Option<String>> {
        let probe: TextProbe = self
            .eval(format!(
                r"(function () {{
                    const el = document.querySelector({});
                    return {{ found: el !== null, text: el ? (el.textContent || '') : '' }};
                }})()",
                js_string(selector)
            ))
            .await?;

        Ok(probe.found.then_some(probe.text))
    }

    async fn content(&self) -> Result<String> {
        self.page
            .content()
            .await
            .map_err(|e| BrowserError::ChromiumError(e.to_string()))
    }
}
