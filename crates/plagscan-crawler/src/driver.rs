//! Fills and submits the search form of a site.

use crate::error::DriverError;
use plagscan_browser::{BrowserActions, BrowserError};
use plagscan_site::SiteDefinition;
use std::future::Future;
use std::time::Duration;
use tokio::time::Instant;
use tracing::debug;

/// Why a single step stopped.
enum StepError {
    Browser(BrowserError),
    StepTimeout(Duration),
    Deadline,
}

/// Drives the submission form of one site.
///
/// Every step is bounded by the per-step timeout and by whatever is left of
/// the request deadline, whichever is shorter.
pub struct PageDriver<'a> {
    site: &'a SiteDefinition,
    step_timeout: Duration,
}

impl<'a> PageDriver<'a> {
    /// Driver for `site` with the given per-step timeout.
    pub fn new(site: &'a SiteDefinition, step_timeout: Duration) -> Self {
        Self { site, step_timeout }
    }

    /// Load the page, size the viewport, type `text` and press submit.
    pub async fn submit<P>(&self, page: &P, text: &str, deadline: Instant) -> Result<(), DriverError>
    where
        P: BrowserActions + ?Sized,
    {
        let site = self.site;
        let form = &site.form;

        self.step(deadline, page.navigate(site.url()))
            .await
            .map_err(|e| match e {
                StepError::Deadline => DriverError::DeadlineExceeded { step: "navigate" },
                StepError::StepTimeout(after) => {
                    DriverError::Navigation(format!("{} did not load within {after:?}", site.url()))
                }
                StepError::Browser(err) => DriverError::Navigation(err.to_string()),
            })?;
        debug!(site = %site.id(), "page loaded");

        self.step(
            deadline,
            page.set_viewport(site.viewport.width, site.viewport.height),
        )
        .await
        .map_err(|e| interaction("set viewport", e))?;

        let wait_ms = u64::try_from(self.step_timeout.as_millis()).unwrap_or(u64::MAX);
        self.step(deadline, page.wait_for_selector(&form.text_input, wait_ms))
            .await
            .map_err(|e| interaction("locate text input", e))?;

        self.step(deadline, page.fill_field(&form.text_input, text))
            .await
            .map_err(|e| interaction("type text", e))?;

        self.step(deadline, page.click(&form.submit_button))
            .await
            .map_err(|e| interaction("submit", e))?;

        debug!(site = %site.id(), chars = text.chars().count(), "text submitted");
        Ok(())
    }

    async fn step<T, F>(&self, deadline: Instant, action: F) -> Result<T, StepError>
    where
        F: Future<Output = plagscan_browser::Result<T>>,
    {
        let remaining = deadline.saturating_duration_since(Instant::now());
        if remaining.is_zero() {
            return Err(StepError::Deadline);
        }

        let budget = self.step_timeout.min(remaining);
        match tokio::time::timeout(budget, action).await {
            Ok(Ok(value)) => Ok(value),
            Ok(Err(err)) => Err(StepError::Browser(err)),
            Err(_) if budget < self.step_timeout => Err(StepError::Deadline),
            Err(_) => Err(StepError::StepTimeout(budget)),
        }
    }
}

fn interaction(step: &'static str, err: StepError) -> DriverError {
    match err {
        StepError::Deadline => DriverError::DeadlineExceeded { step },
        StepError::StepTimeout(after) => {
            DriverError::Interaction(format!("{step}: timed out after {after:?}"))
        }
        StepError::Browser(err) => DriverError::Interaction(format!("{step}: {err}")),
    }
}
