//! Waits for the site to signal either "no results" or a visible result list.

use crate::sanitize::clean_text;
use plagscan_browser::BrowserActions;
use plagscan_site::SiteDefinition;
use std::future::Future;
use std::time::Duration;
use tokio::time::Instant;
use tracing::{debug, info};

/// Progress of a submitted search.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PollState {
    /// Waiting for the site to answer
    Submitted,
    /// The status message reported no results
    NoMatchObserved,
    /// At least one result element is visible
    ResultsObserved,
    /// The deadline passed with neither signal
    DeadlineExceeded,
}

/// What one poll tick saw on the page.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Observation {
    /// Status message contains the no-results phrase
    pub no_match: bool,
    /// A result element is visible
    pub results_visible: bool,
    /// The request deadline has passed
    pub deadline_passed: bool,
}

impl PollState {
    /// Whether polling stops in this state.
    pub fn is_terminal(self) -> bool {
        !matches!(self, Self::Submitted)
    }

    /// Apply one observation. Terminal states never change, and a no-match
    /// signal wins over visible results seen in the same tick.
    #[must_use]
    pub fn observe(self, seen: Observation) -> Self {
        if self.is_terminal() {
            return self;
        }
        if seen.no_match {
            Self::NoMatchObserved
        } else if seen.results_visible {
            Self::ResultsObserved
        } else if seen.deadline_passed {
            Self::DeadlineExceeded
        } else {
            Self::Submitted
        }
    }
}

/// Polls the status message and the result list until one of them settles.
pub struct ResultPoller<'a> {
    site: &'a SiteDefinition,
    interval: Duration,
}

impl<'a> ResultPoller<'a> {
    /// Poller for `site` ticking every `interval`.
    pub fn new(site: &'a SiteDefinition, interval: Duration) -> Self {
        Self { site, interval }
    }

    /// Poll until a terminal state. Never returns `DeadlineExceeded` before
    /// `deadline`.
    pub async fn run<P>(&self, page: &P, deadline: Instant) -> PollState
    where
        P: BrowserActions + ?Sized,
    {
        let started = Instant::now();
        let mut state = PollState::Submitted;
        let mut ticks: u32 = 0;

        loop {
            ticks += 1;

            let no_match = self.probe("status message", deadline, self.no_match_shown(page)).await;
            let results_visible = if no_match {
                false
            } else {
                self.probe("result list", deadline, page.is_visible(&self.site.results.item))
                    .await
            };

            state = state.observe(Observation {
                no_match,
                results_visible,
                deadline_passed: Instant::now() >= deadline,
            });

            if state.is_terminal() {
                info!(
                    site = %self.site.id(),
                    state = ?state,
                    ticks,
                    waited_ms = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX),
                    "polling finished"
                );
                return state;
            }

            let next = (Instant::now() + self.interval).min(deadline);
            tokio::time::sleep_until(next).await;
        }
    }

    async fn no_match_shown<P>(&self, page: &P) -> plagscan_browser::Result<bool>
    where
        P: BrowserActions + ?Sized,
    {
        let status = &self.site.status;
        let text = page.text_content(&status.message).await?;
        Ok(text.is_some_and(|t| status.reports_no_results(&clean_text(&t))))
    }

    /// Run one page query bounded by the deadline. Errors count as "not seen".
    async fn probe<F>(&self, what: &'static str, deadline: Instant, query: F) -> bool
    where
        F: Future<Output = plagscan_browser::Result<bool>>,
    {
        match tokio::time::timeout_at(deadline, query).await {
            Ok(Ok(seen)) => seen,
            Ok(Err(e)) => {
                debug!(site = %self.site.id(), probe = what, error = %e, "probe failed, polling on");
                false
            }
            Err(_) => false,
        }
    }
}
