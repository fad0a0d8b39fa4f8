//! One crawl from validation to outcome.

use crate::driver::PageDriver;
use crate::error::{CrawlFailure, DriverError};
use crate::extractor::ResultExtractor;
use crate::outcome::{CrawlOutcome, CrawlReport};
use crate::poller::{PollState, ResultPoller};
use crate::record::MatchRecord;
use crate::request::{validate_length, CrawlRequest};
use crate::session::{CrawlSession, SessionManager, SessionPool};
use chrono::Utc;
use futures::FutureExt;
use plagscan_core::CrawlerConfig;
use plagscan_site::SiteDefinition;
use std::any::Any;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};
use uuid::Uuid;

/// Runs crawls of one site against a session pool.
///
/// Safe to share between tasks; concurrency is bounded by the pool.
pub struct CrawlOrchestrator<M: SessionManager> {
    pool: SessionPool<M>,
    site: Arc<SiteDefinition>,
    config: CrawlerConfig,
}

impl<M: SessionManager> CrawlOrchestrator<M> {
    /// Orchestrator for one site.
    pub fn new(pool: SessionPool<M>, site: Arc<SiteDefinition>, config: CrawlerConfig) -> Self {
        Self { pool, site, config }
    }

    /// Site this orchestrator crawls.
    pub fn site(&self) -> &SiteDefinition {
        &self.site
    }

    /// Session pool shared by all crawls.
    pub fn pool(&self) -> &SessionPool<M> {
        &self.pool
    }

    /// Build a request, applying the configured default and maximum deadline.
    pub fn request(&self, text: &str, deadline: Option<Duration>) -> Result<CrawlRequest, CrawlFailure> {
        CrawlRequest::new(text, self.config.resolve_deadline(deadline)).map_err(CrawlFailure::from)
    }

    /// Validate raw text and crawl it. Invalid text never touches the pool.
    pub async fn crawl_text(&self, text: &str, deadline: Option<Duration>) -> CrawlOutcome {
        match self.request(text, deadline) {
            Ok(request) => self.crawl(request).await,
            Err(failure) => {
                info!(site = %self.site.id(), reason = %failure, "request rejected");
                CrawlOutcome::Failed(failure)
            }
        }
    }

    /// Crawl a validated request without external cancellation.
    pub async fn crawl(&self, request: CrawlRequest) -> CrawlOutcome {
        self.run(request, CancellationToken::new()).await.outcome
    }

    /// Crawl once and report the outcome with its session bookkeeping.
    ///
    /// Exactly one outcome is produced. The session, if one was acquired, is
    /// released before this returns, whatever happened in between.
    pub async fn run(&self, request: CrawlRequest, cancel: CancellationToken) -> CrawlReport {
        let started = Instant::now();
        let checked_at = Utc::now();
        let deadline = started + request.deadline();

        let finish = |session_id: Option<Uuid>, outcome: CrawlOutcome| {
            let elapsed_ms = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX);
            info!(
                site = %self.site.id(),
                session = ?session_id,
                outcome = outcome.label(),
                matches = outcome.match_count(),
                elapsed_ms,
                "crawl finished"
            );
            CrawlReport {
                site: self.site.id().clone(),
                session_id,
                checked_at,
                elapsed_ms,
                outcome,
            }
        };

        if let Err(violation) = validate_length(request.text()) {
            return finish(None, CrawlOutcome::Failed(violation.into()));
        }

        let wait = self.config.session_acquire_timeout().min(request.deadline());
        let acquired = tokio::select! {
            biased;
            () = cancel.cancelled() => return finish(None, CrawlOutcome::Failed(CrawlFailure::Cancelled)),
            acquired = self.pool.acquire(wait) => acquired,
        };
        let mut session = match acquired {
            Ok(session) => session,
            Err(e) => return finish(None, CrawlOutcome::Failed(e.into())),
        };
        let session_id = session.id();
        debug!(site = %self.site.id(), session = %session_id, chars = request.len(), "crawl started");

        let result = AssertUnwindSafe(self.drive(&session, &request, deadline, &cancel))
            .catch_unwind()
            .await;
        session.release().await;

        let outcome = match result {
            Ok(outcome) => outcome,
            Err(panic) => {
                let reason = panic_message(panic.as_ref());
                error!(site = %self.site.id(), session = %session_id, panic = %reason, "crawl panicked");
                CrawlOutcome::Failed(CrawlFailure::Internal(reason))
            }
        };

        finish(Some(session_id), outcome)
    }

    async fn drive(
        &self,
        session: &CrawlSession<M>,
        request: &CrawlRequest,
        deadline: Instant,
        cancel: &CancellationToken,
    ) -> CrawlOutcome {
        let page = match session.page() {
            Ok(page) => page,
            Err(e) => return CrawlOutcome::Failed(e.into()),
        };

        let driver = PageDriver::new(&self.site, self.config.step_timeout());
        // Driver steps run to completion; each is already time-bounded.
        let submitted = driver.submit(page, request.text(), deadline).await;
        if cancel.is_cancelled() {
            return CrawlOutcome::Failed(CrawlFailure::Cancelled);
        }
        match submitted {
            Ok(()) => {}
            Err(DriverError::DeadlineExceeded { step }) => {
                warn!(site = %self.site.id(), step, "deadline passed before submission finished");
                return CrawlOutcome::TimedOut;
            }
            Err(DriverError::Navigation(reason)) => {
                warn!(site = %self.site.id(), error = %reason, "navigation failed");
                return CrawlOutcome::Failed(CrawlFailure::Navigation(reason));
            }
            Err(DriverError::Interaction(reason)) => {
                warn!(site = %self.site.id(), error = %reason, "page interaction failed");
                return CrawlOutcome::Failed(CrawlFailure::Interaction(reason));
            }
        }

        let poller = ResultPoller::new(&self.site, self.config.poll_interval());
        let state = tokio::select! {
            biased;
            () = cancel.cancelled() => return CrawlOutcome::Failed(CrawlFailure::Cancelled),
            state = poller.run(page, deadline) => state,
        };

        match state {
            PollState::NoMatchObserved => CrawlOutcome::NoMatch,
            PollState::DeadlineExceeded => CrawlOutcome::TimedOut,
            PollState::Submitted => CrawlOutcome::Failed(CrawlFailure::Internal(
                "polling stopped before a verdict".to_string(),
            )),
            PollState::ResultsObserved => self.collect(page, deadline).await,
        }
    }

    async fn collect(&self, page: &M::Page, deadline: Instant) -> CrawlOutcome {
        let step_timeout = self.config.step_timeout();
        let remaining = deadline.saturating_duration_since(Instant::now());
        if remaining.is_zero() {
            warn!(site = %self.site.id(), "deadline passed before extraction");
            return CrawlOutcome::TimedOut;
        }

        let budget = step_timeout.min(remaining);
        let extractor = ResultExtractor::new(&self.site);
        let raw = match tokio::time::timeout(budget, extractor.extract(page)).await {
            Ok(Ok(raw)) => raw,
            Ok(Err(e)) => {
                warn!(site = %self.site.id(), error = %e, "extraction failed");
                return CrawlOutcome::Failed(e.into());
            }
            Err(_) if budget < step_timeout => {
                warn!(site = %self.site.id(), "deadline passed during extraction");
                return CrawlOutcome::TimedOut;
            }
            Err(_) => {
                return CrawlOutcome::Failed(CrawlFailure::Extraction(format!(
                    "document not readable within {step_timeout:?}"
                )));
            }
        };

        if raw.is_empty() {
            return CrawlOutcome::NoMatch;
        }
        CrawlOutcome::Matches(raw.into_iter().map(MatchRecord::from_raw).collect())
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "crawl task panicked".to_string()
    }
}
