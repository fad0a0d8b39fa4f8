//! Error types for the crawl pipeline.
//!
//! Each stage has its own error so the orchestrator can tell "site
//! unreachable" from "form layout changed" from "pool exhausted". Everything
//! ends up as a [`CrawlFailure`] inside a [`crate::CrawlOutcome`].

use serde::Serialize;
use thiserror::Error;

/// Why a request text was rejected before any session was opened.
#[derive(Debug, Clone, Copy, Error, PartialEq, Eq, Serialize)]
#[serde(tag = "violation", rename_all = "snake_case")]
pub enum InputViolation {
    /// Fewer characters than the lower bound
    #[error("text has {len} characters, at least {min} required")]
    TooShort {
        /// Character count after sanitizing
        len: usize,
        /// Lower bound
        min: usize,
    },

    /// More characters than the upper bound
    #[error("text has {len} characters, at most {max} allowed")]
    TooLong {
        /// Character count after sanitizing
        len: usize,
        /// Upper bound
        max: usize,
    },
}

/// Caller-facing failure reasons carried by `CrawlOutcome::Failed`.
#[derive(Debug, Clone, Error, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "detail", rename_all = "snake_case")]
pub enum CrawlFailure {
    /// Request rejected, nothing was attempted
    #[error("invalid input: {0}")]
    InvalidInput(InputViolation),

    /// No isolated session could be obtained
    #[error("no browser session available: {0}")]
    SessionUnavailable(String),

    /// Target page unreachable
    #[error("navigation failed: {0}")]
    Navigation(String),

    /// Target page markup did not match the form selectors
    #[error("page interaction failed: {0}")]
    Interaction(String),

    /// Results were signalled but could not be read
    #[error("result extraction failed: {0}")]
    Extraction(String),

    /// The caller cancelled the crawl
    #[error("crawl cancelled")]
    Cancelled,

    /// The pipeline panicked or reached an impossible state
    #[error("internal error: {0}")]
    Internal(String),
}

/// Errors from acquiring or using a crawl session.
#[derive(Debug, Error)]
pub enum SessionError {
    /// Pool exhausted, closed, or the browser refused a new context
    #[error("{0}")]
    Unavailable(String),

    /// The session was already released
    #[error("session already released")]
    Released,
}

/// Errors from the page interaction driver.
#[derive(Debug, Error)]
pub enum DriverError {
    /// Navigation to the target page failed or timed out
    #[error("{0}")]
    Navigation(String),

    /// A form control was missing or could not be operated
    #[error("{0}")]
    Interaction(String),

    /// The request deadline ran out during a step
    #[error("deadline exceeded during {step}")]
    DeadlineExceeded {
        /// Step that was running
        step: &'static str,
    },
}

/// Errors from the result extractor.
#[derive(Debug, Error)]
pub enum ExtractError {
    /// The rendered document could not be read
    #[error("could not read rendered document: {0}")]
    Document(String),

    /// A result selector does not parse
    #[error("invalid selector for {field}: {reason}")]
    Selector {
        /// Selector field name
        field: &'static str,
        /// Parser message
        reason: String,
    },
}

impl From<SessionError> for CrawlFailure {
    fn from(err: SessionError) -> Self {
        match err {
            SessionError::Unavailable(reason) => Self::SessionUnavailable(reason),
            SessionError::Released => Self::Internal(err.to_string()),
        }
    }
}

impl From<ExtractError> for CrawlFailure {
    fn from(err: ExtractError) -> Self {
        Self::Extraction(err.to_string())
    }
}

impl From<InputViolation> for CrawlFailure {
    fn from(violation: InputViolation) -> Self {
        Self::InvalidInput(violation)
    }
}
