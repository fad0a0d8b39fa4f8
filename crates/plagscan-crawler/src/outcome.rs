//! Crawl outcomes and the JSON envelope returned to callers.

use crate::error::{CrawlFailure, InputViolation};
use crate::record::MatchRecord;
use chrono::{DateTime, Utc};
use plagscan_core::SiteId;
use serde::Serialize;
use uuid::Uuid;

/// Message reported when the site found nothing.
pub const NO_MATCH_MESSAGE: &str = "Did not find any documents making use of the text";

/// Message reported when the deadline passed without a verdict.
pub const TIMED_OUT_MESSAGE: &str = "The similarity check did not finish before the deadline";

/// Terminal result of one crawl. Exactly one is produced per request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", content = "data", rename_all = "snake_case")]
pub enum CrawlOutcome {
    /// The site reported that nothing matched
    NoMatch,
    /// Matches in the order the page listed them; never empty
    Matches(Vec<MatchRecord>),
    /// The deadline passed before either signal appeared
    TimedOut,
    /// The crawl could not be completed
    Failed(CrawlFailure),
}

impl CrawlOutcome {
    /// HTTP status a service front end should answer with.
    pub fn http_status(&self) -> u16 {
        match self {
            Self::Matches(_) => 200,
            Self::NoMatch => 404,
            Self::TimedOut => 504,
            Self::Failed(CrawlFailure::InvalidInput(_)) => 400,
            Self::Failed(CrawlFailure::SessionUnavailable(_)) => 503,
            Self::Failed(_) => 500,
        }
    }

    /// Short label for logs.
    pub fn label(&self) -> &'static str {
        match self {
            Self::NoMatch => "no_match",
            Self::Matches(_) => "matches",
            Self::TimedOut => "timed_out",
            Self::Failed(_) => "failed",
        }
    }

    /// Number of match records, 0 for every other outcome.
    pub fn match_count(&self) -> usize {
        match self {
            Self::Matches(records) => records.len(),
            _ => 0,
        }
    }
}

/// `{success, data, length, message}` envelope returned to callers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CrawlResponse {
    /// True for matches and for a confirmed no-match
    pub success: bool,
    /// Ordered matches, `null` otherwise
    pub data: Option<Vec<MatchRecord>>,
    /// Number of matches
    pub length: usize,
    /// Human-readable explanation for anything but matches
    pub message: Option<String>,
    /// Structured failure reason
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<CrawlFailure>,
}

impl From<&CrawlOutcome> for CrawlResponse {
    fn from(outcome: &CrawlOutcome) -> Self {
        match outcome {
            CrawlOutcome::Matches(records) => Self {
                success: true,
                length: records.len(),
                data: Some(records.clone()),
                message: None,
                error: None,
            },
            CrawlOutcome::NoMatch => Self {
                success: true,
                data: None,
                length: 0,
                message: Some(NO_MATCH_MESSAGE.to_string()),
                error: None,
            },
            CrawlOutcome::TimedOut => Self {
                success: false,
                data: None,
                length: 0,
                message: Some(TIMED_OUT_MESSAGE.to_string()),
                error: None,
            },
            CrawlOutcome::Failed(failure) => Self {
                success: false,
                data: None,
                length: 0,
                message: Some(failure_message(failure)),
                error: Some(failure.clone()),
            },
        }
    }
}

fn failure_message(failure: &CrawlFailure) -> String {
    match failure {
        CrawlFailure::InvalidInput(InputViolation::TooShort { .. }) => {
            "The paragraph is too short to find anything".to_string()
        }
        CrawlFailure::InvalidInput(InputViolation::TooLong { max, .. }) => {
            format!("The paragraph length is limited to {max} characters")
        }
        other => other.to_string(),
    }
}

/// A finished crawl with its bookkeeping.
#[derive(Debug, Clone, Serialize)]
pub struct CrawlReport {
    /// Site that was crawled
    pub site: SiteId,
    /// Session used, `None` when the request never reached one
    pub session_id: Option<Uuid>,
    /// Wall-clock start of the crawl
    pub checked_at: DateTime<Utc>,
    /// Time from start to outcome
    pub elapsed_ms: u64,
    /// The terminal outcome
    pub outcome: CrawlOutcome,
}

impl CrawlReport {
    /// Envelope for the outcome.
    pub fn response(&self) -> CrawlResponse {
        CrawlResponse::from(&self.outcome)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::RawRecord;

    fn record(title: &str) -> MatchRecord {
        MatchRecord::from_raw(RawRecord {
            title: Some(title.to_string()),
            percent_text: Some("50%".to_string()),
            ..RawRecord::default()
        })
    }

    #[test]
    fn test_http_status_mapping() {
        assert_eq!(CrawlOutcome::Matches(vec![record("a")]).http_status(), 200);
        assert_eq!(CrawlOutcome::NoMatch.http_status(), 404);
        assert_eq!(CrawlOutcome::TimedOut.http_status(), 504);
        assert_eq!(
            CrawlOutcome::Failed(CrawlFailure::InvalidInput(InputViolation::TooShort {
                len: 3,
                min: 50
            }))
            .http_status(),
            400
        );
        assert_eq!(
            CrawlOutcome::Failed(CrawlFailure::SessionUnavailable("busy".into())).http_status(),
            503
        );
        assert_eq!(
            CrawlOutcome::Failed(CrawlFailure::Navigation("dns".into())).http_status(),
            500
        );
        assert_eq!(CrawlOutcome::Failed(CrawlFailure::Cancelled).http_status(), 500);
    }

    #[test]
    fn test_response_for_matches() {
        let outcome = CrawlOutcome::Matches(vec![record("a"), record("b")]);
        let response = CrawlResponse::from(&outcome);
        assert!(response.success);
        assert_eq!(response.length, 2);
        assert_eq!(response.data.as_ref().map(Vec::len), Some(2));
        assert_eq!(response.message, None);
        assert_eq!(outcome.match_count(), 2);
    }

    #[test]
    fn test_response_for_no_match() {
        let response = CrawlResponse::from(&CrawlOutcome::NoMatch);
        assert!(response.success);
        assert_eq!(response.data, None);
        assert_eq!(response.length, 0);
        assert_eq!(response.message.as_deref(), Some(NO_MATCH_MESSAGE));
    }

    #[test]
    fn test_response_for_failure() {
        let outcome = CrawlOutcome::Failed(CrawlFailure::Interaction("no textarea".into()));
        let response = CrawlResponse::from(&outcome);
        assert!(!response.success);
        assert_eq!(
            response.message.as_deref(),
            Some("page interaction failed: no textarea")
        );

        let json = serde_json::to_value(&response).expect("serialize");
        assert_eq!(json["error"]["kind"], "interaction");
        assert!(json["data"].is_null());
    }

    #[test]
    fn test_response_for_invalid_input() {
        let short = CrawlResponse::from(&CrawlOutcome::Failed(CrawlFailure::InvalidInput(
            InputViolation::TooShort { len: 12, min: 50 },
        )));
        assert_eq!(
            short.message.as_deref(),
            Some("The paragraph is too short to find anything")
        );

        let long = CrawlResponse::from(&CrawlOutcome::Failed(CrawlFailure::InvalidInput(
            InputViolation::TooLong {
                len: 1200,
                max: 1000,
            },
        )));
        assert_eq!(
            long.message.as_deref(),
            Some("The paragraph length is limited to 1000 characters")
        );
        assert!(!long.success);
    }

    #[test]
    fn test_outcome_serialization() {
        let json = serde_json::to_value(CrawlOutcome::TimedOut).expect("serialize");
        assert_eq!(json, serde_json::json!({ "status": "timed_out" }));

        let json = serde_json::to_value(CrawlOutcome::Matches(vec![record("x")])).expect("serialize");
        assert_eq!(json["status"], "matches");
        assert_eq!(json["data"][0]["title"], "x");
        assert_eq!(json["data"][0]["similarity_percent"], 50);
    }
}
