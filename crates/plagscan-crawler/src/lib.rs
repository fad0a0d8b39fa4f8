//! Plagscan Crawler - Content-similarity checks against rendered web pages.
//!
//! A crawl submits one text to a site's search form inside an isolated
//! browser session, waits for the site's verdict under a hard deadline, and
//! turns the result list into normalized [`MatchRecord`]s.
//!
//! # Pipeline
//!
//! - **Request** ([`request`]): sanitize and length-check the text
//! - **Session** ([`session`]): bounded pool of isolated pages, released exactly once
//! - **Driver** ([`driver`]): navigate, size the viewport, type and submit
//! - **Poller** ([`poller`]): wait for "no results" or a visible result list
//! - **Extractor** ([`extractor`]): read result entries in document order
//! - **Orchestrator** ([`orchestrator`]): runs the steps and maps them to a [`CrawlOutcome`]
//!
//! # Example
//!
//! ```rust,no_run
//! use plagscan_browser::BrowserEngine;
//! use plagscan_core::AppConfig;
//! use plagscan_crawler::{CrawlOrchestrator, SessionPool};
//! use plagscan_site::SiteDefinition;
//! use std::sync::Arc;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = AppConfig::default();
//! let engine = Arc::new(BrowserEngine::launch(&config.browser).await?);
//! let pool = SessionPool::new(engine, config.crawler.max_concurrent_sessions);
//! let crawler = CrawlOrchestrator::new(pool, Arc::new(SiteDefinition::plagium()), config.crawler);
//!
//! let outcome = crawler.crawl_text("some paragraph of at least fifty characters to check ...", None).await;
//! println!("{}", outcome.http_status());
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]

pub mod driver;
pub mod error;
pub mod extractor;
pub mod orchestrator;
pub mod outcome;
pub mod poller;
pub mod record;
pub mod request;
pub mod sanitize;
pub mod session;

pub use error::{CrawlFailure, DriverError, ExtractError, InputViolation, SessionError};
pub use orchestrator::CrawlOrchestrator;
pub use outcome::{CrawlOutcome, CrawlReport, CrawlResponse};
pub use poller::PollState;
pub use record::{MatchRecord, RawRecord};
pub use request::{CrawlRequest, MAX_TEXT_CHARS, MIN_TEXT_CHARS};
pub use session::{CrawlSession, SessionManager, SessionPool};
