//! Browser automation engine for JavaScript-heavy target pages.
//!
//! One Chromium process is shared; every crawl gets its own incognito-style
//! browser context so cookies, storage and form state never leak between
//! concurrent callers.

pub mod actions;
pub mod engine;
pub mod error;
pub mod fingerprint;
pub mod page;

pub use actions::BrowserActions;
pub use engine::BrowserEngine;
pub use error::{BrowserError, Result};
pub use page::IsolatedPage;
