//! Plagscan Core - Foundation crate for the Plagscan similarity crawler.
//!
//! This crate provides shared types, error handling and configuration
//! management that all other Plagscan crates depend on.
//!
//! # Modules
//!
//! - [`error`] - Central error types using thiserror
//! - [`config`] - TOML-based configuration with XDG paths
//! - [`types`] - Shared newtypes (`SiteId`)
//!
//! # Example
//!
//! ```rust
//! use plagscan_core::{AppConfig, SiteId};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let config = AppConfig::default();
//! assert_eq!(config.crawler.default_deadline_secs, 180);
//!
//! let site = SiteId::new("plagium")?;
//! println!("crawling with {site}");
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]

pub mod config;
pub mod error;
pub mod types;

// Re-export commonly used types
pub use config::{AppConfig, BrowserConfig, CrawlerConfig};
pub use error::{ConfigError, ConfigResult, PlagscanError, Result};
pub use types::SiteId;
