//! Plagscan Site - Definitions of the external pages the crawler drives.
//!
//! A site definition captures everything the crawler needs to know about one
//! crawl kind: the fixed URL, the viewport the selectors were written against,
//! the form controls, the status message that signals "no results", and the
//! selectors for each field of a result element. Adding a crawl kind means
//! adding a definition, not changing the orchestrator.
//!
//! # Architecture
//!
//! - **Definition Types** ([`definition`]): Strongly-typed site metadata and selectors
//! - **Loader** ([`loader`]): TOML file loading from a definitions directory
//! - **Registry** ([`registry`]): In-memory cache seeded with built-in definitions
//! - **Errors** ([`error`]): Site-specific error types
//!
//! # Example
//!
//! ```rust
//! use plagscan_site::SiteRegistry;
//! use plagscan_core::SiteId;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let registry = SiteRegistry::with_builtins();
//! let definition = registry.get(&SiteId::new("plagium")?)?;
//!
//! println!("Site: {} at {}", definition.name(), definition.url());
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]

pub mod definition;
pub mod error;
pub mod loader;
pub mod registry;

// Re-export commonly used types
pub use definition::{
    FormSelectors, ResultSelectors, SiteDefinition, SiteMetadata, StatusSelectors, Viewport,
};
pub use error::{Result, SiteError};
pub use loader::SiteLoader;
pub use registry::SiteRegistry;
