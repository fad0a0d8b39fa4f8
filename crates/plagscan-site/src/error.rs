//! Error types for the site definition subsystem.

use thiserror::Error;

/// Errors that can occur while loading or querying site definitions.
#[derive(Error, Debug)]
pub enum SiteError {
    /// Site definition not found
    #[error("site definition not found: {site_id}")]
    NotFound {
        /// The site ID that was not found
        site_id: String,
    },

    /// Failed to read a site definition file
    #[error("failed to load site definition from {path}: {source}")]
    LoadError {
        /// Path to the definition file
        path: String,
        /// Underlying error
        #[source]
        source: std::io::Error,
    },

    /// Failed to parse site definition TOML
    #[error("failed to parse site definition TOML in {path}: {source}")]
    ParseError {
        /// Path to the definition file
        path: String,
        /// TOML parse error
        #[source]
        source: toml::de::Error,
    },

    /// Invalid site definition (validation failed)
    #[error("invalid site definition for {site_id}: {reason}")]
    ValidationError {
        /// Site ID being validated
        site_id: String,
        /// Reason for validation failure
        reason: String,
    },

    /// Site definition directory not found
    #[error("site definitions directory not found at {path}")]
    DirectoryNotFound {
        /// Expected directory path
        path: String,
    },

    /// I/O error while accessing site definitions
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for site operations.
pub type Result<T> = std::result::Result<T, SiteError>;
