//! Core error types for Plagscan.
//!
//! Subsystem crates define their own error enums; this one covers what is
//! shared between them: identifiers, validation and configuration.

use thiserror::Error;

/// Central error type for shared Plagscan operations.
#[derive(Error, Debug)]
pub enum PlagscanError {
    /// Configuration errors (file loading, parsing, validation)
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Validation errors (invalid identifiers, constraints)
    #[error("validation error: {0}")]
    Validation(String),
}

/// Configuration-specific errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to determine config directory path
    #[error("could not determine config directory (XDG base directories not available)")]
    NoConfigDir,

    /// Failed to parse TOML
    #[error("failed to parse config TOML: {0}")]
    ParseError(#[from] toml::de::Error),

    /// Failed to serialize config
    #[error("failed to serialize config: {0}")]
    SerializeError(#[from] toml::ser::Error),

    /// I/O error reading/writing config
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Invalid configuration value
    #[error("invalid config value for {field}: {reason}")]
    InvalidValue {
        /// Field name
        field: String,
        /// Reason for invalidity
        reason: String,
    },
}

/// Result type alias using `PlagscanError`.
pub type Result<T> = std::result::Result<T, PlagscanError>;

/// Result type alias for configuration operations.
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = PlagscanError::Validation("empty site id".to_string());
        assert_eq!(err.to_string(), "validation error: empty site id");

        let err = ConfigError::InvalidValue {
            field: "crawler.max_concurrent_sessions".to_string(),
            reason: "must be at least 1".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "invalid config value for crawler.max_concurrent_sessions: must be at least 1"
        );
    }

    #[test]
    fn test_error_from_config() {
        let config_err = ConfigError::NoConfigDir;
        let err: PlagscanError = config_err.into();
        assert!(matches!(err, PlagscanError::Config(_)));
    }
}
