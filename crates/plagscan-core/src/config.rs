//! Configuration management for Plagscan.
//!
//! Provides TOML-based configuration with XDG-compliant paths and
//! environment variable overrides.

use crate::error::{ConfigError, ConfigResult};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;
use std::time::Duration;

/// Main application configuration.
///
/// This is loaded from `~/.config/plagscan/config.toml` (or platform equivalent).
/// If the file doesn't exist, default values are used.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Browser automation settings
    pub browser: BrowserConfig,
    /// Crawl orchestration settings
    pub crawler: CrawlerConfig,
}

impl AppConfig {
    /// Load configuration from disk, falling back to defaults if not found.
    ///
    /// # Errors
    /// Returns error if:
    /// - Config directory cannot be determined
    /// - File exists but cannot be read
    /// - File contents are not valid TOML
    /// - A value is out of range
    pub fn load() -> ConfigResult<Self> {
        let config_path = Self::config_path()?;

        let config: Self = if config_path.exists() {
            tracing::debug!("Loading config from {}", config_path.display());
            let contents = fs::read_to_string(&config_path)?;
            toml::from_str(&contents)?
        } else {
            tracing::debug!("Config file not found, using defaults");
            Self::default()
        };

        config.validate()?;
        Ok(config)
    }

    /// Load configuration with environment variable overrides.
    ///
    /// Supports the following environment variables:
    /// - `PLAGSCAN_HEADLESS`: Override browser headless mode (true/false)
    /// - `PLAGSCAN_CHROME_PATH`: Override the Chrome/Chromium executable
    /// - `PLAGSCAN_MAX_SESSIONS`: Override the concurrent session limit
    /// - `PLAGSCAN_DEADLINE_SECS`: Override the default crawl deadline
    pub fn load_with_env() -> ConfigResult<Self> {
        let mut config = Self::load()?;
        config.apply_env_overrides(|key| std::env::var(key).ok());
        config.validate()?;
        Ok(config)
    }

    /// Apply overrides from an environment-like lookup.
    ///
    /// Unparseable values are ignored and the configured value is kept.
    pub fn apply_env_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(val) = lookup("PLAGSCAN_HEADLESS") {
            if let Ok(headless) = val.parse() {
                self.browser.headless = headless;
                tracing::debug!("Override browser.headless from env: {}", headless);
            }
        }

        if let Some(val) = lookup("PLAGSCAN_CHROME_PATH") {
            if !val.is_empty() {
                tracing::debug!("Override browser.chrome_executable from env: {}", val);
                self.browser.chrome_executable = Some(PathBuf::from(val));
            }
        }

        if let Some(val) = lookup("PLAGSCAN_MAX_SESSIONS") {
            if let Ok(max) = val.parse() {
                self.crawler.max_concurrent_sessions = max;
                tracing::debug!("Override crawler.max_concurrent_sessions from env: {}", max);
            }
        }

        if let Some(val) = lookup("PLAGSCAN_DEADLINE_SECS") {
            if let Ok(secs) = val.parse() {
                self.crawler.default_deadline_secs = secs;
                tracing::debug!("Override crawler.default_deadline_secs from env: {}", secs);
            }
        }
    }

    /// Check that values are usable by the crawler.
    pub fn validate(&self) -> ConfigResult<()> {
        if self.crawler.max_concurrent_sessions == 0 {
            return Err(ConfigError::InvalidValue {
                field: "crawler.max_concurrent_sessions".to_string(),
                reason: "must be at least 1".to_string(),
            });
        }

        if self.crawler.poll_interval_ms == 0 {
            return Err(ConfigError::InvalidValue {
                field: "crawler.poll_interval_ms".to_string(),
                reason: "must be greater than 0".to_string(),
            });
        }

        if self.crawler.step_timeout_secs == 0 {
            return Err(ConfigError::InvalidValue {
                field: "crawler.step_timeout_secs".to_string(),
                reason: "must be greater than 0".to_string(),
            });
        }

        if self.crawler.default_deadline_secs == 0 {
            return Err(ConfigError::InvalidValue {
                field: "crawler.default_deadline_secs".to_string(),
                reason: "must be greater than 0".to_string(),
            });
        }

        if self.crawler.default_deadline_secs > self.crawler.max_deadline_secs {
            return Err(ConfigError::InvalidValue {
                field: "crawler.default_deadline_secs".to_string(),
                reason: format!(
                    "must not exceed crawler.max_deadline_secs ({})",
                    self.crawler.max_deadline_secs
                ),
            });
        }

        if self.browser.window_width == 0 || self.browser.window_height == 0 {
            return Err(ConfigError::InvalidValue {
                field: "browser.window_width/window_height".to_string(),
                reason: "window dimensions must be non-zero".to_string(),
            });
        }

        Ok(())
    }

    /// Save configuration to disk.
    ///
    /// Creates the config directory if it doesn't exist.
    pub fn save(&self) -> ConfigResult<()> {
        let config_path = Self::config_path()?;
        let config_dir = config_path
            .parent()
            .ok_or_else(|| ConfigError::InvalidValue {
                field: "config_path".to_string(),
                reason: "no parent directory".to_string(),
            })?;

        fs::create_dir_all(config_dir)?;
        tracing::debug!("Saving config to {}", config_path.display());

        let contents = toml::to_string_pretty(self)?;
        fs::write(config_path, contents)?;
        Ok(())
    }

    /// Get the path to the configuration file.
    ///
    /// Uses XDG base directories: `~/.config/plagscan/config.toml`
    pub fn config_path() -> ConfigResult<PathBuf> {
        let dirs =
            ProjectDirs::from("com", "plagscan", "plagscan").ok_or(ConfigError::NoConfigDir)?;
        Ok(dirs.config_dir().join("config.toml"))
    }

    /// Get the data directory path. Its `sites/` folder is the fallback
    /// location for user site definitions.
    ///
    /// Uses XDG base directories: `~/.local/share/plagscan`
    pub fn data_dir() -> ConfigResult<PathBuf> {
        let dirs =
            ProjectDirs::from("com", "plagscan", "plagscan").ok_or(ConfigError::NoConfigDir)?;
        Ok(dirs.data_dir().to_path_buf())
    }
}

/// Browser automation settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BrowserConfig {
    /// Run browser in headless mode
    pub headless: bool,
    /// Browser window width
    pub window_width: u32,
    /// Browser window height
    pub window_height: u32,
    /// Timeout for a single DevTools request in seconds
    pub request_timeout_secs: u64,
    /// Explicit Chrome/Chromium executable; auto-detected when absent
    #[serde(skip_serializing_if = "Option::is_none")]
    pub chrome_executable: Option<PathBuf>,
    /// Pick a random desktop user agent for each session
    pub randomize_user_agent: bool,
}

impl Default for BrowserConfig {
    fn default() -> Self {
        Self {
            headless: true,
            window_width: 1080,
            window_height: 1080,
            request_timeout_secs: 30,
            chrome_executable: None,
            randomize_user_agent: true,
        }
    }
}

impl BrowserConfig {
    /// DevTools request timeout as a `Duration`.
    #[must_use]
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

/// Crawl orchestration settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CrawlerConfig {
    /// Deadline applied when the caller doesn't supply one
    pub default_deadline_secs: u64,
    /// Upper bound for caller-supplied deadline overrides
    pub max_deadline_secs: u64,
    /// Delay between two poll ticks in milliseconds
    pub poll_interval_ms: u64,
    /// Timeout for a single driver step (navigate, fill, click)
    pub step_timeout_secs: u64,
    /// Number of isolated sessions that may be open at once
    pub max_concurrent_sessions: usize,
    /// How long a request may wait for a free session slot
    pub session_acquire_timeout_secs: u64,
    /// Directory with extra site definitions
    #[serde(skip_serializing_if = "Option::is_none")]
    pub definitions_dir: Option<PathBuf>,
    /// Site used when the caller doesn't name one
    pub default_site: String,
}

impl Default for CrawlerConfig {
    fn default() -> Self {
        Self {
            default_deadline_secs: 180,
            max_deadline_secs: 600,
            poll_interval_ms: 500,
            step_timeout_secs: 30,
            max_concurrent_sessions: 4,
            session_acquire_timeout_secs: 30,
            definitions_dir: None,
            default_site: "plagium".to_string(),
        }
    }
}

impl CrawlerConfig {
    /// Deadline for a crawl, honoring an optional caller override.
    ///
    /// Overrides are clamped to `max_deadline_secs`.
    #[must_use]
    pub fn resolve_deadline(&self, requested: Option<Duration>) -> Duration {
        let max = Duration::from_secs(self.max_deadline_secs);
        requested
            .unwrap_or_else(|| Duration::from_secs(self.default_deadline_secs))
            .min(max)
    }

    /// Poll tick interval as a `Duration`.
    #[must_use]
    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }

    /// Per-step driver timeout as a `Duration`.
    #[must_use]
    pub fn step_timeout(&self) -> Duration {
        Duration::from_secs(self.step_timeout_secs)
    }

    /// Session slot wait as a `Duration`.
    #[must_use]
    pub fn session_acquire_timeout(&self) -> Duration {
        Duration::from_secs(self.session_acquire_timeout_secs)
    }
}
