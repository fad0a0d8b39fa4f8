//! Site definition types and structures.
//!
//! This module defines the data structures for site definitions loaded from
//! TOML files, plus the built-in Plagium definition.

use crate::error::{Result, SiteError};
use plagscan_core::SiteId;
use scraper::Selector;
use serde::{Deserialize, Serialize};

/// Complete site definition loaded from TOML.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SiteDefinition {
    /// Core site metadata
    pub site: SiteMetadata,

    /// Viewport the selectors were written against
    #[serde(default)]
    pub viewport: Viewport,

    /// Input and trigger controls
    pub form: FormSelectors,

    /// Status message used to detect "no results"
    pub status: StatusSelectors,

    /// Result element collection and its sub-fields
    pub results: ResultSelectors,
}

impl SiteDefinition {
    /// Get the site ID.
    #[must_use]
    pub fn id(&self) -> &SiteId {
        &self.site.id
    }

    /// Get the site name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.site.name
    }

    /// Get the fixed target URL.
    #[must_use]
    pub fn url(&self) -> &str {
        &self.site.url
    }

    /// Built-in definition for the Plagium quick search page.
    #[must_use]
    pub fn plagium() -> Self {
        Self {
            site: SiteMetadata {
                id: SiteId::new("plagium").expect("valid built-in site ID"),
                name: "Plagium".to_string(),
                url: "https://www.plagium.com/".to_string(),
                description: "Plagium quick search for text reuse on the web".to_string(),
            },
            viewport: Viewport {
                width: 1080,
                height: 1080,
            },
            form: FormSelectors {
                text_input: "textarea[id='text']".to_string(),
                submit_button: "button[id='btnQuickSearch']".to_string(),
            },
            status: StatusSelectors {
                message: "div#message".to_string(),
                no_results_phrase:
                    "Plagium did not find documents making use of the text that you entered."
                        .to_string(),
            },
            results: ResultSelectors {
                item: "div.result".to_string(),
                title_link: "a.title".to_string(),
                description: "p > span.description".to_string(),
                percent_badge: "p > span.info > span.rank > span.badge".to_string(),
                count_badge: "p > span.info > span.found > span.badge".to_string(),
            },
        }
    }

    /// Validate the site definition for completeness and correctness.
    pub fn validate(&self) -> Result<()> {
        let site_id = self.site.id.to_string();
        let invalid = |reason: String| SiteError::ValidationError {
            site_id: site_id.clone(),
            reason,
        };

        if self.site.name.trim().is_empty() {
            return Err(invalid("site name cannot be empty".to_string()));
        }

        let url = url::Url::parse(&self.site.url)
            .map_err(|e| invalid(format!("site URL '{}' is invalid: {e}", self.site.url)))?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(invalid(format!(
                "site URL must be http or https, got '{}'",
                url.scheme()
            )));
        }

        if self.viewport.width == 0 || self.viewport.height == 0 {
            return Err(invalid(format!(
                "viewport must be non-zero, got {}x{}",
                self.viewport.width, self.viewport.height
            )));
        }

        if self.status.no_results_phrase.trim().is_empty() {
            return Err(invalid(
                "status.no_results_phrase cannot be empty".to_string(),
            ));
        }

        for (field, selector) in self.selectors() {
            Self::check_selector(field, selector).map_err(invalid)?;
        }

        Ok(())
    }

    /// All selectors with the TOML path they were read from.
    fn selectors(&self) -> [(&'static str, &str); 8] {
        [
            ("form.text_input", &self.form.text_input),
            ("form.submit_button", &self.form.submit_button),
            ("status.message", &self.status.message),
            ("results.item", &self.results.item),
            ("results.title_link", &self.results.title_link),
            ("results.description", &self.results.description),
            ("results.percent_badge", &self.results.percent_badge),
            ("results.count_badge", &self.results.count_badge),
        ]
    }

    fn check_selector(field: &str, selector: &str) -> std::result::Result<(), String> {
        if selector.trim().is_empty() {
            return Err(format!("{field} cannot be empty"));
        }
        Selector::parse(selector)
            .map(|_| ())
            .map_err(|e| format!("{field} is not a valid CSS selector ('{selector}'): {e}"))
    }
}

/// Site metadata.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SiteMetadata {
    /// Unique site identifier
    pub id: SiteId,
    /// Human-readable name
    pub name: String,
    /// Fixed page the crawl starts from
    pub url: String,
    /// Free-form description
    #[serde(default)]
    pub description: String,
}

/// Browser viewport dimensions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Viewport {
    /// Width in CSS pixels
    pub width: u32,
    /// Height in CSS pixels
    pub height: u32,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            width: 1080,
            height: 1080,
        }
    }
}

/// CSS selectors for the submission form.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FormSelectors {
    /// Text input control receiving the submitted text
    pub text_input: String,
    /// Control that triggers the search
    pub submit_button: String,
}

/// Status message selectors.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusSelectors {
    /// Element whose text carries the site's status message
    pub message: String,
    /// Phrase in that message meaning "nothing found"
    pub no_results_phrase: String,
}

impl StatusSelectors {
    /// Whether a status message text reports that nothing was found.
    #[must_use]
    pub fn reports_no_results(&self, message: &str) -> bool {
        message.contains(&self.no_results_phrase)
    }
}

/// CSS selectors for result elements and their fields.
///
/// Field selectors are evaluated relative to each result element.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResultSelectors {
    /// One element per result, in ranking order
    pub item: String,
    /// Anchor carrying the title text and the source link
    pub title_link: String,
    /// Excerpt / description text
    pub description: String,
    /// Similarity percentage badge, e.g. `87%`
    pub percent_badge: String,
    /// Count of similar passages found
    pub count_badge: String,
}
