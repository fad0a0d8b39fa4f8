//! Turns the rendered result page into raw records.

use crate::error::ExtractError;
use crate::record::RawRecord;
use crate::sanitize::clean_text;
use plagscan_browser::BrowserActions;
use plagscan_site::SiteDefinition;
use scraper::{ElementRef, Html, Selector};
use tracing::debug;
use url::Url;

/// Reads result entries out of the rendered page.
pub struct ResultExtractor<'a> {
    site: &'a SiteDefinition,
}

/// Selectors compiled once per extraction.
struct CompiledSelectors {
    status: Selector,
    item: Selector,
    title_link: Selector,
    description: Selector,
    percent_badge: Selector,
    count_badge: Selector,
}

impl CompiledSelectors {
    fn compile(site: &SiteDefinition) -> Result<Self, ExtractError> {
        Ok(Self {
            status: compile("status.message", &site.status.message)?,
            item: compile("results.item", &site.results.item)?,
            title_link: compile("results.title_link", &site.results.title_link)?,
            description: compile("results.description", &site.results.description)?,
            percent_badge: compile("results.percent_badge", &site.results.percent_badge)?,
            count_badge: compile("results.count_badge", &site.results.count_badge)?,
        })
    }
}

fn compile(field: &'static str, selector: &str) -> Result<Selector, ExtractError> {
    Selector::parse(selector).map_err(|e| ExtractError::Selector {
        field,
        reason: e.to_string(),
    })
}

fn text_of(element: &ElementRef<'_>) -> String {
    element.text().collect()
}

impl<'a> ResultExtractor<'a> {
    /// Extractor using the result selectors of `site`.
    pub fn new(site: &'a SiteDefinition) -> Self {
        Self { site }
    }

    /// Read the rendered document from `page` and parse it.
    pub async fn extract<P>(&self, page: &P) -> Result<Vec<RawRecord>, ExtractError>
    where
        P: BrowserActions + ?Sized,
    {
        let html = page
            .content()
            .await
            .map_err(|e| ExtractError::Document(e.to_string()))?;
        self.parse(&html)
    }

    /// Parse result entries in document order.
    ///
    /// Returns no records when the status message reports no results, even if
    /// stale result elements are still in the document.
    pub fn parse(&self, html: &str) -> Result<Vec<RawRecord>, ExtractError> {
        let selectors = CompiledSelectors::compile(self.site)?;
        let document = Html::parse_document(html);

        if let Some(status) = document.select(&selectors.status).next() {
            if self.site.status.reports_no_results(&clean_text(&text_of(&status))) {
                debug!(site = %self.site.id(), "status message reports no results");
                return Ok(Vec::new());
            }
        }

        let base_url = Url::parse(self.site.url()).ok();
        let records: Vec<RawRecord> = document
            .select(&selectors.item)
            .map(|item| {
                let link = item.select(&selectors.title_link).next();
                RawRecord {
                    title: link.as_ref().map(text_of),
                    url: link
                        .and_then(|a| a.value().attr("href"))
                        .map(|href| resolve_url(base_url.as_ref(), href)),
                    description: item.select(&selectors.description).next().as_ref().map(text_of),
                    percent_text: item.select(&selectors.percent_badge).next().as_ref().map(text_of),
                    count_text: item.select(&selectors.count_badge).next().as_ref().map(text_of),
                }
            })
            .collect();

        debug!(site = %self.site.id(), count = records.len(), "extracted result elements");
        Ok(records)
    }
}

/// Resolve a possibly relative link against the site URL.
fn resolve_url(base: Option<&Url>, href: &str) -> String {
    let href = href.trim();
    match base.map(|b| b.join(href)) {
        Some(Ok(url)) => url.to_string(),
        _ => href.to_string(),
    }
}
