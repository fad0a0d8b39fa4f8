#![allow(dead_code)]

use plagscan_browser::{BrowserActions, BrowserError, Result as BrowserResult};
use plagscan_core::CrawlerConfig;
use plagscan_crawler::{CrawlOrchestrator, SessionManager, SessionPool};
use plagscan_site::SiteDefinition;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::time::Instant;

/// How a scripted page behaves after it is opened.
#[derive(Debug, Clone, Default)]
pub struct PageScript {
    /// `navigate` fails as if the site answered 503
    pub unreachable: bool,
    /// The text input never appears
    pub missing_text_input: bool,
    /// Status message shows the no-results phrase after this long
    pub no_match_after: Option<Duration>,
    /// Result elements become visible after this long
    pub results_after: Option<Duration>,
    /// Rendered document returned by `content`
    pub html: String,
    /// `is_visible` panics
    pub panic_while_polling: bool,
    /// The session manager refuses to open pages
    pub refuse_open: bool,
    /// `content` takes this long to answer
    pub content_delay: Option<Duration>,
}

impl PageScript {
    /// Neither signal ever shows up.
    pub fn silent() -> Self {
        Self::default()
    }

    pub fn no_match() -> Self {
        Self {
            no_match_after: Some(Duration::from_secs(2)),
            ..Self::default()
        }
    }

    pub fn results(after: Duration, html: String) -> Self {
        Self {
            results_after: Some(after),
            html,
            ..Self::default()
        }
    }
}

#[derive(Debug, Default)]
pub struct Counters {
    pub opened: AtomicUsize,
    pub closed: AtomicUsize,
    pub live: AtomicUsize,
    pub max_live: AtomicUsize,
    pub navigations: AtomicUsize,
    pub content_reads: AtomicUsize,
    pub submitted: Mutex<Vec<String>>,
}

impl Counters {
    pub fn opened(&self) -> usize {
        self.opened.load(Ordering::SeqCst)
    }

    pub fn closed(&self) -> usize {
        self.closed.load(Ordering::SeqCst)
    }

    pub fn max_live(&self) -> usize {
        self.max_live.load(Ordering::SeqCst)
    }

    pub fn content_reads(&self) -> usize {
        self.content_reads.load(Ordering::SeqCst)
    }

    pub fn navigations(&self) -> usize {
        self.navigations.load(Ordering::SeqCst)
    }

    pub fn submitted(&self) -> Vec<String> {
        self.submitted.lock().unwrap().clone()
    }
}

pub struct ScriptedPage {
    script: PageScript,
    site: SiteDefinition,
    opened_at: Instant,
    counters: Arc<Counters>,
}

impl ScriptedPage {
    fn reached(&self, after: Option<Duration>) -> bool {
        after.is_some_and(|after| self.opened_at.elapsed() >= after)
    }
}

#[async_trait::async_trait]
impl BrowserActions for ScriptedPage {
    async fn navigate(&self, url: &str) -> BrowserResult<()> {
        self.counters.navigations.fetch_add(1, Ordering::SeqCst);
        if self.script.unreachable {
            return Err(BrowserError::NavigationError(format!("{url} answered HTTP 503")));
        }
        Ok(())
    }

    async fn set_viewport(&self, _width: u32, _height: u32) -> BrowserResult<()> {
        Ok(())
    }

    async fn fill_field(&self, selector: &str, value: &str) -> BrowserResult<()> {
        if self.script.missing_text_input {
            return Err(BrowserError::SelectorNotFound(selector.to_string()));
        }
        self.counters.submitted.lock().unwrap().push(value.to_string());
        Ok(())
    }

    async fn click(&self, _selector: &str) -> BrowserResult<()> {
        Ok(())
    }

    async fn is_present(&self, selector: &str) -> BrowserResult<bool> {
        Ok(!(self.script.missing_text_input && selector == self.site.form.text_input))
    }

    async fn is_visible(&self, selector: &str) -> BrowserResult<bool> {
        if self.script.panic_while_polling {
            panic!("renderer crashed");
        }
        if selector == self.site.results.item {
            return Ok(self.reached(self.script.results_after));
        }
        Ok(true)
    }

    async fn text_content(&self, selector: &str) -> BrowserResult<Option<String>> {
        if selector == self.site.status.message && self.reached(self.script.no_match_after) {
            return Ok(Some(format!(
                "\n   {}   ",
                self.site.status.no_results_phrase
            )));
        }
        Ok(Some(String::new()))
    }

    async fn content(&self) -> BrowserResult<String> {
        self.counters.content_reads.fetch_add(1, Ordering::SeqCst);
        if let Some(delay) = self.script.content_delay {
            tokio::time::sleep(delay).await;
        }
        Ok(self.script.html.clone())
    }
}

/// Session manager handing out scripted pages and counting their lifecycle.
pub struct FakeSessions {
    script: PageScript,
    pub counters: Arc<Counters>,
}

#[async_trait::async_trait]
impl SessionManager for FakeSessions {
    type Page = ScriptedPage;

    async fn open(&self) -> BrowserResult<ScriptedPage> {
        if self.script.refuse_open {
            return Err(BrowserError::ChromiumError("browser process exited".to_string()));
        }
        self.counters.opened.fetch_add(1, Ordering::SeqCst);
        let live = self.counters.live.fetch_add(1, Ordering::SeqCst) + 1;
        self.counters.max_live.fetch_max(live, Ordering::SeqCst);

        Ok(ScriptedPage {
            script: self.script.clone(),
            site: SiteDefinition::plagium(),
            opened_at: Instant::now(),
            counters: Arc::clone(&self.counters),
        })
    }

    async fn close(&self, _page: ScriptedPage) {
        self.counters.live.fetch_sub(1, Ordering::SeqCst);
        self.counters.closed.fetch_add(1, Ordering::SeqCst);
    }
}

pub fn test_config() -> CrawlerConfig {
    CrawlerConfig {
        session_acquire_timeout_secs: 30,
        ..CrawlerConfig::default()
    }
}

/// Orchestrator over scripted pages, plus the shared counters.
pub fn crawler(
    script: PageScript,
    pool_size: usize,
    config: CrawlerConfig,
) -> (CrawlOrchestrator<FakeSessions>, Arc<Counters>) {
    let counters = Arc::new(Counters::default());
    let manager = Arc::new(FakeSessions {
        script,
        counters: Arc::clone(&counters),
    });
    let pool = SessionPool::new(manager, pool_size);
    let orchestrator = CrawlOrchestrator::new(pool, Arc::new(SiteDefinition::plagium()), config);
    (orchestrator, counters)
}

/// A text of exactly `chars` characters.
pub fn text_of_len(chars: usize) -> String {
    "lorem ipsum ".chars().cycle().take(chars.saturating_sub(1)).chain(std::iter::once('x')).collect()
}

/// Result page markup in Plagium's layout; each entry is `(title, href, percent)`.
pub fn results_html(entries: &[(&str, &str, &str)]) -> String {
    let blocks: String = entries
        .iter()
        .map(|(title, href, percent)| {
            format!(
                r#"<div class="result">
                    <a class="title" href="{href}">{title}</a>
                    <p>
                        <span class="description">Snippet for {title}</span>
                        <span class="info">
                            <span class="rank"><span class="badge">{percent}</span></span>
                            <span class="found"><span class="badge">2</span></span>
                        </span>
                    </p>
                </div>"#
            )
        })
        .collect();
    format!(r#"<html><body><div id="message"></div>{blocks}</body></html>"#)
}

pub fn no_results_html() -> String {
    format!(
        r#"<html><body><div id="message">{}</div></body></html>"#,
        SiteDefinition::plagium().status.no_results_phrase
    )
}
