use crate::error::{BrowserError, Result};
use crate::fingerprint::Fingerprint;
use crate::page::IsolatedPage;
use chromiumoxide::browser::{Browser, BrowserConfig as ChromiumConfig};
use chromiumoxide::cdp::browser_protocol::browser::BrowserContextId;
use chromiumoxide::cdp::browser_protocol::emulation::SetUserAgentOverrideParams;
use chromiumoxide::cdp::browser_protocol::target::{
    CreateBrowserContextParams, CreateTargetParams, DisposeBrowserContextParams,
};
use futures::stream::StreamExt;
use plagscan_core::BrowserConfig;
use tokio::task::JoinHandle;

/// Browser automation engine.
///
/// Owns the single Chromium process. Pages are never created in the default
/// context: each one gets a fresh browser context that is disposed with it.
pub struct BrowserEngine {
    browser: Browser,
    handler_task: JoinHandle<()>,
    randomize_user_agent: bool,
}

impl BrowserEngine {
    /// Create a new browser engine with default configuration
    pub async fn new() -> Result<Self> {
        Self::launch(&BrowserConfig::default()).await
    }

    /// Launch Chromium according to the browser settings.
    pub async fn launch(settings: &BrowserConfig) -> Result<Self> {
        let mut builder = ChromiumConfig::builder()
            .no_sandbox()
            .window_size(settings.window_width, settings.window_height)
            .request_timeout(settings.request_timeout());

        if !settings.headless {
            builder = builder.with_head();
        }
        if let Some(path) = &settings.chrome_executable {
            builder = builder.chrome_executable(path);
        }

        let config = builder.build().map_err(BrowserError::ChromiumError)?;

        let (browser, mut handler) = Browser::launch(config)
            .await
            .map_err(|e| BrowserError::ChromiumError(e.to_string()))?;

        // Spawn browser handler
        let handler_task = tokio::spawn(async move {
            while let Some(event) = handler.next().await {
                if let Err(e) = event {
                    tracing::trace!(error = %e, "browser handler event error");
                }
            }
        });

        tracing::info!(headless = settings.headless, "browser launched");

        Ok(Self {
            browser,
            handler_task,
            randomize_user_agent: settings.randomize_user_agent,
        })
    }

    /// Open a blank page in a brand-new browser context.
    ///
    /// Nothing is shared with other pages: cookies, storage and cache are
    /// scoped to the context.
    pub async fn open_isolated_page(&self) -> Result<IsolatedPage> {
        let context_id = self
            .browser
            .execute(CreateBrowserContextParams::default())
            .await
            .map_err(|e| BrowserError::ChromiumError(format!("create context: {e}")))?
            .result
            .browser_context_id;

        match self.new_page_in(&context_id).await {
            Ok(page) => {
                tracing::debug!(context = ?context_id, "isolated page opened");
                Ok(IsolatedPage { page, context_id })
            }
            Err(e) => {
                self.dispose_context(context_id).await;
                Err(e)
            }
        }
    }

    async fn new_page_in(&self, context_id: &BrowserContextId) -> Result<chromiumoxide::Page> {
        let params = CreateTargetParams::builder()
            .url("about:blank")
            .browser_context_id(context_id.clone())
            .build()
            .map_err(BrowserError::ChromiumError)?;

        let page = self
            .browser
            .new_page(params)
            .await
            .map_err(|e| BrowserError::ChromiumError(format!("create page: {e}")))?;

        let fingerprint = if self.randomize_user_agent {
            Fingerprint::randomized()
        } else {
            Fingerprint::stable()
        };
        let user_agent = SetUserAgentOverrideParams::builder()
            .user_agent(fingerprint.user_agent)
            .accept_language(fingerprint.accept_language)
            .build()
            .map_err(BrowserError::ChromiumError)?;
        page.execute(user_agent)
            .await
            .map_err(|e| BrowserError::ChromiumError(format!("set user agent: {e}")))?;

        Ok(page)
    }

    /// Close a page and dispose its context. Never fails; problems are logged.
    pub async fn close_isolated_page(&self, page: IsolatedPage) {
        let IsolatedPage { page, context_id } = page;

        if let Err(e) = page.close().await {
            tracing::debug!(error = %e, "page close failed, disposing context anyway");
        }
        self.dispose_context(context_id).await;
    }

    async fn dispose_context(&self, context_id: BrowserContextId) {
        match self
            .browser
            .execute(DisposeBrowserContextParams::new(context_id.clone()))
            .await
        {
            Ok(_) => tracing::debug!(context = ?context_id, "browser context disposed"),
            Err(e) => tracing::warn!(context = ?context_id, error = %e, "failed to dispose browser context"),
        }
    }

    /// Close the browser process and wait for it to exit.
    pub async fn shutdown(mut self) {
        if let Err(e) = self.browser.close().await {
            tracing::warn!(error = %e, "browser close failed");
        }
        if let Err(e) = self.browser.wait().await {
            tracing::debug!(error = %e, "browser wait failed");
        }
        self.handler_task.abort();
    }
}

impl Drop for BrowserEngine {
    fn drop(&mut self) {
        self.handler_task.abort();
    }
}
