//! Bounded pool of isolated browser sessions.
//!
//! A [`CrawlSession`] holds one pool slot and one isolated page. The
//! orchestrator releases it explicitly; if the crawl future is dropped
//! instead, `Drop` hands the page back on the current runtime.

use crate::error::SessionError;
use plagscan_browser::{BrowserActions, BrowserEngine, BrowserError, IsolatedPage};
use std::sync::Arc;
use std::time::Duration;
use tokio::runtime::Handle;
use tokio::sync::{OwnedSemaphorePermit, Semaphore};
use tracing::{debug, warn};
use uuid::Uuid;

/// Source of isolated pages.
#[async_trait::async_trait]
pub trait SessionManager: Send + Sync + 'static {
    /// Page type handed to the crawl pipeline.
    type Page: BrowserActions + 'static;

    /// Open a page that shares no state with any other page.
    async fn open(&self) -> Result<Self::Page, BrowserError>;

    /// Close a page and dispose everything it owned. Must not fail.
    async fn close(&self, page: Self::Page);
}

#[async_trait::async_trait]
impl SessionManager for BrowserEngine {
    type Page = IsolatedPage;

    async fn open(&self) -> Result<IsolatedPage, BrowserError> {
        self.open_isolated_page().await
    }

    async fn close(&self, page: IsolatedPage) {
        self.close_isolated_page(page).await;
    }
}

/// At most `capacity` sessions are live at any time.
pub struct SessionPool<M: SessionManager> {
    manager: Arc<M>,
    slots: Arc<Semaphore>,
    capacity: usize,
}

impl<M: SessionManager> Clone for SessionPool<M> {
    fn clone(&self) -> Self {
        Self {
            manager: Arc::clone(&self.manager),
            slots: Arc::clone(&self.slots),
            capacity: self.capacity,
        }
    }
}

impl<M: SessionManager> SessionPool<M> {
    /// Create a pool; a capacity of 0 is raised to 1.
    pub fn new(manager: Arc<M>, capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            manager,
            slots: Arc::new(Semaphore::new(capacity)),
            capacity,
        }
    }

    /// Maximum number of live sessions.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Slots not currently held by a session.
    pub fn available(&self) -> usize {
        self.slots.available_permits()
    }

    /// Wait up to `wait` for a free slot, then open a fresh page in it.
    pub async fn acquire(&self, wait: Duration) -> Result<CrawlSession<M>, SessionError> {
        let permit = match tokio::time::timeout(wait, Arc::clone(&self.slots).acquire_owned()).await
        {
            Ok(Ok(permit)) => permit,
            Ok(Err(_)) => {
                return Err(SessionError::Unavailable("session pool is closed".to_string()));
            }
            Err(_) => {
                warn!(capacity = self.capacity, wait = ?wait, "session pool exhausted");
                return Err(SessionError::Unavailable(format!(
                    "all {} sessions busy for {}ms",
                    self.capacity,
                    wait.as_millis()
                )));
            }
        };

        let page = self
            .manager
            .open()
            .await
            .map_err(|e| SessionError::Unavailable(format!("could not open isolated page: {e}")))?;

        let id = Uuid::new_v4();
        debug!(session = %id, available = self.available(), "session acquired");

        Ok(CrawlSession {
            id,
            page: Some(page),
            manager: Arc::clone(&self.manager),
            permit: Some(permit),
        })
    }

    /// Stop handing out sessions. Pending and future acquires fail.
    pub fn close(&self) {
        self.slots.close();
    }
}

/// One exclusively owned isolated page plus its pool slot.
pub struct CrawlSession<M: SessionManager> {
    id: Uuid,
    page: Option<M::Page>,
    manager: Arc<M>,
    permit: Option<OwnedSemaphorePermit>,
}

impl<M: SessionManager> CrawlSession<M> {
    /// Identifier used in logs and reports.
    pub fn id(&self) -> Uuid {
        self.id
    }

    /// The live page, or an error after release.
    pub fn page(&self) -> Result<&M::Page, SessionError> {
        self.page.as_ref().ok_or(SessionError::Released)
    }

    /// Whether the page has been handed back.
    pub fn is_released(&self) -> bool {
        self.page.is_none()
    }

    /// Close the page and free the slot. Calling it again is a no-op.
    ///
    /// The close runs on its own task and completes even if this future is
    /// dropped while waiting for it.
    pub async fn release(&mut self) {
        let Some(page) = self.page.take() else {
            self.permit.take();
            return;
        };
        let manager = Arc::clone(&self.manager);
        let permit = self.permit.take();
        let id = self.id;

        let closing = tokio::spawn(async move {
            manager.close(page).await;
            drop(permit);
        });
        match closing.await {
            Ok(()) => debug!(session = %id, "session released"),
            Err(e) => warn!(session = %id, error = %e, "closing session failed"),
        }
    }
}

impl<M: SessionManager> Drop for CrawlSession<M> {
    fn drop(&mut self) {
        let Some(page) = self.page.take() else {
            return;
        };
        let manager = Arc::clone(&self.manager);
        let permit = self.permit.take();
        let id = self.id;

        match Handle::try_current() {
            Ok(handle) => {
                debug!(session = %id, "session dropped before release, closing in background");
                handle.spawn(async move {
                    manager.close(page).await;
                    drop(permit);
                    debug!(session = %id, "session released");
                });
            }
            Err(_) => warn!(session = %id, "session dropped outside a runtime, page leaked"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use plagscan_browser::Result as BrowserResult;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct NullPage;

    #[async_trait::async_trait]
    impl BrowserActions for NullPage {
        async fn navigate(&self, _url: &str) -> BrowserResult<()> {
            Ok(())
        }
        async fn set_viewport(&self, _width: u32, _height: u32) -> BrowserResult<()> {
            Ok(())
        }
        async fn fill_field(&self, _selector: &str, _value: &str) -> BrowserResult<()> {
            Ok(())
        }
        async fn click(&self, _selector: &str) -> BrowserResult<()> {
            Ok(())
        }
        async fn is_present(&self, _selector: &str) -> BrowserResult<bool> {
            Ok(true)
        }
        async fn is_visible(&self, _selector: &str) -> BrowserResult<bool> {
            Ok(false)
        }
        async fn text_content(&self, _selector: &str) -> BrowserResult<Option<String>> {
            Ok(None)
        }
        async fn content(&self) -> BrowserResult<String> {
            Ok(String::new())
        }
    }

    #[derive(Default)]
    struct CountingManager {
        opened: AtomicUsize,
        closed: AtomicUsize,
        refuse: bool,
        close_delay: Option<Duration>,
    }

    #[async_trait::async_trait]
    impl SessionManager for CountingManager {
        type Page = NullPage;

        async fn open(&self) -> Result<NullPage, BrowserError> {
            if self.refuse {
                return Err(BrowserError::ChromiumError("browser gone".to_string()));
            }
            self.opened.fetch_add(1, Ordering::SeqCst);
            Ok(NullPage)
        }

        async fn close(&self, _page: NullPage) {
            if let Some(delay) = self.close_delay {
                tokio::time::sleep(delay).await;
            }
            self.closed.fetch_add(1, Ordering::SeqCst);
        }
    }

    #[tokio::test]
    async fn test_release_is_idempotent() {
        let manager = Arc::new(CountingManager::default());
        let pool = SessionPool::new(Arc::clone(&manager), 2);

        let mut session = pool.acquire(Duration::from_secs(1)).await.unwrap();
        assert_eq!(pool.available(), 1);
        assert!(session.page().is_ok());

        session.release().await;
        session.release().await;
        assert!(session.is_released());
        assert!(matches!(session.page(), Err(SessionError::Released)));
        assert_eq!(manager.closed.load(Ordering::SeqCst), 1);
        assert_eq!(pool.available(), 2);

        drop(session);
        tokio::task::yield_now().await;
        assert_eq!(manager.closed.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_drop_releases_in_background() {
        let manager = Arc::new(CountingManager::default());
        let pool = SessionPool::new(Arc::clone(&manager), 1);

        let session = pool.acquire(Duration::from_secs(1)).await.unwrap();
        drop(session);

        // Slot comes back once the background close ran
        let again = pool.acquire(Duration::from_secs(1)).await;
        assert!(again.is_ok());
        assert_eq!(manager.closed.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_abandoned_release_still_closes_page() {
        let manager = Arc::new(CountingManager {
            close_delay: Some(Duration::from_secs(1)),
            ..CountingManager::default()
        });
        let pool = SessionPool::new(Arc::clone(&manager), 1);

        let mut session = pool.acquire(Duration::from_secs(1)).await.unwrap();
        let abandoned = tokio::time::timeout(Duration::from_millis(10), session.release()).await;
        assert!(abandoned.is_err());
        assert!(session.is_released());
        drop(session);

        tokio::time::sleep(Duration::from_secs(2)).await;
        assert_eq!(manager.closed.load(Ordering::SeqCst), 1);
        assert_eq!(pool.available(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_exhausted_pool_times_out() {
        let manager = Arc::new(CountingManager::default());
        let pool = SessionPool::new(Arc::clone(&manager), 1);

        let _held = pool.acquire(Duration::from_secs(1)).await.unwrap();
        let second = pool.acquire(Duration::from_secs(5)).await;
        assert!(matches!(second, Err(SessionError::Unavailable(_))));
        assert_eq!(manager.opened.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_open_failure_frees_slot() {
        let manager = Arc::new(CountingManager {
            refuse: true,
            ..CountingManager::default()
        });
        let pool = SessionPool::new(Arc::clone(&manager), 1);

        let result = pool.acquire(Duration::from_secs(1)).await;
        assert!(matches!(result, Err(SessionError::Unavailable(msg)) if msg.contains("browser gone")));
        assert_eq!(pool.available(), 1);
    }

    #[tokio::test]
    async fn test_closed_pool_refuses() {
        let pool = SessionPool::new(Arc::new(CountingManager::default()), 1);
        pool.close();
        assert!(pool.acquire(Duration::from_secs(1)).await.is_err());
    }

    #[test]
    fn test_zero_capacity_is_raised() {
        let pool = SessionPool::new(Arc::new(CountingManager::default()), 0);
        assert_eq!(pool.capacity(), 1);
    }
}
