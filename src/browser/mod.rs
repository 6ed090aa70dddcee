pub mod chromium;
pub mod mock_browser;

pub use chromium::ChromiumBrowser;
pub use mock_browser::{MockBrowser, MockPage};

use crate::ScraperResult;
use async_trait::async_trait;
use std::time::Duration;
use url::Url;

/// A browser engine handing out independent sessions (tabs).
#[async_trait]
pub trait Browser: Send + Sync {
    async fn new_session(&self) -> ScraperResult<Box<dyn Session>>;
    async fn shutdown(&self) -> ScraperResult<()>;
    fn active_sessions(&self) -> usize;
}

/// One open page. Selectors are CSS selectors.
#[async_trait]
pub trait Session: Send + Sync {
    async fn goto(&mut self, url: &Url) -> ScraperResult<()>;
    async fn current_url(&self) -> ScraperResult<Url>;

    /// Polls until an element matching `selector` is visible and enabled.
    /// Returns `false` once `timeout` elapses without one.
    async fn wait_for_clickable(&self, selector: &str, timeout: Duration) -> ScraperResult<bool>;

    async fn scroll_into_view(&self, selector: &str) -> ScraperResult<()>;
    async fn click(&self, selector: &str) -> ScraperResult<()>;

    /// Clicks through `HTMLElement.click()`, bypassing overlays that
    /// intercept real mouse events.
    async fn js_click(&self, selector: &str) -> ScraperResult<()>;

    /// Serialized DOM as it currently stands, including lazily loaded nodes.
    async fn content(&self) -> ScraperResult<String>;

    async fn close(self: Box<Self>) -> ScraperResult<()>;
}
