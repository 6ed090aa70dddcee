use super::{Browser, Session};
use crate::parser::compile;
use crate::{ScraperError, ScraperResult};
use async_trait::async_trait;
use parking_lot::Mutex;
use scraper::Html;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::time::sleep;
use url::Url;

/// A page served by [`MockBrowser`]. Every successful click moves the page to
/// its next HTML state; the last state sticks.
#[derive(Clone, Debug, Default)]
pub struct MockPage {
    pub states: Vec<String>,
    pub delay: Option<Duration>,
    pub fail_navigation: bool,
}

impl MockPage {
    pub fn new(states: Vec<String>) -> Self {
        Self {
            states,
            ..Default::default()
        }
    }

    pub fn single(html: impl Into<String>) -> Self {
        Self::new(vec![html.into()])
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn failing() -> Self {
        Self {
            fail_navigation: true,
            ..Default::default()
        }
    }
}

#[derive(Default)]
struct Counters {
    active: AtomicUsize,
    peak: AtomicUsize,
    opened: AtomicUsize,
    clicks: AtomicUsize,
    js_clicks: AtomicUsize,
}

/// In-memory browser for exercising the crawler without Chromium.
#[derive(Clone, Default)]
pub struct MockBrowser {
    pages: Arc<HashMap<String, MockPage>>,
    native_click_fails: bool,
    script_click_fails: bool,
    counters: Arc<Counters>,
}

impl MockBrowser {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_page(mut self, url: &Url, page: MockPage) -> Self {
        Arc::make_mut(&mut self.pages).insert(url.to_string(), page);
        self
    }

    /// Native clicks error out, as when an overlay intercepts them.
    pub fn with_failing_native_click(mut self) -> Self {
        self.native_click_fails = true;
        self
    }

    /// Script clicks error out too, leaving the control unclickable.
    pub fn with_failing_script_click(mut self) -> Self {
        self.script_click_fails = true;
        self
    }

    pub fn sessions_opened(&self) -> usize {
        self.counters.opened.load(Ordering::SeqCst)
    }

    pub fn peak_sessions(&self) -> usize {
        self.counters.peak.load(Ordering::SeqCst)
    }

    pub fn clicks(&self) -> usize {
        self.counters.clicks.load(Ordering::SeqCst)
    }

    pub fn js_clicks(&self) -> usize {
        self.counters.js_clicks.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Browser for MockBrowser {
    async fn new_session(&self) -> ScraperResult<Box<dyn Session>> {
        let active = self.counters.active.fetch_add(1, Ordering::SeqCst) + 1;
        self.counters.peak.fetch_max(active, Ordering::SeqCst);
        self.counters.opened.fetch_add(1, Ordering::SeqCst);

        Ok(Box::new(MockSession {
            browser: self.clone(),
            current: None,
            state: Mutex::new(0),
        }))
    }

    async fn shutdown(&self) -> ScraperResult<()> {
        Ok(())
    }

    fn active_sessions(&self) -> usize {
        self.counters.active.load(Ordering::SeqCst)
    }
}

pub struct MockSession {
    browser: MockBrowser,
    current: Option<(Url, MockPage)>,
    state: Mutex<usize>,
}

impl MockSession {
    fn html(&self) -> ScraperResult<String> {
        let (url, page) = self
            .current
            .as_ref()
            .ok_or_else(|| ScraperError::NavigationError("no page loaded".to_string()))?;
        let index = (*self.state.lock()).min(page.states.len().saturating_sub(1));
        page.states
            .get(index)
            .cloned()
            .ok_or_else(|| ScraperError::NavigationError(format!("{} has no content", url)))
    }

    fn has_element(&self, selector: &str) -> ScraperResult<bool> {
        let selector = compile(selector)?;
        let html = self.html()?;
        let document = Html::parse_document(&html);
        let found = document.select(&selector).next().is_some();
        Ok(found)
    }

    fn require_element(&self, selector: &str) -> ScraperResult<()> {
        if self.has_element(selector)? {
            Ok(())
        } else {
            Err(ScraperError::ElementNotFound(selector.to_string()))
        }
    }

    fn advance(&self) {
        *self.state.lock() += 1;
    }
}

#[async_trait]
impl Session for MockSession {
    async fn goto(&mut self, url: &Url) -> ScraperResult<()> {
        let page = self
            .browser
            .pages
            .get(url.as_str())
            .cloned()
            .ok_or_else(|| ScraperError::NavigationError(format!("unknown page {}", url)))?;

        if let Some(delay) = page.delay {
            sleep(delay).await;
        }
        if page.fail_navigation {
            return Err(ScraperError::NavigationError(format!("failed to load {}", url)));
        }

        *self.state.lock() = 0;
        self.current = Some((url.clone(), page));
        Ok(())
    }

    async fn current_url(&self) -> ScraperResult<Url> {
        self.current
            .as_ref()
            .map(|(url, _)| url.clone())
            .ok_or_else(|| ScraperError::NavigationError("no page loaded".to_string()))
    }

    async fn wait_for_clickable(&self, selector: &str, _timeout: Duration) -> ScraperResult<bool> {
        self.has_element(selector)
    }

    async fn scroll_into_view(&self, selector: &str) -> ScraperResult<()> {
        self.require_element(selector)
    }

    async fn click(&self, selector: &str) -> ScraperResult<()> {
        self.require_element(selector)?;
        if self.browser.native_click_fails {
            return Err(ScraperError::InteractionError(format!(
                "click on {} intercepted",
                selector
            )));
        }
        self.browser.counters.clicks.fetch_add(1, Ordering::SeqCst);
        self.advance();
        Ok(())
    }

    async fn js_click(&self, selector: &str) -> ScraperResult<()> {
        self.require_element(selector)?;
        if self.browser.script_click_fails {
            return Err(ScraperError::InteractionError(format!(
                "script click on {} failed",
                selector
            )));
        }
        self.browser.counters.js_clicks.fetch_add(1, Ordering::SeqCst);
        self.advance();
        Ok(())
    }

    async fn content(&self) -> ScraperResult<String> {
        self.html()
    }

    async fn close(self: Box<Self>) -> ScraperResult<()> {
        self.browser.counters.active.fetch_sub(1, Ordering::SeqCst);
        Ok(())
    }
}
