use super::{Browser, Session};
use crate::core::ScraperConfig;
use crate::{ScraperError, ScraperResult};
use async_trait::async_trait;
use chromiumoxide::browser::{Browser as CdpBrowser, BrowserConfig};
use chromiumoxide::page::Page;
use futures::StreamExt;
use log::{debug, info, trace};
use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tokio::time::{sleep, Instant};
use url::Url;

pub const CHROME_PATH_ENV: &str = "JOBSCRAPER_CHROME_PATH";

const POLL_INTERVAL: Duration = Duration::from_millis(250);

fn chrome_executable(config: &ScraperConfig) -> Option<PathBuf> {
    config
        .chrome_executable
        .clone()
        .or_else(|| std::env::var(CHROME_PATH_ENV).ok().map(PathBuf::from))
}

/// Headless Chromium driven over CDP. One process per run, one tab per session.
pub struct ChromiumBrowser {
    browser: Mutex<CdpBrowser>,
    handler: JoinHandle<()>,
    active: Arc<AtomicUsize>,
}

impl ChromiumBrowser {
    pub async fn launch(config: &ScraperConfig) -> ScraperResult<Self> {
        let mut builder = BrowserConfig::builder()
            .arg("--log-level=3")
            .arg("--disable-gpu")
            .arg("--no-sandbox")
            .arg("--disable-dev-shm-usage")
            .arg("--disable-extensions");

        if !config.headless {
            builder = builder.with_head();
        }
        if let Some(path) = chrome_executable(config) {
            debug!("Using Chromium executable: {}", path.display());
            builder = builder.chrome_executable(path);
        }

        let browser_config = builder.build().map_err(ScraperError::BrowserConfigError)?;

        info!("Launching Chromium (headless={})", config.headless);
        let (browser, mut handler) = CdpBrowser::launch(browser_config).await?;

        let handler = tokio::spawn(async move {
            while let Some(event) = handler.next().await {
                if let Err(e) = event {
                    trace!("CDP handler event error: {}", e);
                }
            }
        });

        Ok(Self {
            browser: Mutex::new(browser),
            handler,
            active: Arc::new(AtomicUsize::new(0)),
        })
    }
}

impl Drop for ChromiumBrowser {
    fn drop(&mut self) {
        self.handler.abort();
    }
}

#[async_trait]
impl Browser for ChromiumBrowser {
    async fn new_session(&self) -> ScraperResult<Box<dyn Session>> {
        let page = self.browser.lock().await.new_page("about:blank").await?;
        self.active.fetch_add(1, Ordering::SeqCst);

        Ok(Box::new(ChromiumSession {
            page,
            active: Arc::clone(&self.active),
        }))
    }

    async fn shutdown(&self) -> ScraperResult<()> {
        let mut browser = self.browser.lock().await;
        browser.close().await?;
        browser.wait().await?;
        info!("Chromium closed");
        Ok(())
    }

    fn active_sessions(&self) -> usize {
        self.active.load(Ordering::SeqCst)
    }
}

pub struct ChromiumSession {
    page: Page,
    active: Arc<AtomicUsize>,
}

impl ChromiumSession {
    async fn evaluate_bool(&self, script: &str) -> ScraperResult<bool> {
        let result = self.page.evaluate(script).await?;
        Ok(result.into_value::<bool>()?)
    }
}

fn clickable_script(selector: &str) -> ScraperResult<String> {
    Ok(format!(
        r#"(() => {{
            const el = document.querySelector({selector});
            if (!el || el.disabled) return false;
            const style = window.getComputedStyle(el);
            if (style.visibility === 'hidden' || style.display === 'none') return false;
            const rect = el.getBoundingClientRect();
            return rect.width > 0 && rect.height > 0;
        }})()"#,
        selector = serde_json::to_string(selector)?
    ))
}

/// True when the element's centre point hits the element itself, i.e. no
/// overlay would swallow a mouse click there.
fn hit_test_script(selector: &str) -> ScraperResult<String> {
    Ok(format!(
        r#"(() => {{
            const el = document.querySelector({selector});
            if (!el) return false;
            const rect = el.getBoundingClientRect();
            const hit = document.elementFromPoint(rect.left + rect.width / 2, rect.top + rect.height / 2);
            return hit !== null && el.contains(hit);
        }})()"#,
        selector = serde_json::to_string(selector)?
    ))
}

fn js_click_script(selector: &str) -> ScraperResult<String> {
    Ok(format!(
        r#"(() => {{
            const el = document.querySelector({selector});
            if (!el) return false;
            el.click();
            return true;
        }})()"#,
        selector = serde_json::to_string(selector)?
    ))
}

#[async_trait]
impl Session for ChromiumSession {
    async fn goto(&mut self, url: &Url) -> ScraperResult<()> {
        debug!("Navigating to {}", url);
        self.page.goto(url.as_str()).await?;
        Ok(())
    }

    async fn current_url(&self) -> ScraperResult<Url> {
        let url = self
            .page
            .url()
            .await?
            .ok_or_else(|| ScraperError::NavigationError("page has no URL".to_string()))?;
        Ok(Url::parse(&url)?)
    }

    async fn wait_for_clickable(&self, selector: &str, timeout: Duration) -> ScraperResult<bool> {
        let script = clickable_script(selector)?;
        let deadline = Instant::now() + timeout;

        loop {
            if self.evaluate_bool(&script).await? {
                return Ok(true);
            }
            if Instant::now() >= deadline {
                trace!("{} not clickable within {:?}", selector, timeout);
                return Ok(false);
            }
            sleep(POLL_INTERVAL).await;
        }
    }

    async fn scroll_into_view(&self, selector: &str) -> ScraperResult<()> {
        self.page.find_element(selector).await?.scroll_into_view().await?;
        Ok(())
    }

    async fn click(&self, selector: &str) -> ScraperResult<()> {
        let element = self.page.find_element(selector).await?;
        // CDP mouse events land on whatever is on top, so check first
        if !self.evaluate_bool(&hit_test_script(selector)?).await? {
            return Err(ScraperError::InteractionError(format!(
                "click on {} intercepted by another element",
                selector
            )));
        }
        element.click().await?;
        Ok(())
    }

    async fn js_click(&self, selector: &str) -> ScraperResult<()> {
        if self.evaluate_bool(&js_click_script(selector)?).await? {
            Ok(())
        } else {
            Err(ScraperError::ElementNotFound(selector.to_string()))
        }
    }

    async fn content(&self) -> ScraperResult<String> {
        Ok(self.page.content().await?)
    }

    async fn close(self: Box<Self>) -> ScraperResult<()> {
        let ChromiumSession { page, active } = *self;
        active.fetch_sub(1, Ordering::SeqCst);
        page.close().await?;
        Ok(())
    }
}
