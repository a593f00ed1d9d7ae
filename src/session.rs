//! Browser session management over the Chrome DevTools Protocol.
//!
//! One Chromium instance drives one tab for the lifetime of a run. The
//! traversal depends only on the capability set exposed here: navigation,
//! bounded selector waits, document snapshots, and synthetic clicks.

use std::time::Duration;

use chromiumoxide::browser::{Browser, BrowserConfig};
use chromiumoxide::page::Page;
use futures_util::StreamExt;
use scraper::Html;
use tokio::task::JoinHandle;
use tokio::time::Instant;
use tracing::{debug, info};

use crate::error::{Result, ScrapeError};

const WAIT_POLL_INTERVAL: Duration = Duration::from_millis(100);
const SETTLE_DELAY: Duration = Duration::from_millis(200);

/// Launch settings for the scraping browser.
#[derive(Debug, Clone)]
pub struct SessionConfig {
    pub headless: bool,
    pub window_width: u32,
    pub window_height: u32,
    /// Upper bound for every DOM wait. A single poll loop, no retries.
    pub wait_timeout: Duration,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            headless: true,
            window_width: 1920,
            window_height: 1080,
            wait_timeout: Duration::from_secs(10),
        }
    }
}

/// A single Chromium instance driving one tab.
pub struct BrowserSession {
    browser: Browser,
    page: Page,
    handler_task: JoinHandle<()>,
    wait_timeout: Duration,
}

impl BrowserSession {
    /// Launch a configured Chromium instance and open a blank tab.
    pub async fn launch(config: &SessionConfig) -> Result<Self> {
        let mut builder = BrowserConfig::builder()
            .window_size(config.window_width, config.window_height)
            .arg("--no-sandbox")
            .arg("--disable-setuid-sandbox")
            .arg("--disable-dev-shm-usage")
            .arg("--disable-popup-blocking")
            .arg("--disable-blink-features=AutomationControlled")
            .arg("--hide-scrollbars")
            .arg("--disable-extensions");
        if config.headless {
            builder = builder.arg("--disable-gpu");
        } else {
            builder = builder.with_head();
        }
        let browser_config = builder.build().map_err(ScrapeError::BrowserConfig)?;

        let (browser, mut handler) = Browser::launch(browser_config).await?;
        let handler_task = tokio::spawn(async move {
            while let Some(event) = handler.next().await {
                if let Err(e) = event {
                    debug!("cdp handler: {e}");
                }
            }
        });
        let page = browser.new_page("about:blank").await?;
        info!(headless = config.headless, "browser launched");

        Ok(Self {
            browser,
            page,
            handler_task,
            wait_timeout: config.wait_timeout,
        })
    }

    /// Load `url` in the tab and give the page a moment to settle.
    pub async fn goto(&self, url: &str) -> Result<()> {
        debug!(url, "navigating");
        self.page.goto(url).await?;
        if let Err(e) = self.page.wait_for_navigation().await {
            debug!("navigation wait: {e}");
        }
        tokio::time::sleep(SETTLE_DELAY).await;
        Ok(())
    }

    /// Bounded poll until `selector` matches at least one element.
    pub async fn wait_for(&self, selector: &str) -> Result<()> {
        let deadline = Instant::now() + self.wait_timeout;
        let script = format!(
            "document.querySelector({}) !== null",
            js_string(selector)
        );
        loop {
            if self.eval_bool(&script).await? {
                return Ok(());
            }
            if Instant::now() >= deadline {
                return Err(ScrapeError::WaitTimeout {
                    selector: selector.to_string(),
                    url: self.current_url().await,
                    timeout_secs: self.wait_timeout.as_secs(),
                });
            }
            tokio::time::sleep(WAIT_POLL_INTERVAL).await;
        }
    }

    /// Scroll the nth element matching `selector` into view and click it
    /// with a synthetic event.
    pub async fn click_nth(&self, selector: &str, index: usize) -> Result<()> {
        let script = format!(
            "(() => {{ \
               const els = document.querySelectorAll({}); \
               const el = els[{index}]; \
               if (!el) return false; \
               el.scrollIntoView(true); \
               el.click(); \
               return true; \
             }})()",
            js_string(selector)
        );
        if self.eval_bool(&script).await? {
            Ok(())
        } else {
            Err(ScrapeError::ElementNotFound {
                context: "click target",
            })
        }
    }

    /// Snapshot the current DOM as a parsed document.
    pub async fn document(&self) -> Result<Html> {
        let content = self.page.content().await?;
        Ok(Html::parse_document(&content))
    }

    pub async fn current_url(&self) -> String {
        self.page.url().await.ok().flatten().unwrap_or_default()
    }

    /// Shut the browser down. Called exactly once on every terminal path.
    pub async fn close(mut self) -> Result<()> {
        let closed = self.browser.close().await;
        self.handler_task.abort();
        closed?;
        info!("browser closed");
        Ok(())
    }

    async fn eval_bool(&self, script: &str) -> Result<bool> {
        let value: serde_json::Value = self
            .page
            .evaluate(script)
            .await?
            .into_value()
            .map_err(|_| ScrapeError::Evaluation {
                context: "boolean result",
            })?;
        Ok(value.as_bool().unwrap_or(false))
    }
}

/// Quote `s` as a JS string literal.
fn js_string(s: &str) -> String {
    serde_json::Value::String(s.to_string()).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn js_string_quotes_and_escapes() {
        assert_eq!(js_string("h1"), "\"h1\"");
        assert_eq!(
            js_string("div[data-testid=\"add-to-coupon-button\"] p"),
            "\"div[data-testid=\\\"add-to-coupon-button\\\"] p\""
        );
    }
}
