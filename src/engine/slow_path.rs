// * Slow Path - Headless Browser Fetching
// * Uses ChromiumOxide when the direct HTTP path is blocked by the source.
// * One isolated browser per fetch sequence; the rendered DOM is parsed like an HTTP body.

use chromiumoxide::browser::{Browser, BrowserConfig};
use chromiumoxide::cdp::browser_protocol::page::AddScriptToEvaluateOnNewDocumentParams;
use chromiumoxide::page::Page;
use futures::StreamExt;
use std::time::Duration;
use tracing::{debug, info, warn};

use crate::config::constants::TABLE_POLL_INTERVAL_MS;
use crate::network::errors::FetchError;
use crate::network::identity::IdentityProfile;
use crate::network::source::{PageQuery, PageSource};
use crate::refinery::tables::{extract_page, RawPage, TableLocator};

// * Stealth payload to mask WebDriver detection
const STEALTH_PAYLOAD: &str = r#"
(() => {
    // * Mask navigator.webdriver
    Object.defineProperty(navigator, 'webdriver', {
        get: () => false,
        configurable: true
    });

    // * Mask languages
    Object.defineProperty(navigator, 'languages', {
        get: () => ['en-US', 'en'],
        configurable: true
    });

    // * Set hardwareConcurrency to 4 (common value)
    Object.defineProperty(navigator, 'hardwareConcurrency', {
        get: () => 4,
        configurable: true
    });

    // * Remove automation indicators from window
    delete window.cdc_adoQpoasnfa76pfcZLmcfl_Array;
    delete window.cdc_adoQpoasnfa76pfcZLmcfl_Promise;
    delete window.cdc_adoQpoasnfa76pfcZLmcfl_Symbol;
})();
"#;

// * BrowserFetcher owns one headless browser between `open` and `close`
pub struct BrowserFetcher {
    navigation_timeout: Duration,
    table_wait_timeout: Duration,
    browser: Option<Browser>,
    page: Option<Page>,
    handler: Option<tokio::task::JoinHandle<()>>,
}

impl BrowserFetcher {
    // * Creates a fetcher (browser not launched until `open`)
    pub fn new(navigation_timeout: Duration, table_wait_timeout: Duration) -> Self {
        Self {
            navigation_timeout,
            table_wait_timeout,
            browser: None,
            page: None,
            handler: None,
        }
    }

    pub fn is_open(&self) -> bool {
        self.browser.is_some()
    }

    fn launch_config() -> Result<BrowserConfig, FetchError> {
        let identity = IdentityProfile::desktop_chrome();
        BrowserConfig::builder()
            .no_sandbox()
            .window_size(1920, 1080)
            .arg("--disable-blink-features=AutomationControlled")
            .arg("--disable-infobars")
            .arg("--disable-dev-shm-usage")
            .arg("--disable-gpu")
            .arg("--disable-setuid-sandbox")
            .arg(format!("--user-agent={}", identity.user_agent))
            .build()
            .map_err(FetchError::Browser)
    }

    // * Launches the browser and prepares a stealth-patched tab
    async fn launch(&mut self) -> Result<(), FetchError> {
        let config = Self::launch_config()?;

        let (browser, mut handler) = Browser::launch(config)
            .await
            .map_err(|e| FetchError::Browser(e.to_string()))?;

        // * Spawn handler in background
        let handle = tokio::spawn(async move {
            while let Some(_event) = handler.next().await {
                // * Process browser events
            }
        });
        self.handler = Some(handle);

        let page = browser
            .new_page("about:blank")
            .await
            .map_err(|e| FetchError::Browser(e.to_string()))?;
        self.browser = Some(browser);

        // * Runs before any page script on every navigation
        page.execute(AddScriptToEvaluateOnNewDocumentParams::new(STEALTH_PAYLOAD))
            .await
            .map_err(|e| FetchError::Browser(e.to_string()))?;

        self.page = Some(page);
        info!("BrowserFetcher browser launched");
        Ok(())
    }

    // * Polls for the table element until it appears or the wait times out
    async fn wait_for_table(page: &Page, selector: &str, timeout: Duration) -> bool {
        let poll = async {
            loop {
                if page.find_element(selector).await.is_ok() {
                    return;
                }
                tokio::time::sleep(Duration::from_millis(TABLE_POLL_INTERVAL_MS)).await;
            }
        };
        tokio::time::timeout(timeout, poll).await.is_ok()
    }

    async fn rendered_markup(page: &Page) -> Result<String, FetchError> {
        page.content()
            .await
            .map_err(|e| FetchError::Browser(e.to_string()))
    }
}

// * Rendered markup goes through the same extractor as an HTTP body,
// * so both strategies yield the same `RawPage` for the same table
fn parse_rendered(html: &str, locator: &TableLocator) -> Result<RawPage, FetchError> {
    extract_page(html, locator)
}

impl PageSource for BrowserFetcher {
    async fn open(&mut self) -> Result<(), FetchError> {
        if self.is_open() {
            return Ok(());
        }
        self.launch().await
    }

    async fn fetch_page(&mut self, query: &PageQuery, page_index: u32) -> Result<RawPage, FetchError> {
        if !self.is_open() {
            self.launch().await?;
        }
        let page = self
            .page
            .as_ref()
            .ok_or_else(|| FetchError::Browser("no open tab".to_string()))?;

        let url = query.page_url(page_index);
        let timeout_ms = self.navigation_timeout.as_millis() as u64;

        // * Navigate with timeout
        match tokio::time::timeout(self.navigation_timeout, page.goto(url.as_str())).await {
            Ok(Ok(_)) => {}
            Ok(Err(e)) => return Err(FetchError::Navigation(e.to_string())),
            Err(_) => return Err(FetchError::Timeout(timeout_ms)),
        }
        debug!("Navigated to {}", url);

        let selector = query.locator.css_selector();
        if !Self::wait_for_table(page, &selector, self.table_wait_timeout).await {
            // * The class may have drifted; the fingerprint fallback can still find it
            warn!("'{}' did not render within {:?}", selector, self.table_wait_timeout);
        }

        let html = Self::rendered_markup(page).await?;
        parse_rendered(&html, &query.locator)
    }

    // * Closes the browser gracefully
    async fn close(&mut self) {
        if let Some(page) = self.page.take() {
            let _ = page.close().await;
        }
        if let Some(mut browser) = self.browser.take() {
            let _ = browser.close().await;
            let _ = browser.wait().await;
        }
        if let Some(handler) = self.handler.take() {
            handler.abort();
        }
        info!("BrowserFetcher shutdown complete");
    }

    fn strategy(&self) -> &'static str {
        "browser"
    }
}

impl Drop for BrowserFetcher {
    fn drop(&mut self) {
        // * Best effort cleanup - can't await in drop
        if let Some(handler) = self.handler.take() {
            handler.abort();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stealth_payload_contains_required_masks() {
        assert!(STEALTH_PAYLOAD.contains("webdriver"));
        assert!(STEALTH_PAYLOAD.contains("languages"));
        assert!(STEALTH_PAYLOAD.contains("hardwareConcurrency"));
    }

    #[test]
    fn test_new_fetcher_is_closed() {
        let fetcher = BrowserFetcher::new(Duration::from_secs(1), Duration::from_secs(1));
        assert!(!fetcher.is_open());
        assert_eq!(fetcher.strategy(), "browser");
    }

    #[test]
    fn test_rendered_rows_match_http_extraction() {
        let html = r#"
            <table class="screener_table">
                <tr><th>Ticker</th><td>Company</td><td>Market Cap</td></tr>
                <tr><th>NVDA</th><td>NVIDIA Corp</td><td>
                    <table class="tooltip"><tr><td>inner</td></tr></table>
                </td></tr>
            </table>
            <table><tr><td id="screener_pagination">
                <a class="screener-pages" href="?r=1">1</a><a class="screener-pages" href="?r=21">2</a>
            </td></tr></table>
        "#;
        let locator = TableLocator::screener();
        let rendered = parse_rendered(html, &locator).unwrap();

        assert_eq!(rendered, extract_page(html, &locator).unwrap());
        // * `th` cells keep their position and nested rows are not counted
        assert_eq!(rendered.rows.len(), 2);
        assert_eq!(rendered.rows[1][0], "NVDA");
        assert_eq!(rendered.rows[1][1], "NVIDIA Corp");
        assert_eq!(rendered.data_row_count(), 1);
        assert!(rendered.has_page_after(1));
    }

    #[test]
    fn test_rendered_page_without_table_is_structural() {
        let err = parse_rendered("<html><body>Loading</body></html>", &TableLocator::screener()).unwrap_err();
        assert!(err.is_structural());
    }
}
