// * One fetch capability, two strategies.
// * The Pager only sees `PageSource`; which backend runs is a configuration choice.

use std::future::Future;
use url::Url;

use crate::config::{FetchStrategy, Settings};
use crate::engine::normalization::paginated_url;
use crate::engine::slow_path::BrowserFetcher;
use crate::network::client::HttpFetcher;
use crate::network::errors::FetchError;
use crate::refinery::tables::{RawPage, TableLocator};

/// Identifies one paginated listing on the source site
#[derive(Debug, Clone, PartialEq)]
pub struct PageQuery {
    pub base_url: Url,
    pub locator: TableLocator,
    pub page_size: usize,
}

impl PageQuery {
    pub fn new(base_url: Url, locator: TableLocator, page_size: usize) -> Self {
        Self {
            base_url,
            locator,
            page_size,
        }
    }

    /// URL of the 0-based page `page`
    pub fn page_url(&self, page: u32) -> Url {
        paginated_url(&self.base_url, page, self.page_size)
    }
}

/// Something that can turn a page of a listing into a `RawPage`.
/// `open`/`close` bracket one fetch sequence; the Pager always calls `close`.
pub trait PageSource {
    fn open(&mut self) -> impl Future<Output = Result<(), FetchError>> {
        async { Ok(()) }
    }

    fn fetch_page(
        &mut self,
        query: &PageQuery,
        page: u32,
    ) -> impl Future<Output = Result<RawPage, FetchError>>;

    fn close(&mut self) -> impl Future<Output = ()> {
        async {}
    }

    fn strategy(&self) -> &'static str;
}

/// The configured fetch backend
pub enum Fetcher {
    Http(HttpFetcher),
    Browser(BrowserFetcher),
}

impl Fetcher {
    pub fn from_settings(settings: &Settings) -> Result<Self, FetchError> {
        match settings.strategy {
            FetchStrategy::Http => Ok(Fetcher::Http(HttpFetcher::new(settings.request_timeout())?)),
            FetchStrategy::Browser => Ok(Fetcher::Browser(BrowserFetcher::new(
                settings.navigation_timeout(),
                settings.table_wait_timeout(),
            ))),
        }
    }
}

impl PageSource for Fetcher {
    async fn open(&mut self) -> Result<(), FetchError> {
        match self {
            Fetcher::Http(inner) => inner.open().await,
            Fetcher::Browser(inner) => inner.open().await,
        }
    }

    async fn fetch_page(&mut self, query: &PageQuery, page: u32) -> Result<RawPage, FetchError> {
        match self {
            Fetcher::Http(inner) => inner.fetch_page(query, page).await,
            Fetcher::Browser(inner) => inner.fetch_page(query, page).await,
        }
    }

    async fn close(&mut self) {
        match self {
            Fetcher::Http(inner) => inner.close().await,
            Fetcher::Browser(inner) => inner.close().await,
        }
    }

    fn strategy(&self) -> &'static str {
        match self {
            Fetcher::Http(inner) => inner.strategy(),
            Fetcher::Browser(inner) => inner.strategy(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn query() -> PageQuery {
        PageQuery::new(
            Url::parse("https://finviz.com/screener.ashx?v=152&f=ind_banks").unwrap(),
            TableLocator::screener(),
            20,
        )
    }

    #[test]
    fn test_default_settings_select_http() {
        let fetcher = Fetcher::from_settings(&Settings::default()).unwrap();
        assert!(matches!(fetcher, Fetcher::Http(_)));
        assert_eq!(fetcher.strategy(), "http");
    }

    #[test]
    fn test_browser_strategy_selects_browser_without_launching() {
        let settings = Settings::default().with_strategy(FetchStrategy::Browser);
        let fetcher = Fetcher::from_settings(&settings).unwrap();
        match &fetcher {
            Fetcher::Browser(inner) => assert!(!inner.is_open()),
            Fetcher::Http(_) => panic!("Expected the browser fetcher"),
        }
        assert_eq!(fetcher.strategy(), "browser");
    }

    #[tokio::test]
    async fn test_both_variants_share_the_page_source_calls() {
        // * Port 1 refuses connections, so neither variant gets a page
        let mut query = query();
        query.base_url = Url::parse("http://127.0.0.1:1/screener.ashx?v=152").unwrap();

        let mut http = Fetcher::from_settings(&Settings::default()).unwrap();
        http.open().await.unwrap();
        assert!(matches!(http.fetch_page(&query, 0).await, Err(FetchError::Http(_))));
        http.close().await;

        // * Closing a browser fetcher that never opened is a no-op
        let settings = Settings::default().with_strategy(FetchStrategy::Browser);
        let mut browser = Fetcher::from_settings(&settings).unwrap();
        browser.close().await;
        assert_eq!(browser.strategy(), "browser");
    }

    #[test]
    fn test_page_url_offsets() {
        let query = query();
        assert_eq!(query.page_url(0), query.base_url);
        assert!(query.page_url(1).as_str().ends_with("r=21"));
    }
}
