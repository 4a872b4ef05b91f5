use regex::Regex;
use reqwest::{Client, StatusCode};
use std::sync::LazyLock;
use std::time::Duration;
use tracing::debug;

use crate::network::errors::FetchError;
use crate::network::identity::IdentityProfile;
use crate::network::source::{PageQuery, PageSource};
use crate::refinery::tables::{extract_page, RawPage};

// * Challenge and block pages answer 200 but carry one of these titles
static BAN_TITLE_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?is)<title>[^<]*(Just a moment|Attention Required|Access Denied|Security Check)[^<]*</title>")
        .expect("! CRITICAL: Failed to compile Soft Ban Regex")
});

// * The direct HTTP strategy: one GET per page, fixed headers, no retry.
pub struct HttpFetcher {
    inner: Client,
}

impl HttpFetcher {
    // * Builds the client with the desktop identity baked into its default headers.
    pub fn new(timeout: Duration) -> Result<Self, FetchError> {
        let headers = IdentityProfile::desktop_chrome().headers()?;

        let client = Client::builder()
            .default_headers(headers)
            .cookie_store(true)
            .gzip(true)
            .brotli(true)
            .timeout(timeout)
            .build()?;

        Ok(Self { inner: client })
    }

    // * Fetches a URL; anything other than 200 fails immediately.
    pub async fn fetch(&self, url: &str) -> Result<String, FetchError> {
        let resp = self.inner.get(url).send().await?;
        let status = resp.status();

        if status != StatusCode::OK {
            return Err(FetchError::Status(status.as_u16()));
        }

        let body = resp.text().await?;
        detect_soft_ban(&body)?;

        Ok(body)
    }
}

pub fn detect_soft_ban(body: &str) -> Result<(), FetchError> {
    if let Some(cap) = BAN_TITLE_REGEX.captures(body) {
        let trigger = cap.get(1).map(|m| m.as_str()).unwrap_or_default();
        return Err(FetchError::Blocked(format!("Title Trigger: {}", trigger)));
    }
    Ok(())
}

impl PageSource for HttpFetcher {
    async fn fetch_page(&mut self, query: &PageQuery, page: u32) -> Result<RawPage, FetchError> {
        let url = query.page_url(page);
        debug!("GET {}", url);
        let body = self.fetch(url.as_str()).await?;
        extract_page(&body, &query.locator)
    }

    fn strategy(&self) -> &'static str {
        "http"
    }
}
