// * Runtime settings for a Sector-Lens process.
// * Defaults come from `constants`; the CLI overrides individual fields.

use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::config::constants::{
    API_KEY_ENV, BROWSER_PAGE_DELAY_MS, HTTP_PAGE_DELAY_MS, MAX_PAGES, PAGE_SIZE,
    PAGE_TIMEOUT_MS, REQUEST_TIMEOUT_MS, SCREENER_URL, SECTOR_OVERVIEW_URL,
    TABLE_WAIT_TIMEOUT_MS,
};
use crate::refinery::rows::TableSchema;

/// Which fetch backend drives page retrieval.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum, Default)]
#[serde(rename_all = "snake_case")]
pub enum FetchStrategy {
    /// Plain HTTP GET with a browser-like header set
    #[default]
    Http,
    /// Headless Chromium, cell text read through the DOM
    Browser,
}

/// Column layout of the industry overview table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum, Default)]
#[serde(rename_all = "snake_case")]
pub enum SectorLayout {
    /// Name in the first cell
    Plain,
    /// Leading "No." column before the name
    #[default]
    Numbered,
}

impl SectorLayout {
    pub fn schema(self) -> TableSchema {
        match self {
            SectorLayout::Plain => TableSchema::sector_overview(),
            SectorLayout::Numbered => TableSchema::sector_overview_numbered(),
        }
    }
}

/// Column layout of the screener table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum, Default)]
#[serde(rename_all = "snake_case")]
pub enum ScreenerLayout {
    /// Ticker in the first cell
    #[default]
    Plain,
    /// Leading "No." column before the ticker
    Numbered,
}

impl ScreenerLayout {
    pub fn schema(self) -> TableSchema {
        match self {
            ScreenerLayout::Plain => TableSchema::screener(),
            ScreenerLayout::Numbered => TableSchema::screener_numbered(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    pub strategy: FetchStrategy,
    pub sector_url: String,
    pub screener_url: String,
    pub sector_layout: SectorLayout,
    pub screener_layout: ScreenerLayout,
    pub page_size: usize,
    pub max_pages: u32,
    pub http_delay_ms: u64,
    pub browser_delay_ms: u64,
    pub request_timeout_ms: u64,
    pub navigation_timeout_ms: u64,
    pub table_wait_timeout_ms: u64,
    // * Declared for parity with the hosted deployment; nothing sends it
    #[serde(skip_serializing)]
    pub api_key: Option<String>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            strategy: FetchStrategy::default(),
            sector_url: SECTOR_OVERVIEW_URL.to_string(),
            screener_url: SCREENER_URL.to_string(),
            sector_layout: SectorLayout::default(),
            screener_layout: ScreenerLayout::default(),
            page_size: PAGE_SIZE,
            max_pages: MAX_PAGES,
            http_delay_ms: HTTP_PAGE_DELAY_MS,
            browser_delay_ms: BROWSER_PAGE_DELAY_MS,
            request_timeout_ms: REQUEST_TIMEOUT_MS,
            navigation_timeout_ms: PAGE_TIMEOUT_MS,
            table_wait_timeout_ms: TABLE_WAIT_TIMEOUT_MS,
            api_key: None,
        }
    }
}

impl Settings {
    /// Defaults plus the optional API key from the environment.
    pub fn from_env() -> Self {
        let api_key = std::env::var(API_KEY_ENV)
            .ok()
            .filter(|key| !key.trim().is_empty());
        Self {
            api_key,
            ..Self::default()
        }
    }

    pub fn with_strategy(mut self, strategy: FetchStrategy) -> Self {
        self.strategy = strategy;
        self
    }

    pub fn with_max_pages(mut self, max_pages: u32) -> Self {
        self.max_pages = max_pages;
        self
    }

    pub fn with_sector_layout(mut self, layout: SectorLayout) -> Self {
        self.sector_layout = layout;
        self
    }

    pub fn with_screener_layout(mut self, layout: ScreenerLayout) -> Self {
        self.screener_layout = layout;
        self
    }

    pub fn with_page_delay_ms(mut self, delay_ms: u64) -> Self {
        self.http_delay_ms = delay_ms;
        self.browser_delay_ms = delay_ms;
        self
    }

    // * The browser path is slower to render, so it waits longer between pages
    pub fn page_delay(&self) -> Duration {
        match self.strategy {
            FetchStrategy::Http => Duration::from_millis(self.http_delay_ms),
            FetchStrategy::Browser => Duration::from_millis(self.browser_delay_ms),
        }
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }

    pub fn navigation_timeout(&self) -> Duration {
        Duration::from_millis(self.navigation_timeout_ms)
    }

    pub fn table_wait_timeout(&self) -> Duration {
        Duration::from_millis(self.table_wait_timeout_ms)
    }
}
