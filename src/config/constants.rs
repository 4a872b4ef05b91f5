// * Configuration Constants
// * Central location for all default URLs, thresholds and timeouts

// * Industry overview (one row per industry group)
pub const SECTOR_OVERVIEW_URL: &str =
    "https://finviz.com/groups.ashx?g=industry&v=152&o=name&c=0,1,2,3,4,6,7,10,13,22,24,25,26";

// * Screener base; the industry filter is appended as `f=ind_<slug>`
pub const SCREENER_URL: &str = "https://finviz.com/screener.ashx?v=152";

// * Screener column selection matching the company schema
pub const SCREENER_COLUMNS: &str = "1,2,6,7,8,10,11,75,21,82,39,40,41,63";

// * Rows the screener renders per page
pub const PAGE_SIZE: usize = 20;

// * Upper bound on pages fetched per industry
pub const MAX_PAGES: u32 = 5;

// * Pause between consecutive page fetches (direct HTTP)
pub const HTTP_PAGE_DELAY_MS: u64 = 1_000;

// * Pause between consecutive page fetches (headless browser)
pub const BROWSER_PAGE_DELAY_MS: u64 = 2_000;

// * Whole-request timeout for the direct HTTP strategy
pub const REQUEST_TIMEOUT_MS: u64 = 30_000;

// * Page navigation timeout in milliseconds
pub const PAGE_TIMEOUT_MS: u64 = 60_000;

// * How long the browser waits for the data table to render
pub const TABLE_WAIT_TIMEOUT_MS: u64 = 60_000;

// * Poll interval while waiting for the table element
pub const TABLE_POLL_INTERVAL_MS: u64 = 250;

// * Placeholder API key variable (read, never sent)
pub const API_KEY_ENV: &str = "FINVIZ_API_KEY";

// * Sentinel stored for cells a row does not carry
pub const NOT_AVAILABLE: &str = "N/A";
