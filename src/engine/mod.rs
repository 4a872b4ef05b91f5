pub mod cache;
pub mod error;
pub mod multiples;
pub mod normalization;
pub mod pager;
pub mod slow_path;

pub use cache::ResultCache;
pub use error::{FetchResult, ScrapeError, ScrapeErrorKind};
pub use multiples::{fetch_companies, fetch_sector_summary, MultiplesService};
pub use pager::{collect, PagerConfig, PagerOutcome, StopReason};
pub use slow_path::BrowserFetcher;
