// * Pager
// * Drives fetch -> extract cycles across result pages, strictly one page at a time.
// * Stops on the first failure, an empty or short page, a missing next-page link, or the page ceiling.

use serde::Serialize;
use std::time::Duration;
use tracing::{debug, info, warn};

use crate::engine::error::ScrapeError;
use crate::network::source::{PageQuery, PageSource};
use crate::refinery::rows::{extract_rows, RawRecord, TableSchema};
use crate::refinery::tables::RawPage;

#[derive(Debug, Clone)]
pub struct PagerConfig {
    /// Ceiling on pages fetched, counting the first
    pub max_pages: u32,
    /// Fixed pause between consecutive page fetches
    pub delay: Duration,
}

impl PagerConfig {
    pub fn new(max_pages: u32, delay: Duration) -> Self {
        Self { max_pages, delay }
    }

    pub fn single_page() -> Self {
        Self::new(1, Duration::ZERO)
    }
}

/// Why pagination ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum StopReason {
    TransportFailure,
    TableNotFound,
    EmptyPage,
    ShortPage,
    NoNextPage,
    PageLimit,
}

#[derive(Debug, Clone)]
pub struct PagerOutcome {
    pub records: Vec<RawRecord>,
    pub pages_fetched: u32,
    pub stop: StopReason,
}

enum PagerState {
    Fetching(u32),
    Extracting(u32, RawPage),
    Done(StopReason),
}

/// Collects every row of a paginated listing.
///
/// A failure on the first page is an error; a failure on a later page ends pagination
/// and keeps what was gathered. Zero records overall is `ScrapeError::NoData`.
/// The source is closed on every exit path.
pub async fn collect<S: PageSource>(
    source: &mut S,
    query: &PageQuery,
    schema: &TableSchema,
    config: &PagerConfig,
) -> Result<PagerOutcome, ScrapeError> {
    if let Err(e) = source.open().await {
        warn!("Failed to open {} source: {}", source.strategy(), e);
        source.close().await;
        return Err(e.into());
    }

    let result = run(source, query, schema, config).await;
    source.close().await;
    result
}

async fn run<S: PageSource>(
    source: &mut S,
    query: &PageQuery,
    schema: &TableSchema,
    config: &PagerConfig,
) -> Result<PagerOutcome, ScrapeError> {
    let mut records: Vec<RawRecord> = Vec::new();
    let mut pages_fetched = 0;
    let mut state = PagerState::Fetching(0);

    let stop = loop {
        state = match state {
            PagerState::Fetching(page) => {
                if page >= config.max_pages {
                    PagerState::Done(StopReason::PageLimit)
                } else {
                    if page > 0 && !config.delay.is_zero() {
                        tokio::time::sleep(config.delay).await;
                    }

                    info!("Fetching page {} via {}: {}", page + 1, source.strategy(), query.page_url(page));
                    match source.fetch_page(query, page).await {
                        Ok(raw) => {
                            pages_fetched += 1;
                            PagerState::Extracting(page, raw)
                        }
                        Err(e) if page == 0 => {
                            warn!("First page failed: {}", e);
                            return Err(e.into());
                        }
                        Err(e) => {
                            warn!("Page {} failed, keeping {} rows: {}", page + 1, records.len(), e);
                            PagerState::Done(if e.is_structural() {
                                StopReason::TableNotFound
                            } else {
                                StopReason::TransportFailure
                            })
                        }
                    }
                }
            }
            PagerState::Extracting(page, raw) => {
                let extracted = extract_rows(&raw.rows, schema);
                debug!(
                    "Page {}: {} data rows, {} extracted",
                    page + 1,
                    raw.data_row_count(),
                    extracted.len()
                );

                if extracted.is_empty() {
                    PagerState::Done(StopReason::EmptyPage)
                } else {
                    records.extend(extracted);

                    // * Short is judged on rows served, so dropped malformed rows do not end paging early
                    if raw.data_row_count() < query.page_size {
                        PagerState::Done(StopReason::ShortPage)
                    } else if !raw.has_page_after(page + 1) {
                        PagerState::Done(StopReason::NoNextPage)
                    } else {
                        PagerState::Fetching(page + 1)
                    }
                }
            }
            PagerState::Done(reason) => break reason,
        };
    };

    info!(
        "Pagination finished after {} page(s) with {} rows ({:?})",
        pages_fetched,
        records.len(),
        stop
    );

    if records.is_empty() {
        return Err(ScrapeError::NoData("No data found in table".to_string()));
    }

    Ok(PagerOutcome {
        records,
        pages_fetched,
        stop,
    })
}
