// * Multiples Service
// * The boundary the display layer talks to: one result for the sector summary,
// * one per industry's company listing, each either records or a typed error.

use std::collections::HashSet;
use tracing::{info, warn};
use url::Url;

use crate::config::Settings;
use crate::engine::cache::ResultCache;
use crate::engine::error::{FetchResult, ScrapeError};
use crate::engine::normalization::screener_url;
use crate::engine::pager::{collect, PagerConfig};
use crate::network::errors::FetchError;
use crate::network::source::{Fetcher, PageQuery, PageSource};
use crate::refinery::records::{CompanyRecord, FromRawRecord, SectorRecord};
use crate::refinery::tables::TableLocator;

// * The summary takes no parameters, so it lives under the empty key
const SUMMARY_KEY: &str = "";

pub fn sector_query(settings: &Settings) -> Result<PageQuery, ScrapeError> {
    let url = Url::parse(&settings.sector_url).map_err(FetchError::from)?;
    Ok(PageQuery::new(url, TableLocator::sector_overview(), settings.page_size))
}

pub fn company_query(settings: &Settings, industry: &str) -> Result<PageQuery, ScrapeError> {
    let url = screener_url(&settings.screener_url, industry).ok_or(FetchError::InvalidUrl)?;
    Ok(PageQuery::new(url, TableLocator::screener(), settings.page_size))
}

/// Fetches the one-page sector overview through `source`
pub async fn fetch_sector_summary<S: PageSource>(
    source: &mut S,
    settings: &Settings,
) -> FetchResult<SectorRecord> {
    let query = sector_query(settings)?;
    let schema = settings.sector_layout.schema();

    let outcome = collect(source, &query, &schema, &PagerConfig::single_page()).await?;
    Ok(outcome.records.iter().map(SectorRecord::from_raw).collect())
}

/// Fetches every company of one industry through `source`, in page order.
/// Repeated tickers keep their first occurrence.
pub async fn fetch_companies<S: PageSource>(
    source: &mut S,
    settings: &Settings,
    industry: &str,
) -> FetchResult<CompanyRecord> {
    let query = company_query(settings, industry)?;
    let schema = settings.screener_layout.schema();
    let config = PagerConfig::new(settings.max_pages, settings.page_delay());

    let outcome = collect(source, &query, &schema, &config)
        .await
        .map_err(|e| match e {
            ScrapeError::NoData(_) => ScrapeError::NoData("No data found for this industry".to_string()),
            other => other,
        })?;

    let mut seen = HashSet::new();
    let companies: Vec<CompanyRecord> = outcome
        .records
        .iter()
        .map(CompanyRecord::from_raw)
        .filter(|c| seen.insert(c.ticker.clone()))
        .collect();

    info!(
        "{} companies for '{}' over {} page(s)",
        companies.len(),
        industry,
        outcome.pages_fetched
    );
    Ok(companies)
}

/// Cached access to sector and company data with the configured fetch strategy
pub struct MultiplesService {
    settings: Settings,
    summary: ResultCache<SectorRecord>,
    companies: ResultCache<CompanyRecord>,
}

impl MultiplesService {
    pub fn new(settings: Settings) -> Self {
        Self {
            settings,
            summary: ResultCache::new(),
            companies: ResultCache::new(),
        }
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    // * A fresh fetcher per sequence; the browser variant must not outlive it
    fn fetcher(&self) -> Result<Fetcher, ScrapeError> {
        Fetcher::from_settings(&self.settings).map_err(|e| {
            warn!("Could not build {:?} fetcher: {}", self.settings.strategy, e);
            ScrapeError::from(e)
        })
    }

    pub async fn sector_summary(&self) -> FetchResult<SectorRecord> {
        self.summary
            .get_or_fetch(SUMMARY_KEY, || async {
                let mut fetcher = self.fetcher()?;
                fetch_sector_summary(&mut fetcher, &self.settings).await
            })
            .await
    }

    pub async fn companies(&self, industry: &str) -> FetchResult<CompanyRecord> {
        self.companies
            .get_or_fetch(industry, || async {
                let mut fetcher = self.fetcher()?;
                fetch_companies(&mut fetcher, &self.settings, industry).await
            })
            .await
    }

    pub async fn invalidate_summary(&self) -> bool {
        self.summary.invalidate(SUMMARY_KEY).await
    }

    pub async fn invalidate_companies(&self, industry: &str) -> bool {
        self.companies.invalidate(industry).await
    }

    pub async fn clear(&self) {
        self.summary.clear().await;
        self.companies.clear().await;
    }
}
