// * Sector-Lens: valuation multiples scraped from sector and screener tables.
// * Pipeline: network (fetch) -> refinery (locate, extract, normalize) -> engine (paging, caching).

pub mod config;
pub mod engine;
pub mod network;
pub mod ops;
pub mod refinery;
pub mod report;
