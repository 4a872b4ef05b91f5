pub mod client;
pub mod errors;
pub mod identity;
pub mod source;

pub use client::HttpFetcher;
pub use errors::FetchError;
pub use source::{Fetcher, PageQuery, PageSource};
