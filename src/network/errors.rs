use thiserror::Error;

// * Unified Error type for the Network Layer (both fetch strategies).
#[derive(Error, Debug)]
pub enum FetchError {
    #[error("Request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("HTTP {0}")]
    Status(u16),

    #[error("Blocked by the source: {0}")]
    Blocked(String),

    #[error("Browser failure: {0}")]
    Browser(String),

    #[error("Page navigation failed: {0}")]
    Navigation(String),

    #[error("Timed out after {0}ms")]
    Timeout(u64),

    #[error("Data table not found on page")]
    TableNotFound,

    #[error("Invalid URL")]
    InvalidUrl,

    #[error("Invalid header value: {0}")]
    InvalidHeader(#[from] reqwest::header::InvalidHeaderValue),
}

impl FetchError {
    // * Structural failures mean the page arrived but did not carry the data
    pub fn is_structural(&self) -> bool {
        matches!(self, FetchError::TableNotFound)
    }
}

impl From<url::ParseError> for FetchError {
    fn from(_: url::ParseError) -> Self {
        FetchError::InvalidUrl
    }
}
