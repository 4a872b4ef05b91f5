use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::network::errors::FetchError;

// * Boundary error handed to the display layer.
// * Cloneable so cached results can be served more than once.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
pub enum ScrapeError {
    #[error("Failed to fetch page: {0}")]
    Transport(String),

    #[error("Could not find data table: {0}")]
    TableNotFound(String),

    // * The reason already reads as a full sentence
    #[error("{0}")]
    NoData(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ScrapeErrorKind {
    Transport,
    TableNotFound,
    NoData,
}

impl ScrapeError {
    pub fn kind(&self) -> ScrapeErrorKind {
        match self {
            ScrapeError::Transport(_) => ScrapeErrorKind::Transport,
            ScrapeError::TableNotFound(_) => ScrapeErrorKind::TableNotFound,
            ScrapeError::NoData(_) => ScrapeErrorKind::NoData,
        }
    }

    pub fn reason(&self) -> &str {
        match self {
            ScrapeError::Transport(r) | ScrapeError::TableNotFound(r) | ScrapeError::NoData(r) => r,
        }
    }
}

impl From<FetchError> for ScrapeError {
    fn from(err: FetchError) -> Self {
        if err.is_structural() {
            ScrapeError::TableNotFound(err.to_string())
        } else {
            ScrapeError::Transport(err.to_string())
        }
    }
}

/// Either the records of one fetch or why there are none
pub type FetchResult<T> = Result<Vec<T>, ScrapeError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fetch_error_classification() {
        let err: ScrapeError = FetchError::Status(503).into();
        assert_eq!(err.kind(), ScrapeErrorKind::Transport);
        assert!(err.reason().contains("503"));

        let err: ScrapeError = FetchError::TableNotFound.into();
        assert_eq!(err.kind(), ScrapeErrorKind::TableNotFound);

        let err: ScrapeError = FetchError::Timeout(60_000).into();
        assert_eq!(err.kind(), ScrapeErrorKind::Transport);
    }

    #[test]
    fn test_display_includes_reason() {
        let err = ScrapeError::NoData("No data found for this industry".into());
        assert_eq!(err.to_string(), "No data found for this industry");

        let err = ScrapeError::Transport("HTTP 503".into());
        assert_eq!(err.to_string(), "Failed to fetch page: HTTP 503");
    }
}
