use thiserror::Error;

use crate::resilience::Cancelled;

pub type Result<T> = std::result::Result<T, HarvestError>;

#[derive(Error, Debug)]
pub enum HarvestError {
    #[error("Request timed out: {0}")]
    Timeout(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("HTTP status {status} for {url}")]
    HttpStatus { status: u16, url: String },

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Operation cancelled")]
    Cancelled,
}

impl HarvestError {
    /// Whether a failure is worth another attempt. This is the predicate the
    /// scraper hands to the retry layer: timeouts, transport failures, and
    /// throttling/server statuses, nothing else.
    pub fn is_transient(&self) -> bool {
        match self {
            HarvestError::Timeout(_) | HarvestError::Network(_) => true,
            HarvestError::HttpStatus { status, .. } => {
                matches!(*status, 408 | 429 | 500..=599)
            }
            _ => false,
        }
    }
}

impl From<Cancelled> for HarvestError {
    fn from(_: Cancelled) -> Self {
        HarvestError::Cancelled
    }
}
