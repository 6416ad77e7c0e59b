//! Blog theme scraper: listing pagination, post extraction, transient-failure
//! retry, CSV export.

pub mod cli;
pub mod error;
pub mod export;
pub mod resilience;
pub mod scrape;

pub use error::{HarvestError, Result};
