//! CSV export of scraped posts.

use std::fs;
use std::path::Path;

use tracing::info;

use crate::error::Result;
use crate::scrape::PostRecord;

/// Write records as CSV with a `Title,Content` header, creating parent
/// directories as needed. The header is written even for an empty crawl.
pub fn write_csv(path: &Path, records: &[PostRecord]) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }

    let mut writer = csv::Writer::from_path(path)?;
    if records.is_empty() {
        writer.write_record(["Title", "Content"])?;
    }
    for record in records {
        writer.serialize(record)?;
    }
    writer.flush()?;

    info!("Wrote {} records to {}", records.len(), path.display());
    Ok(())
}
