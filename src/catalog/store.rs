//! File persistence for switch record collections.

use std::path::Path;

use tracing::{debug, error, info};

use super::error::CatalogError;
use super::record::SwitchRecord;

/// Reads and writes record files, one encoded record per line.
pub struct RecordStore;

impl RecordStore {
    /// Load every record from `path`, in file order.
    ///
    /// A malformed line aborts the load; the codec error is returned as is.
    pub fn load(path: &Path) -> Result<Vec<SwitchRecord>, CatalogError> {
        let content = std::fs::read_to_string(path).map_err(|source| CatalogError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        let mut records = Vec::new();
        for (index, line) in content.lines().enumerate() {
            let record = SwitchRecord::from_line(line).map_err(|e| {
                error!(path = %path.display(), line = index + 1, error = %e, "Rejecting record file");
                e
            })?;
            records.push(record);
        }

        debug!(path = %path.display(), records = records.len(), "Loaded switch records");
        Ok(records)
    }

    /// Write `records` to `path`, replacing any existing content.
    pub fn save<'a, I>(path: &Path, records: I) -> Result<(), CatalogError>
    where
        I: IntoIterator<Item = &'a SwitchRecord>,
    {
        let mut content = String::new();
        let mut count = 0usize;
        for record in records {
            content.push_str(&record.to_line());
            content.push('\n');
            count += 1;
        }

        std::fs::write(path, content.as_bytes()).map_err(|source| CatalogError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        info!(path = %path.display(), records = count, "Serialized switch records");
        Ok(())
    }
}
