//! JSON backup export and import.

use std::path::{Path, PathBuf};

use chrono::{NaiveDate, Utc};
use serde_json::Value;

use super::models::JobRecord;
use super::repository::JobStore;
use crate::error::{Result, TrackerError};

/// `job_tracker_backup_<YYYY-MM-DD>.json`
pub fn backup_file_name(date: NaiveDate) -> String {
    format!("job_tracker_backup_{}.json", date.format("%Y-%m-%d"))
}

/// Parse an import payload. Only a top-level array is accepted. Object
/// entries are taken as-is apart from the field defaults `JobRecord`
/// applies; an entry that is not an object (a number, string, array or
/// null) cannot be held as a record, so it rejects the whole import.
pub fn parse_backup(text: &str) -> Result<Vec<JobRecord>> {
    let value: Value = serde_json::from_str(text)?;
    let Value::Array(entries) = value else {
        return Err(TrackerError::InvalidImport(
            "expected a JSON array of job records".to_string(),
        ));
    };
    entries
        .into_iter()
        .enumerate()
        .map(|(index, entry)| {
            if !entry.is_object() {
                return Err(TrackerError::InvalidImport(format!(
                    "entry {index} is not a job record object"
                )));
            }
            Ok(serde_json::from_value(entry)?)
        })
        .collect()
}

impl JobStore {
    /// Write the collection as pretty JSON into `dir` and return the file path
    pub fn export_data(&self, dir: &Path) -> Result<PathBuf> {
        std::fs::create_dir_all(dir)?;
        let path = dir.join(backup_file_name(Utc::now().date_naive()));
        let text = serde_json::to_string_pretty(&self.get_all())?;
        std::fs::write(&path, text)?;
        tracing::info!(path = %path.display(), count = self.len(), "exported backup");
        Ok(path)
    }

    /// Replace the collection with the contents of a backup file. Nothing is
    /// changed if the file cannot be read or is not a JSON array.
    pub fn import_data(&mut self, path: &Path) -> Result<usize> {
        let text = std::fs::read_to_string(path)?;
        let records = parse_backup(&text)?;
        self.replace_all(records)?;
        tracing::info!(path = %path.display(), count = self.len(), "imported backup");
        Ok(self.len())
    }
}
