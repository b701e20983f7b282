//! JSON file provider.
//!
//! Serves records from a local JSON array, for offline runs and for replaying
//! a saved search. The query string is ignored; the file is the result set.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tracing::debug;

use super::{ProviderError, ProviderResult, RecordProvider};
use crate::models::Record;

/// Provider that reads records from a JSON file.
#[derive(Debug, Clone)]
pub struct JsonFileProvider {
    path: PathBuf,
    name: String,
    records: Vec<Record>,
}

impl JsonFileProvider {
    /// Load records from a JSON file containing an array of records.
    ///
    /// # Errors
    /// Returns `ProviderError::IoError` if the file cannot be read and
    /// `ProviderError::ParseError` if it is not a valid record array
    pub async fn from_file(path: impl AsRef<Path>) -> ProviderResult<Self> {
        let path = path.as_ref().to_path_buf();
        let content = tokio::fs::read_to_string(&path).await?;
        let records: Vec<Record> = serde_json::from_str(&content).map_err(|e| {
            ProviderError::ParseError(format!("Invalid records in {}: {}", path.display(), e))
        })?;

        debug!("Loaded {} records from {}", records.len(), path.display());

        Ok(Self {
            name: format!("JSON file {}", path.display()),
            path,
            records,
        })
    }

    /// Path of the backing file.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl RecordProvider for JsonFileProvider {
    async fn fetch_records(&self, _query: &str, max_results: usize) -> ProviderResult<Vec<Record>> {
        Ok(self.records.iter().take(max_results).cloned().collect())
    }

    fn name(&self) -> &str {
        &self.name
    }
}
