//! Tierlist Repository - JSON file backend
//!
//! The record is written as pretty JSON next to its final location and then
//! renamed over it, so a crash mid-write never leaves a truncated file.

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tracing::info;

use crate::codec::TierlistRecord;
use crate::domain::{DomainError, DomainResult};

use super::traits::TierlistStore;

pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_default();
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

#[async_trait]
impl TierlistStore for JsonFileStore {
    async fn save(&self, record: &TierlistRecord) -> DomainResult<()> {
        let json = serde_json::to_vec_pretty(record)
            .map_err(|e| DomainError::Internal(format!("Failed to encode tierlist: {}", e)))?;

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| DomainError::Internal(e.to_string()))?;
        }

        let tmp = self.temp_path();
        tokio::fs::write(&tmp, &json)
            .await
            .map_err(|e| DomainError::Internal(format!("Failed to write {}: {}", tmp.display(), e)))?;
        tokio::fs::rename(&tmp, &self.path)
            .await
            .map_err(|e| DomainError::Internal(format!("Failed to replace {}: {}", self.path.display(), e)))?;

        info!(path = %self.path.display(), bytes = json.len(), "tierlist saved");
        Ok(())
    }

    async fn load(&self) -> DomainResult<TierlistRecord> {
        let bytes = tokio::fs::read(&self.path)
            .await
            .map_err(|e| DomainError::Internal(format!("Failed to read {}: {}", self.path.display(), e)))?;
        let record: TierlistRecord = serde_json::from_slice(&bytes)
            .map_err(|e| DomainError::InvalidInput(format!("{} is not a tierlist: {}", self.path.display(), e)))?;

        info!(path = %self.path.display(), items = record.items.len(), "tierlist loaded");
        Ok(record)
    }

    fn describe(&self) -> String {
        format!("json:{}", self.path.display())
    }
}
