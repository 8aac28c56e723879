//! In-memory store
//!
//! Holds the last saved record. Loading before anything was saved yields an
//! empty tierlist.

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::codec::TierlistRecord;
use crate::domain::DomainResult;

use super::traits::TierlistStore;

#[derive(Default)]
pub struct MemoryStore {
    record: Mutex<Option<TierlistRecord>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_record(record: TierlistRecord) -> Self {
        Self {
            record: Mutex::new(Some(record)),
        }
    }

    /// What a load would return, without going through the trait
    pub async fn snapshot(&self) -> Option<TierlistRecord> {
        self.record.lock().await.clone()
    }
}

#[async_trait]
impl TierlistStore for MemoryStore {
    async fn save(&self, record: &TierlistRecord) -> DomainResult<()> {
        *self.record.lock().await = Some(record.clone());
        Ok(())
    }

    async fn load(&self) -> DomainResult<TierlistRecord> {
        Ok(self
            .record
            .lock()
            .await
            .clone()
            .unwrap_or_else(TierlistRecord::empty))
    }

    fn describe(&self) -> String {
        "memory".to_string()
    }
}
