//! Repository Layer - Core Traits
//!
//! Defines the abstract interface for tierlist persistence.
//! Implementations can use SQLite, a JSON file, in-memory, etc.

use async_trait::async_trait;

use crate::codec::TierlistRecord;
use crate::domain::DomainResult;

/// Whole-record persistence
///
/// A store replaces everything it holds on `save` and returns the last saved
/// record on `load`. Failures leave the caller's model alone; there is no
/// partial save and no retry.
#[async_trait]
pub trait TierlistStore: Send + Sync {
    /// Persist the record, replacing any previous contents
    async fn save(&self, record: &TierlistRecord) -> DomainResult<()>;

    /// Read back the stored record
    async fn load(&self) -> DomainResult<TierlistRecord>;

    /// Human-readable location, for logs
    fn describe(&self) -> String;
}
