//! Application State
//!
//! The single mutator of the tierlist. Commands borrow the session through
//! short synchronous locks; save and load are the only operations that await,
//! and while one is running the `busy` flag turns every edit into a
//! `Conflict` instead of letting it interleave with the I/O.

use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, MutexGuard};

use tempfile::TempDir;
use tracing::{info, warn};

use crate::codec::{self, TierlistRecord};
use crate::config::{AppConfig, StoreKind};
use crate::domain::{DomainError, DomainResult, IdAllocator, Tierlist};
use crate::drag::DragReconciler;
use crate::repository::{JsonFileStore, MemoryStore, SqliteTierlistStore, TierlistStore};

/// Model plus the drag protocol that mutates it
#[derive(Debug, Default)]
pub struct Session {
    pub tierlist: Tierlist,
    pub drag: DragReconciler,
}

/// Application state shared across commands
pub struct AppState {
    session: Mutex<Session>,
    ids: IdAllocator,
    store: Box<dyn TierlistStore>,
    busy: AtomicBool,
    default_title: String,
    thumb_scratch: Option<TempDir>,
}

/// Clears the busy flag when the save/load finishes, however it finishes
pub struct BusyGuard<'a> {
    flag: &'a AtomicBool,
}

impl Drop for BusyGuard<'_> {
    fn drop(&mut self) {
        self.flag.store(false, Ordering::SeqCst);
    }
}

impl AppState {
    pub fn new(store: Box<dyn TierlistStore>) -> Self {
        Self::with_title(store, crate::domain::DEFAULT_TITLE)
    }

    pub fn with_title(store: Box<dyn TierlistStore>, default_title: impl Into<String>) -> Self {
        let default_title = default_title.into();
        Self {
            session: Mutex::new(Session {
                tierlist: Tierlist::new(default_title.clone()),
                drag: DragReconciler::new(),
            }),
            ids: IdAllocator::new(),
            store,
            busy: AtomicBool::new(false),
            default_title,
            thumb_scratch: None,
        }
    }

    /// Build the store named by `config`. Nothing is loaded yet.
    pub async fn from_config(config: &AppConfig) -> DomainResult<Self> {
        let (thumb_dir, scratch) = match &config.thumb_dir {
            Some(dir) => (dir.clone(), None),
            None => {
                let tmp = tempfile::Builder::new()
                    .prefix("tierlist-thumbs")
                    .tempdir()
                    .map_err(|e| DomainError::Internal(format!("Failed to create thumb dir: {}", e)))?;
                (tmp.path().to_path_buf(), Some(tmp))
            }
        };

        let store: Box<dyn TierlistStore> = match config.store {
            StoreKind::Sqlite => Box::new(SqliteTierlistStore::open(&config.db_path, thumb_dir).await?),
            StoreKind::Json => Box::new(JsonFileStore::new(config.db_path.clone())),
            StoreKind::Memory => Box::new(MemoryStore::new()),
        };
        info!(store = %store.describe(), "store ready");

        let mut state = Self::with_title(store, config.default_title.clone());
        state.thumb_scratch = scratch;
        Ok(state)
    }

    /// Directory holding unpacked thumbnails when no thumb dir was configured
    pub fn scratch_dir(&self) -> Option<PathBuf> {
        self.thumb_scratch.as_ref().map(|d| d.path().to_path_buf())
    }

    pub fn ids(&self) -> &IdAllocator {
        &self.ids
    }

    pub fn store(&self) -> &dyn TierlistStore {
        self.store.as_ref()
    }

    pub fn is_busy(&self) -> bool {
        self.busy.load(Ordering::SeqCst)
    }

    fn lock(&self) -> DomainResult<MutexGuard<'_, Session>> {
        self.session
            .lock()
            .map_err(|_| DomainError::Internal("session lock poisoned".to_string()))
    }

    /// Run a read-only closure against the session
    pub fn read<T>(&self, f: impl FnOnce(&Session) -> T) -> DomainResult<T> {
        let session = self.lock()?;
        Ok(f(&session))
    }

    /// Run a mutating closure against the session; refused while saving or loading
    pub fn edit<T>(&self, f: impl FnOnce(&mut Session) -> DomainResult<T>) -> DomainResult<T> {
        if self.is_busy() {
            return Err(DomainError::Conflict(
                "tierlist is being saved or loaded".to_string(),
            ));
        }
        let mut session = self.lock()?;
        f(&mut session)
    }

    fn begin_io(&self) -> DomainResult<BusyGuard<'_>> {
        self.busy
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .map_err(|_| DomainError::Conflict("a save or load is already running".to_string()))?;
        Ok(BusyGuard { flag: &self.busy })
    }

    fn ensure_not_dragging(session: &Session) -> DomainResult<()> {
        match session.drag.active_id() {
            Some(id) => Err(DomainError::Conflict(format!(
                "item {} is being dragged; drop it first",
                id
            ))),
            None => Ok(()),
        }
    }

    /// Snapshot the model and hand it to the store
    pub async fn save(&self) -> DomainResult<TierlistRecord> {
        let _busy = self.begin_io()?;
        let record = {
            let session = self.lock()?;
            Self::ensure_not_dragging(&session)?;
            codec::serialize(&session.tierlist)
        };

        self.store.save(&record).await.inspect_err(|e| {
            warn!(store = %self.store.describe(), error = %e, "save failed");
        })?;
        Ok(record)
    }

    /// Replace the model with the stored one. The current model is only
    /// touched once the record has been read and fully decoded.
    pub async fn load(&self) -> DomainResult<()> {
        let _busy = self.begin_io()?;
        {
            let session = self.lock()?;
            Self::ensure_not_dragging(&session)?;
        }

        let record = self.store.load().await.inspect_err(|e| {
            warn!(store = %self.store.describe(), error = %e, "load failed");
        })?;
        let (item_max, tier_max) = record.watermarks();
        let tierlist = codec::deserialize(record)?;

        let mut session = self.lock()?;
        session.tierlist = tierlist;
        session.drag = DragReconciler::new();
        self.ids.reseed(item_max, tier_max);
        info!(
            items = session.tierlist.item_count(),
            tiers = session.tierlist.tiers().len(),
            "tierlist replaced from store"
        );
        Ok(())
    }

    /// Start over with an empty tierlist; ids keep counting upwards
    pub fn reset(&self, title: Option<String>) -> DomainResult<()> {
        let title = title.unwrap_or_else(|| self.default_title.clone());
        self.edit(|session| {
            Self::ensure_not_dragging(session)?;
            session.tierlist = Tierlist::new(title);
            Ok(())
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{ItemDraft, ListKey};

    fn state() -> AppState {
        AppState::new(Box::new(MemoryStore::new()))
    }

    #[tokio::test]
    async fn test_save_then_load_restores_model() {
        let state = state();
        let id = state
            .edit(|s| Ok(s.tierlist.add_item(ItemDraft::new("A", ""), &state.ids).id))
            .unwrap();
        state.save().await.unwrap();

        state.edit(|s| s.tierlist.delete_item(id).map(|_| ())).unwrap();
        state.load().await.unwrap();

        assert!(state.read(|s| s.tierlist.item(id).is_some()).unwrap());
    }

    #[tokio::test]
    async fn test_save_refused_mid_drag() {
        let state = state();
        let id = state
            .edit(|s| Ok(s.tierlist.add_item(ItemDraft::new("A", ""), &state.ids).id))
            .unwrap();
        state.edit(|s| {
            s.drag.drag_start(id);
            Ok(())
        })
        .unwrap();

        assert!(matches!(state.save().await, Err(DomainError::Conflict(_))));
        assert!(matches!(state.load().await, Err(DomainError::Conflict(_))));
        assert!(!state.is_busy());
    }

    #[tokio::test]
    async fn test_load_resets_drag_and_reseeds_ids() {
        let mut record = TierlistRecord::empty();
        record.items = vec![crate::domain::Item::new(42, "answer", "")];
        record.items_pool = vec![42];
        let state = AppState::new(Box::new(MemoryStore::with_record(record)));

        state.load().await.unwrap();

        let next = state
            .edit(|s| Ok(s.tierlist.add_item(ItemDraft::new("B", ""), &state.ids).id))
            .unwrap();
        assert!(next >= 43);
        assert_eq!(state.read(|s| s.tierlist.locate(42)).unwrap(), Some((ListKey::Pool, 0)));
    }

    #[test]
    fn test_edit_refused_while_busy() {
        let state = state();
        let guard = state.begin_io().unwrap();
        assert!(matches!(state.edit(|_| Ok(())), Err(DomainError::Conflict(_))));
        assert!(matches!(state.begin_io(), Err(DomainError::Conflict(_))));
        drop(guard);
        assert!(state.edit(|_| Ok(())).is_ok());
    }

    #[test]
    fn test_reset_uses_default_title() {
        let state = AppState::with_title(Box::new(MemoryStore::new()), "Coffee");
        state.edit(|s| { s.tierlist.set_title("Tea"); Ok(()) }).unwrap();
        state.reset(None).unwrap();
        assert_eq!(state.read(|s| s.tierlist.title().to_string()).unwrap(), "Coffee");
    }

    #[tokio::test]
    async fn test_from_config_memory_store_gets_scratch_dir() {
        let config = AppConfig {
            store: StoreKind::Memory,
            ..AppConfig::default()
        };
        let state = AppState::from_config(&config).await.unwrap();
        assert_eq!(state.store().describe(), "memory");
        assert!(state.scratch_dir().map(|d| d.exists()).unwrap_or(false));
    }
}
