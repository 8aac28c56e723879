//! Tierlist Repository - SQLite backend
//!
//! One database file holds one tierlist. `items_pos` rows with a NULL
//! `tier_id` are pool members; items without any position row also end up in
//! the pool. Thumbnail files are embedded as blobs on save and written back
//! out to the thumbnail directory as `_indb_<id>` on load.

use async_trait::async_trait;
use rusqlite::{params, Connection, OptionalExtension};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

use crate::codec::{TierRecord, TierlistRecord};
use crate::domain::{DomainError, DomainResult, Item, ItemId, TierId, DEFAULT_TITLE};

use super::db::{init_db, DbState};
use super::traits::TierlistStore;

const THUMB_PREFIX: &str = "_indb_";

/// SQLite implementation of the tierlist store
pub struct SqliteTierlistStore {
    db: DbState,
    location: String,
    thumb_dir: PathBuf,
}

impl SqliteTierlistStore {
    pub fn new(db: DbState, location: impl Into<String>, thumb_dir: impl Into<PathBuf>) -> Self {
        Self {
            db,
            location: location.into(),
            thumb_dir: thumb_dir.into(),
        }
    }

    /// Open (creating if missing) the database file at `db_path`
    pub async fn open(db_path: &Path, thumb_dir: impl Into<PathBuf>) -> DomainResult<Self> {
        let db = init_db(db_path).await.map_err(DomainError::Internal)?;
        Ok(Self::new(db, db_path.display().to_string(), thumb_dir))
    }

    pub fn thumb_dir(&self) -> &Path {
        &self.thumb_dir
    }

    /// Where an embedded thumbnail for `id` is written on load
    pub fn thumb_path(&self, id: ItemId) -> PathBuf {
        self.thumb_dir.join(format!("{}{}", THUMB_PREFIX, id))
    }
}

struct ItemRow {
    id: i64,
    name: String,
    url: String,
    memo: Option<String>,
    thumb_ref: Option<String>,
    thumb: Option<Vec<u8>>,
}

struct StoredTierlist {
    title: Option<String>,
    item_max_id: i64,
    tier_max_id: i64,
    tiers: Vec<(i64, String)>,
    items: Vec<ItemRow>,
    positions: Vec<(i64, Option<i64>)>,
}

fn internal<E: ToString>(e: E) -> DomainError {
    DomainError::Internal(e.to_string())
}

fn to_sql_id(id: u64) -> DomainResult<i64> {
    i64::try_from(id).map_err(|_| DomainError::InvalidInput(format!("id {} is too large to store", id)))
}

fn from_sql_id(id: i64) -> DomainResult<u64> {
    u64::try_from(id).map_err(|_| DomainError::InvalidInput(format!("stored id {} is negative", id)))
}

fn write_record(
    conn: &mut Connection,
    record: &TierlistRecord,
    thumbs: &HashMap<ItemId, Vec<u8>>,
) -> DomainResult<()> {
    let (item_max, tier_max) = record.watermarks();
    let tx = conn.transaction().map_err(internal)?;

    tx.execute_batch(
        "DELETE FROM tierlist;
         DELETE FROM tiers;
         DELETE FROM items;
         DELETE FROM items_pos;",
    )
    .map_err(internal)?;

    tx.execute(
        "INSERT INTO tierlist(title, item_max_id, tier_max_id) VALUES (?1, ?2, ?3)",
        params![record.title, to_sql_id(item_max)?, to_sql_id(tier_max)?],
    )
    .map_err(internal)?;

    {
        let mut stmt = tx
            .prepare("INSERT INTO tiers(id, pos, title) VALUES (?1, ?2, ?3)")
            .map_err(internal)?;
        for (pos, tier) in record.tiers.iter().enumerate() {
            stmt.execute(params![to_sql_id(tier.id)?, pos as i64, tier.title])
                .map_err(internal)?;
        }

        let mut stmt = tx
            .prepare(
                "INSERT OR REPLACE INTO items(id, name, url, memo, thumb_ref, thumb)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            )
            .map_err(internal)?;
        for item in &record.items {
            stmt.execute(params![
                to_sql_id(item.id)?,
                item.name,
                item.source_url,
                item.memo,
                item.thumbnail_ref,
                thumbs.get(&item.id),
            ])
            .map_err(internal)?;
        }

        let mut stmt = tx
            .prepare("INSERT INTO items_pos(item_id, tier_id, pos) VALUES (?1, ?2, ?3)")
            .map_err(internal)?;
        for (pos, &id) in record.items_pool.iter().enumerate() {
            stmt.execute(params![to_sql_id(id)?, Option::<i64>::None, pos as i64])
                .map_err(internal)?;
        }
        for tier in &record.tiers {
            let tier_id = to_sql_id(tier.id)?;
            for (pos, &id) in tier.item_ids.iter().enumerate() {
                stmt.execute(params![to_sql_id(id)?, Some(tier_id), pos as i64])
                    .map_err(internal)?;
            }
        }
    }

    tx.commit().map_err(internal)
}

fn read_stored(conn: &Connection) -> DomainResult<StoredTierlist> {
    let header = conn
        .query_row(
            "SELECT title, item_max_id, tier_max_id FROM tierlist LIMIT 1",
            [],
            |row| Ok((row.get::<_, String>(0)?, row.get::<_, i64>(1)?, row.get::<_, i64>(2)?)),
        )
        .optional()
        .map_err(internal)?;
    let (title, item_max_id, tier_max_id) = match header {
        Some((title, item_max, tier_max)) => (Some(title), item_max, tier_max),
        None => (None, 0, 0),
    };

    let mut stmt = conn
        .prepare("SELECT id, title FROM tiers ORDER BY pos ASC")
        .map_err(internal)?;
    let tiers = stmt
        .query_map([], |row| Ok((row.get(0)?, row.get(1)?)))
        .map_err(internal)?
        .collect::<Result<Vec<(i64, String)>, _>>()
        .map_err(internal)?;

    let mut stmt = conn
        .prepare("SELECT id, name, url, memo, thumb_ref, thumb FROM items ORDER BY id ASC")
        .map_err(internal)?;
    let items = stmt
        .query_map([], |row| {
            Ok(ItemRow {
                id: row.get(0)?,
                name: row.get(1)?,
                url: row.get(2)?,
                memo: row.get(3)?,
                thumb_ref: row.get(4)?,
                thumb: row.get(5)?,
            })
        })
        .map_err(internal)?
        .collect::<Result<Vec<_>, _>>()
        .map_err(internal)?;

    let mut stmt = conn
        .prepare("SELECT item_id, tier_id FROM items_pos ORDER BY pos ASC, rowid ASC")
        .map_err(internal)?;
    let positions = stmt
        .query_map([], |row| Ok((row.get(0)?, row.get(1)?)))
        .map_err(internal)?
        .collect::<Result<Vec<(i64, Option<i64>)>, _>>()
        .map_err(internal)?;

    Ok(StoredTierlist {
        title,
        item_max_id,
        tier_max_id,
        tiers,
        items,
        positions,
    })
}

impl SqliteTierlistStore {
    /// Embedded bytes for every thumbnail that names a readable file
    async fn collect_thumbs(&self, record: &TierlistRecord) -> HashMap<ItemId, Vec<u8>> {
        let mut thumbs = HashMap::new();
        for item in &record.items {
            let Some(path) = item.thumbnail_ref.as_deref() else {
                continue;
            };
            match tokio::fs::read(path).await {
                Ok(bytes) => {
                    thumbs.insert(item.id, bytes);
                }
                Err(e) => {
                    debug!(item = item.id, path, error = %e, "thumbnail not embedded");
                }
            }
        }
        thumbs
    }

    async fn build_record(&self, stored: StoredTierlist) -> DomainResult<TierlistRecord> {
        let mut tiers = Vec::with_capacity(stored.tiers.len());
        let mut tier_slot: HashMap<TierId, usize> = HashMap::new();
        for (id, title) in stored.tiers {
            let id = from_sql_id(id)?;
            tier_slot.insert(id, tiers.len());
            tiers.push(TierRecord {
                id,
                title,
                item_ids: Vec::new(),
            });
        }

        let mut items_pool = Vec::new();
        for (item_id, tier_id) in stored.positions {
            let item_id = from_sql_id(item_id)?;
            match tier_id {
                None => items_pool.push(item_id),
                Some(tier_id) => {
                    let tier_id = from_sql_id(tier_id)?;
                    let slot = tier_slot.get(&tier_id).copied().ok_or_else(|| {
                        DomainError::InvalidInput(format!(
                            "item {} is positioned in unknown tier {}",
                            item_id, tier_id
                        ))
                    })?;
                    tiers[slot].item_ids.push(item_id);
                }
            }
        }

        let has_thumbs = stored.items.iter().any(|row| row.thumb.is_some());
        if has_thumbs {
            tokio::fs::create_dir_all(&self.thumb_dir).await.map_err(internal)?;
        }

        let mut items = Vec::with_capacity(stored.items.len());
        for row in stored.items {
            let id = from_sql_id(row.id)?;
            let thumbnail_ref = match row.thumb {
                Some(bytes) => {
                    let path = self.thumb_path(id);
                    tokio::fs::write(&path, &bytes).await.map_err(internal)?;
                    Some(path.to_string_lossy().to_string())
                }
                None => row.thumb_ref,
            };
            items.push(Item {
                id,
                name: row.name,
                source_url: row.url,
                thumbnail_ref,
                memo: row.memo,
            });
        }

        Ok(TierlistRecord {
            title: stored.title.unwrap_or_else(|| DEFAULT_TITLE.to_string()),
            tiers,
            tier_max_id: from_sql_id(stored.tier_max_id)?,
            items,
            items_pool,
            item_max_id: from_sql_id(stored.item_max_id)?,
        })
    }
}

#[async_trait]
impl TierlistStore for SqliteTierlistStore {
    async fn save(&self, record: &TierlistRecord) -> DomainResult<()> {
        let thumbs = self.collect_thumbs(record).await;

        let conn = self.db.connection();
        {
            let mut guard = conn.lock().await;
            let conn = guard
                .as_mut()
                .ok_or_else(|| DomainError::Internal("Database not initialized".to_string()))?;
            write_record(conn, record, &thumbs)?;
        }

        info!(
            location = %self.location,
            items = record.items.len(),
            tiers = record.tiers.len(),
            embedded = thumbs.len(),
            "tierlist saved"
        );
        Ok(())
    }

    async fn load(&self) -> DomainResult<TierlistRecord> {
        let conn = self.db.connection();
        let stored = {
            let guard = conn.lock().await;
            let conn = guard
                .as_ref()
                .ok_or_else(|| DomainError::Internal("Database not initialized".to_string()))?;
            read_stored(conn)?
        };
        if stored.title.is_none() {
            warn!(location = %self.location, "database has no tierlist row, loading an empty one");
        }

        let record = self.build_record(stored).await?;
        info!(
            location = %self.location,
            items = record.items.len(),
            tiers = record.tiers.len(),
            "tierlist loaded"
        );
        Ok(record)
    }

    fn describe(&self) -> String {
        format!("sqlite:{}", self.location)
    }
}
