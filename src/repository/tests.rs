//! Repository Integration Tests
//!
//! Tests for the tierlist stores with temporary SQLite databases and files.

#[cfg(test)]
mod tests {
    use crate::codec::{deserialize, serialize, TierlistRecord};
    use crate::domain::{DomainError, IdAllocator, ItemDraft, ListKey, Tierlist};
    use crate::repository::{init_db, JsonFileStore, MemoryStore, SqliteTierlistStore, TierlistStore};
    use std::path::Path;
    use tempfile::TempDir;

    fn sample_tierlist() -> Tierlist {
        let ids = IdAllocator::new();
        let mut tl = Tierlist::new("Games");
        let a = tl.add_item(ItemDraft::new("Celeste", "url-celeste"), &ids).id;
        let b = tl.add_item(ItemDraft::new("Hades", "url-hades"), &ids).id;
        tl.add_item(ItemDraft::new("Tetris", "url-tetris"), &ids);
        let mut memo = ItemDraft::new("Portal", "url-portal");
        memo.memo = Some("co-op too".to_string());
        let c = tl.add_item(memo, &ids).id;
        tl.add_item(ItemDraft::new("Braid", "url-braid"), &ids);

        let s = tl.add_tier("S", &ids);
        tl.add_tier("A", &ids);
        tl.add_tier("B", &ids);
        tl.move_item(b, ListKey::Pool, ListKey::Tier(s), 0).unwrap();
        tl.move_item(a, ListKey::Pool, ListKey::Tier(s), 1).unwrap();
        tl.move_item(c, ListKey::Pool, ListKey::Tier(s + 2), 0).unwrap();
        tl
    }

    async fn setup_sqlite(dir: &TempDir) -> SqliteTierlistStore {
        SqliteTierlistStore::open(&dir.path().join("tierlist.db3"), dir.path().join("thumbs"))
            .await
            .expect("Failed to open test DB")
    }

    #[tokio::test]
    async fn test_sqlite_round_trip() {
        let dir = TempDir::new().unwrap();
        let store = setup_sqlite(&dir).await;
        let tl = sample_tierlist();

        store.save(&serialize(&tl)).await.expect("Save failed");
        let record = store.load().await.expect("Load failed");

        assert_eq!(record.item_max_id, 5);
        assert_eq!(record.tier_max_id, 3);
        assert_eq!(deserialize(record).unwrap(), tl);
    }

    #[tokio::test]
    async fn test_sqlite_save_replaces_previous_contents() {
        let dir = TempDir::new().unwrap();
        let store = setup_sqlite(&dir).await;

        store.save(&serialize(&sample_tierlist())).await.unwrap();
        store.save(&serialize(&Tierlist::new("Blank"))).await.unwrap();

        let tl = deserialize(store.load().await.unwrap()).unwrap();
        assert_eq!(tl.title(), "Blank");
        assert_eq!(tl.item_count(), 0);
        assert!(tl.tiers().is_empty());
    }

    #[tokio::test]
    async fn test_sqlite_survives_reopen() {
        let dir = TempDir::new().unwrap();
        let tl = sample_tierlist();
        {
            let store = setup_sqlite(&dir).await;
            store.save(&serialize(&tl)).await.unwrap();
        }

        let store = setup_sqlite(&dir).await;
        assert_eq!(deserialize(store.load().await.unwrap()).unwrap(), tl);
    }

    #[tokio::test]
    async fn test_sqlite_fresh_database_is_empty() {
        let dir = TempDir::new().unwrap();
        let store = setup_sqlite(&dir).await;

        let record = store.load().await.unwrap();
        assert_eq!(record, TierlistRecord::empty());
    }

    #[tokio::test]
    async fn test_sqlite_thumbnail_is_embedded() {
        let dir = TempDir::new().unwrap();
        let store = setup_sqlite(&dir).await;

        let source = dir.path().join("cover.png");
        std::fs::write(&source, [0x89u8, b'P', b'N', b'G', 1, 2, 3]).unwrap();

        let ids = IdAllocator::new();
        let mut tl = Tierlist::empty();
        let mut draft = ItemDraft::new("Cover", "url");
        draft.thumbnail_ref = Some(source.to_string_lossy().to_string());
        let with_thumb = tl.add_item(draft, &ids).id;
        let mut draft = ItemDraft::new("Gone", "url");
        draft.thumbnail_ref = Some("/definitely/not/here.png".to_string());
        let missing = tl.add_item(draft, &ids).id;

        store.save(&serialize(&tl)).await.unwrap();
        std::fs::remove_file(&source).unwrap();

        let loaded = deserialize(store.load().await.unwrap()).unwrap();
        let thumb = loaded.item(with_thumb).unwrap().thumbnail_ref.clone().unwrap();
        assert_eq!(Path::new(&thumb), store.thumb_path(with_thumb));
        assert_eq!(std::fs::read(&thumb).unwrap(), vec![0x89u8, b'P', b'N', b'G', 1, 2, 3]);

        assert_eq!(
            loaded.item(missing).unwrap().thumbnail_ref.as_deref(),
            Some("/definitely/not/here.png")
        );
    }

    #[tokio::test]
    async fn test_sqlite_legacy_rows_without_pool_positions() {
        let dir = TempDir::new().unwrap();
        let db_path = dir.path().join("legacy.db3");
        {
            let conn = rusqlite::Connection::open(&db_path).unwrap();
            conn.execute_batch(
                "CREATE TABLE tierlist (title TEXT NOT NULL);
                 CREATE TABLE tiers (id INTEGER PRIMARY KEY, pos INTEGER NOT NULL, title TEXT NOT NULL);
                 CREATE TABLE items (id INTEGER PRIMARY KEY, name TEXT NOT NULL, url TEXT NOT NULL, thumb BLOB);
                 CREATE TABLE items_pos (item_id INTEGER NOT NULL, tier_id INTEGER, pos INTEGER NOT NULL);
                 INSERT INTO tierlist(title) VALUES ('list');
                 INSERT INTO tiers(id, pos, title) VALUES (1, 0, 'tier1'), (2, 1, 'tier2'), (5, 2, 'tier3');
                 INSERT INTO items(id, name, url, thumb) VALUES
                    (1, 'item1', 'url1', X'000102'),
                    (2, 'item2', 'url2', NULL),
                    (3, 'item3', 'url3', X'030405');
                 INSERT INTO items_pos(item_id, tier_id, pos) VALUES (1, 2, 1), (2, 2, 0);",
            )
            .unwrap();
        }

        let store = SqliteTierlistStore::open(&db_path, dir.path().join("thumbs"))
            .await
            .unwrap();
        let record = store.load().await.unwrap();
        assert_eq!(record.watermarks(), (3, 5));

        let tl = deserialize(record).unwrap();
        assert_eq!(tl.title(), "list");
        assert_eq!(tl.tiers().len(), 3);
        assert_eq!(tl.tier(2).unwrap().item_ids(), vec![2, 1]);
        assert_eq!(tl.pool().item_ids(), vec![3]);
        assert_eq!(std::fs::read(store.thumb_path(3)).unwrap(), vec![3u8, 4, 5]);
        assert!(tl.item(2).unwrap().thumbnail_ref.is_none());
    }

    #[tokio::test]
    async fn test_sqlite_unknown_tier_position_is_rejected() {
        let dir = TempDir::new().unwrap();
        let db_path = dir.path().join("broken.db3");
        let db = init_db(&db_path).await.unwrap();
        {
            let conn = db.connection();
            let guard = conn.lock().await;
            guard
                .as_ref()
                .unwrap()
                .execute_batch(
                    "INSERT INTO tierlist(title) VALUES ('broken');
                     INSERT INTO items(id, name, url) VALUES (1, 'a', 'u');
                     INSERT INTO items_pos(item_id, tier_id, pos) VALUES (1, 9, 0);",
                )
                .unwrap();
        }
        let store = SqliteTierlistStore::new(db, "broken", dir.path());

        let err = store.load().await.unwrap_err();
        assert!(matches!(err, DomainError::InvalidInput(_)));
    }

    #[tokio::test]
    async fn test_sqlite_closed_connection_errors() {
        let dir = TempDir::new().unwrap();
        let db = init_db(Path::new(":memory:")).await.unwrap();
        db.close().await;
        let store = SqliteTierlistStore::new(db, ":memory:", dir.path());

        assert!(matches!(store.load().await, Err(DomainError::Internal(_))));
        assert!(matches!(
            store.save(&TierlistRecord::empty()).await,
            Err(DomainError::Internal(_))
        ));
    }

    #[tokio::test]
    async fn test_json_round_trip() {
        let dir = TempDir::new().unwrap();
        let store = JsonFileStore::new(dir.path().join("nested").join("list.json"));
        let tl = sample_tierlist();

        store.save(&serialize(&tl)).await.unwrap();
        assert!(store.path().exists());
        assert!(!dir.path().join("nested").join("list.json.tmp").exists());

        let text = std::fs::read_to_string(store.path()).unwrap();
        assert!(text.contains("\"itemsPool\""));
        assert_eq!(deserialize(store.load().await.unwrap()).unwrap(), tl);
    }

    #[tokio::test]
    async fn test_json_load_errors() {
        let dir = TempDir::new().unwrap();
        let store = JsonFileStore::new(dir.path().join("absent.json"));
        assert!(matches!(store.load().await, Err(DomainError::Internal(_))));

        std::fs::write(store.path(), "{ not json").unwrap();
        assert!(matches!(store.load().await, Err(DomainError::InvalidInput(_))));
    }

    #[tokio::test]
    async fn test_memory_store() {
        let store = MemoryStore::new();
        assert_eq!(store.load().await.unwrap(), TierlistRecord::empty());
        assert!(store.snapshot().await.is_none());

        let record = serialize(&sample_tierlist());
        store.save(&record).await.unwrap();
        assert_eq!(store.load().await.unwrap(), record);
        assert_eq!(store.describe(), "memory");
    }
}
