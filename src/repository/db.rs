//! Database Connection and Setup
//!
//! Manages the SQLite connection and migrations.

use rusqlite::Connection;
use std::path::Path;
use std::sync::Arc;
use tokio::sync::Mutex;

/// Database state wrapper
#[derive(Clone)]
pub struct DbState {
    conn: Arc<Mutex<Option<Connection>>>,
}

impl Default for DbState {
    fn default() -> Self {
        Self::new()
    }
}

impl DbState {
    pub fn new() -> Self {
        Self {
            conn: Arc::new(Mutex::new(None)),
        }
    }

    /// Shared handle to the connection slot
    pub fn connection(&self) -> Arc<Mutex<Option<Connection>>> {
        self.conn.clone()
    }

    pub async fn is_open(&self) -> bool {
        self.conn.lock().await.is_some()
    }

    /// Drop the connection; later store calls fail until reopened
    pub async fn close(&self) {
        *self.conn.lock().await = None;
    }
}

/// Open (or create) the database at `db_path` and bring its schema up to date.
/// `":memory:"` opens a private in-memory database.
pub async fn init_db(db_path: &Path) -> Result<DbState, String> {
    let conn = if db_path == Path::new(":memory:") {
        Connection::open_in_memory()
    } else {
        Connection::open(db_path)
    }
    .map_err(|e| format!("Failed to open db {}: {}", db_path.display(), e))?;

    run_migrations(&conn)?;

    let state = DbState::new();
    *state.conn.lock().await = Some(conn);

    Ok(state)
}

/// Check if a column exists in a table
fn column_exists(conn: &Connection, table: &str, column: &str) -> bool {
    let query = format!("PRAGMA table_info({})", table);
    let Ok(mut stmt) = conn.prepare(&query) else {
        return false;
    };
    let Ok(names) = stmt.query_map([], |row| row.get::<_, String>(1)) else {
        return false;
    };
    let found = names.flatten().any(|name| name == column);
    found
}

fn add_column(conn: &Connection, table: &str, column: &str, decl: &str) -> Result<(), String> {
    if column_exists(conn, table, column) {
        return Ok(());
    }
    conn.execute(&format!("ALTER TABLE {} ADD COLUMN {} {}", table, column, decl), [])
        .map(|_| ())
        .map_err(|e| format!("Failed to add {}.{}: {}", table, column, e))
}

/// Run database migrations
fn run_migrations(conn: &Connection) -> Result<(), String> {
    // Base layout, shared with databases written by earlier versions
    conn.execute_batch(
        "CREATE TABLE IF NOT EXISTS tierlist (
            title TEXT NOT NULL
        );
        CREATE TABLE IF NOT EXISTS tiers (
            id INTEGER PRIMARY KEY,
            pos INTEGER NOT NULL,
            title TEXT NOT NULL
        );
        CREATE TABLE IF NOT EXISTS items (
            id INTEGER PRIMARY KEY,
            name TEXT NOT NULL,
            url TEXT NOT NULL,
            thumb BLOB
        );
        CREATE TABLE IF NOT EXISTS items_pos (
            item_id INTEGER NOT NULL,
            tier_id INTEGER,
            pos INTEGER NOT NULL
        );",
    )
    .map_err(|e| e.to_string())?;

    add_column(conn, "items", "memo", "TEXT")?;
    add_column(conn, "items", "thumb_ref", "TEXT")?;
    add_column(conn, "tierlist", "item_max_id", "INTEGER NOT NULL DEFAULT 0")?;
    add_column(conn, "tierlist", "tier_max_id", "INTEGER NOT NULL DEFAULT 0")?;

    conn.execute(
        "CREATE INDEX IF NOT EXISTS idx_items_pos_tier ON items_pos(tier_id, pos)",
        [],
    )
    .map_err(|e| e.to_string())?;

    Ok(())
}
