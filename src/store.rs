use std::collections::HashMap;
use std::path::Path;

use chrono::{DateTime, Utc};
use rusqlite::{Connection, OptionalExtension};
use serde::{Deserialize, Serialize};

use crate::error::{Result, SeatingError};
use crate::grid::{Grid, GridBounds, Seat};

pub const DB_FILE: &str = "seating.sqlite3";

/// A named, persisted copy of grid state. Immutable once saved: editing the
/// active grid never touches a stored snapshot.
#[derive(Debug, Clone, PartialEq)]
pub struct LayoutSnapshot {
    pub name: String,
    pub created_at: DateTime<Utc>,
    pub grid: Grid,
}

// Wire shape per the persistence contract: camelCase keys, ISO-8601
// createdAt, seats as a flat list reassembled by (row, col) on load.
// Unknown extra fields are ignored for forward compatibility.
#[derive(Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SnapshotWire {
    name: String,
    created_at: String,
    grid: GridWire,
}

#[derive(Serialize, Deserialize)]
struct GridWire {
    rows: usize,
    cols: usize,
    seats: Vec<Seat>,
}

impl LayoutSnapshot {
    pub fn to_json(&self) -> Result<String> {
        let wire = SnapshotWire {
            name: self.name.clone(),
            created_at: self.created_at.to_rfc3339(),
            grid: GridWire {
                rows: self.grid.rows(),
                cols: self.grid.cols(),
                seats: self.grid.seats().cloned().collect(),
            },
        };
        serde_json::to_string(&wire)
            .map_err(|e| SeatingError::StorageUnavailable(format!("serialize snapshot: {e}")))
    }

    pub fn from_json(body: &str, bounds: GridBounds) -> Result<LayoutSnapshot> {
        let wire: SnapshotWire = serde_json::from_str(body)
            .map_err(|e| SeatingError::StorageUnavailable(format!("malformed snapshot: {e}")))?;
        let created_at = DateTime::parse_from_rfc3339(&wire.created_at)
            .map_err(|e| SeatingError::StorageUnavailable(format!("malformed createdAt: {e}")))?
            .with_timezone(&Utc);
        let grid = Grid::from_parts(wire.grid.rows, wire.grid.cols, wire.grid.seats, bounds)?;
        Ok(LayoutSnapshot {
            name: wire.name,
            created_at,
            grid,
        })
    }
}

/// Key->string persistence collaborator. The engine defines only the
/// serialization contract; the backing medium is the host's choice.
pub trait LayoutStore {
    fn get(&self, name: &str) -> Result<Option<String>>;
    fn set(&mut self, name: &str, body: &str) -> Result<()>;
    fn remove(&mut self, name: &str) -> Result<bool>;
    fn list(&self) -> Result<Vec<String>>;
}

/// Persist the grid under `name`. Refuses to replace an existing snapshot
/// unless the host confirmed the overwrite.
pub fn save_layout(
    store: &mut dyn LayoutStore,
    name: &str,
    grid: &Grid,
    overwrite: bool,
) -> Result<LayoutSnapshot> {
    if !overwrite && store.get(name)?.is_some() {
        return Err(SeatingError::NameConflict {
            name: name.to_string(),
        });
    }
    let snapshot = LayoutSnapshot {
        name: name.to_string(),
        created_at: Utc::now(),
        grid: grid.clone(),
    };
    store.set(name, &snapshot.to_json()?)?;
    tracing::info!(layout = name, "layout saved");
    Ok(snapshot)
}

pub fn load_layout(
    store: &dyn LayoutStore,
    name: &str,
    bounds: GridBounds,
) -> Result<LayoutSnapshot> {
    let Some(body) = store.get(name)? else {
        return Err(SeatingError::NotFound {
            name: name.to_string(),
        });
    };
    LayoutSnapshot::from_json(&body, bounds)
}

pub fn delete_layout(store: &mut dyn LayoutStore, name: &str) -> Result<()> {
    if !store.remove(name)? {
        return Err(SeatingError::NotFound {
            name: name.to_string(),
        });
    }
    tracing::info!(layout = name, "layout deleted");
    Ok(())
}

pub fn list_layouts(store: &dyn LayoutStore) -> Result<Vec<String>> {
    let mut names = store.list()?;
    names.sort();
    Ok(names)
}

/// HashMap-backed store for hosts that persist elsewhere and for tests.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: HashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        MemoryStore::default()
    }
}

impl LayoutStore for MemoryStore {
    fn get(&self, name: &str) -> Result<Option<String>> {
        Ok(self.entries.get(name).cloned())
    }

    fn set(&mut self, name: &str, body: &str) -> Result<()> {
        self.entries.insert(name.to_string(), body.to_string());
        Ok(())
    }

    fn remove(&mut self, name: &str) -> Result<bool> {
        Ok(self.entries.remove(name).is_some())
    }

    fn list(&self) -> Result<Vec<String>> {
        Ok(self.entries.keys().cloned().collect())
    }
}

/// SQLite-backed store: one workspace directory, one `seating.sqlite3`,
/// one snapshots table. I/O failures surface as `StorageUnavailable`; the
/// engine never retries on its own.
pub struct SqliteStore {
    conn: Connection,
}

fn db_err(e: rusqlite::Error) -> SeatingError {
    SeatingError::StorageUnavailable(e.to_string())
}

impl SqliteStore {
    pub fn open(workspace: &Path) -> Result<SqliteStore> {
        std::fs::create_dir_all(workspace)
            .map_err(|e| SeatingError::StorageUnavailable(e.to_string()))?;
        let conn = Connection::open(workspace.join(DB_FILE)).map_err(db_err)?;
        Self::init(conn)
    }

    pub fn open_in_memory() -> Result<SqliteStore> {
        let conn = Connection::open_in_memory().map_err(db_err)?;
        Self::init(conn)
    }

    fn init(conn: Connection) -> Result<SqliteStore> {
        conn.execute(
            "CREATE TABLE IF NOT EXISTS layout_snapshots(
                name TEXT PRIMARY KEY,
                body TEXT NOT NULL,
                updated_at TEXT
            )",
            [],
        )
        .map_err(db_err)?;
        Ok(SqliteStore { conn })
    }
}

impl LayoutStore for SqliteStore {
    fn get(&self, name: &str) -> Result<Option<String>> {
        self.conn
            .query_row(
                "SELECT body FROM layout_snapshots WHERE name = ?",
                [name],
                |r| r.get(0),
            )
            .optional()
            .map_err(db_err)
    }

    fn set(&mut self, name: &str, body: &str) -> Result<()> {
        self.conn
            .execute(
                "INSERT INTO layout_snapshots(name, body, updated_at)
                 VALUES(?, ?, ?)
                 ON CONFLICT(name) DO UPDATE SET
                   body = excluded.body,
                   updated_at = excluded.updated_at",
                (name, body, Utc::now().to_rfc3339()),
            )
            .map_err(db_err)?;
        Ok(())
    }

    fn remove(&mut self, name: &str) -> Result<bool> {
        let changed = self
            .conn
            .execute("DELETE FROM layout_snapshots WHERE name = ?", [name])
            .map_err(db_err)?;
        Ok(changed > 0)
    }

    fn list(&self) -> Result<Vec<String>> {
        let mut stmt = self
            .conn
            .prepare("SELECT name FROM layout_snapshots ORDER BY name")
            .map_err(db_err)?;
        stmt.query_map([], |r| r.get::<_, String>(0))
            .and_then(|it| it.collect::<std::result::Result<Vec<_>, _>>())
            .map_err(db_err)
    }
}
