use crate::{Result, Script, ScriptOrder, ScriptStore, StoreError};
use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, Row};
use std::fs;
use std::path::{Path, PathBuf};

/// Highest schema version this build understands.
pub const SCHEMA_VERSION: i64 = 2;

const SCRIPT_COLUMNS: &str =
    "id, title, content, created_at, updated_at, font_size, scroll_speed";

/// SQLite-backed [`ScriptStore`].
pub struct ScriptDb {
    conn: Connection,
    path: Option<PathBuf>,
}

impl ScriptDb {
    pub fn open_or_create(path: &Path) -> Result<Self> {
        if let Some(dir) = path.parent() {
            fs::create_dir_all(dir)?;
        }
        let conn = Connection::open(path).map_err(StoreError::Write)?;
        // Recommended PRAGMAs for local interactive app DB
        conn.pragma_update(None, "journal_mode", &"WAL")
            .map_err(StoreError::Write)?;
        conn.pragma_update(None, "synchronous", &"NORMAL")
            .map_err(StoreError::Write)?;
        apply_migrations(&conn)?;
        tracing::info!(path = %path.display(), "opened script store");
        Ok(Self {
            conn,
            path: Some(path.to_path_buf()),
        })
    }

    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory().map_err(StoreError::Write)?;
        apply_migrations(&conn)?;
        Ok(Self { conn, path: None })
    }

    pub fn connection(&self) -> &Connection {
        &self.conn
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    pub fn schema_version(&self) -> Result<i64> {
        Ok(self
            .conn
            .pragma_query_value(None, "user_version", |row| row.get(0))?)
    }
}

fn micros_to_utc(v: i64) -> DateTime<Utc> {
    DateTime::from_timestamp_micros(v).unwrap_or_default()
}

fn script_from_row(row: &Row<'_>) -> rusqlite::Result<Script> {
    Ok(Script {
        id: row.get(0)?,
        title: row.get(1)?,
        content: row.get(2)?,
        created_at: micros_to_utc(row.get(3)?),
        updated_at: micros_to_utc(row.get(4)?),
        font_size: row.get(5)?,
        scroll_speed: row.get(6)?,
    })
}

fn script_exists(conn: &Connection, id: &str) -> Result<bool> {
    let n: i64 = conn.query_row(
        "SELECT COUNT(*) FROM scripts WHERE id = ?1",
        params![id],
        |row| row.get(0),
    )?;
    Ok(n > 0)
}

fn insert_row(conn: &Connection, script: &Script) -> Result<()> {
    script.validate()?;
    if script_exists(conn, &script.id)? {
        return Err(StoreError::Duplicate(script.id.clone()));
    }
    conn.execute(
        "INSERT INTO scripts(id, title, content, created_at, updated_at, font_size, scroll_speed) VALUES(?1, ?2, ?3, ?4, ?5, ?6, ?7)",
        params![
            script.id,
            script.title,
            script.content,
            script.created_at.timestamp_micros(),
            script.updated_at.timestamp_micros(),
            script.font_size,
            script.scroll_speed,
        ],
    )
    .map_err(StoreError::Write)?;
    tracing::debug!(id = %script.id, "script inserted");
    Ok(())
}

impl ScriptStore for ScriptDb {
    fn insert(&mut self, script: &Script) -> Result<()> {
        insert_row(&self.conn, script)
    }

    /// All rows land in one transaction; any failure rolls the batch back.
    fn insert_batch(&mut self, scripts: &[Script]) -> Result<()> {
        let tx = self.conn.transaction().map_err(StoreError::Write)?;
        for script in scripts {
            insert_row(&tx, script)?;
        }
        tx.commit().map_err(StoreError::Write)?;
        tracing::debug!(count = scripts.len(), "script batch inserted");
        Ok(())
    }

    fn get(&self, id: &str) -> Result<Script> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {SCRIPT_COLUMNS} FROM scripts WHERE id = ?1 LIMIT 1"
        ))?;
        let mut rows = stmt.query(params![id])?;
        if let Some(row) = rows.next()? {
            Ok(script_from_row(row)?)
        } else {
            Err(StoreError::NotFound(id.to_string()))
        }
    }

    fn list_by(&self, order: ScriptOrder) -> Result<Vec<Script>> {
        let order_sql = match order {
            ScriptOrder::Title => "COALESCE(title, '') COLLATE NOCASE ASC, created_at ASC",
            ScriptOrder::RecentlyCreated => "created_at DESC",
        };
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {SCRIPT_COLUMNS} FROM scripts ORDER BY {order_sql}"
        ))?;
        let rows = stmt.query_map([], script_from_row)?;
        let mut out = Vec::new();
        for r in rows {
            out.push(r?);
        }
        Ok(out)
    }

    fn update(&mut self, script: &Script) -> Result<()> {
        script.validate()?;
        let changed = self
            .conn
            .execute(
                "UPDATE scripts SET title = ?2, content = ?3, updated_at = ?4, font_size = ?5, scroll_speed = ?6 WHERE id = ?1",
                params![
                    script.id,
                    script.title,
                    script.content,
                    script.updated_at.timestamp_micros(),
                    script.font_size,
                    script.scroll_speed,
                ],
            )
            .map_err(StoreError::Write)?;
        if changed == 0 {
            return Err(StoreError::NotFound(script.id.clone()));
        }
        tracing::debug!(id = %script.id, "script updated");
        Ok(())
    }

    fn delete(&mut self, id: &str) -> Result<()> {
        let changed = self
            .conn
            .execute("DELETE FROM scripts WHERE id = ?1", params![id])
            .map_err(StoreError::Write)?;
        if changed == 0 {
            return Err(StoreError::NotFound(id.to_string()));
        }
        tracing::debug!(id, "script deleted");
        Ok(())
    }

    fn count(&self) -> Result<usize> {
        let n: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM scripts", [], |row| row.get(0))?;
        Ok(n as usize)
    }
}

fn ensure_column(conn: &Connection, table: &str, column: &str, alter_sql: &str) -> Result<()> {
    let mut stmt = conn.prepare(&format!("PRAGMA table_info({table})"))?;
    let mut rows = stmt.query([])?;
    let mut exists = false;
    while let Some(row) = rows.next()? {
        let name: String = row.get(1)?;
        if name.eq_ignore_ascii_case(column) {
            exists = true;
            break;
        }
    }
    if !exists {
        conn.execute(alter_sql, [])
            .map_err(|e| StoreError::Migration(format!("{table}.{column}: {e}")))?;
    }
    Ok(())
}

fn record_migration(conn: &Connection, name: &str) -> Result<()> {
    conn.execute(
        "INSERT OR IGNORE INTO migrations(name, applied_at) VALUES(?1, strftime('%s','now'))",
        params![name],
    )
    .map_err(|e| StoreError::Migration(format!("{name}: {e}")))?;
    Ok(())
}

fn apply_migrations(conn: &Connection) -> Result<()> {
    let found: i64 = conn.pragma_query_value(None, "user_version", |row| row.get(0))?;
    if found > SCHEMA_VERSION {
        return Err(StoreError::Migration(format!(
            "store schema version {found} is newer than supported version {SCHEMA_VERSION}"
        )));
    }
    conn.execute_batch(include_str!("../migrations/V0001__init.sql"))
        .map_err(|e| StoreError::Migration(format!("V0001__init: {e}")))?;
    record_migration(conn, "V0001__init")?;
    // Display settings (V0002)
    ensure_column(
        conn,
        "scripts",
        "font_size",
        "ALTER TABLE scripts ADD COLUMN font_size REAL NOT NULL DEFAULT 30.0",
    )?;
    ensure_column(
        conn,
        "scripts",
        "scroll_speed",
        "ALTER TABLE scripts ADD COLUMN scroll_speed REAL NOT NULL DEFAULT 10.0",
    )?;
    record_migration(conn, "V0002__display_settings")?;
    conn.pragma_update(None, "user_version", &SCHEMA_VERSION)
        .map_err(|e| StoreError::Migration(format!("user_version: {e}")))?;
    if found < SCHEMA_VERSION {
        tracing::info!(from = found, to = SCHEMA_VERSION, "script store migrated");
    }
    Ok(())
}
