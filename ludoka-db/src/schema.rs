//! SQLite schema creation and verification.

use std::time::Duration;

use rusqlite::{Connection, params};
use thiserror::Error;

use crate::unique::{ConfigurationError, TableDescriptor};

#[derive(Debug, Error)]
pub enum SchemaError {
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),
    #[error("Table configuration error: {0}")]
    Configuration(#[from] ConfigurationError),
    #[error("Schema version mismatch: expected version {expected}, found {found}")]
    VersionMismatch { expected: i32, found: i32 },
    #[error("Schema mismatch on table '{table}': {detail}")]
    Mismatch { table: String, detail: String },
}

/// Current schema version.
pub const CURRENT_VERSION: i32 = 1;

/// How long a connection waits for another writer's lock.
pub const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

/// Create all tables and indexes if they don't exist.
///
/// This is idempotent: safe to call on an existing database.
pub fn create_schema(conn: &Connection) -> Result<(), SchemaError> {
    conn.execute_batch(SCHEMA_SQL)?;
    if get_schema_version(conn)? == 0 {
        set_schema_version(conn, CURRENT_VERSION)?;
    }
    Ok(())
}

/// Open or create a ludoka database at the given path.
pub fn open_database(path: &std::path::Path) -> Result<Connection, SchemaError> {
    let conn = Connection::open(path)?;
    conn.execute_batch("PRAGMA journal_mode=WAL; PRAGMA foreign_keys=ON;")?;
    conn.busy_timeout(BUSY_TIMEOUT)?;

    let version = get_schema_version(&conn)?;
    if version == 0 {
        log::info!("Creating schema in {}", path.display());
        create_schema(&conn)?;
    } else if version != CURRENT_VERSION {
        return Err(SchemaError::VersionMismatch {
            expected: CURRENT_VERSION,
            found: version,
        });
    }

    Ok(conn)
}

/// Open an in-memory database with the full schema. Useful for testing.
pub fn open_memory() -> Result<Connection, SchemaError> {
    let conn = Connection::open_in_memory()?;
    conn.execute_batch("PRAGMA foreign_keys=ON;")?;
    create_schema(&conn)?;
    Ok(conn)
}

/// Get the current schema version, or 0 if no schema exists.
pub fn get_schema_version(conn: &Connection) -> Result<i32, SchemaError> {
    let exists: bool = conn.query_row(
        "SELECT EXISTS(SELECT 1 FROM sqlite_master WHERE type='table' AND name='schema_version')",
        [],
        |row| row.get(0),
    )?;

    if !exists {
        return Ok(0);
    }

    let version: i32 = conn.query_row(
        "SELECT COALESCE(MAX(version), 0) FROM schema_version",
        [],
        |row| row.get(0),
    )?;
    Ok(version)
}

fn set_schema_version(conn: &Connection, version: i32) -> Result<(), SchemaError> {
    conn.execute(
        "INSERT INTO schema_version (version) VALUES (?1)",
        [version],
    )?;
    Ok(())
}

// ── Descriptor Verification ─────────────────────────────────────────────────

/// Check a table descriptor against the live schema.
///
/// The declared primary key must match the table's, in order, and every
/// declared unique index must exist under its name with the same columns.
/// Unique indexes present in the database but not declared are only logged:
/// the database still enforces them on write.
pub fn verify_table<T>(conn: &Connection, table: &TableDescriptor<T>) -> Result<(), SchemaError> {
    let name = table.table();
    let mismatch = |detail: String| SchemaError::Mismatch {
        table: name.to_string(),
        detail,
    };

    let actual_pk = primary_key_columns(conn, name)?;
    if actual_pk.is_empty() {
        return Err(mismatch("table does not exist or has no primary key".into()));
    }
    if actual_pk != table.primary_key() {
        return Err(mismatch(format!(
            "primary key is ({}), declared ({})",
            actual_pk.join(", "),
            table.primary_key().join(", "),
        )));
    }

    let indexes = unique_indexes(conn, name)?;
    for declared in table.unique_indexes() {
        let Some((_, columns)) = indexes.iter().find(|(n, _)| *n == declared.name) else {
            return Err(mismatch(format!(
                "unique index '{}' does not exist",
                declared.name
            )));
        };
        if *columns != declared.columns {
            return Err(mismatch(format!(
                "unique index '{}' covers ({}), declared ({})",
                declared.name,
                columns.join(", "),
                declared.columns.join(", "),
            )));
        }
    }

    for (index, columns) in &indexes {
        let cols: Vec<&str> = columns.iter().map(String::as_str).collect();
        if table.group_for_columns(&cols).is_none() {
            log::warn!(
                "Unique index '{}' on {}({}) is not declared; conflicts on it surface only at write time",
                index,
                name,
                columns.join(", "),
            );
        }
    }

    Ok(())
}

/// Primary key columns of `table` in key order (empty if the table is missing).
fn primary_key_columns(conn: &Connection, table: &str) -> Result<Vec<String>, SchemaError> {
    let mut stmt = conn.prepare(
        "SELECT name FROM pragma_table_info(?1) WHERE pk > 0 ORDER BY pk",
    )?;
    let rows = stmt.query_map(params![table], |row| row.get::<_, String>(0))?;
    rows.collect::<Result<Vec<_>, _>>().map_err(Into::into)
}

/// Unique indexes of `table` other than the primary key, with their columns.
fn unique_indexes(
    conn: &Connection,
    table: &str,
) -> Result<Vec<(String, Vec<String>)>, SchemaError> {
    let mut stmt = conn.prepare(
        "SELECT name FROM pragma_index_list(?1) WHERE \"unique\" = 1 AND origin != 'pk' ORDER BY name",
    )?;
    let names = stmt
        .query_map(params![table], |row| row.get::<_, String>(0))?
        .collect::<Result<Vec<_>, _>>()?;

    let mut cols_stmt =
        conn.prepare("SELECT name FROM pragma_index_info(?1) ORDER BY seqno")?;
    let mut indexes = Vec::with_capacity(names.len());
    for index in names {
        let columns = cols_stmt
            .query_map(params![index], |row| row.get::<_, String>(0))?
            .collect::<Result<Vec<_>, _>>()?;
        indexes.push((index, columns));
    }
    Ok(indexes)
}

const SCHEMA_SQL: &str = r#"
-- Schema version tracking
CREATE TABLE IF NOT EXISTS schema_version (
    version INTEGER NOT NULL,
    applied_at TEXT NOT NULL DEFAULT (datetime('now'))
);

-- Users
CREATE TABLE IF NOT EXISTS users (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    name TEXT NOT NULL,
    password BLOB
);
CREATE UNIQUE INDEX IF NOT EXISTS users_name_unique ON users(name);

-- Game catalog
CREATE TABLE IF NOT EXISTS games (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    name TEXT NOT NULL,
    steamid INTEGER
);
CREATE UNIQUE INDEX IF NOT EXISTS games_steamid_unique ON games(steamid);

-- Per-user interest in games; default entries are not stored
CREATE TABLE IF NOT EXISTS libraries (
    user_id INTEGER NOT NULL REFERENCES users(id) ON DELETE CASCADE,
    game_id INTEGER NOT NULL REFERENCES games(id) ON DELETE CASCADE,
    interest BOOLEAN NOT NULL,
    PRIMARY KEY (user_id, game_id)
);
CREATE INDEX IF NOT EXISTS idx_libraries_game ON libraries(game_id);
"#;
