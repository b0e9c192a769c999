pub(crate) mod config;
pub(crate) mod game;
pub(crate) mod init;
pub(crate) mod library;
pub(crate) mod user;

use std::path::Path;

use ludoka_db::{Connection, Tables};
use serde::Serialize;

use crate::CliError;

/// Open the database at `path` and register its tables.
pub(crate) fn open(path: &Path) -> Result<(Connection, Tables), CliError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    let conn = ludoka_db::open_database(path)
        .map_err(|e| CliError::database(format!("Failed to open {}: {}", path.display(), e)))?;
    let tables = Tables::open(&conn)?;
    Ok((conn, tables))
}

/// Write `value` to stdout as pretty JSON, bypassing the logger.
pub(crate) fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<(), CliError> {
    let json = serde_json::to_string_pretty(value)
        .map_err(|e| CliError::other(format!("Failed to serialize output: {}", e)))?;
    println!("{}", json);
    Ok(())
}

/// Display form of an optional Steam id.
pub(crate) fn format_steamid(steamid: Option<i64>) -> String {
    steamid.map_or_else(|| "-".to_string(), |id| id.to_string())
}
