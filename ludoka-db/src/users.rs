//! User accounts.

use ludoka_core::{User, UserData};
use rusqlite::{Connection, OptionalExtension, params, params_from_iter};

use crate::error::OperationError;
use crate::tables::Tables;
use crate::unique::{guarded_create, guarded_update};

// ── Writes ──────────────────────────────────────────────────────────────────

/// Create a user. Returns the generated ID.
///
/// Fails with a conflict on `users_name_unique` if the name is taken.
pub fn create_user(
    conn: &Connection,
    tables: &Tables,
    user: &UserData,
    password: Option<&[u8]>,
) -> Result<i64, OperationError> {
    user.validate()?;
    let candidate = User {
        id: None,
        name: user.name.clone(),
    };
    let id = guarded_create(conn, &tables.users, &candidate, |conn| {
        conn.execute(
            "INSERT INTO users (name, password) VALUES (?1, ?2)",
            params![user.name, password],
        )?;
        Ok(conn.last_insert_rowid())
    })?;
    log::debug!("Created user {} ({})", id, user.name);
    Ok(id)
}

/// Rename a user. Returns false if no user has this ID.
pub fn update_user(
    conn: &Connection,
    tables: &Tables,
    id: i64,
    user: &UserData,
) -> Result<bool, OperationError> {
    user.validate()?;
    let candidate = User::new(id, user.clone());
    let updated = guarded_update(conn, &tables.users, &candidate, |conn| {
        let changed = conn.execute(
            "UPDATE users SET name = ?2 WHERE id = ?1",
            params![id, user.name],
        )?;
        Ok(changed > 0)
    })?;
    Ok(updated)
}

/// Set a user's password digest, or clear it to disable login.
pub fn update_password(
    conn: &Connection,
    id: i64,
    password: Option<&[u8]>,
) -> Result<bool, OperationError> {
    let changed = conn.execute(
        "UPDATE users SET password = ?2 WHERE id = ?1",
        params![id, password],
    )?;
    Ok(changed > 0)
}

/// Delete a user along with their library.
pub fn delete_user(conn: &Connection, id: i64) -> Result<bool, OperationError> {
    let changed = conn.execute("DELETE FROM users WHERE id = ?1", params![id])?;
    Ok(changed > 0)
}

// ── Reads ───────────────────────────────────────────────────────────────────

pub fn read_user(conn: &Connection, id: i64) -> Result<Option<User>, OperationError> {
    conn.query_row(
        "SELECT id, name FROM users WHERE id = ?1",
        params![id],
        row_to_user,
    )
    .optional()
    .map_err(Into::into)
}

/// Users with any of the given IDs, ordered by ID. Unknown IDs are skipped.
pub fn read_users(conn: &Connection, ids: &[i64]) -> Result<Vec<User>, OperationError> {
    if ids.is_empty() {
        return Ok(Vec::new());
    }
    let sql = format!(
        "SELECT id, name FROM users WHERE id IN ({}) ORDER BY id",
        placeholders(ids.len())
    );
    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt.query_map(params_from_iter(ids), row_to_user)?;
    rows.collect::<Result<Vec<_>, _>>().map_err(Into::into)
}

pub fn read_all_users(conn: &Connection) -> Result<Vec<User>, OperationError> {
    let mut stmt = conn.prepare("SELECT id, name FROM users ORDER BY id")?;
    let rows = stmt.query_map([], row_to_user)?;
    rows.collect::<Result<Vec<_>, _>>().map_err(Into::into)
}

/// Look up a user by name along with their password digest.
///
/// The digest is `None` when login is disabled for the user.
pub fn read_password(
    conn: &Connection,
    name: &str,
) -> Result<Option<(User, Option<Vec<u8>>)>, OperationError> {
    conn.query_row(
        "SELECT id, name, password FROM users WHERE name = ?1",
        params![name],
        |row| Ok((row_to_user(row)?, row.get(2)?)),
    )
    .optional()
    .map_err(Into::into)
}

/// Whether a user other than `except_id` already has this name.
pub fn user_exists_by_name(
    conn: &Connection,
    name: &str,
    except_id: Option<i64>,
) -> Result<bool, OperationError> {
    let exists: bool = conn.query_row(
        "SELECT EXISTS(SELECT 1 FROM users WHERE name = ?1 AND (?2 IS NULL OR id != ?2))",
        params![name, except_id],
        |row| row.get(0),
    )?;
    Ok(exists)
}

fn row_to_user(row: &rusqlite::Row<'_>) -> rusqlite::Result<User> {
    Ok(User {
        id: Some(row.get(0)?),
        name: row.get(1)?,
    })
}

/// `?, ?, ?` for an `IN` list of `n` values.
pub(crate) fn placeholders(n: usize) -> String {
    vec!["?"; n].join(", ")
}
