//! Per-user game libraries.
//!
//! Only entries that differ from [`LibraryEntry::DEFAULTS`] are stored; a
//! missing row reads back as the defaults.

use ludoka_core::LibraryEntry;
use rusqlite::{Connection, ErrorCode, OptionalExtension, ffi, params, params_from_iter};

use crate::error::OperationError;
use crate::users::placeholders;

/// A user's entry for a game, or the defaults when none is stored.
pub fn get_entry(
    conn: &Connection,
    user_id: i64,
    game_id: i64,
) -> Result<LibraryEntry, OperationError> {
    let entry = conn
        .query_row(
            "SELECT user_id, game_id, interest FROM libraries
             WHERE user_id = ?1 AND game_id = ?2",
            params![user_id, game_id],
            row_to_entry,
        )
        .optional()?;
    Ok(entry.unwrap_or_else(|| LibraryEntry::defaults_for(user_id, game_id)))
}

/// Stored entries of the given users, optionally restricted to some games.
///
/// Ordered by user, then game. Pairs without a stored entry are omitted.
pub fn get_entries(
    conn: &Connection,
    user_ids: &[i64],
    game_ids: Option<&[i64]>,
) -> Result<Vec<LibraryEntry>, OperationError> {
    if user_ids.is_empty() || game_ids.is_some_and(<[i64]>::is_empty) {
        return Ok(Vec::new());
    }

    let mut sql = format!(
        "SELECT user_id, game_id, interest FROM libraries WHERE user_id IN ({})",
        placeholders(user_ids.len())
    );
    let mut ids = user_ids.to_vec();
    if let Some(game_ids) = game_ids {
        sql.push_str(&format!(" AND game_id IN ({})", placeholders(game_ids.len())));
        ids.extend_from_slice(game_ids);
    }
    sql.push_str(" ORDER BY user_id, game_id");

    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt.query_map(params_from_iter(ids), row_to_entry)?;
    rows.collect::<Result<Vec<_>, _>>().map_err(Into::into)
}

/// Store a user's entry for a game.
///
/// An entry with default values removes the stored row instead. The IDs in
/// `entry` are ignored in favor of `user_id` and `game_id`.
pub fn set_entry(
    conn: &Connection,
    user_id: i64,
    game_id: i64,
    entry: &LibraryEntry,
) -> Result<(), OperationError> {
    if entry.has_default_values() {
        unset_entry(conn, user_id, game_id)?;
        return Ok(());
    }

    let result = conn.execute(
        "INSERT INTO libraries (user_id, game_id, interest)
         VALUES (?1, ?2, ?3)
         ON CONFLICT(user_id, game_id) DO UPDATE SET
             interest = excluded.interest",
        params![user_id, game_id, entry.interest],
    );
    match result {
        Ok(_) => Ok(()),
        Err(rusqlite::Error::SqliteFailure(e, _))
            if e.code == ErrorCode::ConstraintViolation
                && e.extended_code == ffi::SQLITE_CONSTRAINT_FOREIGNKEY =>
        {
            Err(OperationError::not_found(
                "user or game",
                format!("{}/{}", user_id, game_id),
            ))
        }
        Err(e) => Err(e.into()),
    }
}

/// Remove a user's entry for a game. Returns false if none was stored.
pub fn unset_entry(
    conn: &Connection,
    user_id: i64,
    game_id: i64,
) -> Result<bool, OperationError> {
    let changed = conn.execute(
        "DELETE FROM libraries WHERE user_id = ?1 AND game_id = ?2",
        params![user_id, game_id],
    )?;
    Ok(changed > 0)
}

fn row_to_entry(row: &rusqlite::Row<'_>) -> rusqlite::Result<LibraryEntry> {
    Ok(LibraryEntry {
        user_id: row.get(0)?,
        game_id: row.get(1)?,
        interest: row.get(2)?,
    })
}
