//! The game catalog.

use ludoka_core::Game;
use rusqlite::{Connection, OptionalExtension, params, params_from_iter};

use crate::error::OperationError;
use crate::tables::Tables;
use crate::unique::{guarded_create, guarded_update};
use crate::users::placeholders;

/// Create a game. The incoming ID is ignored; returns the generated one.
///
/// Fails with a conflict on `games_steamid_unique` if another game already
/// has this Steam id.
pub fn create_game(conn: &Connection, tables: &Tables, game: &Game) -> Result<i64, OperationError> {
    game.validate()?;
    let candidate = Game {
        id: None,
        ..game.clone()
    };
    let id = guarded_create(conn, &tables.games, &candidate, |conn| {
        conn.execute(
            "INSERT INTO games (name, steamid) VALUES (?1, ?2)",
            params![game.name, game.steamid],
        )?;
        Ok(conn.last_insert_rowid())
    })?;
    log::debug!("Created game {} ({})", id, game.name);
    Ok(id)
}

/// Replace a game's name and Steam id. Returns false if no game has this ID.
pub fn update_game(
    conn: &Connection,
    tables: &Tables,
    id: i64,
    game: &Game,
) -> Result<bool, OperationError> {
    game.validate()?;
    let candidate = game.with_id(id);
    let updated = guarded_update(conn, &tables.games, &candidate, |conn| {
        let changed = conn.execute(
            "UPDATE games SET name = ?2, steamid = ?3 WHERE id = ?1",
            params![id, game.name, game.steamid],
        )?;
        Ok(changed > 0)
    })?;
    Ok(updated)
}

/// Delete a game and every library entry referencing it.
pub fn delete_game(conn: &Connection, id: i64) -> Result<bool, OperationError> {
    let changed = conn.execute("DELETE FROM games WHERE id = ?1", params![id])?;
    Ok(changed > 0)
}

pub fn read_game(conn: &Connection, id: i64) -> Result<Option<Game>, OperationError> {
    conn.query_row(
        "SELECT id, name, steamid FROM games WHERE id = ?1",
        params![id],
        row_to_game,
    )
    .optional()
    .map_err(Into::into)
}

/// Games with any of the given IDs, ordered by ID.
pub fn read_games(conn: &Connection, ids: &[i64]) -> Result<Vec<Game>, OperationError> {
    if ids.is_empty() {
        return Ok(Vec::new());
    }
    let sql = format!(
        "SELECT id, name, steamid FROM games WHERE id IN ({}) ORDER BY id",
        placeholders(ids.len())
    );
    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt.query_map(params_from_iter(ids), row_to_game)?;
    rows.collect::<Result<Vec<_>, _>>().map_err(Into::into)
}

pub fn read_all_games(conn: &Connection) -> Result<Vec<Game>, OperationError> {
    let mut stmt = conn.prepare("SELECT id, name, steamid FROM games ORDER BY id")?;
    let rows = stmt.query_map([], row_to_game)?;
    rows.collect::<Result<Vec<_>, _>>().map_err(Into::into)
}

fn row_to_game(row: &rusqlite::Row<'_>) -> rusqlite::Result<Game> {
    Ok(Game {
        id: Some(row.get(0)?),
        name: row.get(1)?,
        steamid: row.get(2)?,
    })
}
