//! Uniqueness descriptors for the ludoka tables.

use ludoka_core::{Game, User};
use rusqlite::Connection;

use crate::schema::{SchemaError, verify_table};
use crate::unique::{ConfigurationError, Entry, TableDescriptor, UniqueIndex, register_table};

pub const USERS_NAME_UNIQUE: &str = "users_name_unique";
pub const GAMES_STEAMID_UNIQUE: &str = "games_steamid_unique";

/// Descriptors for every table written through a guarded write.
///
/// Registered once at startup and shared by all operations.
#[derive(Debug)]
pub struct Tables {
    pub users: TableDescriptor<User>,
    pub games: TableDescriptor<Game>,
}

impl Tables {
    /// Register all descriptors.
    pub fn register() -> Result<Self, ConfigurationError> {
        let users = register_table(
            "users",
            &["id"],
            vec![UniqueIndex::new(USERS_NAME_UNIQUE, ["name"])],
            vec![
                Entry::new("id", |u: &User| u.id),
                Entry::new("name", |u: &User| u.name.clone()),
            ],
        )?;

        let games = register_table(
            "games",
            &["id"],
            vec![UniqueIndex::new(GAMES_STEAMID_UNIQUE, ["steamid"])],
            vec![
                Entry::new("id", |g: &Game| g.id),
                Entry::new("name", |g: &Game| g.name.clone()),
                Entry::new("steamid", |g: &Game| g.steamid),
            ],
        )?;

        Ok(Self { users, games })
    }

    /// Register all descriptors and verify them against `conn`'s schema.
    pub fn open(conn: &Connection) -> Result<Self, SchemaError> {
        let tables = Self::register()?;
        verify_table(conn, &tables.users)?;
        verify_table(conn, &tables.games)?;
        Ok(tables)
    }
}
