//! SQLite persistence for ludoka.
//!
//! Provides schema creation, the unique-constraint conflict checker that
//! guards every insert and update, and the user, game, and library
//! operations built on it (via rusqlite with the bundled feature).

pub mod error;
pub mod games;
pub mod libraries;
pub mod schema;
pub mod tables;
pub mod unique;
pub mod users;

pub use error::OperationError;
pub use rusqlite::Connection;
pub use games::{create_game, delete_game, read_all_games, read_game, read_games, update_game};
pub use libraries::{get_entries, get_entry, set_entry, unset_entry};
pub use schema::{SchemaError, create_schema, open_database, open_memory, verify_table};
pub use tables::{GAMES_STEAMID_UNIQUE, Tables, USERS_NAME_UNIQUE};
pub use unique::{ConflictError, PRIMARY_KEY, WriteError};
pub use users::{
    create_user, delete_user, read_all_users, read_password, read_user, read_users,
    update_password, update_user, user_exists_by_name,
};
