//! Data model types for users, the game catalog, and per-user libraries.
//!
//! These types mirror the persisted schema. Identifiers assigned by the
//! database are `Option<i64>`: `None` means "not stored yet".

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// Maximum length of a user name, in characters.
pub const MAX_USER_NAME_LEN: usize = 50;

/// Maximum length of a game name, in characters.
pub const MAX_GAME_NAME_LEN: usize = 256;

// ── User ────────────────────────────────────────────────────────────────────

/// A user identified by an ID.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    #[serde(default)]
    pub id: Option<i64>,
    pub name: String,
}

impl User {
    pub fn new(id: i64, data: UserData) -> Self {
        Self {
            id: Some(id),
            name: data.name,
        }
    }
}

/// A user's data without an associated ID.
///
/// Most calls that receive user data get the ID separately.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserData {
    pub name: String,
}

impl UserData {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        validate_name("user", &self.name, MAX_USER_NAME_LEN)
    }
}

impl From<User> for UserData {
    fn from(user: User) -> Self {
        Self { name: user.name }
    }
}

// ── Game ────────────────────────────────────────────────────────────────────

/// A catalog game, optionally linked to its Steam application id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Game {
    #[serde(default)]
    pub id: Option<i64>,
    pub name: String,
    #[serde(default)]
    pub steamid: Option<i64>,
}

impl Game {
    pub fn new(name: impl Into<String>, steamid: Option<i64>) -> Self {
        Self {
            id: None,
            name: name.into(),
            steamid,
        }
    }

    /// Copy of this game carrying the given id.
    pub fn with_id(&self, id: i64) -> Self {
        Self {
            id: Some(id),
            ..self.clone()
        }
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        validate_name("game", &self.name, MAX_GAME_NAME_LEN)
    }
}

// ── Library ─────────────────────────────────────────────────────────────────

/// A user's interest in a game.
///
/// Entries equal to [`LibraryEntry::DEFAULTS`] are never stored: reading a
/// missing pair yields the defaults for that pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LibraryEntry {
    #[serde(default = "unset_id")]
    pub user_id: i64,
    #[serde(default = "unset_id")]
    pub game_id: i64,
    pub interest: bool,
}

fn unset_id() -> i64 {
    -1
}

impl LibraryEntry {
    pub const DEFAULTS: LibraryEntry = LibraryEntry {
        user_id: -1,
        game_id: -1,
        interest: false,
    };

    /// Column order used by the compact list encoding.
    pub const COLUMNS: [&'static str; 3] = ["user_id", "game_id", "interest"];

    /// Default entry for a specific user/game pair.
    pub fn defaults_for(user_id: i64, game_id: i64) -> Self {
        Self {
            user_id,
            game_id,
            ..Self::DEFAULTS
        }
    }

    pub fn has_default_values(&self) -> bool {
        self.interest == Self::DEFAULTS.interest
    }

    /// Compact `[user_id, game_id, interest]` row.
    pub fn as_row(&self) -> LibraryRow {
        LibraryRow(self.user_id, self.game_id, self.interest)
    }
}

/// A library entry encoded as a positional row (serializes as a JSON array).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LibraryRow(pub i64, pub i64, pub bool);

impl From<LibraryRow> for LibraryEntry {
    fn from(row: LibraryRow) -> Self {
        Self {
            user_id: row.0,
            game_id: row.1,
            interest: row.2,
        }
    }
}

/// Library entries for a group of users, in compact form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupEntries {
    pub defaults: LibraryRow,
    pub columns: Vec<String>,
    pub entries: Vec<LibraryRow>,
}

impl GroupEntries {
    pub fn new(entries: &[LibraryEntry]) -> Self {
        Self {
            defaults: LibraryEntry::DEFAULTS.as_row(),
            columns: LibraryEntry::COLUMNS.iter().map(|c| c.to_string()).collect(),
            entries: entries.iter().map(LibraryEntry::as_row).collect(),
        }
    }
}

// ── Helpers ─────────────────────────────────────────────────────────────────

fn validate_name(kind: &'static str, name: &str, max: usize) -> Result<(), ValidationError> {
    let len = name.chars().count();
    if name.trim().is_empty() {
        return Err(ValidationError::EmptyName { kind });
    }
    if len > max {
        return Err(ValidationError::NameTooLong { kind, len, max });
    }
    Ok(())
}
