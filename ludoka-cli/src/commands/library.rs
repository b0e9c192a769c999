use std::path::Path;

use ludoka_core::{GroupEntries, LibraryEntry};
use owo_colors::OwoColorize;
use owo_colors::Stream::Stdout;

use crate::CliError;

pub(crate) fn run_library_get(
    db_path: &Path,
    user: i64,
    game: i64,
    json: bool,
) -> Result<(), CliError> {
    let (conn, _) = super::open(db_path)?;
    let entry = ludoka_db::get_entry(&conn, user, game)?;

    if json {
        return super::print_json(&entry);
    }
    let interest = if entry.interest {
        "interested".if_supports_color(Stdout, |t| t.green()).to_string()
    } else {
        "not interested".if_supports_color(Stdout, |t| t.dimmed()).to_string()
    };
    log::info!("User {}, game {}: {}", user, game, interest);
    Ok(())
}

pub(crate) fn run_library_set(
    db_path: &Path,
    user: i64,
    game: i64,
    interest: bool,
) -> Result<(), CliError> {
    let (conn, _) = super::open(db_path)?;
    let entry = LibraryEntry {
        interest,
        ..LibraryEntry::defaults_for(user, game)
    };
    ludoka_db::set_entry(&conn, user, game, &entry)?;
    log::info!("Saved entry for user {}, game {}", user, game);
    Ok(())
}

pub(crate) fn run_library_unset(db_path: &Path, user: i64, game: i64) -> Result<(), CliError> {
    let (conn, _) = super::open(db_path)?;
    if ludoka_db::unset_entry(&conn, user, game)? {
        log::info!("Reset entry for user {}, game {}", user, game);
    } else {
        log::info!("User {} had no entry for game {}", user, game);
    }
    Ok(())
}

pub(crate) fn run_library_group(
    db_path: &Path,
    users: &[i64],
    games: Option<&[i64]>,
) -> Result<(), CliError> {
    let (conn, _) = super::open(db_path)?;

    let known = ludoka_db::read_users(&conn, users)?;
    if known.len() < users.len() {
        let missing: Vec<String> = users
            .iter()
            .filter(|id| !known.iter().any(|u| u.id == Some(**id)))
            .map(|id| id.to_string())
            .collect();
        if !missing.is_empty() {
            return Err(CliError::not_found(format!("user {}", missing.join(", "))));
        }
    }

    let entries = ludoka_db::get_entries(&conn, users, games)?;
    super::print_json(&GroupEntries::new(&entries))
}
