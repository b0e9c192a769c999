use std::path::Path;

use ludoka_core::Game;
use owo_colors::OwoColorize;
use owo_colors::Stream::Stdout;

use super::format_steamid;
use crate::CliError;

pub(crate) fn run_game_add(
    db_path: &Path,
    name: String,
    steamid: Option<i64>,
) -> Result<(), CliError> {
    let (conn, tables) = super::open(db_path)?;
    let game = Game::new(name, steamid);
    let id = ludoka_db::create_game(&conn, &tables, &game)?;
    log::info!(
        "Added {} with id {}",
        game.name.if_supports_color(Stdout, |t| t.bold()),
        id,
    );
    Ok(())
}

pub(crate) fn run_game_list(db_path: &Path, json: bool) -> Result<(), CliError> {
    let (conn, _) = super::open(db_path)?;
    let games = ludoka_db::read_all_games(&conn)?;

    if json {
        return super::print_json(&games);
    }
    if games.is_empty() {
        log::info!("No games.");
        return Ok(());
    }

    log::info!("{}", "Games".if_supports_color(Stdout, |t| t.bold()));
    crate::log_blank();
    log::info!("  {:>6}  {:>10}  {}", "ID", "Steam", "Name");
    for game in &games {
        log::info!(
            "  {:>6}  {:>10}  {}",
            game.id.unwrap_or_default(),
            format_steamid(game.steamid),
            game.name,
        );
    }
    crate::log_blank();
    log::info!("{} game(s)", games.len());
    Ok(())
}

pub(crate) fn run_game_show(db_path: &Path, id: i64, json: bool) -> Result<(), CliError> {
    let (conn, _) = super::open(db_path)?;
    let game = ludoka_db::read_game(&conn, id)?
        .ok_or_else(|| CliError::not_found(format!("game {}", id)))?;

    if json {
        return super::print_json(&game);
    }
    log::info!("  ID:    {}", id);
    log::info!("  Name:  {}", game.name.if_supports_color(Stdout, |t| t.bold()));
    log::info!("  Steam: {}", format_steamid(game.steamid));
    Ok(())
}

pub(crate) fn run_game_update(
    db_path: &Path,
    id: i64,
    name: Option<String>,
    steamid: Option<i64>,
    clear_steamid: bool,
) -> Result<(), CliError> {
    let (conn, tables) = super::open(db_path)?;
    let mut game = ludoka_db::read_game(&conn, id)?
        .ok_or_else(|| CliError::not_found(format!("game {}", id)))?;

    if let Some(name) = name {
        game.name = name;
    }
    if clear_steamid {
        game.steamid = None;
    } else if steamid.is_some() {
        game.steamid = steamid;
    }

    if !ludoka_db::update_game(&conn, &tables, id, &game)? {
        return Err(CliError::not_found(format!("game {}", id)));
    }
    log::info!(
        "Updated game {}: {} (steam {})",
        id,
        game.name,
        format_steamid(game.steamid)
    );
    Ok(())
}

pub(crate) fn run_game_delete(db_path: &Path, id: i64) -> Result<(), CliError> {
    let (conn, _) = super::open(db_path)?;
    if !ludoka_db::delete_game(&conn, id)? {
        return Err(CliError::not_found(format!("game {}", id)));
    }
    log::info!("Deleted game {}", id);
    Ok(())
}
