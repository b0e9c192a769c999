use std::path::Path;

use ludoka_core::{UserData, hash_password, validate_password, verify_password};
use owo_colors::OwoColorize;
use owo_colors::Stream::Stdout;

use crate::CliError;

pub(crate) fn run_user_add(
    db_path: &Path,
    name: String,
    password: Option<String>,
) -> Result<(), CliError> {
    let digest = match password.as_deref() {
        Some(p) => {
            validate_password(p).map_err(|e| CliError::invalid(e.to_string()))?;
            Some(hash_password(p))
        }
        None => None,
    };

    let (conn, tables) = super::open(db_path)?;
    let id = ludoka_db::create_user(&conn, &tables, &UserData::new(name.as_str()), digest.as_deref())?;
    log::info!(
        "Created user {} with id {}",
        name.if_supports_color(Stdout, |t| t.bold()),
        id,
    );
    Ok(())
}

pub(crate) fn run_user_list(db_path: &Path, json: bool) -> Result<(), CliError> {
    let (conn, _) = super::open(db_path)?;
    let users = ludoka_db::read_all_users(&conn)?;

    if json {
        return super::print_json(&users);
    }
    if users.is_empty() {
        log::info!("No users.");
        return Ok(());
    }

    log::info!("{}", "Users".if_supports_color(Stdout, |t| t.bold()));
    crate::log_blank();
    log::info!("  {:>6}  {}", "ID", "Name");
    for user in &users {
        log::info!("  {:>6}  {}", user.id.unwrap_or_default(), user.name);
    }
    crate::log_blank();
    log::info!("{} user(s)", users.len());
    Ok(())
}

pub(crate) fn run_user_show(db_path: &Path, id: i64, json: bool) -> Result<(), CliError> {
    let (conn, _) = super::open(db_path)?;
    let user = ludoka_db::read_user(&conn, id)?
        .ok_or_else(|| CliError::not_found(format!("user {}", id)))?;

    if json {
        return super::print_json(&user);
    }
    let login = match ludoka_db::read_password(&conn, &user.name)? {
        Some((_, Some(_))) => "enabled",
        _ => "disabled",
    };
    log::info!("  ID:    {}", id);
    log::info!("  Name:  {}", user.name.if_supports_color(Stdout, |t| t.bold()));
    log::info!("  Login: {}", login);
    Ok(())
}

pub(crate) fn run_user_rename(db_path: &Path, id: i64, name: String) -> Result<(), CliError> {
    let (conn, tables) = super::open(db_path)?;
    if !ludoka_db::update_user(&conn, &tables, id, &UserData::new(name.as_str()))? {
        return Err(CliError::not_found(format!("user {}", id)));
    }
    log::info!("Renamed user {} to {}", id, name);
    Ok(())
}

pub(crate) fn run_user_delete(db_path: &Path, id: i64) -> Result<(), CliError> {
    let (conn, _) = super::open(db_path)?;
    if !ludoka_db::delete_user(&conn, id)? {
        return Err(CliError::not_found(format!("user {}", id)));
    }
    log::info!("Deleted user {}", id);
    Ok(())
}

pub(crate) fn run_user_passwd(
    db_path: &Path,
    id: i64,
    password: Option<String>,
    disable: bool,
) -> Result<(), CliError> {
    let digest = match password.as_deref() {
        Some(p) if !disable => {
            validate_password(p).map_err(|e| CliError::invalid(e.to_string()))?;
            Some(hash_password(p))
        }
        _ => None,
    };

    let (conn, _) = super::open(db_path)?;
    if !ludoka_db::update_password(&conn, id, digest.as_deref())? {
        return Err(CliError::not_found(format!("user {}", id)));
    }
    if digest.is_some() {
        log::info!("Password set for user {}", id);
    } else {
        log::info!("Login disabled for user {}", id);
    }
    Ok(())
}

pub(crate) fn run_user_login(db_path: &Path, name: &str, password: &str) -> Result<(), CliError> {
    let (conn, _) = super::open(db_path)?;

    // Same message for unknown users and wrong passwords
    let denied = || CliError::auth("wrong user name or password");
    let (user, stored) = ludoka_db::read_password(&conn, name)?.ok_or_else(denied)?;
    let stored = stored.ok_or_else(|| CliError::auth(format!("login is disabled for {}", name)))?;
    if !verify_password(password, &stored) {
        return Err(denied());
    }

    log::info!(
        "{} logged in as {} (id {})",
        "OK".if_supports_color(Stdout, |t| t.green()),
        user.name,
        user.id.unwrap_or_default(),
    );
    Ok(())
}
