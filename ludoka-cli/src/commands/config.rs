use std::path::Path;

use owo_colors::OwoColorize;
use owo_colors::Stream::Stdout;

use crate::CliError;
use crate::settings::{DbPathSource, Settings, settings_path};

/// Show the settings file, the resolved database path, and their sources.
pub(crate) fn run_config_show(
    db_path: &Path,
    source: DbPathSource,
    settings: &Settings,
) -> Result<(), CliError> {
    log::info!(
        "{}",
        "ludoka Configuration".if_supports_color(Stdout, |t| t.bold()),
    );
    crate::log_blank();

    let path = settings_path();
    let state = if path.exists() {
        "(exists)".if_supports_color(Stdout, |t| t.green()).to_string()
    } else {
        "(not found)".if_supports_color(Stdout, |t| t.dimmed()).to_string()
    };
    log::info!(
        "  Settings file: {} {}",
        path.display().if_supports_color(Stdout, |t| t.cyan()),
        state,
    );
    crate::log_blank();

    log::info!(
        "  {:<10} {} ({})",
        "database",
        db_path.display(),
        source.if_supports_color(Stdout, |t| t.dimmed()),
    );
    let level = settings.log.level.as_deref().unwrap_or("info");
    let level_source = if settings.log.level.is_some() {
        "config file"
    } else {
        "default"
    };
    log::info!(
        "  {:<10} {} ({})",
        "log level",
        level,
        level_source.if_supports_color(Stdout, |t| t.dimmed()),
    );
    Ok(())
}

/// Print the settings file path.
pub(crate) fn run_config_path() -> Result<(), CliError> {
    println!("{}", settings_path().display());
    Ok(())
}
