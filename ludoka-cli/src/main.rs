//! ludoka CLI
//!
//! Command-line interface for the ludoka user, game, and library database.

mod cli_types;
mod commands;
mod error;
mod settings;

use std::io::Write;

use clap::Parser;
use log::LevelFilter;
use owo_colors::OwoColorize;
use owo_colors::Stream::Stdout;

use cli_types::{Cli, Commands, ConfigAction, GameAction, LibraryAction, UserAction};
pub(crate) use error::CliError;
use settings::Settings;

fn main() {
    let cli = Cli::parse();

    let settings_path = settings::settings_path();
    let (settings, settings_error) = match Settings::load_from(&settings_path) {
        Ok(s) => (s, None),
        Err(e) => (Settings::default(), Some(e)),
    };
    init_logger(&cli, &settings);
    if let Some(e) = settings_error {
        log::warn!("Ignoring settings: {}", e);
    }

    if let Err(e) = run(cli, &settings) {
        log::error!("{}", e);
        std::process::exit(e.exit_code());
    }
}

fn run(cli: Cli, settings: &Settings) -> Result<(), CliError> {
    let (db_path, source) = settings::resolve_db_path(cli.db, settings);
    log::debug!("Using database {} ({})", db_path.display(), source);

    match cli.command {
        Commands::Init => commands::init::run_init(&db_path),
        Commands::User { action } => match action {
            UserAction::Add { name, password } => {
                commands::user::run_user_add(&db_path, name, password)
            }
            UserAction::List { json } => commands::user::run_user_list(&db_path, json),
            UserAction::Show { id, json } => commands::user::run_user_show(&db_path, id, json),
            UserAction::Rename { id, name } => commands::user::run_user_rename(&db_path, id, name),
            UserAction::Delete { id } => commands::user::run_user_delete(&db_path, id),
            UserAction::Passwd {
                id,
                password,
                disable,
            } => commands::user::run_user_passwd(&db_path, id, password, disable),
            UserAction::Login { name, password } => {
                commands::user::run_user_login(&db_path, &name, &password)
            }
        },
        Commands::Game { action } => match action {
            GameAction::Add { name, steamid } => {
                commands::game::run_game_add(&db_path, name, steamid)
            }
            GameAction::List { json } => commands::game::run_game_list(&db_path, json),
            GameAction::Show { id, json } => commands::game::run_game_show(&db_path, id, json),
            GameAction::Update {
                id,
                name,
                steamid,
                clear_steamid,
            } => commands::game::run_game_update(&db_path, id, name, steamid, clear_steamid),
            GameAction::Delete { id } => commands::game::run_game_delete(&db_path, id),
        },
        Commands::Library { action } => match action {
            LibraryAction::Get { user, game, json } => {
                commands::library::run_library_get(&db_path, user, game, json)
            }
            LibraryAction::Set {
                user,
                game,
                interest,
            } => commands::library::run_library_set(&db_path, user, game, interest),
            LibraryAction::Unset { user, game } => {
                commands::library::run_library_unset(&db_path, user, game)
            }
            LibraryAction::Group { users, games } => {
                commands::library::run_library_group(&db_path, &users, games.as_deref())
            }
        },
        Commands::Config { action } => match action {
            ConfigAction::Show => commands::config::run_config_show(&db_path, source, settings),
            ConfigAction::Path => commands::config::run_config_path(),
        },
    }
}

/// Install the logger. Normal output goes through `log::info!`.
///
/// Level priority: `--quiet`/`--verbose`, then `RUST_LOG`, then
/// `log.level` in settings, then `info`.
fn init_logger(cli: &Cli, settings: &Settings) {
    let mut builder = env_logger::Builder::new();
    builder.target(env_logger::Target::Stdout);

    let configured = settings
        .log
        .level
        .as_deref()
        .and_then(|l| l.parse::<LevelFilter>().ok());
    builder.filter_level(configured.unwrap_or(LevelFilter::Info));
    if let Ok(filters) = std::env::var("RUST_LOG") {
        builder.parse_filters(&filters);
    }
    if cli.quiet {
        builder.filter_level(LevelFilter::Warn);
    } else if cli.verbose {
        builder.filter_level(LevelFilter::Debug);
    }

    let verbose = cli.verbose;
    builder.format(move |buf, record| match record.level() {
        log::Level::Info if !verbose => writeln!(buf, "{}", record.args()),
        log::Level::Error => writeln!(
            buf,
            "{} {}",
            "error:".if_supports_color(Stdout, |t| t.red()),
            record.args()
        ),
        log::Level::Warn => writeln!(
            buf,
            "{} {}",
            "warning:".if_supports_color(Stdout, |t| t.yellow()),
            record.args()
        ),
        level => writeln!(
            buf,
            "[{} {:<5} {}] {}",
            buf.timestamp_millis(),
            level,
            record.target(),
            record.args()
        ),
    });
    builder.init();
}

/// Print an empty line through the logger.
pub(crate) fn log_blank() {
    log::info!("");
}
