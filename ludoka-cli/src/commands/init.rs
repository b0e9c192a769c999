use std::path::Path;

use owo_colors::OwoColorize;
use owo_colors::Stream::Stdout;

use crate::CliError;

pub(crate) fn run_init(db_path: &Path) -> Result<(), CliError> {
    let existed = db_path.exists();
    let (conn, tables) = super::open(db_path)?;
    let version = ludoka_db::schema::get_schema_version(&conn)?;

    let status = if existed { "verified" } else { "created" };
    log::info!(
        "Database {} {}",
        db_path.display().if_supports_color(Stdout, |t| t.cyan()),
        status.if_supports_color(Stdout, |t| t.green()),
    );
    log::info!("  Schema version: {}", version);
    for table in [tables.users.table(), tables.games.table()] {
        log::debug!("  Descriptor for '{}' matches the schema", table);
    }
    Ok(())
}
