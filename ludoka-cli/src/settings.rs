//! User settings (`~/.config/ludoka/settings.toml`) and database path
//! resolution.

use std::fmt;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::CliError;

/// Environment variable overriding the database path.
pub(crate) const DB_ENV_VAR: &str = "LUDOKA_DB";

/// Canonical path to the settings file: `~/.config/ludoka/settings.toml`.
pub(crate) fn settings_path() -> PathBuf {
    let config = dirs::config_dir().unwrap_or_else(|| PathBuf::from("."));
    config.join("ludoka").join("settings.toml")
}

/// Default database location: `<data dir>/ludoka/ludoka.db`.
pub(crate) fn default_db_path() -> PathBuf {
    let data = dirs::data_dir().unwrap_or_else(|| PathBuf::from("."));
    data.join("ludoka").join("ludoka.db")
}

#[derive(Debug, Default, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub(crate) struct Settings {
    pub database: DatabaseSettings,
    pub log: LogSettings,
}

#[derive(Debug, Default, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub(crate) struct DatabaseSettings {
    pub path: Option<PathBuf>,
}

#[derive(Debug, Default, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub(crate) struct LogSettings {
    /// `error`, `warn`, `info`, `debug`, or `trace`
    pub level: Option<String>,
}

impl Settings {
    /// Load settings from `path`. A missing file yields the defaults.
    pub(crate) fn load_from(path: &Path) -> Result<Self, CliError> {
        let contents = match std::fs::read_to_string(path) {
            Ok(c) => c,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Self::default()),
            Err(e) => return Err(e.into()),
        };
        toml::from_str(&contents)
            .map_err(|e| CliError::config(format!("Invalid {}: {}", path.display(), e)))
    }
}

/// Where the database path came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum DbPathSource {
    Flag,
    EnvVar,
    ConfigFile,
    Default,
}

impl fmt::Display for DbPathSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Flag => write!(f, "--db flag"),
            Self::EnvVar => write!(f, "env ${}", DB_ENV_VAR),
            Self::ConfigFile => write!(f, "config file"),
            Self::Default => write!(f, "default"),
        }
    }
}

/// Resolve the database path using a priority chain:
///
/// 1. `--db` flag (if `Some`)
/// 2. `LUDOKA_DB` environment variable
/// 3. `database.path` in `settings.toml`
/// 4. [`default_db_path`]
pub(crate) fn resolve_db_path(
    flag: Option<PathBuf>,
    settings: &Settings,
) -> (PathBuf, DbPathSource) {
    resolve_with_env(flag, std::env::var_os(DB_ENV_VAR).map(PathBuf::from), settings)
}

fn resolve_with_env(
    flag: Option<PathBuf>,
    env: Option<PathBuf>,
    settings: &Settings,
) -> (PathBuf, DbPathSource) {
    if let Some(p) = flag {
        return (p, DbPathSource::Flag);
    }
    if let Some(p) = env.filter(|p| !p.as_os_str().is_empty()) {
        return (p, DbPathSource::EnvVar);
    }
    if let Some(p) = settings.database.path.clone() {
        return (p, DbPathSource::ConfigFile);
    }
    (default_db_path(), DbPathSource::Default)
}
