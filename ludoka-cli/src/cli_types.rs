//! CLI type definitions: command enums and argument structs.

use std::path::PathBuf;

use clap::{ArgAction, Parser, Subcommand};

#[derive(Parser)]
#[command(name = "ludoka")]
#[command(about = "Manage users, games, and game libraries", long_about = None)]
pub(crate) struct Cli {
    /// Database file (overrides $LUDOKA_DB and settings.toml)
    #[arg(long, global = true)]
    pub db: Option<PathBuf>,

    /// Only show warnings and errors (suppress normal output)
    #[arg(long, global = true)]
    pub quiet: bool,

    /// Enable verbose/debug logging (timestamps + debug-level messages)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub(crate) enum Commands {
    /// Create the database and verify its schema
    Init,

    /// Manage user accounts
    User {
        #[command(subcommand)]
        action: UserAction,
    },

    /// Manage the game catalog
    Game {
        #[command(subcommand)]
        action: GameAction,
    },

    /// Read and edit user libraries
    Library {
        #[command(subcommand)]
        action: LibraryAction,
    },

    /// Show settings and where they come from
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand)]
pub(crate) enum UserAction {
    /// Create a user
    Add {
        name: String,

        /// Enable login with this password
        #[arg(long)]
        password: Option<String>,
    },

    /// List all users
    List {
        #[arg(long)]
        json: bool,
    },

    /// Show one user
    Show {
        id: i64,

        #[arg(long)]
        json: bool,
    },

    /// Change a user's name
    Rename { id: i64, name: String },

    /// Delete a user and their library
    Delete { id: i64 },

    /// Set a user's password, or disable login
    Passwd {
        id: i64,

        #[arg(long, required_unless_present = "disable")]
        password: Option<String>,

        /// Remove the password; the user can no longer log in
        #[arg(long, conflicts_with = "password")]
        disable: bool,
    },

    /// Check a user name and password
    Login { name: String, password: String },
}

#[derive(Subcommand)]
pub(crate) enum GameAction {
    /// Add a game to the catalog
    Add {
        name: String,

        /// Steam application id
        #[arg(long)]
        steamid: Option<i64>,
    },

    /// List all games
    List {
        #[arg(long)]
        json: bool,
    },

    /// Show one game
    Show {
        id: i64,

        #[arg(long)]
        json: bool,
    },

    /// Change a game's name or Steam id
    Update {
        id: i64,

        #[arg(long)]
        name: Option<String>,

        #[arg(long, conflicts_with = "clear_steamid")]
        steamid: Option<i64>,

        /// Remove the Steam id
        #[arg(long)]
        clear_steamid: bool,
    },

    /// Remove a game from the catalog and every library
    Delete { id: i64 },
}

#[derive(Subcommand)]
pub(crate) enum LibraryAction {
    /// Show a user's entry for a game
    Get {
        user: i64,
        game: i64,

        #[arg(long)]
        json: bool,
    },

    /// Set a user's entry for a game
    Set {
        user: i64,
        game: i64,

        /// Whether the user is interested in the game
        #[arg(long, action = ArgAction::Set, default_value_t = true)]
        interest: bool,
    },

    /// Reset a user's entry for a game to the defaults
    Unset { user: i64, game: i64 },

    /// Print the entries of several users as compact JSON
    Group {
        /// User ids (e.g., 1,2,3)
        #[arg(value_delimiter = ',', required = true)]
        users: Vec<i64>,

        /// Restrict to these game ids
        #[arg(long, value_delimiter = ',')]
        games: Option<Vec<i64>>,
    },
}

#[derive(Subcommand)]
pub(crate) enum ConfigAction {
    /// Show current settings and their sources
    Show,

    /// Print the settings file path
    Path,
}
