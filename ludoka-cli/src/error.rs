use ludoka_db::{ConflictError, OperationError, SchemaError};
use thiserror::Error;

/// Errors that can occur during CLI command execution.
#[derive(Debug, Error)]
pub(crate) enum CliError {
    /// I/O error
    #[error("{0}")]
    Io(#[from] std::io::Error),

    /// Database could not be opened or queried
    #[error("Database error: {0}")]
    Database(String),

    /// A unique constraint already holds the given value
    #[error("{0}")]
    Conflict(ConflictError),

    #[error("Not found: {0}")]
    NotFound(String),

    /// Rejected input (name length, weak password)
    #[error("Invalid input: {0}")]
    Invalid(String),

    /// Wrong user name or password
    #[error("Authentication failed: {0}")]
    Auth(String),

    /// Configuration error
    #[error("Config error: {0}")]
    Config(String),

    /// Catch-all for other errors
    #[error("{0}")]
    Other(String),
}

impl CliError {
    pub(crate) fn database(msg: impl Into<String>) -> Self {
        Self::Database(msg.into())
    }

    pub(crate) fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }

    pub(crate) fn invalid(msg: impl Into<String>) -> Self {
        Self::Invalid(msg.into())
    }

    pub(crate) fn auth(msg: impl Into<String>) -> Self {
        Self::Auth(msg.into())
    }

    pub(crate) fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    pub(crate) fn other(msg: impl Into<String>) -> Self {
        Self::Other(msg.into())
    }

    /// Process exit status: 2 for conflicts, 1 for everything else.
    pub(crate) fn exit_code(&self) -> i32 {
        match self {
            Self::Conflict(_) => 2,
            _ => 1,
        }
    }
}

impl From<OperationError> for CliError {
    fn from(e: OperationError) -> Self {
        match e {
            OperationError::Conflict(c) => Self::Conflict(c),
            OperationError::NotFound { entity_type, id } => {
                Self::not_found(format!("{} {}", entity_type, id))
            }
            OperationError::Invalid(e) => Self::invalid(e.to_string()),
            OperationError::Sqlite(e) => Self::database(e.to_string()),
            OperationError::Configuration(e) => Self::config(e.to_string()),
        }
    }
}

impl From<SchemaError> for CliError {
    fn from(e: SchemaError) -> Self {
        Self::database(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn conflicts_exit_with_two() {
        let conflict = ConflictError::new("users", vec!["users_name_unique".into()]);
        let err = CliError::from(OperationError::Conflict(conflict));
        assert_eq!(err.exit_code(), 2);
        assert_eq!(
            err.to_string(),
            "Value already in database for users: users_name_unique"
        );
    }

    #[test]
    fn other_failures_exit_with_one() {
        let err = CliError::from(OperationError::NotFound {
            entity_type: "user".into(),
            id: "7".into(),
        });
        assert_eq!(err.exit_code(), 1);
        assert_eq!(err.to_string(), "Not found: user 7");
        assert_eq!(CliError::auth("bad password").exit_code(), 1);
    }
}
