use ludoka_core::ValidationError;
use thiserror::Error;

use crate::unique::{ConfigurationError, ConflictError, WriteError};

/// Failure of a user, game, or library operation.
#[derive(Debug, Error)]
pub enum OperationError {
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),
    #[error(transparent)]
    Conflict(#[from] ConflictError),
    #[error("Entity not found: {entity_type} with id '{id}'")]
    NotFound { entity_type: String, id: String },
    #[error("Invalid input: {0}")]
    Invalid(#[from] ValidationError),
    #[error("Table configuration error: {0}")]
    Configuration(#[from] ConfigurationError),
}

impl From<WriteError> for OperationError {
    fn from(e: WriteError) -> Self {
        match e {
            WriteError::Conflict(c) => Self::Conflict(c),
            WriteError::Sqlite(e) => Self::Sqlite(e),
        }
    }
}

impl OperationError {
    pub(crate) fn not_found(entity_type: &str, id: impl ToString) -> Self {
        Self::NotFound {
            entity_type: entity_type.to_string(),
            id: id.to_string(),
        }
    }

    /// The violated constraint names, if this is a conflict.
    pub fn conflicts(&self) -> Option<&[String]> {
        match self {
            Self::Conflict(c) => Some(&c.constraints),
            _ => None,
        }
    }
}
