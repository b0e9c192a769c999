//! Writes that only run when no unique constraint would be violated.

use rusqlite::{Connection, ErrorCode, Transaction, TransactionBehavior, ffi};
use thiserror::Error;

use super::checker::{ConflictSource, check_conflicts};
use super::descriptor::TableDescriptor;

/// One or more unique constraints already hold the candidate's values.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Value already in database for {}: {}", .table, .constraints.join(", "))]
pub struct ConflictError {
    pub table: String,
    pub constraints: Vec<String>,
}

impl ConflictError {
    pub fn new(table: impl Into<String>, constraints: Vec<String>) -> Self {
        Self {
            table: table.into(),
            constraints,
        }
    }

    pub fn involves(&self, constraint: &str) -> bool {
        self.constraints.iter().any(|c| c == constraint)
    }
}

/// Failure of a guarded SQLite write.
#[derive(Debug, Error)]
pub enum WriteError {
    #[error(transparent)]
    Conflict(#[from] ConflictError),

    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),
}

/// Run `write` only if `item` conflicts with no stored row.
///
/// The check and the write must share one atomic unit of work; the SQLite
/// wrappers [`guarded_create`] and [`guarded_update`] provide it.
pub fn guarded_write<T, S, R, E, F>(
    source: &S,
    table: &TableDescriptor<T>,
    item: &T,
    update: bool,
    write: F,
) -> Result<R, E>
where
    S: ConflictSource + ?Sized,
    E: From<ConflictError> + From<S::Error>,
    F: FnOnce() -> Result<R, E>,
{
    let conflicts = check_conflicts(source, table, item, update)?;
    if !conflicts.is_empty() {
        return Err(ConflictError::new(table.table(), conflicts).into());
    }
    write()
}

/// Insert `item` through `insert` unless it would violate a unique constraint.
///
/// Check and insert run in one transaction that holds the write lock from
/// the start (or in a savepoint of the caller's open transaction). A
/// constraint violation raised by the insert itself is reported as a
/// [`ConflictError`] too.
pub fn guarded_create<T, R, F>(
    conn: &Connection,
    table: &TableDescriptor<T>,
    item: &T,
    insert: F,
) -> Result<R, WriteError>
where
    F: FnOnce(&Connection) -> rusqlite::Result<R>,
{
    guarded(conn, table, item, false, insert)
}

/// Update `item` through `update` unless another row holds its unique values.
///
/// Returns what `update` returns (normally whether a row changed).
pub fn guarded_update<T, F>(
    conn: &Connection,
    table: &TableDescriptor<T>,
    item: &T,
    update: F,
) -> Result<bool, WriteError>
where
    F: FnOnce(&Connection) -> rusqlite::Result<bool>,
{
    guarded(conn, table, item, true, update)
}

fn guarded<T, R, F>(
    conn: &Connection,
    table: &TableDescriptor<T>,
    item: &T,
    update: bool,
    write: F,
) -> Result<R, WriteError>
where
    F: FnOnce(&Connection) -> rusqlite::Result<R>,
{
    atomically(conn, |conn| {
        guarded_write(conn, table, item, update, || {
            write(conn).map_err(|e| match conflict_from_sqlite(table, &e) {
                Some(conflict) => {
                    log::warn!("{} (raised by storage after a clean check)", conflict);
                    WriteError::Conflict(conflict)
                }
                None => WriteError::Sqlite(e),
            })
        })
    })
}

const SAVEPOINT: &str = "ludoka_guarded_write";

/// Run `f` in its own atomic unit: an IMMEDIATE transaction, or a savepoint
/// when the connection already has a transaction open.
fn atomically<R, F>(conn: &Connection, f: F) -> Result<R, WriteError>
where
    F: FnOnce(&Connection) -> Result<R, WriteError>,
{
    if conn.is_autocommit() {
        let tx = Transaction::new_unchecked(conn, TransactionBehavior::Immediate)?;
        let result = f(&tx)?;
        tx.commit()?;
        return Ok(result);
    }

    conn.execute_batch(&format!("SAVEPOINT {}", SAVEPOINT))?;
    match f(conn) {
        Ok(result) => {
            conn.execute_batch(&format!("RELEASE {}", SAVEPOINT))?;
            Ok(result)
        }
        Err(e) => {
            conn.execute_batch(&format!("ROLLBACK TO {0}; RELEASE {0}", SAVEPOINT))?;
            Err(e)
        }
    }
}

/// Translate a SQLite unique/primary-key violation into a [`ConflictError`].
///
/// SQLite reports the offending columns (`UNIQUE constraint failed:
/// t.a, t.b`); they are mapped back to the descriptor's group name, or kept
/// verbatim when no declared group matches. Other errors yield `None`.
pub fn conflict_from_sqlite<T>(
    table: &TableDescriptor<T>,
    err: &rusqlite::Error,
) -> Option<ConflictError> {
    let rusqlite::Error::SqliteFailure(failure, message) = err else {
        return None;
    };
    if failure.code != ErrorCode::ConstraintViolation
        || !matches!(
            failure.extended_code,
            ffi::SQLITE_CONSTRAINT_UNIQUE | ffi::SQLITE_CONSTRAINT_PRIMARYKEY
        )
    {
        return None;
    }

    let columns: Vec<&str> = message
        .as_deref()
        .and_then(|m| m.split_once(": "))
        .map(|(_, cols)| {
            cols.split(", ")
                .map(|c| c.rsplit_once('.').map_or(c, |(_, col)| col).trim())
                .collect()
        })
        .unwrap_or_default();

    let name = table
        .group_for_columns(&columns)
        .map(str::to_string)
        .unwrap_or_else(|| columns.join(", "));
    Some(ConflictError::new(table.table(), vec![name]))
}
