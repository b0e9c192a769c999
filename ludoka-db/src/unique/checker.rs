//! Pre-write conflict detection.

use rusqlite::{Connection, params_from_iter};

use super::descriptor::{PRIMARY_KEY, TableDescriptor};
use super::predicate::{Predicate, quote_ident};

/// Something that can answer "does any row of `table` match?".
///
/// Implemented for SQLite connections (and, through `Deref`, transactions).
pub trait ConflictSource {
    type Error;

    fn exists(&self, table: &str, predicate: &Predicate) -> Result<bool, Self::Error>;
}

impl ConflictSource for Connection {
    type Error = rusqlite::Error;

    fn exists(&self, table: &str, predicate: &Predicate) -> Result<bool, Self::Error> {
        let (clause, params) = predicate.to_sql();
        let sql = format!(
            "SELECT EXISTS(SELECT 1 FROM {} WHERE {})",
            quote_ident(table),
            clause
        );
        let mut stmt = self.prepare_cached(&sql)?;
        stmt.query_row(params_from_iter(params.iter()), |row| row.get(0))
    }
}

/// The named groups a write of `item` must be checked against.
///
/// On insert the primary key is included (when assigned). On update it is
/// left out and every other group excludes the row being updated. Groups
/// that cannot match anything (NULL candidate values) are dropped.
pub fn conflict_checks<'a, T>(
    table: &'a TableDescriptor<T>,
    item: &T,
    update: bool,
) -> Vec<(&'a str, Predicate)> {
    let keyed = table.has_assigned_key(item);
    let mut checks = Vec::with_capacity(table.unique_indexes.len() + 1);

    if !update && keyed {
        checks.push((PRIMARY_KEY, table.primary_key_selector(item)));
    }

    let own_row = (update && keyed).then(|| Predicate::not(table.primary_key_selector(item)));
    for (name, selector) in table.index_selectors(item) {
        if !selector.can_match() {
            continue;
        }
        let predicate = match &own_row {
            Some(exclude) => Predicate::and([exclude.clone(), selector]),
            None => selector,
        };
        checks.push((name, predicate));
    }

    checks
}

/// Names of the unique constraints a write of `item` would violate.
///
/// Returns the primary-key group (as [`PRIMARY_KEY`]) first, then unique
/// indexes in declaration order. When nothing needs checking, no query is
/// issued.
pub fn check_conflicts<T, S>(
    source: &S,
    table: &TableDescriptor<T>,
    item: &T,
    update: bool,
) -> Result<Vec<String>, S::Error>
where
    S: ConflictSource + ?Sized,
{
    let checks = conflict_checks(table, item, update);
    if checks.is_empty() {
        return Ok(Vec::new());
    }

    let mut conflicts = Vec::new();
    for (name, predicate) in &checks {
        if source.exists(&table.table, predicate)? {
            conflicts.push(name.to_string());
        }
    }

    if conflicts.is_empty() {
        log::trace!("{}: no conflicts across {} check(s)", table.table, checks.len());
    } else {
        log::debug!("{}: conflicts on {}", table.table, conflicts.join(", "));
    }
    Ok(conflicts)
}
