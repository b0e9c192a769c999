//! Unique-constraint conflict detection.
//!
//! A table is registered once with its primary key, unique indexes, and a
//! binding from each of those columns to the entity field holding its value
//! ([`register_table`]). For a candidate entity the descriptor builds
//! equality predicates per group, [`check_conflicts`] asks the database
//! which groups already hold the candidate's values, and
//! [`guarded_create`] / [`guarded_update`] only run a write when that list
//! is empty.

mod checker;
mod descriptor;
mod guard;
mod predicate;
mod selector;
mod value;

pub use checker::{ConflictSource, check_conflicts, conflict_checks};
pub use descriptor::{
    ConfigurationError, Entry, PRIMARY_KEY, TableDescriptor, UniqueIndex, register_table,
};
pub use guard::{
    ConflictError, WriteError, conflict_from_sqlite, guarded_create, guarded_update,
    guarded_write,
};
pub use predicate::Predicate;
pub use value::Value;
