//! Table descriptors: primary key, unique indexes, and column bindings.

use std::collections::{HashMap, HashSet};
use std::fmt;

use thiserror::Error;

use super::predicate::Predicate;
use super::value::Value;

/// Constraint name reported for the primary-key group.
pub const PRIMARY_KEY: &str = "primary_key";

/// A table declaration that cannot be used for conflict detection.
///
/// Raised at registration time, never while checking a row.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigurationError {
    #[error("Table '{table}' declares no primary key columns")]
    EmptyPrimaryKey { table: String },

    #[error("Unique index '{index}' on table '{table}' has no columns")]
    EmptyIndex { table: String, index: String },

    #[error("Unique index name '{index}' is declared twice on table '{table}'")]
    DuplicateIndex { table: String, index: String },

    #[error("Unique index on table '{table}' may not be named 'primary_key'")]
    ReservedIndexName { table: String },

    #[error("Column '{column}' is bound twice on table '{table}'")]
    DuplicateBinding { table: String, column: String },

    #[error("Column '{column}' of {group} on table '{table}' has no binding")]
    MissingBinding {
        table: String,
        group: String,
        column: String,
    },
}

/// A named group of columns that must be unique together.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UniqueIndex {
    pub name: String,
    pub columns: Vec<String>,
}

impl UniqueIndex {
    pub fn new<I, S>(name: impl Into<String>, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            name: name.into(),
            columns: columns.into_iter().map(Into::into).collect(),
        }
    }
}

type Accessor<T> = Box<dyn Fn(&T) -> Value + Send + Sync>;

/// Binds a column to the entity field it is read from.
pub struct Entry<T> {
    column: String,
    accessor: Accessor<T>,
}

impl<T> Entry<T> {
    pub fn new<V, F>(column: impl Into<String>, accessor: F) -> Self
    where
        T: 'static,
        F: Fn(&T) -> V + Send + Sync + 'static,
        V: Into<Value> + 'static,
    {
        Self {
            column: column.into(),
            accessor: Box::new(move |item| accessor(item).into()),
        }
    }

    pub fn column(&self) -> &str {
        &self.column
    }

    /// The column's value for `item`.
    pub fn value(&self, item: &T) -> Value {
        (self.accessor)(item)
    }

    /// Equality test matching rows whose column equals `item`'s value.
    pub fn selector(&self, item: &T) -> Predicate {
        Predicate::eq(self.column.as_str(), self.value(item))
    }
}

impl<T> fmt::Debug for Entry<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Entry").field("column", &self.column).finish()
    }
}

/// Uniqueness metadata for one persisted entity type.
///
/// Built once with [`register_table`] and read-only afterwards.
pub struct TableDescriptor<T> {
    pub(super) table: String,
    pub(super) primary_key: Vec<String>,
    pub(super) unique_indexes: Vec<UniqueIndex>,
    pub(super) entries: HashMap<String, Entry<T>>,
}

impl<T> TableDescriptor<T> {
    pub fn table(&self) -> &str {
        &self.table
    }

    pub fn primary_key(&self) -> &[String] {
        &self.primary_key
    }

    pub fn unique_indexes(&self) -> &[UniqueIndex] {
        &self.unique_indexes
    }

    /// Name of the group whose columns are exactly `columns` (any order).
    pub fn group_for_columns(&self, columns: &[&str]) -> Option<&str> {
        let wanted: HashSet<&str> = columns.iter().copied().collect();
        let same = |cols: &[String]| {
            cols.len() == wanted.len() && cols.iter().all(|c| wanted.contains(c.as_str()))
        };
        if same(&self.primary_key) {
            return Some(PRIMARY_KEY);
        }
        self.unique_indexes
            .iter()
            .find(|idx| same(&idx.columns))
            .map(|idx| idx.name.as_str())
    }

    pub(super) fn entry(&self, column: &str) -> &Entry<T> {
        // Registration guarantees every key and index column is bound.
        &self.entries[column]
    }
}

impl<T> fmt::Debug for TableDescriptor<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TableDescriptor")
            .field("table", &self.table)
            .field("primary_key", &self.primary_key)
            .field("unique_indexes", &self.unique_indexes)
            .finish_non_exhaustive()
    }
}

/// Register a table for conflict detection.
///
/// Every primary-key and unique-index column must have a binding in
/// `bindings`; anything else is a [`ConfigurationError`]. Extra bindings for
/// non-unique columns are accepted and ignored.
pub fn register_table<T>(
    table: &str,
    primary_key: &[&str],
    unique_indexes: Vec<UniqueIndex>,
    bindings: Vec<Entry<T>>,
) -> Result<TableDescriptor<T>, ConfigurationError> {
    if primary_key.is_empty() {
        return Err(ConfigurationError::EmptyPrimaryKey {
            table: table.to_string(),
        });
    }

    let mut entries = HashMap::with_capacity(bindings.len());
    for entry in bindings {
        if entries.contains_key(entry.column()) {
            return Err(ConfigurationError::DuplicateBinding {
                table: table.to_string(),
                column: entry.column().to_string(),
            });
        }
        entries.insert(entry.column().to_string(), entry);
    }

    let missing = |group: &str, columns: &[String]| {
        columns
            .iter()
            .find(|c| !entries.contains_key(c.as_str()))
            .map(|c| ConfigurationError::MissingBinding {
                table: table.to_string(),
                group: group.to_string(),
                column: c.clone(),
            })
    };

    let primary_key: Vec<String> = primary_key.iter().map(|c| c.to_string()).collect();
    if let Some(err) = missing("the primary key", &primary_key) {
        return Err(err);
    }

    let mut names = HashSet::new();
    for idx in &unique_indexes {
        if idx.name == PRIMARY_KEY {
            return Err(ConfigurationError::ReservedIndexName {
                table: table.to_string(),
            });
        }
        if idx.columns.is_empty() {
            return Err(ConfigurationError::EmptyIndex {
                table: table.to_string(),
                index: idx.name.clone(),
            });
        }
        if !names.insert(idx.name.as_str()) {
            return Err(ConfigurationError::DuplicateIndex {
                table: table.to_string(),
                index: idx.name.clone(),
            });
        }
        if let Some(err) = missing(&format!("unique index '{}'", idx.name), &idx.columns) {
            return Err(err);
        }
    }

    log::debug!(
        "Registered table '{}': key ({}), {} unique index(es)",
        table,
        primary_key.join(", "),
        unique_indexes.len(),
    );

    Ok(TableDescriptor {
        table: table.to_string(),
        primary_key,
        unique_indexes,
        entries,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Row {
        id: i64,
        name: String,
        code: Option<i64>,
    }

    fn bindings() -> Vec<Entry<Row>> {
        vec![
            Entry::new("id", |r: &Row| r.id),
            Entry::new("name", |r: &Row| r.name.clone()),
            Entry::new("code", |r: &Row| r.code),
        ]
    }

    #[test]
    fn registers_valid_table() {
        let desc = register_table(
            "things",
            &["id"],
            vec![UniqueIndex::new("things_name_unique", ["name"])],
            bindings(),
        )
        .unwrap();
        assert_eq!(desc.table(), "things");
        assert_eq!(desc.primary_key(), ["id".to_string()]);
        assert_eq!(desc.unique_indexes().len(), 1);

        let row = Row {
            id: 3,
            name: "x".into(),
            code: None,
        };
        assert_eq!(desc.entry("code").value(&row), Value::Null);
        assert_eq!(desc.entry("name").selector(&row).to_string(), "name = 'x'");
    }

    #[test]
    fn missing_index_binding_fails_fast() {
        let err = register_table(
            "things",
            &["id"],
            vec![UniqueIndex::new("things_serial_unique", ["serial"])],
            bindings(),
        )
        .unwrap_err();
        assert_eq!(
            err,
            ConfigurationError::MissingBinding {
                table: "things".into(),
                group: "unique index 'things_serial_unique'".into(),
                column: "serial".into(),
            }
        );
    }

    #[test]
    fn missing_key_binding_fails_fast() {
        let err = register_table::<Row>("things", &["uuid"], vec![], bindings()).unwrap_err();
        assert!(matches!(err, ConfigurationError::MissingBinding { ref column, .. } if column == "uuid"));
    }

    #[test]
    fn rejects_reserved_and_duplicate_names() {
        let err = register_table(
            "things",
            &["id"],
            vec![UniqueIndex::new(PRIMARY_KEY, ["name"])],
            bindings(),
        )
        .unwrap_err();
        assert!(matches!(err, ConfigurationError::ReservedIndexName { .. }));

        let err = register_table(
            "things",
            &["id"],
            vec![
                UniqueIndex::new("dup", ["name"]),
                UniqueIndex::new("dup", ["code"]),
            ],
            bindings(),
        )
        .unwrap_err();
        assert!(matches!(err, ConfigurationError::DuplicateIndex { .. }));
    }

    #[test]
    fn rejects_structural_mistakes() {
        assert!(matches!(
            register_table::<Row>("things", &[], vec![], bindings()),
            Err(ConfigurationError::EmptyPrimaryKey { .. })
        ));
        assert!(matches!(
            register_table(
                "things",
                &["id"],
                vec![UniqueIndex::new("empty", Vec::<String>::new())],
                bindings()
            ),
            Err(ConfigurationError::EmptyIndex { .. })
        ));

        let mut twice = bindings();
        twice.push(Entry::new("id", |r: &Row| r.id));
        assert!(matches!(
            register_table("things", &["id"], vec![], twice),
            Err(ConfigurationError::DuplicateBinding { .. })
        ));
    }

    #[test]
    fn maps_columns_back_to_groups() {
        let desc = register_table(
            "things",
            &["id"],
            vec![UniqueIndex::new("pair", ["name", "code"])],
            bindings(),
        )
        .unwrap();
        assert_eq!(desc.group_for_columns(&["id"]), Some(PRIMARY_KEY));
        assert_eq!(desc.group_for_columns(&["code", "name"]), Some("pair"));
        assert_eq!(desc.group_for_columns(&["name"]), None);
    }
}
