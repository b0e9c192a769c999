//! Per-instance selectors for the primary key and each unique index.
//!
//! Selectors only read the candidate's fields; they never touch the
//! database.

use super::descriptor::TableDescriptor;
use super::predicate::Predicate;

impl<T> TableDescriptor<T> {
    /// Predicate matching the row that has `item`'s primary key.
    pub fn primary_key_selector(&self, item: &T) -> Predicate {
        self.group_selector(&self.primary_key, item)
    }

    /// One predicate per unique index, in declaration order, keyed by
    /// index name. The primary key is not included.
    pub fn index_selectors(&self, item: &T) -> Vec<(&str, Predicate)> {
        self.unique_indexes
            .iter()
            .map(|idx| (idx.name.as_str(), self.group_selector(&idx.columns, item)))
            .collect()
    }

    /// Whether `item` carries a primary key.
    ///
    /// Keys assigned by the database on insert read as NULL until then.
    pub fn has_assigned_key(&self, item: &T) -> bool {
        self.primary_key
            .iter()
            .all(|col| !self.entry(col).value(item).is_null())
    }

    fn group_selector(&self, columns: &[String], item: &T) -> Predicate {
        Predicate::and(columns.iter().map(|col| self.entry(col).selector(item)))
    }
}

#[cfg(test)]
mod tests {
    use crate::unique::{Entry, UniqueIndex, Value, register_table};

    #[derive(Clone)]
    struct TestData {
        userid: i64,
        gameid: i64,
        unique1: String,
        unique2a: String,
        unique2b: String,
    }

    fn data(userid: i64, gameid: i64, u1: &str, u2a: &str, u2b: &str) -> TestData {
        TestData {
            userid,
            gameid,
            unique1: u1.into(),
            unique2a: u2a.into(),
            unique2b: u2b.into(),
        }
    }

    fn descriptor() -> crate::unique::TableDescriptor<TestData> {
        register_table(
            "test",
            &["userid", "gameid"],
            vec![
                UniqueIndex::new("unique1_index", ["unique1"]),
                UniqueIndex::new("unique2_index", ["unique2a", "unique2b"]),
            ],
            vec![
                Entry::new("userid", |t: &TestData| t.userid),
                Entry::new("gameid", |t: &TestData| t.gameid),
                Entry::new("unique1", |t: &TestData| t.unique1.clone()),
                Entry::new("unique2a", |t: &TestData| t.unique2a.clone()),
                Entry::new("unique2b", |t: &TestData| t.unique2b.clone()),
            ],
        )
        .unwrap()
    }

    #[test]
    fn primary_key_selector_covers_every_key_column() {
        let desc = descriptor();
        let pk = desc.primary_key_selector(&data(2, 7, "a", "b", "c"));
        assert_eq!(pk.to_string(), "userid = 2 AND gameid = 7");
    }

    #[test]
    fn index_selectors_follow_declaration_order() {
        let desc = descriptor();
        let selectors = desc.index_selectors(&data(1, 1, "x", "y", "z"));
        let rendered: Vec<(&str, String)> = selectors
            .iter()
            .map(|(name, p)| (*name, p.to_string()))
            .collect();
        assert_eq!(
            rendered,
            vec![
                ("unique1_index", "unique1 = 'x'".to_string()),
                ("unique2_index", "unique2a = 'y' AND unique2b = 'z'".to_string()),
            ]
        );
    }

    #[test]
    fn selectors_are_referentially_transparent() {
        let desc = descriptor();
        let item = data(1, 2, "b", "a", "b");
        assert_eq!(
            desc.index_selectors(&item),
            desc.index_selectors(&item.clone())
        );
        assert_eq!(
            desc.primary_key_selector(&item),
            desc.primary_key_selector(&item)
        );
    }

    #[test]
    fn unassigned_key_is_detected() {
        struct Auto {
            id: Option<i64>,
        }
        let desc = register_table("auto", &["id"], vec![], vec![Entry::new("id", |a: &Auto| a.id)])
            .unwrap();
        assert!(!desc.has_assigned_key(&Auto { id: None }));
        assert!(desc.has_assigned_key(&Auto { id: Some(4) }));
        assert_eq!(
            desc.primary_key_selector(&Auto { id: None }),
            crate::unique::Predicate::eq("id", Value::Null)
        );
    }
}
