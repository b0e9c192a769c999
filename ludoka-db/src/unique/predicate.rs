//! Boolean row predicates built from equality tests.
//!
//! A [`Predicate`] renders to a parametrized SQL fragment for SQLite and can
//! also be evaluated against an in-memory row, with the same three-valued
//! (TRUE / FALSE / UNKNOWN) semantics SQL applies to NULLs.

use std::fmt;

use super::value::Value;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Predicate {
    /// `column = value`
    Eq { column: String, value: Value },
    /// Conjunction. An empty conjunction is true.
    And(Vec<Predicate>),
    Not(Box<Predicate>),
}

impl Predicate {
    pub fn eq(column: impl Into<String>, value: impl Into<Value>) -> Self {
        Predicate::Eq {
            column: column.into(),
            value: value.into(),
        }
    }

    /// Conjunction of `parts`, flattening nested conjunctions.
    pub fn and(parts: impl IntoIterator<Item = Predicate>) -> Self {
        let mut flat = Vec::new();
        for part in parts {
            match part {
                Predicate::And(inner) => flat.extend(inner),
                other => flat.push(other),
            }
        }
        if flat.len() == 1 {
            flat.remove(0)
        } else {
            Predicate::And(flat)
        }
    }

    pub fn not(inner: Predicate) -> Self {
        Predicate::Not(Box::new(inner))
    }

    /// Whether some row could satisfy this predicate.
    ///
    /// An equality against NULL is never true, so a conjunction containing
    /// one can be skipped without asking the database.
    pub fn can_match(&self) -> bool {
        match self {
            Predicate::Eq { value, .. } => !value.is_null(),
            Predicate::And(parts) => parts.iter().all(Predicate::can_match),
            Predicate::Not(_) => true,
        }
    }

    /// Render as a SQL boolean expression with `?` placeholders.
    ///
    /// Parameters are returned in placeholder order.
    pub fn to_sql(&self) -> (String, Vec<Value>) {
        let mut params = Vec::new();
        let sql = self.write_sql(&mut params);
        (sql, params)
    }

    fn write_sql(&self, params: &mut Vec<Value>) -> String {
        match self {
            Predicate::Eq { column, value } => {
                params.push(value.clone());
                format!("{} = ?", quote_ident(column))
            }
            Predicate::And(parts) if parts.is_empty() => "1".to_string(),
            Predicate::And(parts) => {
                let rendered: Vec<String> = parts.iter().map(|p| p.write_sql(params)).collect();
                format!("({})", rendered.join(" AND "))
            }
            Predicate::Not(inner) => format!("NOT {}", inner.write_sql(params)),
        }
    }

    /// Evaluate against a row, where `lookup` returns a column's value.
    ///
    /// Returns `None` for UNKNOWN. Missing columns read as NULL.
    pub fn eval<F>(&self, lookup: &F) -> Option<bool>
    where
        F: Fn(&str) -> Option<Value>,
    {
        match self {
            Predicate::Eq { column, value } => {
                lookup(column).unwrap_or(Value::Null).sql_eq(value)
            }
            Predicate::And(parts) => {
                let mut result = Some(true);
                for part in parts {
                    match part.eval(lookup) {
                        Some(false) => return Some(false),
                        None => result = None,
                        Some(true) => {}
                    }
                }
                result
            }
            Predicate::Not(inner) => inner.eval(lookup).map(|b| !b),
        }
    }

    /// True only when the predicate evaluates to TRUE (a WHERE clause match).
    pub fn matches<F>(&self, lookup: &F) -> bool
    where
        F: Fn(&str) -> Option<Value>,
    {
        self.eval(lookup) == Some(true)
    }
}

impl fmt::Display for Predicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Predicate::Eq { column, value } => write!(f, "{} = {}", column, value),
            Predicate::And(parts) if parts.is_empty() => write!(f, "TRUE"),
            Predicate::And(parts) => {
                for (i, part) in parts.iter().enumerate() {
                    if i > 0 {
                        write!(f, " AND ")?;
                    }
                    match part {
                        Predicate::And(_) => write!(f, "({})", part)?,
                        _ => write!(f, "{}", part)?,
                    }
                }
                Ok(())
            }
            Predicate::Not(inner) => match inner.as_ref() {
                Predicate::Eq { .. } => write!(f, "NOT {}", inner),
                _ => write!(f, "NOT ({})", inner),
            },
        }
    }
}

/// Quote an SQL identifier.
pub(crate) fn quote_ident(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}
