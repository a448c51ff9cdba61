//! # Condition Module
//!
//! Turns a [`Conditions`] set into a parameterized `WHERE` clause plus the
//! ordered list of values to bind. Every read, update and delete service
//! goes through [`map_conditions`].
//!
//! Column keys are validated as plain identifiers (ASCII letters, digits,
//! underscore) and quoted for the driver; values are never written into the
//! SQL text.
//!
//! ## Example
//!
//! ```rust,ignore
//! let conditions = Conditions::new()
//!     .eq("status", "active")
//!     .gte("age", 18)
//!     .is_in("role", ["admin", "editor"]);
//!
//! let clause = map_conditions(&conditions, Drivers::Postgres, 0)?;
//! // WHERE "status" = $1 AND "age" >= $2 AND "role" IN ($3, $4)
//! ```

use crate::{Error, database::Drivers, value::Record, value::Value};

// ============================================================================
// Identifiers
// ============================================================================

/// Returns `true` when `name` is non-empty and only contains ASCII letters,
/// digits and underscores.
pub fn is_safe_identifier(name: &str) -> bool {
    !name.is_empty() && name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_')
}

/// Validates `name` as an identifier, failing with `InvalidCondition`.
pub fn validate_identifier(name: &str) -> Result<&str, Error> {
    if is_safe_identifier(name) {
        Ok(name)
    } else {
        Err(Error::InvalidCondition(format!("unsafe identifier `{}`", name)))
    }
}

/// Quotes an already validated identifier for `driver`.
pub fn quote_identifier(name: &str, driver: Drivers) -> String {
    match driver {
        Drivers::MySQL => format!("`{}`", name),
        Drivers::Postgres | Drivers::SQLite => format!("\"{}\"", name),
    }
}

/// Placeholder for the `index`-th (1-based) bound value.
pub(crate) fn placeholder(index: usize, driver: Drivers) -> String {
    match driver {
        Drivers::Postgres => format!("${}", index),
        Drivers::SQLite | Drivers::MySQL => "?".to_string(),
    }
}

// ============================================================================
// Predicates
// ============================================================================

/// A single predicate in a condition set.
#[derive(Debug, Clone, PartialEq)]
pub enum Condition {
    Eq(String, Value),
    NotEq(String, Value),
    Gt(String, Value),
    Gte(String, Value),
    Lt(String, Value),
    Lte(String, Value),
    /// `column LIKE pattern`; the pattern is bound as-is.
    Like(String, String),
    In(String, Vec<Value>),
    NotIn(String, Vec<Value>),
    IsNull(String),
    IsNotNull(String),
    /// Trusted SQL fragment using `?` placeholders for its own values.
    ///
    /// Only single-quoted literals are skipped when placeholders are counted
    /// and renumbered. A `?` inside a double-quoted identifier, a backtick
    /// identifier or a `--` / `/* */` comment is treated as a placeholder, so
    /// keep those out of raw fragments.
    Raw(String, Vec<Value>),
}

/// An ordered conjunction of predicates.
///
/// An empty set means "no filter" for reads. Deletes refuse any set that
/// [matches everything](Conditions::matches_everything) unless it was built
/// with [`Conditions::wildcard`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Conditions {
    items: Vec<Condition>,
    wildcard: bool,
}

impl Conditions {
    pub fn new() -> Self {
        Self::default()
    }

    /// An empty set explicitly confirmed to match every row.
    pub fn wildcard() -> Self {
        Self { items: Vec::new(), wildcard: true }
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn is_wildcard(&self) -> bool {
        self.wildcard
    }

    /// `true` when the set selects every row: it is empty, or each predicate
    /// is an empty `NOT IN` (mapped to `1 = 1`).
    pub fn matches_everything(&self) -> bool {
        self.items.iter().all(|c| matches!(c, Condition::NotIn(_, values) if values.is_empty()))
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Condition> {
        self.items.iter()
    }

    pub fn push(mut self, condition: Condition) -> Self {
        self.items.push(condition);
        self
    }

    pub fn eq(self, column: impl Into<String>, value: impl Into<Value>) -> Self {
        self.push(Condition::Eq(column.into(), value.into()))
    }

    pub fn not_eq(self, column: impl Into<String>, value: impl Into<Value>) -> Self {
        self.push(Condition::NotEq(column.into(), value.into()))
    }

    pub fn gt(self, column: impl Into<String>, value: impl Into<Value>) -> Self {
        self.push(Condition::Gt(column.into(), value.into()))
    }

    pub fn gte(self, column: impl Into<String>, value: impl Into<Value>) -> Self {
        self.push(Condition::Gte(column.into(), value.into()))
    }

    pub fn lt(self, column: impl Into<String>, value: impl Into<Value>) -> Self {
        self.push(Condition::Lt(column.into(), value.into()))
    }

    pub fn lte(self, column: impl Into<String>, value: impl Into<Value>) -> Self {
        self.push(Condition::Lte(column.into(), value.into()))
    }

    pub fn like(self, column: impl Into<String>, pattern: impl Into<String>) -> Self {
        self.push(Condition::Like(column.into(), pattern.into()))
    }

    pub fn is_in<V: Into<Value>>(self, column: impl Into<String>, values: impl IntoIterator<Item = V>) -> Self {
        self.push(Condition::In(column.into(), values.into_iter().map(Into::into).collect()))
    }

    pub fn not_in<V: Into<Value>>(self, column: impl Into<String>, values: impl IntoIterator<Item = V>) -> Self {
        self.push(Condition::NotIn(column.into(), values.into_iter().map(Into::into).collect()))
    }

    pub fn is_null(self, column: impl Into<String>) -> Self {
        self.push(Condition::IsNull(column.into()))
    }

    pub fn is_not_null(self, column: impl Into<String>) -> Self {
        self.push(Condition::IsNotNull(column.into()))
    }

    pub fn raw(self, sql: impl Into<String>, values: Vec<Value>) -> Self {
        self.push(Condition::Raw(sql.into(), values))
    }
}

/// A record used as a condition set means equality on every column.
impl From<Record> for Conditions {
    fn from(record: Record) -> Self {
        record.into_iter().fold(Conditions::new(), |conditions, (column, value)| conditions.eq(column, value))
    }
}

impl From<&Record> for Conditions {
    fn from(record: &Record) -> Self {
        Conditions::from(record.clone())
    }
}

// ============================================================================
// Mapping
// ============================================================================

/// The mapped form of a condition set.
///
/// `sql` is either empty or starts with `WHERE `.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WhereClause {
    pub sql: String,
    pub params: Vec<Value>,
}

/// Maps `conditions` to a `WHERE` clause.
///
/// `bound_before` is the number of values already bound earlier in the
/// statement, so PostgreSQL placeholders continue from `$bound_before + 1`.
pub fn map_conditions(conditions: &Conditions, driver: Drivers, bound_before: usize) -> Result<WhereClause, Error> {
    let mut parts = Vec::with_capacity(conditions.len());
    let mut params = Vec::new();
    let mut next = |value: Value, params: &mut Vec<Value>| {
        params.push(value);
        placeholder(bound_before + params.len(), driver)
    };

    for condition in conditions.iter() {
        let part = match condition {
            Condition::Eq(col, v) => compare(col, "=", v, driver, &mut params, &mut next)?,
            Condition::NotEq(col, v) => compare(col, "<>", v, driver, &mut params, &mut next)?,
            Condition::Gt(col, v) => compare(col, ">", v, driver, &mut params, &mut next)?,
            Condition::Gte(col, v) => compare(col, ">=", v, driver, &mut params, &mut next)?,
            Condition::Lt(col, v) => compare(col, "<", v, driver, &mut params, &mut next)?,
            Condition::Lte(col, v) => compare(col, "<=", v, driver, &mut params, &mut next)?,
            Condition::Like(col, pattern) => {
                compare(col, "LIKE", &Value::Text(pattern.clone()), driver, &mut params, &mut next)?
            }
            Condition::In(col, values) | Condition::NotIn(col, values) => {
                let negated = matches!(condition, Condition::NotIn(..));
                let column = quote_identifier(validate_identifier(col)?, driver);
                if values.is_empty() {
                    // IN () is not valid SQL
                    if negated { "1 = 1".to_string() } else { "1 = 0".to_string() }
                } else {
                    let marks: Vec<String> = values.iter().map(|v| next(v.clone(), &mut params)).collect();
                    let op = if negated { "NOT IN" } else { "IN" };
                    format!("{} {} ({})", column, op, marks.join(", "))
                }
            }
            Condition::IsNull(col) => format!("{} IS NULL", quote_identifier(validate_identifier(col)?, driver)),
            Condition::IsNotNull(col) => {
                format!("{} IS NOT NULL", quote_identifier(validate_identifier(col)?, driver))
            }
            Condition::Raw(sql, values) => {
                let rendered = renumber_placeholders(sql, values.len(), bound_before + params.len(), driver)?;
                params.extend(values.iter().cloned());
                format!("({})", rendered)
            }
        };
        parts.push(part);
    }

    if parts.is_empty() {
        return Ok(WhereClause::default());
    }
    Ok(WhereClause { sql: format!("WHERE {}", parts.join(" AND ")), params })
}

fn compare<F>(
    column: &str,
    op: &str,
    value: &Value,
    driver: Drivers,
    params: &mut Vec<Value>,
    next: &mut F,
) -> Result<String, Error>
where
    F: FnMut(Value, &mut Vec<Value>) -> String,
{
    let column = quote_identifier(validate_identifier(column)?, driver);
    let mark = next(value.clone(), params);
    Ok(format!("{} {} {}{}", column, op, mark, crate::temporal::postgres_cast(value, driver)))
}

/// Rewrites the `?` placeholders of a trusted fragment for `driver`,
/// skipping any inside single-quoted literals.
///
/// Fails with `InvalidCondition` when the placeholder count differs from
/// `expected`.
pub(crate) fn renumber_placeholders(
    sql: &str,
    expected: usize,
    bound_before: usize,
    driver: Drivers,
) -> Result<String, Error> {
    let mut out = String::with_capacity(sql.len() + expected * 2);
    let mut in_literal = false;
    let mut found = 0;

    for c in sql.chars() {
        match c {
            '\'' => {
                in_literal = !in_literal;
                out.push(c);
            }
            '?' if !in_literal => {
                found += 1;
                out.push_str(&placeholder(bound_before + found, driver));
            }
            _ => out.push(c),
        }
    }

    if found != expected {
        return Err(Error::InvalidCondition(format!(
            "raw fragment has {} placeholders but {} values",
            found, expected
        )));
    }
    Ok(out)
}
