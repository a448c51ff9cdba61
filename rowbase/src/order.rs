//! Typed `ORDER BY` lists.
//!
//! Ordering is never taken as raw SQL. A [`Sort`] is a list of validated
//! column names with a [`Direction`]; the string form `"id DESC, name"` is
//! accepted through [`Sort::parse`], which applies the same validation.
//! When a table declares sortable columns, [`Sort::render`] also checks each
//! column against that allow-list.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::{
    Error,
    condition::{quote_identifier, validate_identifier},
    database::Drivers,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    #[default]
    Asc,
    Desc,
}

impl Direction {
    pub fn as_sql(self) -> &'static str {
        match self {
            Direction::Asc => "ASC",
            Direction::Desc => "DESC",
        }
    }
}

impl FromStr for Direction {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "ASC" => Ok(Direction::Asc),
            "DESC" => Ok(Direction::Desc),
            other => Err(Error::InvalidCondition(format!("unknown sort direction `{}`", other))),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderBy {
    pub column: String,
    pub direction: Direction,
}

/// An ordered list of sort keys. The default sorts nothing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sort(Vec<OrderBy>);

impl Sort {
    pub fn none() -> Self {
        Self::default()
    }

    pub fn asc(column: impl Into<String>) -> Self {
        Self::none().then_asc(column)
    }

    pub fn desc(column: impl Into<String>) -> Self {
        Self::none().then_desc(column)
    }

    pub fn then_asc(mut self, column: impl Into<String>) -> Self {
        self.0.push(OrderBy { column: column.into(), direction: Direction::Asc });
        self
    }

    pub fn then_desc(mut self, column: impl Into<String>) -> Self {
        self.0.push(OrderBy { column: column.into(), direction: Direction::Desc });
        self
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn keys(&self) -> &[OrderBy] {
        &self.0
    }

    /// Parses `"col [ASC|DESC], ..."`. An empty string is an empty sort.
    pub fn parse(input: &str) -> Result<Self, Error> {
        let mut sort = Sort::none();
        for part in input.split(',').map(str::trim).filter(|p| !p.is_empty()) {
            let mut words = part.split_whitespace();
            let column = words.next().unwrap_or_default();
            validate_identifier(column)?;
            let direction = match words.next() {
                Some(word) => word.parse()?,
                None => Direction::Asc,
            };
            if let Some(extra) = words.next() {
                return Err(Error::InvalidCondition(format!("unexpected `{}` in sort `{}`", extra, part)));
            }
            sort.0.push(OrderBy { column: column.to_string(), direction });
        }
        Ok(sort)
    }

    /// Renders ` ORDER BY ...` (with leading space), or an empty string.
    ///
    /// `allowed`, when present, is the table's sortable-column allow-list.
    pub fn render(&self, driver: Drivers, allowed: Option<&[String]>) -> Result<String, Error> {
        if self.0.is_empty() {
            return Ok(String::new());
        }
        let mut keys = Vec::with_capacity(self.0.len());
        for key in &self.0 {
            let column = validate_identifier(&key.column)?;
            if let Some(allowed) = allowed {
                if !allowed.iter().any(|a| a == column) {
                    return Err(Error::InvalidArgument(format!("column `{}` is not sortable", column)));
                }
            }
            keys.push(format!("{} {}", quote_identifier(column, driver), key.direction.as_sql()));
        }
        Ok(format!(" ORDER BY {}", keys.join(", ")))
    }
}

impl FromStr for Sort {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Sort::parse(s)
    }
}
