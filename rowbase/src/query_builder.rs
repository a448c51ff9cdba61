//! # Statement Assembly Module
//!
//! [`Statement`] accumulates SQL text and the values bound to it, writing
//! the right placeholder for the driver as each value is pushed (`$n` on
//! PostgreSQL, `?` elsewhere). Every service builds its SQL here and runs it
//! through one of the execution methods, which all log the SQL text at
//! `debug` level and never log bound values.

use sqlx::{Row, any::AnyQueryResult};

use crate::{
    Error,
    condition::{Conditions, map_conditions, placeholder, quote_identifier, validate_identifier},
    database::{Connection, Drivers},
    order::Sort,
    table::TableConfig,
    temporal,
    value::{Record, Value},
    value_binding::bind_all,
};

/// A parameterized SQL statement under construction.
#[derive(Debug, Clone)]
pub struct Statement {
    sql: String,
    params: Vec<Value>,
    driver: Drivers,
}

impl Statement {
    pub fn new(driver: Drivers) -> Self {
        Self { sql: String::new(), params: Vec::new(), driver }
    }

    /// `SELECT * FROM "table"`.
    pub fn select_all(table: &TableConfig, driver: Drivers) -> Self {
        Self::select(table, driver, "*")
    }

    /// `SELECT <projection> FROM "table"`. The projection is trusted text.
    pub(crate) fn select(table: &TableConfig, driver: Drivers, projection: &str) -> Self {
        let mut stmt = Self::new(driver);
        stmt.push_sql("SELECT ").push_sql(projection).push_sql(" FROM ");
        stmt.push_sql(&table.quoted_table(driver));
        stmt
    }

    /// Wraps caller-written SQL whose placeholders already match `params`.
    pub(crate) fn raw(sql: &str, params: Vec<Value>, driver: Drivers) -> Self {
        Self { sql: sql.to_string(), params, driver }
    }

    pub fn sql(&self) -> &str {
        &self.sql
    }

    pub fn params(&self) -> &[Value] {
        &self.params
    }

    pub fn push_sql(&mut self, sql: &str) -> &mut Self {
        self.sql.push_str(sql);
        self
    }

    /// Validates, quotes and appends a column name.
    pub fn push_identifier(&mut self, name: &str) -> Result<&mut Self, Error> {
        let quoted = quote_identifier(validate_identifier(name)?, self.driver);
        self.sql.push_str(&quoted);
        Ok(self)
    }

    /// Appends a placeholder and binds `value` to it.
    pub fn push_param(&mut self, value: Value) -> &mut Self {
        self.sql.push_str(&placeholder(self.params.len() + 1, self.driver));
        self.sql.push_str(temporal::postgres_cast(&value, self.driver));
        self.params.push(value);
        self
    }

    /// Appends ` WHERE ...` for `conditions`, or nothing when they are empty.
    pub fn push_conditions(&mut self, conditions: &Conditions) -> Result<&mut Self, Error> {
        let clause = map_conditions(conditions, self.driver, self.params.len())?;
        if !clause.sql.is_empty() {
            self.sql.push(' ');
            self.sql.push_str(&clause.sql);
            self.params.extend(clause.params);
        }
        Ok(self)
    }

    pub fn push_sort(&mut self, sort: &Sort, table: &TableConfig) -> Result<&mut Self, Error> {
        let rendered = sort.render(self.driver, table.sortable_columns())?;
        self.sql.push_str(&rendered);
        Ok(self)
    }

    /// Appends `LIMIT` / `OFFSET`, binding both as integers.
    pub fn push_limit_offset(&mut self, limit: Option<u64>, offset: Option<u64>) -> Result<&mut Self, Error> {
        match (limit, offset) {
            (Some(limit), _) => {
                self.push_sql(" LIMIT ").push_param(Value::Int(to_i64(limit)?));
            }
            // SQLite and MySQL only accept OFFSET after a LIMIT
            (None, Some(_)) => match self.driver {
                Drivers::SQLite => {
                    self.push_sql(" LIMIT -1");
                }
                Drivers::MySQL => {
                    self.push_sql(" LIMIT 18446744073709551615");
                }
                Drivers::Postgres => {}
            },
            (None, None) => {}
        }
        if let Some(offset) = offset {
            self.push_sql(" OFFSET ").push_param(Value::Int(to_i64(offset)?));
        }
        Ok(self)
    }

    // ========================================================================
    // Execution
    // ========================================================================

    /// Runs a statement that returns no rows.
    pub async fn execute<C: Connection>(&self, conn: &mut C) -> Result<AnyQueryResult, Error> {
        log::debug!("{}", self.sql);
        let args = bind_all(&self.params, self.driver)?;
        let result = sqlx::query_with::<sqlx::Any, _>(&self.sql, args).execute(conn.executor()).await?;
        Ok(result)
    }

    pub async fn fetch_all<C: Connection>(&self, conn: &mut C) -> Result<Vec<Record>, Error> {
        log::debug!("{}", self.sql);
        let args = bind_all(&self.params, self.driver)?;
        let rows = sqlx::query_with::<sqlx::Any, _>(&self.sql, args).fetch_all(conn.executor()).await?;
        rows.iter().map(Record::from_row).collect()
    }

    pub async fn fetch_optional<C: Connection>(&self, conn: &mut C) -> Result<Option<Record>, Error> {
        log::debug!("{}", self.sql);
        let args = bind_all(&self.params, self.driver)?;
        let row = sqlx::query_with::<sqlx::Any, _>(&self.sql, args).fetch_optional(conn.executor()).await?;
        row.as_ref().map(Record::from_row).transpose()
    }

    /// Reads the first column of the first row as an integer (`COUNT(*)`).
    pub async fn fetch_count<C: Connection>(&self, conn: &mut C) -> Result<u64, Error> {
        log::debug!("{}", self.sql);
        let args = bind_all(&self.params, self.driver)?;
        let row = sqlx::query_with::<sqlx::Any, _>(&self.sql, args).fetch_one(conn.executor()).await?;
        let count: i64 = row.try_get(0)?;
        u64::try_from(count).map_err(|_| Error::conversion(&format!("negative count {}", count)))
    }
}

fn to_i64(value: u64) -> Result<i64, Error> {
    i64::try_from(value).map_err(|_| Error::InvalidArgument(format!("{} is out of range", value)))
}
