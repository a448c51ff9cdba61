//! Create service: single-row `INSERT`.

use std::sync::Arc;

use crate::{
    Error,
    database::{Connection, Database, Drivers},
    query_builder::Statement,
    table::TableConfig,
    value::{Record, Value},
};

/// Inserts rows into the bound table.
#[derive(Debug, Clone)]
pub struct CreateService {
    db: Database,
    table: Arc<TableConfig>,
}

impl CreateService {
    pub fn new(db: Database, table: Arc<TableConfig>) -> Self {
        Self { db, table }
    }

    /// Inserts `data` as one row. Columns are exactly the record's keys, in
    /// order; nothing is defaulted.
    pub async fn insert(&self, data: &Record) -> Result<(), Error> {
        self.insert_on(&mut self.db.clone(), data).await
    }

    pub async fn insert_on<C: Connection>(&self, conn: &mut C, data: &Record) -> Result<(), Error> {
        let stmt = build_insert(&self.table, conn.driver(), data, false)?;
        stmt.execute(conn).await?;
        Ok(())
    }

    /// Inserts `data` and returns the new row's identifier.
    ///
    /// When `data` carries the primary key, that value is returned as-is.
    /// Otherwise PostgreSQL reads it back through `RETURNING`, and SQLite and
    /// MySQL report the driver's last insert id.
    pub async fn insert_returning_id(&self, data: &Record) -> Result<Value, Error> {
        self.insert_returning_id_on(&mut self.db.clone(), data).await
    }

    pub async fn insert_returning_id_on<C: Connection>(&self, conn: &mut C, data: &Record) -> Result<Value, Error> {
        let driver = conn.driver();
        if let Some(id) = data.get(self.table.primary_key_column()) {
            let id = id.clone();
            build_insert(&self.table, driver, data, false)?.execute(conn).await?;
            return Ok(id);
        }

        match driver {
            Drivers::Postgres => {
                let row = build_insert(&self.table, driver, data, true)?.fetch_optional(conn).await?;
                row.and_then(|mut r| r.remove(self.table.primary_key_column()))
                    .ok_or_else(|| Error::conversion("INSERT ... RETURNING produced no id"))
            }
            Drivers::SQLite | Drivers::MySQL => {
                let result = build_insert(&self.table, driver, data, false)?.execute(conn).await?;
                result
                    .last_insert_id()
                    .map(Value::Int)
                    .ok_or_else(|| Error::conversion("driver did not report a last insert id"))
            }
        }
    }
}

pub(crate) fn build_insert(
    table: &TableConfig,
    driver: Drivers,
    data: &Record,
    returning: bool,
) -> Result<Statement, Error> {
    if data.is_empty() {
        return Err(Error::invalid_argument("cannot insert an empty record"));
    }

    let mut stmt = Statement::new(driver);
    stmt.push_sql("INSERT INTO ").push_sql(&table.quoted_table(driver)).push_sql(" (");
    for (i, column) in data.columns().enumerate() {
        if i > 0 {
            stmt.push_sql(", ");
        }
        stmt.push_identifier(column)?;
    }
    stmt.push_sql(") VALUES (");
    for (i, (_, value)) in data.iter().enumerate() {
        if i > 0 {
            stmt.push_sql(", ");
        }
        stmt.push_param(value.clone());
    }
    stmt.push_sql(")");
    if returning {
        stmt.push_sql(" RETURNING ").push_sql(&table.quoted_primary_key(driver));
    }
    Ok(stmt)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_sql_follows_record_order() {
        let table = TableConfig::new("users");
        let data = Record::new().with("name", "ada").with("age", 36);
        let stmt = build_insert(&table, Drivers::Postgres, &data, true).unwrap();

        assert_eq!(stmt.sql(), r#"INSERT INTO "users" ("name", "age") VALUES ($1, $2) RETURNING "id""#);
        assert_eq!(stmt.params(), &[Value::Text("ada".into()), Value::Int(36)]);
    }

    #[test]
    fn test_insert_rejects_empty_and_unsafe_columns() {
        let table = TableConfig::new("users");

        assert!(matches!(
            build_insert(&table, Drivers::SQLite, &Record::new(), false),
            Err(Error::InvalidArgument(_))
        ));
        assert!(matches!(
            build_insert(&table, Drivers::SQLite, &Record::new().with("name) --", 1), false),
            Err(Error::InvalidCondition(_))
        ));
    }
}
