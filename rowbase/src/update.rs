//! Update service: partial update of one row by primary key.

use std::sync::Arc;

use crate::{
    Error,
    database::{Connection, Database, Drivers},
    query_builder::Statement,
    table::TableConfig,
    value::{Record, Value},
};

/// Updates rows of the bound table by primary key.
#[derive(Debug, Clone)]
pub struct UpdateService {
    db: Database,
    table: Arc<TableConfig>,
}

impl UpdateService {
    pub fn new(db: Database, table: Arc<TableConfig>) -> Self {
        Self { db, table }
    }

    /// Sets the columns in `data` on the row whose primary key is `id`.
    ///
    /// Returns [`Error::NotFound`] when no row has that id, so a missing row
    /// is distinguishable from a driver failure.
    pub async fn update(&self, id: impl Into<Value>, data: &Record) -> Result<(), Error> {
        self.update_on(&mut self.db.clone(), id, data).await
    }

    /// Same as [`update`](Self::update), on any connection (e.g. an open
    /// transaction).
    pub async fn update_on<C: Connection>(&self, conn: &mut C, id: impl Into<Value>, data: &Record) -> Result<(), Error> {
        let stmt = build_update(&self.table, conn.driver(), id.into(), data)?;
        let result = stmt.execute(conn).await?;
        if result.rows_affected() == 0 {
            return Err(Error::NotFound);
        }
        Ok(())
    }
}

pub(crate) fn build_update(table: &TableConfig, driver: Drivers, id: Value, data: &Record) -> Result<Statement, Error> {
    if data.is_empty() {
        return Err(Error::invalid_argument("no fields to update"));
    }

    let mut stmt = Statement::new(driver);
    stmt.push_sql("UPDATE ").push_sql(&table.quoted_table(driver)).push_sql(" SET ");
    for (i, (column, value)) in data.iter().enumerate() {
        if i > 0 {
            stmt.push_sql(", ");
        }
        stmt.push_identifier(column)?.push_sql(" = ").push_param(value.clone());
    }
    stmt.push_sql(" WHERE ").push_sql(&table.quoted_primary_key(driver)).push_sql(" = ").push_param(id);
    Ok(stmt)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_update_binds_fields_then_id() {
        let table = TableConfig::new("users");
        let data = Record::new().with("status", "active").with("score", 3);
        let stmt = build_update(&table, Drivers::Postgres, Value::Int(9), &data).unwrap();

        assert_eq!(stmt.sql(), r#"UPDATE "users" SET "status" = $1, "score" = $2 WHERE "id" = $3"#);
        assert_eq!(stmt.params().last(), Some(&Value::Int(9)));
    }

    #[test]
    fn test_update_with_no_fields_is_rejected() {
        let table = TableConfig::new("users");
        assert!(matches!(
            build_update(&table, Drivers::SQLite, Value::Int(1), &Record::new()),
            Err(Error::InvalidArgument(_))
        ));
    }
}
