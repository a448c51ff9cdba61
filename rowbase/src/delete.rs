//! Delete service.
//!
//! Deleting by condition set never falls back to "delete everything": a set
//! that is empty, or made only of empty `NOT IN` lists, is refused with
//! [`Error::UnconfirmedWildcard`] unless it was built with
//! [`Conditions::wildcard`].

use std::sync::Arc;

use crate::{
    Error,
    condition::Conditions,
    database::{Connection, Database, Drivers},
    query_builder::Statement,
    table::TableConfig,
    value::Value,
};

/// Deletes rows from the bound table.
#[derive(Debug, Clone)]
pub struct DeleteService {
    db: Database,
    table: Arc<TableConfig>,
}

impl DeleteService {
    pub fn new(db: Database, table: Arc<TableConfig>) -> Self {
        Self { db, table }
    }

    /// Deletes the row whose primary key is `id`; [`Error::NotFound`] if
    /// there is none.
    pub async fn delete(&self, id: impl Into<Value>) -> Result<(), Error> {
        self.delete_on(&mut self.db.clone(), id).await
    }

    pub async fn delete_on<C: Connection>(&self, conn: &mut C, id: impl Into<Value>) -> Result<(), Error> {
        let conditions = Conditions::new().eq(self.table.primary_key_column(), id);
        match self.delete_where_on(conn, &conditions).await? {
            0 => Err(Error::NotFound),
            _ => Ok(()),
        }
    }

    /// Deletes every row matching `conditions` and returns how many went.
    ///
    /// A set that selects every row fails with
    /// [`Error::UnconfirmedWildcard`] unless built with
    /// [`Conditions::wildcard`].
    pub async fn delete_where(&self, conditions: &Conditions) -> Result<u64, Error> {
        self.delete_where_on(&mut self.db.clone(), conditions).await
    }

    pub async fn delete_where_on<C: Connection>(&self, conn: &mut C, conditions: &Conditions) -> Result<u64, Error> {
        let stmt = build_delete(&self.table, conn.driver(), conditions)?;
        let result = stmt.execute(conn).await?;
        Ok(result.rows_affected())
    }
}

pub(crate) fn build_delete(table: &TableConfig, driver: Drivers, conditions: &Conditions) -> Result<Statement, Error> {
    if conditions.matches_everything() && !conditions.is_wildcard() {
        return Err(Error::UnconfirmedWildcard);
    }

    let mut stmt = Statement::new(driver);
    stmt.push_sql("DELETE FROM ").push_sql(&table.quoted_table(driver));
    stmt.push_conditions(conditions)?;
    Ok(stmt)
}
