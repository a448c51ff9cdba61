//! Read services: lookups, listings, pagination, search and counting.

use std::sync::Arc;

use crate::{
    Error,
    condition::{Conditions, validate_identifier},
    database::Database,
    order::Sort,
    pagination::{self, Page, Pagination},
    query_builder::Statement,
    table::TableConfig,
    value::{Record, Value},
};

/// Reads rows from the bound table.
#[derive(Debug, Clone)]
pub struct ReadService {
    db: Database,
    table: Arc<TableConfig>,
}

impl ReadService {
    pub fn new(db: Database, table: Arc<TableConfig>) -> Self {
        Self { db, table }
    }

    fn select(&self) -> Statement {
        Statement::select_all(&self.table, self.db.driver())
    }

    /// The row whose primary key is `id`, if any.
    pub async fn find_by_id(&self, id: impl Into<Value>) -> Result<Option<Record>, Error> {
        let conditions = Conditions::new().eq(self.table.primary_key_column(), id);
        let mut stmt = self.select();
        stmt.push_conditions(&conditions)?.push_limit_offset(Some(1), None)?;
        stmt.fetch_optional(&mut self.db.clone()).await
    }

    /// Rows matching `conditions`, sorted and sliced.
    pub async fn find_all(
        &self,
        conditions: &Conditions,
        sort: &Sort,
        limit: Option<u64>,
        offset: Option<u64>,
    ) -> Result<Vec<Record>, Error> {
        let mut stmt = self.select();
        stmt.push_conditions(conditions)?
            .push_sort(sort, &self.table)?
            .push_limit_offset(limit, offset)?;
        stmt.fetch_all(&mut self.db.clone()).await
    }

    /// One page of rows plus metadata. Issues a `COUNT(*)` and then the
    /// sliced `SELECT`; `current_page` starts at 1.
    pub async fn paginate(
        &self,
        conditions: &Conditions,
        sort: &Sort,
        per_page: u64,
        current_page: u64,
    ) -> Result<Page, Error> {
        pagination::validate(per_page, current_page)?;
        let total = self.count(conditions).await?;
        let pagination = Pagination::new(per_page, current_page, total)?;
        let data = self.find_all(conditions, sort, Some(per_page), Some(pagination.offset()?)).await?;

        Ok(Page { data, pagination })
    }

    /// Every row matching `conditions`, unsorted and unpaginated.
    pub async fn fetch_all(&self, conditions: &Conditions) -> Result<Vec<Record>, Error> {
        self.find_all(conditions, &Sort::none(), None, None).await
    }

    /// `ceil(count(conditions) / per_page)`.
    pub async fn total_pages(&self, per_page: u64, conditions: &Conditions) -> Result<u64, Error> {
        pagination::validate(per_page, 1)?;
        let total = self.count(conditions).await?;
        Ok(pagination::total_pages(total, per_page))
    }

    /// The first matching row by primary key, if any.
    pub async fn fetch_one(&self, conditions: &Conditions) -> Result<Option<Record>, Error> {
        let mut stmt = self.select();
        stmt.push_conditions(conditions)?
            .push_sql(" ORDER BY ")
            .push_sql(&self.table.quoted_primary_key(self.db.driver()))
            .push_sql(" ASC")
            .push_limit_offset(Some(1), None)?;
        stmt.fetch_optional(&mut self.db.clone()).await
    }

    /// Runs caller-written SQL with bound `params` and returns the first
    /// row, if any.
    ///
    /// The SQL must already use the driver's placeholder style. Values are
    /// always bound, never spliced into the text.
    pub async fn fetch_raw(&self, sql: &str, params: Vec<Value>) -> Result<Option<Record>, Error> {
        Statement::raw(sql, params, self.db.driver()).fetch_optional(&mut self.db.clone()).await
    }

    /// Rows where `column` contains `keyword` (`LIKE '%keyword%'`).
    ///
    /// `%` and `_` inside `keyword` keep their LIKE meaning.
    pub async fn search(
        &self,
        column: &str,
        keyword: &str,
        sort: &Sort,
        limit: Option<u64>,
    ) -> Result<Vec<Record>, Error> {
        let column = validate_identifier(column)?;
        let conditions = Conditions::new().like(column, format!("%{}%", keyword));
        self.find_all(&conditions, sort, limit, None).await
    }

    /// Number of rows matching `conditions`.
    pub async fn count(&self, conditions: &Conditions) -> Result<u64, Error> {
        let mut stmt = Statement::select(&self.table, self.db.driver(), "COUNT(*)");
        stmt.push_conditions(conditions)?;
        stmt.fetch_count(&mut self.db.clone()).await
    }
}
