//! The simplified success/absence contract.
//!
//! Some callers only want to know "did it work" or "is it there". [`Lenient`]
//! wraps a [`RecordModel`] and flattens every error into `false` or `None`.
//! The swallowed error is logged at `warn` level, so it is not lost, but the
//! caller can no longer tell a missing row from a driver failure. Prefer the
//! `Result`-returning methods on [`RecordModel`] for new code.

use std::fmt::Display;

use crate::{
    bulk::EditEntry,
    condition::Conditions,
    model::RecordModel,
    order::Sort,
    pagination::Page,
    value::{Record, Value},
};

/// Boolean / `Option` view of a [`RecordModel`].
#[derive(Debug, Clone, Copy)]
pub struct Lenient<'a> {
    model: &'a RecordModel,
}

fn flag<E: Display>(op: &str, table: &str, result: Result<impl Sized, E>) -> bool {
    match result {
        Ok(_) => true,
        Err(e) => {
            log::warn!("{} on `{}` failed: {}", op, table, e);
            false
        }
    }
}

fn absent<T, E: Display>(op: &str, table: &str, result: Result<Option<T>, E>) -> Option<T> {
    match result {
        Ok(value) => value,
        Err(e) => {
            log::warn!("{} on `{}` failed: {}", op, table, e);
            None
        }
    }
}

impl<'a> Lenient<'a> {
    pub fn new(model: &'a RecordModel) -> Self {
        Self { model }
    }

    fn table(&self) -> &str {
        self.model.table().table()
    }

    pub async fn create(&self, data: &Record) -> bool {
        flag("create", self.table(), self.model.create(data).await)
    }

    /// The new id, or `None` on any failure.
    pub async fn create_returning_id(&self, data: &Record) -> Option<Value> {
        absent("create", self.table(), self.model.create_returning_id(data).await.map(Some))
    }

    /// `false` both for a missing row and for a driver error.
    pub async fn update(&self, id: impl Into<Value>, data: &Record) -> bool {
        flag("update", self.table(), self.model.update(id, data).await)
    }

    pub async fn delete(&self, id: impl Into<Value>) -> bool {
        flag("delete", self.table(), self.model.delete(id).await)
    }

    pub async fn delete_where(&self, conditions: &Conditions) -> bool {
        flag("delete_where", self.table(), self.model.delete_where(conditions).await)
    }

    pub async fn find_by_id(&self, id: impl Into<Value>) -> Option<Record> {
        absent("find_by_id", self.table(), self.model.find_by_id(id).await)
    }

    pub async fn fetch_one(&self, conditions: &Conditions) -> Option<Record> {
        absent("fetch_one", self.table(), self.model.fetch_one(conditions).await)
    }

    pub async fn fetch_raw(&self, sql: &str, params: Vec<Value>) -> Option<Record> {
        absent("fetch_raw", self.table(), self.model.fetch_raw(sql, params).await)
    }

    /// Rows, or an empty list on failure.
    pub async fn fetch_all(&self, conditions: &Conditions) -> Vec<Record> {
        absent("fetch_all", self.table(), self.model.fetch_all(conditions).await.map(Some)).unwrap_or_default()
    }

    pub async fn find_all(
        &self,
        conditions: &Conditions,
        sort: &Sort,
        limit: Option<u64>,
        offset: Option<u64>,
    ) -> Vec<Record> {
        absent("find_all", self.table(), self.model.find_all(conditions, sort, limit, offset).await.map(Some))
            .unwrap_or_default()
    }

    pub async fn search(&self, column: &str, keyword: &str, sort: &Sort, limit: Option<u64>) -> Vec<Record> {
        absent("search", self.table(), self.model.search(column, keyword, sort, limit).await.map(Some))
            .unwrap_or_default()
    }

    pub async fn paginate(&self, conditions: &Conditions, sort: &Sort, per_page: u64, current_page: u64) -> Option<Page> {
        absent(
            "paginate",
            self.table(),
            self.model.paginate(conditions, sort, per_page, current_page).await.map(Some),
        )
    }

    /// Row count, or `0` on failure.
    pub async fn count(&self, conditions: &Conditions) -> u64 {
        absent("count", self.table(), self.model.count(conditions).await.map(Some)).unwrap_or(0)
    }

    /// Page count, or `0` on failure.
    pub async fn total_pages(&self, per_page: u64, conditions: &Conditions) -> u64 {
        absent("total_pages", self.table(), self.model.total_pages(per_page, conditions).await.map(Some)).unwrap_or(0)
    }

    pub async fn bulk_update<I, V>(&self, ids: I, data: &Record) -> bool
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        flag("bulk_update", self.table(), self.model.bulk_update(ids, data).await)
    }

    pub async fn bulk_delete<I, V>(&self, ids: I) -> bool
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        flag("bulk_delete", self.table(), self.model.bulk_delete(ids).await)
    }

    /// `true` when the batch committed; skipped entries do not count as
    /// failure.
    pub async fn bulk_edit<I>(&self, entries: I) -> bool
    where
        I: IntoIterator<Item = EditEntry>,
    {
        flag("bulk_edit", self.table(), self.model.bulk_edit(entries).await)
    }
}
