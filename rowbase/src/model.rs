//! # Record Model Module
//!
//! [`RecordModel`] is what a concrete table model composes. It binds one
//! [`TableConfig`] to one instance of each service and exposes the whole
//! create / read / update / delete / bulk surface in one place.
//!
//! ## Example Usage
//!
//! ```rust,ignore
//! use rowbase::{Conditions, Database, Record, RecordModel, Sort, TableConfig};
//!
//! pub struct Users(RecordModel);
//!
//! impl Users {
//!     pub fn new(db: Database) -> Result<Self, rowbase::Error> {
//!         let config = TableConfig::new("users").sortable(["id", "name", "created_at"]);
//!         Ok(Self(RecordModel::new(db, config)?))
//!     }
//!
//!     pub async fn active(&self) -> Result<Vec<Record>, rowbase::Error> {
//!         self.0.find_all(&Conditions::new().eq("status", "active"), &Sort::asc("name"), None, None).await
//!     }
//! }
//! ```
//!
//! ## Atomicity
//!
//! Only [`bulk_edit`](RecordModel::bulk_edit) runs in a transaction.
//! [`bulk_update`](RecordModel::bulk_update) and
//! [`bulk_delete`](RecordModel::bulk_delete) are fail-fast loops that keep
//! whatever they applied before the failure. See [`crate::bulk`].

use std::sync::Arc;

use crate::{
    Error,
    bulk::{BulkEditReport, BulkService, EditEntry},
    condition::Conditions,
    database::Database,
    delete::DeleteService,
    insert::CreateService,
    lenient::Lenient,
    order::Sort,
    pagination::Page,
    read::ReadService,
    table::TableConfig,
    update::UpdateService,
    value::{Record, Value},
};

/// A table-bound model with the full record API.
#[derive(Debug, Clone)]
pub struct RecordModel {
    table: Arc<TableConfig>,
    creator: CreateService,
    updater: UpdateService,
    deleter: DeleteService,
    reader: ReadService,
    bulk: BulkService,
}

impl RecordModel {
    /// Binds `db` to the table described by `config`.
    ///
    /// Fails with [`Error::Configuration`] when the table name or primary key
    /// is missing or not a safe identifier.
    pub fn new(db: Database, config: TableConfig) -> Result<Self, Error> {
        config.validate()?;
        let table = Arc::new(config);

        let creator = CreateService::new(db.clone(), table.clone());
        let updater = UpdateService::new(db.clone(), table.clone());
        let deleter = DeleteService::new(db.clone(), table.clone());
        let reader = ReadService::new(db.clone(), table.clone());
        let bulk = BulkService::new(db, updater.clone(), deleter.clone());

        Ok(Self { table, creator, updater, deleter, reader, bulk })
    }

    pub fn table(&self) -> &TableConfig {
        &self.table
    }

    pub fn creator(&self) -> &CreateService {
        &self.creator
    }

    pub fn updater(&self) -> &UpdateService {
        &self.updater
    }

    pub fn deleter(&self) -> &DeleteService {
        &self.deleter
    }

    pub fn reader(&self) -> &ReadService {
        &self.reader
    }

    /// The boolean / absent-marker view of this model.
    pub fn lenient(&self) -> Lenient<'_> {
        Lenient::new(self)
    }

    // ========================================================================
    // Create / Update / Delete
    // ========================================================================

    pub async fn create(&self, data: &Record) -> Result<(), Error> {
        self.creator.insert(data).await
    }

    pub async fn create_returning_id(&self, data: &Record) -> Result<Value, Error> {
        self.creator.insert_returning_id(data).await
    }

    pub async fn update(&self, id: impl Into<Value>, data: &Record) -> Result<(), Error> {
        self.updater.update(id, data).await
    }

    pub async fn delete(&self, id: impl Into<Value>) -> Result<(), Error> {
        self.deleter.delete(id).await
    }

    /// See [`DeleteService::delete_where`]; an empty set must be
    /// [`Conditions::wildcard`].
    pub async fn delete_where(&self, conditions: &Conditions) -> Result<u64, Error> {
        self.deleter.delete_where(conditions).await
    }

    // ========================================================================
    // Reads
    // ========================================================================

    pub async fn find_by_id(&self, id: impl Into<Value>) -> Result<Option<Record>, Error> {
        self.reader.find_by_id(id).await
    }

    pub async fn find_all(
        &self,
        conditions: &Conditions,
        sort: &Sort,
        limit: Option<u64>,
        offset: Option<u64>,
    ) -> Result<Vec<Record>, Error> {
        self.reader.find_all(conditions, sort, limit, offset).await
    }

    pub async fn paginate(
        &self,
        conditions: &Conditions,
        sort: &Sort,
        per_page: u64,
        current_page: u64,
    ) -> Result<Page, Error> {
        self.reader.paginate(conditions, sort, per_page, current_page).await
    }

    pub async fn fetch_all(&self, conditions: &Conditions) -> Result<Vec<Record>, Error> {
        self.reader.fetch_all(conditions).await
    }

    pub async fn fetch_one(&self, conditions: &Conditions) -> Result<Option<Record>, Error> {
        self.reader.fetch_one(conditions).await
    }

    pub async fn fetch_raw(&self, sql: &str, params: Vec<Value>) -> Result<Option<Record>, Error> {
        self.reader.fetch_raw(sql, params).await
    }

    pub async fn search(
        &self,
        column: &str,
        keyword: &str,
        sort: &Sort,
        limit: Option<u64>,
    ) -> Result<Vec<Record>, Error> {
        self.reader.search(column, keyword, sort, limit).await
    }

    pub async fn count(&self, conditions: &Conditions) -> Result<u64, Error> {
        self.reader.count(conditions).await
    }

    pub async fn total_pages(&self, per_page: u64, conditions: &Conditions) -> Result<u64, Error> {
        self.reader.total_pages(per_page, conditions).await
    }

    // ========================================================================
    // Bulk
    // ========================================================================

    /// Non-atomic, fail-fast. See [`BulkService::bulk_update`].
    pub async fn bulk_update<I, V>(&self, ids: I, data: &Record) -> Result<usize, Error>
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        self.bulk.bulk_update(ids, data).await
    }

    /// Non-atomic, fail-fast. See [`BulkService::bulk_delete`].
    pub async fn bulk_delete<I, V>(&self, ids: I) -> Result<usize, Error>
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        self.bulk.bulk_delete(ids).await
    }

    /// Transactional. See [`BulkService::bulk_edit`].
    pub async fn bulk_edit<I>(&self, entries: I) -> Result<BulkEditReport, Error>
    where
        I: IntoIterator<Item = EditEntry>,
    {
        self.bulk.bulk_edit(entries).await
    }
}
