//! # Bulk Operations Module
//!
//! Three ways to touch many rows at once, with deliberately different
//! guarantees:
//!
//! | Operation | Payload | Atomic | On failure |
//! |---|---|---|---|
//! | [`bulk_update`](BulkService::bulk_update) | same fields for every id | no | stops, earlier updates stay |
//! | [`bulk_delete`](BulkService::bulk_delete) | ids only | no | stops, earlier deletes stay |
//! | [`bulk_edit`](BulkService::bulk_edit) | distinct fields per id | yes | rolls back everything |
//!
//! `bulk_update` and `bulk_delete` are best-effort loops. When one of them
//! stops, [`Error::BulkAborted`] reports how many operations were already
//! applied and which id failed. Callers that need all-or-nothing semantics
//! should use `bulk_edit`, or run [`UpdateService::update_on`] /
//! [`DeleteService::delete_on`] inside their own [`Transaction`](crate::Transaction).
//!
//! ## Bulk edit entries
//!
//! `bulk_edit` takes loosely shaped entries, usually straight from a JSON
//! request body:
//!
//! ```json
//! [
//!   { "id": 1, "fields": { "status": "active" } },
//!   { "id": 2 },
//!   { "id": 3, "fields": "oops" }
//! ]
//! ```
//!
//! Entries without an `id`, without `fields`, or whose `fields` is not an
//! object of scalar values are skipped and counted; they never abort the
//! batch. Everything else runs inside a single transaction.

use serde::{Deserialize, Serialize};

use crate::{
    Error,
    database::Database,
    delete::DeleteService,
    update::UpdateService,
    value::{Record, Value},
};

// ============================================================================
// Entries and Reports
// ============================================================================

/// One entry of a bulk edit batch.
///
/// Deserializes from any JSON value; shape problems only surface when the
/// batch runs, where they make the entry skipped.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(from = "serde_json::Value")]
pub enum EditEntry {
    /// Built from typed parts; always well formed.
    Typed { id: Value, fields: Record },
    /// An entry as received, e.g. `{ "id": 1, "fields": { ... } }`.
    Json(serde_json::Value),
}

impl EditEntry {
    pub fn new(id: impl Into<Value>, fields: Record) -> Self {
        EditEntry::Typed { id: id.into(), fields }
    }

    /// The `(id, fields)` pair, or `None` when the entry is malformed.
    pub fn parse(&self) -> Option<(Value, Record)> {
        let (id, fields) = match self {
            EditEntry::Typed { id, fields } => (id.clone(), fields.clone()),
            EditEntry::Json(raw) => {
                let id = Value::from_json(raw.get("id")?)?;
                let fields = Record::from_json(raw.get("fields")?)?;
                (id, fields)
            }
        };
        if id.is_null() || fields.is_empty() {
            return None;
        }
        Some((id, fields))
    }
}

impl From<serde_json::Value> for EditEntry {
    fn from(raw: serde_json::Value) -> Self {
        EditEntry::Json(raw)
    }
}

/// Outcome of a committed bulk edit.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct BulkEditReport {
    /// Entries whose update matched a row.
    pub applied: usize,
    /// Malformed entries that were skipped.
    pub skipped: usize,
    /// Well-formed entries whose id matched no row.
    pub unmatched: usize,
}

// ============================================================================
// Bulk Service
// ============================================================================

#[derive(Debug, Clone)]
pub struct BulkService {
    db: Database,
    updater: UpdateService,
    deleter: DeleteService,
}

impl BulkService {
    pub fn new(db: Database, updater: UpdateService, deleter: DeleteService) -> Self {
        Self { db, updater, deleter }
    }

    /// Applies the same `data` to every id, in order.
    ///
    /// **Not atomic.** The first failure (including an id with no row) stops
    /// the loop with [`Error::BulkAborted`]; updates before it are kept.
    /// Returns the number of rows updated.
    pub async fn bulk_update<I, V>(&self, ids: I, data: &Record) -> Result<usize, Error>
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        let mut applied = 0;
        for id in ids {
            let id = id.into();
            if let Err(e) = self.updater.update(id.clone(), data).await {
                return Err(Error::BulkAborted { applied, failed_at: id, source: Box::new(e) });
            }
            applied += 1;
        }
        Ok(applied)
    }

    /// Deletes every id, in order.
    ///
    /// **Not atomic.** Same fail-fast behaviour as
    /// [`bulk_update`](Self::bulk_update).
    pub async fn bulk_delete<I, V>(&self, ids: I) -> Result<usize, Error>
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        let mut applied = 0;
        for id in ids {
            let id = id.into();
            if let Err(e) = self.deleter.delete(id.clone()).await {
                return Err(Error::BulkAborted { applied, failed_at: id, source: Box::new(e) });
            }
            applied += 1;
        }
        Ok(applied)
    }

    /// Applies a distinct update per entry inside one transaction.
    ///
    /// Malformed entries are skipped. An entry whose id matches no row is
    /// counted as unmatched and does not abort. Any other error rolls the
    /// whole batch back and is returned.
    pub async fn bulk_edit<I>(&self, entries: I) -> Result<BulkEditReport, Error>
    where
        I: IntoIterator<Item = EditEntry>,
    {
        let mut tx = self.db.begin().await?;
        let mut report = BulkEditReport::default();

        for (index, entry) in entries.into_iter().enumerate() {
            let Some((id, fields)) = entry.parse() else {
                log::warn!("bulk edit: skipping malformed entry #{}", index);
                report.skipped += 1;
                continue;
            };

            match self.updater.update_on(&mut tx, id, &fields).await {
                Ok(()) => report.applied += 1,
                Err(Error::NotFound) => report.unmatched += 1,
                Err(e) => {
                    log::error!("bulk edit: entry #{} failed, rolling back: {}", index, e);
                    if let Err(rollback_err) = tx.rollback().await {
                        log::error!("bulk edit: rollback failed: {}", rollback_err);
                    }
                    return Err(e);
                }
            }
        }

        tx.commit().await?;
        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn entry(value: serde_json::Value) -> EditEntry {
        EditEntry::from(value)
    }

    #[test]
    fn test_well_formed_entry_parses() {
        let (id, fields) = entry(json!({ "id": 1, "fields": { "status": "active" } })).parse().unwrap();

        assert_eq!(id, Value::Int(1));
        assert_eq!(fields.get("status"), Some(&Value::Text("active".into())));
    }

    #[test]
    fn test_malformed_entries_do_not_parse() {
        assert!(entry(json!({ "id": 1 })).parse().is_none());
        assert!(entry(json!({ "fields": { "a": 1 } })).parse().is_none());
        assert!(entry(json!({ "id": 1, "fields": "active" })).parse().is_none());
        assert!(entry(json!({ "id": 1, "fields": [1, 2] })).parse().is_none());
        assert!(entry(json!({ "id": null, "fields": { "a": 1 } })).parse().is_none());
        assert!(entry(json!({ "id": 1, "fields": {} })).parse().is_none());
    }

    #[test]
    fn test_batch_deserializes_from_json_array() {
        let batch: Vec<EditEntry> = serde_json::from_value(json!([{ "id": 1, "fields": { "a": 1 } }, 7])).unwrap();

        assert!(batch[0].parse().is_some());
        assert!(batch[1].parse().is_none());
    }

    #[test]
    fn test_typed_entry_parses() {
        let fields = Record::new().with("status", "archived").with("score", 2);
        let (id, parsed) = EditEntry::new(5, fields).parse().unwrap();

        assert_eq!(id, Value::Int(5));
        assert_eq!(parsed.get("score"), Some(&Value::Int(2)));
    }
}
