//! Table binding configuration.
//!
//! Every [`RecordModel`](crate::RecordModel) is bound to exactly one table
//! through an immutable [`TableConfig`]. The config is validated once, when
//! the model is built, and then shared by all of the model's services.

use heck::ToSnakeCase;

use crate::{Error, condition::is_safe_identifier, condition::quote_identifier, database::Drivers};

/// Which table a model works on, and how.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableConfig {
    pub(crate) table: String,
    pub(crate) primary_key: String,
    pub(crate) sortable: Option<Vec<String>>,
}

impl TableConfig {
    /// Binds to `table` with primary key `id`.
    pub fn new(table: impl Into<String>) -> Self {
        Self { table: table.into(), primary_key: "id".to_string(), sortable: None }
    }

    /// Binds to the snake_case form of an entity name (`"BlogPost"` →
    /// `"blog_post"`).
    pub fn for_entity(entity: &str) -> Self {
        Self::new(entity.to_snake_case())
    }

    pub fn primary_key(mut self, column: impl Into<String>) -> Self {
        self.primary_key = column.into();
        self
    }

    /// Restricts `ORDER BY` to the given columns.
    pub fn sortable<I, S>(mut self, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.sortable = Some(columns.into_iter().map(Into::into).collect());
        self
    }

    pub fn table(&self) -> &str {
        &self.table
    }

    pub fn primary_key_column(&self) -> &str {
        &self.primary_key
    }

    pub fn sortable_columns(&self) -> Option<&[String]> {
        self.sortable.as_deref()
    }

    pub(crate) fn quoted_table(&self, driver: Drivers) -> String {
        quote_identifier(&self.table, driver)
    }

    pub(crate) fn quoted_primary_key(&self, driver: Drivers) -> String {
        quote_identifier(&self.primary_key, driver)
    }

    /// Checks the binding before first use.
    pub fn validate(&self) -> Result<(), Error> {
        if self.table.trim().is_empty() {
            return Err(Error::Configuration("table name is required".to_string()));
        }
        if !is_safe_identifier(&self.table) {
            return Err(Error::Configuration(format!("table name `{}` is not a safe identifier", self.table)));
        }
        if !is_safe_identifier(&self.primary_key) {
            return Err(Error::Configuration(format!(
                "primary key `{}` is not a safe identifier",
                self.primary_key
            )));
        }
        if let Some(columns) = &self.sortable {
            if let Some(bad) = columns.iter().find(|c| !is_safe_identifier(c)) {
                return Err(Error::Configuration(format!("sortable column `{}` is not a safe identifier", bad)));
            }
        }
        Ok(())
    }
}
