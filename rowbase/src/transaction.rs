//! # Transaction Module
//!
//! A thin wrapper around an sqlx transaction that can be handed to any
//! service method taking a [`Connection`].
//!
//! ## Features
//!
//! - **Atomic Operations**: Group several writes into one unit of work
//! - **Automatic Rollback**: Dropping an uncommitted transaction rolls it back
//! - **Driver Agnostic**: Works the same on PostgreSQL, MySQL and SQLite
//!
//! ## Example Usage
//!
//! ```rust,ignore
//! let mut tx = db.begin().await?;
//!
//! users.updater().update_on(&mut tx, 1, &Record::new().with("status", "active")).await?;
//! users.updater().update_on(&mut tx, 2, &Record::new().with("status", "active")).await?;
//!
//! tx.commit().await?;
//! ```

// ============================================================================
// Internal Crate Imports
// ============================================================================

use crate::{
    Error,
    database::{Connection, Drivers},
};

// ============================================================================
// Transaction Struct
// ============================================================================

/// A wrapper around a SQLx transaction.
///
/// # Fields
///
/// * `tx` - The underlying SQLx transaction
/// * `driver` - The database driver type (for placeholder and quoting style)
#[derive(Debug)]
pub struct Transaction<'a> {
    pub(crate) tx: sqlx::Transaction<'a, sqlx::Any>,
    pub(crate) driver: Drivers,
}

// ============================================================================
// Connection Implementation
// ============================================================================

/// Lets services run their statements inside this transaction.
impl<'a> Connection for Transaction<'a> {
    type Exec<'c>
        = &'c mut sqlx::AnyConnection
    where
        Self: 'c;

    fn driver(&self) -> Drivers {
        self.driver
    }

    fn executor<'c>(&'c mut self) -> Self::Exec<'c> {
        &mut *self.tx
    }
}

// ============================================================================
// Transaction Control
// ============================================================================

impl<'a> Transaction<'a> {
    /// Commits the transaction, consuming it.
    pub async fn commit(self) -> Result<(), Error> {
        self.tx.commit().await?;
        Ok(())
    }

    /// Rolls back the transaction, consuming it.
    ///
    /// This also happens when the `Transaction` is dropped without being
    /// committed; calling it explicitly surfaces rollback failures.
    pub async fn rollback(self) -> Result<(), Error> {
        self.tx.rollback().await?;
        Ok(())
    }
}
