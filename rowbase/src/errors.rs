//! # Error Handling Module
//!
//! This module defines the error type returned by every rowbase service.
//! Failures are never swallowed at the service boundary: a caller can always
//! tell a missing row from a rejected argument from a driver failure. The
//! older "false or null on any failure" contract is still available through
//! [`Lenient`](crate::lenient::Lenient), which is built on top of this type.
//!
//! ## Error Types
//!
//! - **Configuration**: The model was bound to a missing or unsafe table
//! - **InvalidCondition**: An identifier or predicate would be unsafe to send
//! - **InvalidArgument**: A method argument is out of range or empty
//! - **UnconfirmedWildcard**: An empty delete condition set without confirmation
//! - **NotFound**: An update/delete by id matched no row
//! - **BulkAborted**: A fail-fast bulk operation stopped part way through
//! - **Database**: Wrapped sqlx errors (connection issues, constraint failures)
//!
//! ## Example Usage
//!
//! ```rust,ignore
//! use rowbase::Error;
//!
//! match users.update(7, record).await {
//!     Ok(()) => println!("updated"),
//!     Err(Error::NotFound) => eprintln!("no user 7"),
//!     Err(Error::Database(e)) => eprintln!("database error: {}", e),
//!     Err(e) => eprintln!("rejected: {}", e),
//! }
//! ```

// ============================================================================
// External Crate Imports
// ============================================================================

use thiserror::Error;

// ============================================================================
// Internal Crate Imports
// ============================================================================

use crate::value::Value;

// ============================================================================
// Error Enum Definition
// ============================================================================

/// The main error type for rowbase operations.
///
/// Uses `thiserror` to implement `std::error::Error` and `Display`.
#[derive(Error, Debug)]
pub enum Error {
    /// The table binding is missing or unusable.
    ///
    /// Raised by [`RecordModel::new`](crate::RecordModel::new) when the
    /// [`TableConfig`](crate::TableConfig) carries an empty or unsafe table
    /// name or primary key, and by the connection builder when a URL cannot
    /// be understood. It is always fatal for the value being constructed.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// An identifier or predicate failed validation.
    ///
    /// Column names must consist of ASCII letters, digits and underscores
    /// only. Anything else (spaces, quotes, semicolons, comment markers) is
    /// rejected before any SQL is built, so a key like `"id; DROP TABLE x"`
    /// never reaches the database.
    ///
    /// # Example
    ///
    /// ```rust,ignore
    /// let bad = Conditions::new().eq("id; DROP TABLE users", 1);
    /// assert!(matches!(users.fetch_all(&bad).await, Err(Error::InvalidCondition(_))));
    /// ```
    #[error("Invalid condition: {0}")]
    InvalidCondition(String),

    /// Invalid argument error.
    ///
    /// Used for empty payloads, zero page sizes, and sort columns outside the
    /// table's allow-list.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// A delete was requested with an empty condition set.
    ///
    /// Deleting every row requires building the condition set with
    /// [`Conditions::wildcard`](crate::Conditions::wildcard).
    #[error("Refusing to delete every row without an explicit wildcard")]
    UnconfirmedWildcard,

    /// An update or delete by primary key affected no rows.
    #[error("No row matched the given id")]
    NotFound,

    /// A fail-fast bulk operation stopped at `failed_at`.
    ///
    /// `applied` operations before it were already executed and are **not**
    /// rolled back.
    #[error("Bulk operation aborted at id {failed_at} after {applied} applied: {source}")]
    BulkAborted {
        applied: usize,
        failed_at: Value,
        #[source]
        source: Box<Error>,
    },

    /// Type conversion error.
    ///
    /// Raised when a value cannot be bound to a statement or a column cannot
    /// be decoded into a [`Value`].
    #[error("Type conversion error: {0}")]
    Conversion(String),

    /// Database operation error.
    ///
    /// Wraps errors from the underlying sqlx library and is produced
    /// automatically through `?`.
    ///
    /// # Common Causes
    ///
    /// - **Connection Errors**: Failed to connect to database, pool exhausted
    /// - **Query Errors**: table/column not found
    /// - **Constraint Violations**: Primary key, foreign key, unique, not null violations
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

// ============================================================================
// Helper Functions
// ============================================================================

impl Error {
    /// Creates an `InvalidArgument` error from a string slice.
    pub fn invalid_argument(msg: &str) -> Self {
        Error::InvalidArgument(msg.to_string())
    }

    /// Creates an `InvalidCondition` error from a string slice.
    pub fn invalid_condition(msg: &str) -> Self {
        Error::InvalidCondition(msg.to_string())
    }

    /// Creates a `Conversion` error from a string slice.
    pub fn conversion(msg: &str) -> Self {
        Error::Conversion(msg.to_string())
    }

    /// Returns `true` when the error came from the database driver rather
    /// than from validation inside rowbase.
    pub fn is_driver_error(&self) -> bool {
        match self {
            Error::Database(_) => true,
            Error::BulkAborted { source, .. } => source.is_driver_error(),
            _ => false,
        }
    }
}

/// Result alias used throughout the crate.
pub type Result<T, E = Error> = std::result::Result<T, E>;
