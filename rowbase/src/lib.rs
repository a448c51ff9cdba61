// Declaração dos módulos
pub mod bulk;
pub mod condition;
pub mod database;
pub mod delete;
pub mod errors;
pub mod insert;
pub mod lenient;
pub mod model;
pub mod order;
pub mod pagination;
pub mod query_builder;
pub mod read;
pub mod table;
pub mod temporal;
pub mod transaction;
pub mod update;
pub mod value;
pub mod value_binding;

// Re-exportação para facilitar o uso pela API pública
pub use bulk::{BulkEditReport, EditEntry};
pub use condition::{Condition, Conditions};
pub use database::{Connection, Database, DatabaseBuilder, Drivers};
pub use errors::Error;
pub use lenient::Lenient;
pub use model::RecordModel;
pub use order::{Direction, OrderBy, Sort};
pub use pagination::{Page, Pagination};
pub use table::TableConfig;
pub use transaction::Transaction;
pub use value::{Record, Value};
