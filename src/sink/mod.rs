//! Postgres sink: schema synchronization and idempotent loading.

pub mod loader;
pub mod schema;

/// Namespace holding one table per `<source>_<entity>` pair.
pub const RAW_SCHEMA: &str = "raw";

pub use loader::load_dataset;
pub use schema::{infer_column_kinds, sync_table_columns, ColumnKind};
