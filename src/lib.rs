//! Catalog ingestion pipeline feeding the `raw` Postgres schema.
//!
//! Extracts three public JSON APIs — PokeAPI, SWAPI and NetrunnerDB — each
//! with its own pagination idiom, normalizes cross-record URL references into
//! bare integer identifiers, and upserts the result into one table per entity
//! type. Table schemas are additive: new fields observed upstream become new
//! nullable columns, existing columns are never dropped or retyped.
//!
//! The pipeline runs one entity type at a time, extraction before load, with
//! no fan-out. A failure in one entity type never blocks the others.
//!
//! # Modules
//!
//! - [`resolve`] - URL reference resolution into bare identifiers
//! - [`fetch`] - Retrying HTTP client behind the [`fetch::Fetch`] seam
//! - [`paginate`] - One pagination interface, three source protocols
//! - [`sources`] - Per-source extractors producing validated datasets
//! - [`assemble`] - Identifier synthesis, coercion and deduplication
//! - [`sink`] - Schema synchronization and idempotent loading
//! - [`testing`] - In-memory fetch stub for exercising extractors offline

pub mod assemble;
pub mod config;
pub mod error;
pub mod fetch;
pub mod paginate;
pub mod record;
pub mod resolve;
pub mod sink;
pub mod sources;
pub mod testing;

pub use config::SinkConfig;
pub use error::{EtlError, FetchError, Result};
pub use fetch::{ApiClient, Fetch};
pub use record::{Dataset, Record, ID_FIELD};
