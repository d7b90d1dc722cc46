//! Column-kind inference and additive schema synchronization.
//!
//! The sink schema is derived from the data, not declared up front. Fields
//! holding only scalars become TEXT; a field holding a sequence or mapping in
//! any record becomes JSONB. Synchronization only ever adds columns — it
//! never drops or retypes, so a field whose value kind changes after its
//! column was created surfaces as a write-time failure rather than a silent
//! migration.

use std::collections::HashSet;

use indexmap::IndexMap;
use sqlx::PgConnection;
use tracing::info;

use crate::error::Result;
use crate::record::{Dataset, ID_FIELD};

/// Storage kind for a sink column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnKind {
    Text,
    Jsonb,
}

impl ColumnKind {
    pub fn sql_type(self) -> &'static str {
        match self {
            Self::Text => "TEXT",
            Self::Jsonb => "JSONB",
        }
    }
}

/// Infer the storage kind of every dataset field, in field order (`id`
/// first).
pub fn infer_column_kinds(dataset: &Dataset) -> IndexMap<String, ColumnKind> {
    let mut kinds: IndexMap<String, ColumnKind> = dataset
        .field_names()
        .into_iter()
        .map(|field| (field, ColumnKind::Text))
        .collect();

    for record in &dataset.records {
        for (field, value) in record {
            if value.is_array() || value.is_object() {
                kinds.insert(field.clone(), ColumnKind::Jsonb);
            }
        }
    }
    kinds
}

/// Double-quote an identifier for interpolation into dynamic SQL.
pub fn quote_ident(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}

/// Column names the table currently has.
pub async fn existing_columns(
    conn: &mut PgConnection,
    schema: &str,
    table: &str,
) -> Result<HashSet<String>> {
    let names: Vec<String> = sqlx::query_scalar(
        "SELECT column_name FROM information_schema.columns \
         WHERE table_schema = $1 AND table_name = $2",
    )
    .bind(schema)
    .bind(table)
    .fetch_all(conn)
    .await?;

    Ok(names.into_iter().collect())
}

/// Add every dataset field the table is missing, as a nullable column of the
/// inferred kind. Each ALTER autocommits, so the widened schema is durable
/// before any row is written.
pub async fn sync_table_columns(
    conn: &mut PgConnection,
    schema: &str,
    table: &str,
    kinds: &IndexMap<String, ColumnKind>,
) -> Result<()> {
    let existing = existing_columns(conn, schema, table).await?;

    for (field, kind) in kinds {
        if field == ID_FIELD || existing.contains(field) {
            continue;
        }
        info!(column = %field, kind = kind.sql_type(), %schema, %table, "adding column");
        let statement = format!(
            "ALTER TABLE {}.{} ADD COLUMN {} {}",
            quote_ident(schema),
            quote_ident(table),
            quote_ident(field),
            kind.sql_type(),
        );
        sqlx::query(&statement).execute(&mut *conn).await?;
    }

    Ok(())
}
