//! Idempotent dataset loading.
//!
//! The loader is the only writer of sink tables. Each invocation opens its
//! own connection, creates missing infrastructure, synchronizes the schema,
//! upserts every record keyed on `id`, and commits once for the whole table.
//!
//! Upsert semantics: the dataset's field union defines the authoritative row
//! shape for this load. A field present in the union but absent from an
//! incoming record overwrites the stored value with NULL; a column outside
//! the union (from an earlier, wider run) is left untouched.

use indexmap::IndexMap;
use serde_json::Value;
use sqlx::{Connection, PgConnection};
use tracing::info;

use crate::config::SinkConfig;
use crate::error::Result;
use crate::record::{Dataset, ID_FIELD};
use crate::sink::schema::{infer_column_kinds, quote_ident, sync_table_columns, ColumnKind};

/// Persist a dataset into `schema.table`, creating the namespace, the table
/// and any missing columns first. No-op for an empty dataset.
pub async fn load_dataset(
    config: &SinkConfig,
    schema: &str,
    table: &str,
    dataset: &Dataset,
) -> Result<()> {
    if dataset.is_empty() {
        info!(%schema, %table, "no rows to load, skipping");
        return Ok(());
    }

    let mut conn = PgConnection::connect_with(&config.connect_options()).await?;
    let kinds = infer_column_kinds(dataset);

    // DDL first, autocommitted statement by statement, so the table shape is
    // durable before the row transaction starts.
    sqlx::query(&format!(
        "CREATE SCHEMA IF NOT EXISTS {}",
        quote_ident(schema)
    ))
    .execute(&mut conn)
    .await?;

    sqlx::query(&build_create_table(schema, table, &kinds))
        .execute(&mut conn)
        .await?;

    sync_table_columns(&mut conn, schema, table, &kinds).await?;

    let upsert = build_upsert(schema, table, &kinds);
    let mut tx = conn.begin().await?;
    for record in &dataset.records {
        let mut query = sqlx::query(&upsert);
        for (field, kind) in &kinds {
            let value = record.get(field.as_str());
            if field == ID_FIELD {
                query = query.bind(value.and_then(Value::as_i64));
            } else {
                match kind {
                    ColumnKind::Jsonb => {
                        query = query.bind(value.cloned().filter(|v| !v.is_null()));
                    }
                    ColumnKind::Text => {
                        query = query.bind(text_value(value));
                    }
                }
            }
        }
        query.execute(&mut *tx).await?;
    }
    tx.commit().await?;

    info!(rows = dataset.len(), %schema, %table, "loaded dataset");
    Ok(())
}

/// Render a scalar for a TEXT column: strings verbatim, other scalars as
/// their JSON literal.
fn text_value(value: Option<&Value>) -> Option<String> {
    match value {
        None | Some(Value::Null) => None,
        Some(Value::String(s)) => Some(s.clone()),
        Some(other) => Some(other.to_string()),
    }
}

pub(crate) fn build_create_table(
    schema: &str,
    table: &str,
    kinds: &IndexMap<String, ColumnKind>,
) -> String {
    let columns: Vec<String> = kinds
        .iter()
        .map(|(field, kind)| {
            if field == ID_FIELD {
                format!("{} BIGINT PRIMARY KEY", quote_ident(field))
            } else {
                format!("{} {}", quote_ident(field), kind.sql_type())
            }
        })
        .collect();

    format!(
        "CREATE TABLE IF NOT EXISTS {}.{} ({})",
        quote_ident(schema),
        quote_ident(table),
        columns.join(", "),
    )
}

pub(crate) fn build_upsert(
    schema: &str,
    table: &str,
    kinds: &IndexMap<String, ColumnKind>,
) -> String {
    let columns: Vec<String> = kinds.keys().map(|field| quote_ident(field)).collect();
    let placeholders: Vec<String> = (1..=kinds.len()).map(|n| format!("${n}")).collect();
    let updates: Vec<String> = kinds
        .keys()
        .filter(|field| field.as_str() != ID_FIELD)
        .map(|field| format!("{col} = EXCLUDED.{col}", col = quote_ident(field)))
        .collect();

    let conflict = if updates.is_empty() {
        "DO NOTHING".to_string()
    } else {
        format!("DO UPDATE SET {}", updates.join(", "))
    };

    format!(
        "INSERT INTO {}.{} ({}) VALUES ({}) ON CONFLICT ({}) {}",
        quote_ident(schema),
        quote_ident(table),
        columns.join(", "),
        placeholders.join(", "),
        quote_ident(ID_FIELD),
        conflict,
    )
}
