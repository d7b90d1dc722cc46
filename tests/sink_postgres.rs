//! Sink integration tests against a live Postgres instance.
//!
//! Ignored by default; run with a reachable database and the usual PG*
//! environment variables set:
//!
//! ```sh
//! PGPASSWORD=... cargo test --test sink_postgres -- --ignored
//! ```

use serde_json::{json, Value};
use sqlx::{Connection, PgConnection, Row};

use nerdfacts_etl::sink::{infer_column_kinds, load_dataset, sync_table_columns, RAW_SCHEMA};
use nerdfacts_etl::{Dataset, Record, SinkConfig};

fn record(pairs: &[(&str, Value)]) -> Record {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.clone()))
        .collect()
}

fn dataset(entity: &str, records: Vec<Record>) -> Dataset {
    let mut dataset = Dataset::new(entity);
    dataset.records = records;
    dataset
}

async fn connect(config: &SinkConfig) -> PgConnection {
    PgConnection::connect_with(&config.connect_options())
        .await
        .expect("connect to test database")
}

async fn drop_table(conn: &mut PgConnection, table: &str) {
    sqlx::query(&format!("DROP TABLE IF EXISTS {RAW_SCHEMA}.\"{table}\""))
        .execute(conn)
        .await
        .expect("drop test table");
}

async fn column_names(conn: &mut PgConnection, table: &str) -> Vec<String> {
    sqlx::query_scalar(
        "SELECT column_name FROM information_schema.columns \
         WHERE table_schema = $1 AND table_name = $2 ORDER BY ordinal_position",
    )
    .bind(RAW_SCHEMA)
    .bind(table)
    .fetch_all(conn)
    .await
    .expect("list columns")
}

#[tokio::test]
#[ignore = "requires a live Postgres instance"]
async fn loading_twice_is_idempotent() {
    let config = SinkConfig::from_env().expect("sink configuration");
    let table = "etl_test_idempotence";

    let mut conn = connect(&config).await;
    sqlx::query(&format!("CREATE SCHEMA IF NOT EXISTS {RAW_SCHEMA}"))
        .execute(&mut conn)
        .await
        .expect("create schema");
    drop_table(&mut conn, table).await;

    let data = dataset(
        "idempotence",
        vec![
            record(&[("id", json!(1)), ("name", json!("alpha"))]),
            record(&[("id", json!(2)), ("name", json!("beta"))]),
        ],
    );

    load_dataset(&config, RAW_SCHEMA, table, &data)
        .await
        .expect("first load");
    load_dataset(&config, RAW_SCHEMA, table, &data)
        .await
        .expect("second load");

    let rows = sqlx::query(&format!(
        "SELECT id, name FROM {RAW_SCHEMA}.\"{table}\" ORDER BY id"
    ))
    .fetch_all(&mut conn)
    .await
    .expect("read rows");

    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0].get::<i64, _>("id"), 1);
    assert_eq!(rows[0].get::<Option<String>, _>("name").as_deref(), Some("alpha"));

    drop_table(&mut conn, table).await;
}

#[tokio::test]
#[ignore = "requires a live Postgres instance"]
async fn conflicting_rows_are_fully_overwritten() {
    let config = SinkConfig::from_env().expect("sink configuration");
    let table = "etl_test_overwrite";

    let mut conn = connect(&config).await;
    drop_table(&mut conn, table).await;

    let first = dataset(
        "overwrite",
        vec![record(&[("id", json!(1)), ("tags", json!(["a", "b"]))])],
    );
    let second = dataset(
        "overwrite",
        vec![record(&[("id", json!(1)), ("tags", json!(["c"]))])],
    );

    load_dataset(&config, RAW_SCHEMA, table, &first)
        .await
        .expect("first load");
    load_dataset(&config, RAW_SCHEMA, table, &second)
        .await
        .expect("second load");

    let tags: Option<Value> = sqlx::query_scalar(&format!(
        "SELECT tags FROM {RAW_SCHEMA}.\"{table}\" WHERE id = 1"
    ))
    .fetch_one(&mut conn)
    .await
    .expect("read tags");

    // last write wins, not a union
    assert_eq!(tags, Some(json!(["c"])));

    drop_table(&mut conn, table).await;
}

#[tokio::test]
#[ignore = "requires a live Postgres instance"]
async fn field_absent_from_incoming_record_nulls_the_stored_value() {
    let config = SinkConfig::from_env().expect("sink configuration");
    let table = "etl_test_partial";

    let mut conn = connect(&config).await;
    drop_table(&mut conn, table).await;

    let first = dataset(
        "partial",
        vec![record(&[
            ("id", json!(1)),
            ("name", json!("alpha")),
            ("note", json!("keep me?")),
        ])],
    );
    // "note" stays in the dataset's field union via the second record, but
    // is absent from the record for id 1
    let second = dataset(
        "partial",
        vec![
            record(&[("id", json!(1)), ("name", json!("alpha v2"))]),
            record(&[("id", json!(2)), ("note", json!("other"))]),
        ],
    );

    load_dataset(&config, RAW_SCHEMA, table, &first)
        .await
        .expect("first load");
    load_dataset(&config, RAW_SCHEMA, table, &second)
        .await
        .expect("second load");

    let row = sqlx::query(&format!(
        "SELECT name, note FROM {RAW_SCHEMA}.\"{table}\" WHERE id = 1"
    ))
    .fetch_one(&mut conn)
    .await
    .expect("read row");

    assert_eq!(row.get::<Option<String>, _>("name").as_deref(), Some("alpha v2"));
    assert_eq!(row.get::<Option<String>, _>("note"), None);

    drop_table(&mut conn, table).await;
}

#[tokio::test]
#[ignore = "requires a live Postgres instance"]
async fn synchronization_only_ever_adds_columns() {
    let config = SinkConfig::from_env().expect("sink configuration");
    let table = "etl_test_additive";

    let mut conn = connect(&config).await;
    drop_table(&mut conn, table).await;

    let narrow = dataset(
        "additive",
        vec![record(&[("id", json!(1)), ("name", json!("alpha"))])],
    );
    load_dataset(&config, RAW_SCHEMA, table, &narrow)
        .await
        .expect("narrow load");

    // a later run observes a new field; "name" is absent from it entirely
    let wider = dataset(
        "additive",
        vec![record(&[("id", json!(1)), ("extra", json!(["x"]))])],
    );
    load_dataset(&config, RAW_SCHEMA, table, &wider)
        .await
        .expect("wider load");

    let columns = column_names(&mut conn, table).await;
    assert_eq!(columns, vec!["id", "name", "extra"]);

    // a column outside the incoming field union is left untouched
    let name: Option<String> = sqlx::query_scalar(&format!(
        "SELECT name FROM {RAW_SCHEMA}.\"{table}\" WHERE id = 1"
    ))
    .fetch_one(&mut conn)
    .await
    .expect("read name");
    assert_eq!(name.as_deref(), Some("alpha"));

    // synchronizing again with the same dataset changes nothing
    let kinds = infer_column_kinds(&wider);
    sync_table_columns(&mut conn, RAW_SCHEMA, table, &kinds)
        .await
        .expect("repeat sync");
    assert_eq!(column_names(&mut conn, table).await, columns);

    drop_table(&mut conn, table).await;
}
