//! Dataset assembly: identifier synthesis, coercion and deduplication.
//!
//! Extractors hand over raw resolved records; assembly guarantees the load
//! invariant — every record carries a non-null integral `id`, unique within
//! the dataset. Sources that publish no identifier at all (the card catalog)
//! get one synthesized from their `code` natural key.

use std::collections::HashSet;

use serde_json::Value;
use sha2::{Digest, Sha256};
use tracing::{debug, warn};

use crate::record::{Dataset, Record, ID_FIELD};

/// Natural key consulted when a source publishes no identifier.
const CODE_FIELD: &str = "code";

/// Upper bound of the surrogate range; hashed keys land in
/// `1..=SURROGATE_RANGE`. Collisions inside the window are accepted, not
/// guarded against.
const SURROGATE_RANGE: u64 = 900_000_000;

/// Build a validated dataset from raw records.
///
/// - When no record carries an `id`, one is synthesized per record: a
///   numeric `code` parses directly, a non-numeric `code` maps through a
///   stable hash, and records with neither derive the id from their
///   position.
/// - Records whose id is null or not integer-representable are dropped.
/// - Duplicate ids keep the first occurrence.
pub fn assemble(entity: &str, records: Vec<Record>) -> Dataset {
    let has_ids = records
        .iter()
        .any(|record| record.get(ID_FIELD).is_some_and(|v| !v.is_null()));

    let mut dataset = Dataset::new(entity);
    let mut seen: HashSet<i64> = HashSet::new();

    for (position, mut record) in records.into_iter().enumerate() {
        if !has_ids {
            let surrogate = synthesize_id(&record, position);
            record.insert(ID_FIELD.to_string(), Value::from(surrogate));
        }

        let Some(id) = coerce_id(record.get(ID_FIELD)) else {
            warn!(entity, position, "dropping record without integral id");
            continue;
        };
        if !seen.insert(id) {
            debug!(entity, id, "dropping duplicate id, first occurrence kept");
            continue;
        }

        record.insert(ID_FIELD.to_string(), Value::from(id));
        dataset.records.push(record);
    }

    dataset
}

/// Deterministic surrogate for a record with no published identifier.
fn synthesize_id(record: &Record, position: usize) -> i64 {
    match record.get(CODE_FIELD) {
        Some(Value::String(code)) => code
            .parse::<i64>()
            .unwrap_or_else(|_| hash_to_surrogate(code)),
        Some(Value::Number(n)) if n.as_i64().is_some() => n.as_i64().unwrap_or_default(),
        _ => position as i64 + 1,
    }
}

/// Reduce a non-numeric natural key into the positive surrogate range.
///
/// SHA-256 keeps the mapping stable across runs and platforms, unlike the
/// standard library's randomized hasher.
fn hash_to_surrogate(key: &str) -> i64 {
    let digest = Sha256::digest(key.as_bytes());
    let mut head = [0u8; 8];
    head.copy_from_slice(&digest[..8]);
    (u64::from_be_bytes(head) % SURROGATE_RANGE) as i64 + 1
}

/// The record's identifier as an i64, accepting JSON integers and numeric
/// strings.
fn coerce_id(value: Option<&Value>) -> Option<i64> {
    match value? {
        Value::Number(n) => n.as_i64(),
        Value::String(s) => s.trim().parse::<i64>().ok(),
        _ => None,
    }
}
