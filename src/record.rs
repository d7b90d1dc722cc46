//! Record and dataset types shared across the pipeline.

use indexmap::{IndexMap, IndexSet};
use serde_json::Value;

/// The identifier field every loaded record must carry.
pub const ID_FIELD: &str = "id";

/// A single source item: field name to scalar, sequence, mapping or null.
///
/// Sparse by design — records in one dataset may populate different field
/// sets. Insertion order is preserved so columns appear in the sink in the
/// order they were first observed.
pub type Record = IndexMap<String, Value>;

/// A rectangular collection of records for one entity type.
///
/// After [`crate::assemble::assemble`] has run, every record carries a
/// non-null integral `id`, unique within the dataset.
#[derive(Debug, Clone)]
pub struct Dataset {
    /// Entity type this dataset belongs to (e.g. "starships", "cards")
    pub entity: String,
    pub records: Vec<Record>,
}

impl Dataset {
    pub fn new(entity: impl Into<String>) -> Self {
        Self {
            entity: entity.into(),
            records: Vec::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Ordered union of field names across all records, `id` first.
    pub fn field_names(&self) -> Vec<String> {
        let mut names: IndexSet<String> = IndexSet::new();
        names.insert(ID_FIELD.to_string());
        for record in &self.records {
            for field in record.keys() {
                if !names.contains(field.as_str()) {
                    names.insert(field.clone());
                }
            }
        }
        names.into_iter().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn record(pairs: &[(&str, Value)]) -> Record {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.clone()))
            .collect()
    }

    #[test]
    fn field_names_are_union_with_id_first() {
        let mut dataset = Dataset::new("things");
        dataset
            .records
            .push(record(&[("name", json!("a")), ("id", json!(1))]));
        dataset
            .records
            .push(record(&[("id", json!(2)), ("height", json!(4))]));

        assert_eq!(dataset.field_names(), vec!["id", "name", "height"]);
    }

    #[test]
    fn empty_dataset_reports_empty() {
        let dataset = Dataset::new("things");
        assert!(dataset.is_empty());
        assert_eq!(dataset.len(), 0);
    }
}
