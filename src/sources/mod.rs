//! Per-source extractors.
//!
//! Each source module exposes one `extract` entry point that walks every
//! entity type of that source and returns one validated dataset per entity.
//! Entity types are independent: a listing failure produces an empty dataset
//! for that entity alone, and a failed detail fetch skips that single item.

pub mod netrunner;
pub mod pokeapi;
pub mod swapi;

use serde_json::Value;
use tracing::warn;

use crate::fetch::Fetch;
use crate::paginate::Paginator;
use crate::record::Record;

/// Walk a paginator to the end, collecting summary items.
///
/// A page fetch that fails after retries abandons the entity type: the
/// partial listing is discarded and an empty list returned, leaving the
/// other entity types unaffected.
pub(crate) async fn collect_summaries(
    client: &dyn Fetch,
    entity: &str,
    pager: &mut dyn Paginator,
) -> Vec<Value> {
    let mut items = Vec::new();
    loop {
        match pager.next_page(client).await {
            Ok(Some(page)) => items.extend(page),
            Ok(None) => return items,
            Err(err) => {
                warn!(entity, error = %err, "listing failed, abandoning entity type");
                return Vec::new();
            }
        }
    }
}

/// Fetch each summary item's detail resource and shape it into a record.
///
/// `shape` receives the detail body plus the originating summary item and
/// returns `None` when the response does not have the expected structure.
/// A failed detail fetch skips that single item.
pub(crate) async fn expand_details<F>(
    client: &dyn Fetch,
    entity: &str,
    summaries: Vec<Value>,
    mut shape: F,
) -> Vec<Record>
where
    F: FnMut(Value, &Value) -> Option<Record>,
{
    let mut records = Vec::with_capacity(summaries.len());
    for summary in &summaries {
        let Some(url) = summary.get("url").and_then(Value::as_str) else {
            warn!(entity, "summary item has no detail url, skipping");
            continue;
        };
        match client.get_json(url).await {
            Ok(body) => match shape(body, summary) {
                Some(record) => records.push(record),
                None => warn!(entity, url, "detail response has unexpected shape, skipping"),
            },
            Err(err) => {
                warn!(entity, url, error = %err, "detail fetch failed, skipping item");
            }
        }
    }
    records
}

/// View a JSON object as a record; `None` for any other value kind.
pub(crate) fn as_record(value: &Value) -> Option<Record> {
    value
        .as_object()
        .map(|map| map.iter().map(|(k, v)| (k.clone(), v.clone())).collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::paginate::SinglePage;
    use crate::testing::StubFetch;
    use serde_json::json;

    #[tokio::test]
    async fn failed_detail_fetch_skips_only_that_item() {
        let client = StubFetch::new()
            .responding("https://api.test/items/1", json!({"id": 1, "name": "a"}))
            .failing("https://api.test/items/2")
            .responding("https://api.test/items/3", json!({"id": 3, "name": "c"}));

        let summaries = vec![
            json!({"url": "https://api.test/items/1"}),
            json!({"url": "https://api.test/items/2"}),
            json!({"url": "https://api.test/items/3"}),
        ];

        let records = expand_details(&client, "items", summaries, |body, _| as_record(&body)).await;
        let names: Vec<&Value> = records.iter().map(|r| &r["name"]).collect();
        assert_eq!(names, vec![&json!("a"), &json!("c")]);
    }

    #[tokio::test]
    async fn summaries_without_detail_url_are_skipped() {
        let client =
            StubFetch::new().responding("https://api.test/items/1", json!({"id": 1}));
        let summaries = vec![json!({"name": "no url"}), json!({"url": "https://api.test/items/1"})];
        let records = expand_details(&client, "items", summaries, |body, _| as_record(&body)).await;
        assert_eq!(records.len(), 1);
    }

    #[tokio::test]
    async fn listing_failure_discards_partial_results() {
        let client = StubFetch::new().failing("https://api.test/cards");
        let mut pager = SinglePage::new("https://api.test/cards", "data");
        let items = collect_summaries(&client, "cards", &mut pager).await;
        assert!(items.is_empty());
    }
}
