//! SWAPI extractor: page-number pagination, detail records nested under a
//! `result.properties` envelope.
//!
//! The summary layer is authoritative for identity — each summary item
//! carries the `uid` token while the detail payload does not repeat it — so
//! the id is attached from the summary before resolution. The `url` field is
//! the record's own canonical locator and is exempt from resolution. Films
//! arrive in a single bulk response instead of pages.

use tracing::info;

use crate::assemble::assemble;
use crate::fetch::Fetch;
use crate::paginate::{NumberedPager, SinglePage};
use crate::record::{Dataset, ID_FIELD};
use crate::resolve::{resolve_record, BaseUrl};
use crate::sources::{as_record, collect_summaries, expand_details};

pub const BASE_URL: &str = "https://www.swapi.tech/api/";

const PAGED_ENTITIES: [&str; 5] = ["people", "planets", "starships", "vehicles", "species"];

const PAGE_LIMIT: u32 = 10;

/// Self-URL field kept inspectable in the sink.
const SELF_URL_FIELD: &str = "url";

/// Extract every SWAPI entity type, one dataset each.
pub async fn extract(client: &dyn Fetch) -> Vec<Dataset> {
    let base = BaseUrl::new(BASE_URL, false);
    let mut datasets = Vec::with_capacity(PAGED_ENTITIES.len() + 1);

    for entity in PAGED_ENTITIES {
        let mut pager = NumberedPager::new(format!("{BASE_URL}{entity}"), PAGE_LIMIT);
        let summaries = collect_summaries(client, entity, &mut pager).await;

        let records = expand_details(client, entity, summaries, |body, summary| {
            let mut record = as_record(body.get("result")?.get("properties")?)?;
            if let Some(uid) = summary.get("uid") {
                record.insert(ID_FIELD.to_string(), uid.clone());
            }
            Some(resolve_record(&record, base, Some(SELF_URL_FIELD)))
        })
        .await;

        let dataset = assemble(entity, records);
        info!(entity, records = dataset.len(), "extracted swapi dataset");
        datasets.push(dataset);
    }

    datasets.push(extract_films(client).await);
    datasets
}

/// Films come back in one `result` envelope, each entry wrapping its
/// `properties` next to the `uid`.
async fn extract_films(client: &dyn Fetch) -> Dataset {
    let base = BaseUrl::new(BASE_URL, false);
    let mut pager = SinglePage::new(format!("{BASE_URL}films"), "result");
    let entries = collect_summaries(client, "films", &mut pager).await;

    let records = entries
        .iter()
        .filter_map(|entry| {
            let mut record = as_record(entry.get("properties")?)?;
            if let Some(uid) = entry.get("uid") {
                record.insert(ID_FIELD.to_string(), uid.clone());
            }
            Some(resolve_record(&record, base, Some(SELF_URL_FIELD)))
        })
        .collect();

    let dataset = assemble("films", records);
    info!(entity = "films", records = dataset.len(), "extracted swapi dataset");
    dataset
}
