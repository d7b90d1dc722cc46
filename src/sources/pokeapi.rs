//! PokeAPI extractor: cursor-URL pagination with a detail fetch per item.
//!
//! Listing responses carry a full `next` URL; each summary item points at a
//! detail resource that holds the actual record, `id` included. Detail URLs
//! are trailing-slash-terminated, so reference resolution strips the slash
//! before taking the identifier segment.

use tracing::info;

use crate::assemble::assemble;
use crate::fetch::Fetch;
use crate::paginate::CursorPager;
use crate::record::Dataset;
use crate::resolve::{resolve_record, BaseUrl};
use crate::sources::{as_record, collect_summaries, expand_details};

pub const BASE_URL: &str = "https://pokeapi.co/api/v2/";

const ENTITIES: [(&str, &str); 5] = [
    ("pokemon", "pokemon"),
    ("types", "type"),
    ("abilities", "ability"),
    ("moves", "move"),
    ("items", "item"),
];

const PAGE_LIMIT: u32 = 100;

/// Extract every PokeAPI entity type, one dataset each.
pub async fn extract(client: &dyn Fetch) -> Vec<Dataset> {
    let base = BaseUrl::new(BASE_URL, true);
    let mut datasets = Vec::with_capacity(ENTITIES.len());

    for (entity, path) in ENTITIES {
        let mut pager = CursorPager::new(format!("{BASE_URL}{path}?limit={PAGE_LIMIT}"));
        let summaries = collect_summaries(client, entity, &mut pager).await;

        let records = expand_details(client, entity, summaries, |body, _summary| {
            let record = as_record(&body)?;
            Some(resolve_record(&record, base, None))
        })
        .await;

        let dataset = assemble(entity, records);
        info!(entity, records = dataset.len(), "extracted pokeapi dataset");
        datasets.push(dataset);
    }

    datasets
}
