//! NetrunnerDB extractor: single-shot bulk endpoints.
//!
//! Every entity type arrives complete under a `data` envelope, already flat
//! and without URL references. The records carry no `id` field; the
//! assembler synthesizes identifiers from the `code` natural key.

use tracing::info;

use crate::assemble::assemble;
use crate::fetch::Fetch;
use crate::paginate::SinglePage;
use crate::record::Dataset;
use crate::sources::{as_record, collect_summaries};

pub const BASE_URL: &str = "https://netrunnerdb.com/api/2.0/public/";

const ENTITIES: [&str; 5] = ["cards", "cycles", "packs", "types", "factions"];

/// Extract every NetrunnerDB entity type, one dataset each.
pub async fn extract(client: &dyn Fetch) -> Vec<Dataset> {
    let mut datasets = Vec::with_capacity(ENTITIES.len());

    for entity in ENTITIES {
        let mut pager = SinglePage::new(format!("{BASE_URL}{entity}"), "data");
        let items = collect_summaries(client, entity, &mut pager).await;

        let records = items.iter().filter_map(as_record).collect();
        let dataset = assemble(entity, records);
        info!(entity, records = dataset.len(), "extracted netrunner dataset");
        datasets.push(dataset);
    }

    datasets
}
