use std::collections::BTreeSet;

use serde::Serialize;
use tracing::debug;

use crate::domain::record::Record;
use crate::domain::sort::{sort_records, SortOrder};
use crate::listing::{apply_filters, FilterState, ALL_SENTINEL};
use crate::store::RecordStore;

/// Filters then sorts the whole store. Recomputed from scratch on every call.
pub fn compute<'a>(
    store: &'a RecordStore,
    filter: &FilterState,
    order: SortOrder,
) -> Vec<&'a Record> {
    let mut shown = apply_filters(store.records(), filter);
    sort_records(&mut shown, order);
    debug!(
        total = store.len(),
        shown = shown.len(),
        sort = %order,
        "computed display list"
    );
    shown
}

/// Distinct observed values offered by the four choice selectors.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Facets {
    pub all: &'static str,
    pub positions: Vec<String>,
    pub crimes: Vec<String>,
    pub tags: Vec<String>,
    pub years: Vec<i32>,
}

pub fn facets(store: &RecordStore) -> Facets {
    let records = store.records();
    Facets {
        all: ALL_SENTINEL,
        positions: distinct(records.iter().flat_map(|record| record.position.iter())),
        crimes: distinct(records.iter().flat_map(|record| record.crime.iter())),
        tags: distinct(records.iter().flat_map(|record| record.tags.iter())),
        years: records
            .iter()
            .filter_map(|record| record.year)
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect(),
    }
}

fn distinct<'a>(values: impl Iterator<Item = &'a String>) -> Vec<String> {
    values
        .map(String::as_str)
        .collect::<BTreeSet<_>>()
        .into_iter()
        .map(str::to_string)
        .collect()
}
