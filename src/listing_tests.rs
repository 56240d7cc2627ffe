use super::{apply_filters, matches, FilterState};
use crate::domain::record::Record;
use crate::store::RecordStore;

fn record(id: u32, name: &str, tags: &[&str], description: &str, year: Option<i32>) -> Record {
    Record {
        id,
        name: name.to_string(),
        position: vec!["Mayor".to_string()],
        crime: vec!["Fraud".to_string()],
        description: description.to_string(),
        sources: Vec::new(),
        tags: tags.iter().map(|value| (*value).to_string()).collect(),
        year,
    }
}

fn ids(records: &[&Record]) -> Vec<u32> {
    records.iter().map(|record| record.id).collect()
}

fn bundled() -> RecordStore {
    RecordStore::bundled().expect("bundled records should load")
}

#[test]
fn default_filter_is_identity() {
    let store = bundled();
    let filtered = apply_filters(store.records(), &FilterState::default());
    assert_eq!(filtered.len(), store.len());
    assert!(FilterState::default().is_empty());
}

#[test]
fn year_filter_matches_exact_year_only() {
    let store = bundled();
    let filter = FilterState {
        year: Some("2018".to_string()),
        ..FilterState::default()
    };
    assert_eq!(ids(&apply_filters(store.records(), &filter)), vec![1, 14]);
}

#[test]
fn unparseable_year_matches_nothing() {
    let store = bundled();
    let filter = FilterState {
        year: Some("twenty-eighteen".to_string()),
        ..FilterState::default()
    };
    assert!(apply_filters(store.records(), &filter).is_empty());
    assert!(!filter.is_empty());
}

#[test]
fn absent_year_never_matches_a_set_year() {
    let unknown = record(1, "Unknown", &[], "", None);
    let filter = FilterState {
        year: Some("0".to_string()),
        ..FilterState::default()
    };
    assert!(!matches(&unknown, &filter));
}

#[test]
fn query_matches_tags_case_insensitively() {
    let store = bundled();
    let filter = FilterState {
        query: Some("clergy".to_string()),
        ..FilterState::default()
    };
    assert_eq!(ids(&apply_filters(store.records(), &filter)), vec![2, 8, 15]);

    let upper = FilterState {
        query: Some("CLERGY".to_string()),
        ..FilterState::default()
    };
    assert_eq!(
        apply_filters(store.records(), &filter),
        apply_filters(store.records(), &upper)
    );
}

#[test]
fn query_matches_name_description_or_any_tag() {
    let by_name = record(1, "Harbor Commissioner", &[], "", None);
    let by_description = record(2, "Someone", &[], "Filed at the HARBOR office", None);
    let by_tag = record(3, "Other", &["Harbor Board"], "", None);
    let none = record(4, "Nobody", &["Unrelated"], "nothing here", None);
    let records = vec![by_name, by_description, by_tag, none];

    let filter = FilterState {
        query: Some("harbor".to_string()),
        ..FilterState::default()
    };
    assert_eq!(ids(&apply_filters(&records, &filter)), vec![1, 2, 3]);
}

#[test]
fn query_text_all_is_a_real_search_term() {
    let store = bundled();
    let filter = FilterState {
        query: Some("all".to_string()),
        ..FilterState::default()
    };
    let filtered = apply_filters(store.records(), &filter);
    assert!(!filtered.is_empty());
    assert!(filtered.len() < store.len());
}

#[test]
fn choice_filters_require_exact_membership() {
    let store = bundled();
    let filter = FilterState {
        position: Some("Pastor".to_string()),
        ..FilterState::default()
    };
    // "Megachurch Pastor" must not match a "Pastor" selection.
    assert_eq!(ids(&apply_filters(store.records(), &filter)), vec![2]);

    let lowercase = FilterState {
        position: Some("pastor".to_string()),
        ..FilterState::default()
    };
    assert!(apply_filters(store.records(), &lowercase).is_empty());
}

#[test]
fn padded_query_is_trimmed_before_matching() {
    let store = bundled();
    let padded = FilterState {
        query: Some("  clergy\t".to_string()),
        ..FilterState::default()
    };
    assert_eq!(ids(&apply_filters(store.records(), &padded)), vec![2, 8, 15]);

    let blank = FilterState {
        query: Some(" \t ".to_string()),
        ..FilterState::default()
    };
    assert_eq!(apply_filters(store.records(), &blank).len(), store.len());
}

#[test]
fn all_sentinel_and_blank_values_are_unset() {
    let store = bundled();
    let filter = FilterState {
        query: Some("   ".to_string()),
        position: Some("All".to_string()),
        crime: Some(String::new()),
        tag: Some("all".to_string()),
        year: Some(" ALL ".to_string()),
    };
    assert!(filter.is_empty());
    assert_eq!(apply_filters(store.records(), &filter).len(), store.len());
    assert!(filter.summary().is_none());
}

#[test]
fn combined_filters_are_conjunctive() {
    let store = bundled();
    let filter = FilterState {
        crime: Some("Sexual Harassment".to_string()),
        tag: Some("Terminated".to_string()),
        ..FilterState::default()
    };
    assert_eq!(ids(&apply_filters(store.records(), &filter)), vec![5, 14]);

    let narrowed = FilterState {
        year: Some("2018".to_string()),
        ..filter
    };
    assert_eq!(ids(&apply_filters(store.records(), &narrowed)), vec![14]);
}

#[test]
fn included_records_pass_and_excluded_records_fail() {
    let store = bundled();
    let filter = FilterState {
        query: Some("multiple".to_string()),
        crime: Some("Sexual Harassment".to_string()),
        ..FilterState::default()
    };
    let included = apply_filters(store.records(), &filter);
    for record in store.records() {
        let is_included = included.iter().any(|kept| kept.id == record.id);
        assert_eq!(is_included, matches(record, &filter), "record {}", record.id);
    }
}

#[test]
fn summary_lists_only_active_filters() {
    let filter = FilterState {
        query: Some(" clergy ".to_string()),
        position: None,
        crime: Some("Child Abuse".to_string()),
        tag: Some("all".to_string()),
        year: Some("2015".to_string()),
    };
    assert_eq!(
        filter.summary().as_deref(),
        Some("query=clergy crime=Child Abuse year=2015")
    );
}
