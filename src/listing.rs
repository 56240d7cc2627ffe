use serde::Serialize;

use crate::domain::record::Record;

/// Selector value that means "no constraint" for any of the four choice filters.
pub const ALL_SENTINEL: &str = "all";

/// Active filters. Every value is trimmed before use and blank means unset.
/// The free-text `query` is trimmed as well, so padding typed around a search
/// term does not change what it matches.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FilterState {
    pub query: Option<String>,
    pub position: Option<String>,
    pub crime: Option<String>,
    pub tag: Option<String>,
    pub year: Option<String>,
}

impl FilterState {
    pub fn is_empty(&self) -> bool {
        NormalizedFilter::from(self).has_no_user_filters()
    }

    pub fn summary(&self) -> Option<String> {
        let normalized = NormalizedFilter::from(self);
        let mut parts = Vec::new();
        if let Some(query) = normalized.query_raw.as_deref() {
            parts.push(format!("query={query}"));
        }
        if let Some(position) = normalized.position.as_deref() {
            parts.push(format!("position={position}"));
        }
        if let Some(crime) = normalized.crime.as_deref() {
            parts.push(format!("crime={crime}"));
        }
        if let Some(tag) = normalized.tag.as_deref() {
            parts.push(format!("tag={tag}"));
        }
        if let Some(year) = normalized.year_raw.as_deref() {
            parts.push(format!("year={year}"));
        }

        if parts.is_empty() {
            None
        } else {
            Some(parts.join(" "))
        }
    }
}

pub fn apply_filters<'a>(records: &'a [Record], filter: &FilterState) -> Vec<&'a Record> {
    let normalized = NormalizedFilter::from(filter);
    if normalized.has_no_user_filters() {
        return records.iter().collect();
    }

    records
        .iter()
        .filter(|record| matches_filter(record, &normalized))
        .collect()
}

pub fn matches(record: &Record, filter: &FilterState) -> bool {
    matches_filter(record, &NormalizedFilter::from(filter))
}

#[derive(Debug, Clone, Default)]
struct NormalizedFilter {
    query: Option<String>,
    query_raw: Option<String>,
    position: Option<String>,
    crime: Option<String>,
    tag: Option<String>,
    year: Option<YearFilter>,
    year_raw: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum YearFilter {
    Exact(i32),
    Unparseable,
}

impl NormalizedFilter {
    fn has_no_user_filters(&self) -> bool {
        self.query.is_none()
            && self.position.is_none()
            && self.crime.is_none()
            && self.tag.is_none()
            && self.year.is_none()
    }
}

impl From<&FilterState> for NormalizedFilter {
    fn from(value: &FilterState) -> Self {
        let query_raw = normalize_text(value.query.as_deref());
        let year_raw = normalize_scalar(value.year.as_deref());
        Self {
            query: query_raw.as_deref().map(str::to_lowercase),
            query_raw,
            position: normalize_scalar(value.position.as_deref()),
            crime: normalize_scalar(value.crime.as_deref()),
            tag: normalize_scalar(value.tag.as_deref()),
            year: year_raw.as_deref().map(|raw| match raw.parse::<i32>() {
                Ok(year) => YearFilter::Exact(year),
                Err(_) => YearFilter::Unparseable,
            }),
            year_raw,
        }
    }
}

fn matches_filter(record: &Record, filter: &NormalizedFilter) -> bool {
    if let Some(query) = filter.query.as_deref() {
        if !matches_query(record, query) {
            return false;
        }
    }

    if !contains_value(&record.position, filter.position.as_deref()) {
        return false;
    }

    if !contains_value(&record.crime, filter.crime.as_deref()) {
        return false;
    }

    if !contains_value(&record.tags, filter.tag.as_deref()) {
        return false;
    }

    match filter.year {
        None => true,
        Some(YearFilter::Exact(expected)) => record.year == Some(expected),
        Some(YearFilter::Unparseable) => false,
    }
}

fn contains_value(values: &[String], expected: Option<&str>) -> bool {
    match expected {
        Some(expected) => values.iter().any(|value| value == expected),
        None => true,
    }
}

// `query` is already lower-cased.
fn matches_query(record: &Record, query: &str) -> bool {
    record.name.to_lowercase().contains(query)
        || record.description.to_lowercase().contains(query)
        || record
            .tags
            .iter()
            .any(|tag| tag.to_lowercase().contains(query))
}

fn normalize_text(raw: Option<&str>) -> Option<String> {
    let trimmed = raw?.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

fn normalize_scalar(raw: Option<&str>) -> Option<String> {
    normalize_text(raw).filter(|value| !value.eq_ignore_ascii_case(ALL_SENTINEL))
}

#[cfg(test)]
#[path = "listing_tests.rs"]
mod tests;
