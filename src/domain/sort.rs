use std::cmp::Ordering;
use std::error::Error;
use std::fmt;
use std::str::FromStr;

use serde::Serialize;

use super::record::Record;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum SortOrder {
    #[default]
    NameAsc,
    NameDesc,
    YearDesc,
    YearAsc,
}

impl SortOrder {
    pub const ALL: [SortOrder; 4] = [
        SortOrder::NameAsc,
        SortOrder::NameDesc,
        SortOrder::YearDesc,
        SortOrder::YearAsc,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            SortOrder::NameAsc => "name-asc",
            SortOrder::NameDesc => "name-desc",
            SortOrder::YearDesc => "year-desc",
            SortOrder::YearAsc => "year-asc",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            SortOrder::NameAsc => "Name (A-Z)",
            SortOrder::NameDesc => "Name (Z-A)",
            SortOrder::YearDesc => "Year (newest first)",
            SortOrder::YearAsc => "Year (oldest first)",
        }
    }

    pub fn compare(self, left: &Record, right: &Record) -> Ordering {
        match self {
            SortOrder::NameAsc => compare_names(&left.name, &right.name),
            SortOrder::NameDesc => compare_names(&right.name, &left.name),
            SortOrder::YearDesc => compare_years(left.year, right.year, true),
            SortOrder::YearAsc => compare_years(left.year, right.year, false),
        }
    }
}

/// Stable: records that compare equal keep their incoming relative order.
pub fn sort_records(records: &mut [&Record], order: SortOrder) {
    records.sort_by(|left, right| order.compare(left, right));
}

// Case-folded comparison first so differently-cased names sit together, raw
// comparison second so the ordering stays total.
fn compare_names(left: &str, right: &str) -> Ordering {
    let folded_left = left.chars().flat_map(char::to_lowercase);
    let folded_right = right.chars().flat_map(char::to_lowercase);
    folded_left.cmp(folded_right).then_with(|| left.cmp(right))
}

fn compare_years(left: Option<i32>, right: Option<i32>, descending: bool) -> Ordering {
    match (left, right) {
        (Some(left), Some(right)) if descending => right.cmp(&left),
        (Some(left), Some(right)) => left.cmp(&right),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

impl fmt::Display for SortOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SortOrder {
    type Err = ParseSortOrderError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let normalized = value.trim().to_ascii_lowercase().replace('_', "-");
        let order = match normalized.as_str() {
            "name-asc" | "name" => SortOrder::NameAsc,
            "name-desc" => SortOrder::NameDesc,
            "year-desc" | "newest" => SortOrder::YearDesc,
            "year-asc" | "oldest" => SortOrder::YearAsc,
            _ => {
                return Err(ParseSortOrderError {
                    value: value.to_string(),
                });
            }
        };

        Ok(order)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseSortOrderError {
    value: String,
}

impl fmt::Display for ParseSortOrderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "invalid sort order '{}': expected one of {}",
            self.value,
            SortOrder::ALL
                .iter()
                .map(|order| order.as_str())
                .collect::<Vec<_>>()
                .join(", ")
        )
    }
}

impl Error for ParseSortOrderError {}
