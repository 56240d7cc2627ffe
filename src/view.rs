//! Pure projections from records to what the renderers draw.
//!
//! Nothing here knows about terminals or markup; the HTML and terminal
//! renderers both consume these view models.

use serde::Serialize;

use crate::domain::record::Record;
use crate::listing::FilterState;

pub const SUMMARY_CHARS: usize = 200;
const ELLIPSIS: &str = "...";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SourceLink {
    pub label: String,
    pub url: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CardView {
    pub id: u32,
    pub name: String,
    pub year: String,
    pub positions: Vec<String>,
    pub crimes: Vec<String>,
    pub tags: Vec<String>,
    pub summary: String,
    pub truncated: bool,
    pub sources: Vec<SourceLink>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DetailView {
    pub id: u32,
    pub name: String,
    pub year: String,
    pub positions: Vec<String>,
    pub crimes: Vec<String>,
    pub tags: Vec<String>,
    pub description: String,
    pub sources: Vec<SourceLink>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ListingView {
    pub count_label: String,
    pub filters: Option<String>,
    pub cards: Vec<CardView>,
}

impl ListingView {
    pub fn build(display: &[&Record], filter: &FilterState, summary_chars: usize) -> Self {
        Self {
            count_label: count_label(display.len()),
            filters: filter.summary(),
            cards: display
                .iter()
                .map(|record| CardView::from_record(record, summary_chars))
                .collect(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }
}

impl CardView {
    pub fn from_record(record: &Record, summary_chars: usize) -> Self {
        let (summary, truncated) = truncate_description(&record.description, summary_chars);
        Self {
            id: record.id,
            name: record.name.clone(),
            year: record.year_label(),
            positions: record.position.clone(),
            crimes: record.crime.clone(),
            tags: record.tags.clone(),
            summary,
            truncated,
            sources: source_links(&record.sources),
        }
    }
}

impl DetailView {
    pub fn from_record(record: &Record) -> Self {
        Self {
            id: record.id,
            name: record.name.clone(),
            year: record.year_label(),
            positions: record.position.clone(),
            crimes: record.crime.clone(),
            tags: record.tags.clone(),
            description: record.description.clone(),
            sources: source_links(&record.sources),
        }
    }
}

pub fn count_label(count: usize) -> String {
    let noun = if count == 1 { "entry" } else { "entries" };
    format!("Showing {count} {noun}")
}

/// Cuts at `budget` characters (not bytes) and marks the cut with an ellipsis.
pub fn truncate_description(text: &str, budget: usize) -> (String, bool) {
    match text.char_indices().nth(budget) {
        Some((cut, _)) => (format!("{}{ELLIPSIS}", &text[..cut]), true),
        None => (text.to_string(), false),
    }
}

fn source_links(sources: &[String]) -> Vec<SourceLink> {
    sources
        .iter()
        .enumerate()
        .map(|(index, url)| SourceLink {
            label: format!("Source {}", index + 1),
            url: url.clone(),
        })
        .collect()
}
