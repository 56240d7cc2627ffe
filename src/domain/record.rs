use serde::{Deserialize, Serialize};

pub const UNKNOWN_YEAR_LABEL: &str = "Year Unknown";

/// One documented case entry. Immutable once the store has loaded it.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Record {
    pub id: u32,
    pub name: String,
    #[serde(default)]
    pub position: Vec<String>,
    #[serde(default)]
    pub crime: Vec<String>,
    pub description: String,
    #[serde(default)]
    pub sources: Vec<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub year: Option<i32>,
}

impl Record {
    pub fn year_label(&self) -> String {
        match self.year {
            Some(year) => year.to_string(),
            None => UNKNOWN_YEAR_LABEL.to_string(),
        }
    }
}
