use std::collections::HashMap;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;
use tracing::{debug, info};

use crate::domain::record::Record;

const BUNDLED_RECORDS: &str = include_str!("sample_records.json");

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("failed to read record source '{path}': {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid record data in '{origin}': {source}")]
    Json {
        origin: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("duplicate record id {0}")]
    DuplicateId(u32),
    #[error("record {0} has an empty name")]
    EmptyName(u32),
    #[error("chunk manifest '{0}' lists no data files")]
    EmptyManifest(PathBuf),
}

/// Chunked layout: an `index.json` naming the data files, each a JSON array.
#[derive(Debug, Deserialize)]
struct ChunkManifest {
    #[serde(default)]
    total_entries: Option<usize>,
    files: Vec<String>,
}

#[derive(Debug, Clone)]
pub struct RecordStore {
    records: Vec<Record>,
    by_id: HashMap<u32, usize>,
}

impl RecordStore {
    pub fn bundled() -> Result<Self, StoreError> {
        let records = parse_records(BUNDLED_RECORDS, "bundled sample")?;
        Self::from_records(records)
    }

    pub fn load(path: &Path) -> Result<Self, StoreError> {
        let raw = read_source(path)?;
        let origin = path.display().to_string();
        // An object is a chunk manifest; anything else must be a record array.
        let records = if raw.trim_start().starts_with('{') {
            let manifest: ChunkManifest =
                serde_json::from_str(&raw).map_err(|source| StoreError::Json {
                    origin: origin.clone(),
                    source,
                })?;
            load_chunks(path, manifest)?
        } else {
            parse_records(&raw, &origin)?
        };
        let store = Self::from_records(records)?;
        info!(path = %origin, records = store.len(), "loaded record store");
        Ok(store)
    }

    pub fn from_records(records: Vec<Record>) -> Result<Self, StoreError> {
        let mut by_id = HashMap::with_capacity(records.len());
        for (index, record) in records.iter().enumerate() {
            if record.name.trim().is_empty() {
                return Err(StoreError::EmptyName(record.id));
            }
            if by_id.insert(record.id, index).is_some() {
                return Err(StoreError::DuplicateId(record.id));
            }
        }
        Ok(Self { records, by_id })
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn get(&self, id: u32) -> Option<&Record> {
        self.by_id.get(&id).map(|index| &self.records[*index])
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

fn load_chunks(manifest_path: &Path, manifest: ChunkManifest) -> Result<Vec<Record>, StoreError> {
    if manifest.files.is_empty() {
        return Err(StoreError::EmptyManifest(manifest_path.to_path_buf()));
    }
    let base = chunk_base_dir(manifest_path, &manifest.files[0]);
    let mut records = Vec::with_capacity(manifest.total_entries.unwrap_or_default());
    for file in &manifest.files {
        let chunk_path = base.join(file);
        let raw = read_source(&chunk_path)?;
        let chunk = parse_records(&raw, &chunk_path.display().to_string())?;
        debug!(path = %chunk_path.display(), records = chunk.len(), "loaded record chunk");
        records.extend(chunk);
    }
    Ok(records)
}

// Manifests written next to their chunks list paths like `data/data-1.json`,
// relative to the directory that contains `data/`.
fn chunk_base_dir(manifest_path: &Path, first_file: &str) -> PathBuf {
    let manifest_dir = manifest_path.parent().unwrap_or_else(|| Path::new("."));
    if manifest_dir.join(first_file).exists() {
        return manifest_dir.to_path_buf();
    }
    match manifest_dir.parent() {
        Some(parent) if parent.join(first_file).exists() => parent.to_path_buf(),
        _ => manifest_dir.to_path_buf(),
    }
}

fn read_source(path: &Path) -> Result<String, StoreError> {
    std::fs::read_to_string(path).map_err(|source| StoreError::Read {
        path: path.to_path_buf(),
        source,
    })
}

fn parse_records(raw: &str, origin: &str) -> Result<Vec<Record>, StoreError> {
    serde_json::from_str(raw).map_err(|source| StoreError::Json {
        origin: origin.to_string(),
        source,
    })
}

#[cfg(test)]
#[path = "store_tests.rs"]
mod tests;
