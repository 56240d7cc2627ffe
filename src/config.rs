use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;
use thiserror::Error;
use tracing::debug;

use crate::debounce::DEFAULT_SEARCH_DEBOUNCE;
use crate::view::SUMMARY_CHARS;

pub const DEFAULT_CONFIG_FILE: &str = "casebook.toml";
const DEFAULT_TITLE: &str = "Casebook";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file '{path}': {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config file '{path}': {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
    #[error("invalid config: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewerConfig {
    pub data: Option<PathBuf>,
    pub title: String,
    pub summary_chars: usize,
    pub search_debounce: Duration,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            data: None,
            title: DEFAULT_TITLE.to_string(),
            summary_chars: SUMMARY_CHARS,
            search_debounce: DEFAULT_SEARCH_DEBOUNCE,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawConfig {
    data: Option<PathBuf>,
    title: Option<String>,
    summary_chars: Option<usize>,
    search_debounce_ms: Option<u64>,
}

impl ViewerConfig {
    /// Reads `path` when given. Without an explicit path the default file is
    /// used only if it exists.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let (path, required) = match path {
            Some(path) => (path.to_path_buf(), true),
            None => (PathBuf::from(DEFAULT_CONFIG_FILE), false),
        };
        if !required && !path.exists() {
            return Ok(Self::default());
        }
        let raw = std::fs::read_to_string(&path).map_err(|source| ConfigError::Read {
            path: path.clone(),
            source,
        })?;
        let config = Self::from_toml(&raw, path.parent()).map_err(|err| match err {
            ConfigError::Parse { source, .. } => ConfigError::Parse {
                path: path.clone(),
                source,
            },
            other => other,
        })?;
        debug!(path = %path.display(), "loaded config file");
        Ok(config)
    }

    /// Relative `data` paths resolve against `base_dir` (the config file's directory).
    pub(crate) fn from_toml(raw: &str, base_dir: Option<&Path>) -> Result<Self, ConfigError> {
        let file: RawConfig = toml::from_str(raw).map_err(|source| ConfigError::Parse {
            path: PathBuf::new(),
            source,
        })?;
        let defaults = Self::default();

        let summary_chars = file.summary_chars.unwrap_or(defaults.summary_chars);
        if summary_chars == 0 {
            return Err(ConfigError::Invalid(
                "summary_chars must be greater than zero".to_string(),
            ));
        }
        let title = match file.title {
            Some(title) if title.trim().is_empty() => {
                return Err(ConfigError::Invalid("title must not be empty".to_string()));
            }
            Some(title) => title,
            None => defaults.title,
        };
        let data = file.data.map(|data| match base_dir {
            Some(base) if data.is_relative() => base.join(data),
            _ => data,
        });

        Ok(Self {
            data,
            title,
            summary_chars,
            search_debounce: file
                .search_debounce_ms
                .map(Duration::from_millis)
                .unwrap_or(defaults.search_debounce),
        })
    }

    /// Command-line and environment values win over the file.
    pub fn with_data_override(mut self, data: Option<PathBuf>) -> Self {
        if data.is_some() {
            self.data = data;
        }
        self
    }
}
