use std::path::{Path, PathBuf};

use rusqlite::Connection;
use thiserror::Error;
use tracing::{debug, warn};

use crate::db;

pub const DARK_MODE_KEY: &str = "darkMode";
const ENABLED_VALUE: &str = "true";

#[derive(Debug, Error)]
pub enum PrefsError {
    #[error("I/O error preparing preference store: {0}")]
    Io(#[from] std::io::Error),
    #[error("preference database error: {0}")]
    Db(#[from] rusqlite::Error),
}

/// Durable home of the one UI preference: the light/dark display mode.
///
/// `load` and `save` never fail from the caller's point of view; storage
/// problems are logged and the light default is used.
#[derive(Debug, Clone)]
pub struct PreferenceStore {
    path: PathBuf,
}

impl PreferenceStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn load(&self) -> bool {
        match self.try_load() {
            Ok(dark_mode) => dark_mode,
            Err(err) => {
                warn!(path = %self.path.display(), error = %err, "could not read display preference");
                false
            }
        }
    }

    pub fn save(&self, dark_mode: bool) {
        if let Err(err) = self.try_save(dark_mode) {
            warn!(path = %self.path.display(), error = %err, "could not persist display preference");
        }
    }

    pub fn try_load(&self) -> Result<bool, PrefsError> {
        if !self.path.exists() {
            return Ok(false);
        }
        let conn = self.connect()?;
        let stored = db::get_preference(&conn, DARK_MODE_KEY)?;
        Ok(stored.as_deref() == Some(ENABLED_VALUE))
    }

    pub fn try_save(&self, dark_mode: bool) -> Result<(), PrefsError> {
        let conn = self.connect()?;
        db::set_preference(&conn, DARK_MODE_KEY, if dark_mode { "true" } else { "false" })?;
        debug!(dark_mode, "saved display preference");
        Ok(())
    }

    fn connect(&self) -> Result<Connection, PrefsError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        Ok(db::open_connection(&self.path.display().to_string())?)
    }
}
