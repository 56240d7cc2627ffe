use std::path::PathBuf;

use thiserror::Error;
use tracing::{error, info};

use crate::config::{ConfigError, ViewerConfig};
use crate::domain::record::Record;
use crate::domain::sort::SortOrder;
use crate::html::{self, PageModel, PageOptions};
use crate::listing::FilterState;
use crate::pipeline::{self, Facets};
use crate::prefs::{PreferenceStore, PrefsError};
use crate::session::Session;
use crate::store::{RecordStore, StoreError};
use crate::view::{DetailView, ListingView};

pub const STORE_UNAVAILABLE_MESSAGE: &str = "Error: Database not found.";

#[derive(Debug, Error)]
pub enum AppError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("record store unavailable: {0}")]
    Store(#[from] StoreError),
    #[error("config error: {0}")]
    Config(#[from] ConfigError),
    #[error("preference error: {0}")]
    Prefs(#[from] PrefsError),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("{0}")]
    InvalidArgument(String),
    #[error("entry '{0}' not found")]
    NotFound(u32),
}

pub struct App {
    store: RecordStore,
    prefs: PreferenceStore,
    config: ViewerConfig,
}

impl App {
    pub fn open(config: ViewerConfig, prefs_path: PathBuf) -> Result<Self, AppError> {
        let store = load_store(&config)?;
        Ok(Self::with_store(store, config, prefs_path))
    }

    pub fn with_store(store: RecordStore, config: ViewerConfig, prefs_path: PathBuf) -> Self {
        Self {
            store,
            prefs: PreferenceStore::new(prefs_path),
            config,
        }
    }

    pub fn store(&self) -> &RecordStore {
        &self.store
    }

    pub fn config(&self) -> &ViewerConfig {
        &self.config
    }

    pub fn prefs(&self) -> &PreferenceStore {
        &self.prefs
    }

    pub fn list(&self, filter: &FilterState, order: SortOrder) -> Vec<&Record> {
        pipeline::compute(&self.store, filter, order)
    }

    pub fn listing(&self, filter: &FilterState, order: SortOrder) -> ListingView {
        ListingView::build(&self.list(filter, order), filter, self.config.summary_chars)
    }

    pub fn show(&self, id: u32) -> Option<DetailView> {
        self.store.get(id).map(DetailView::from_record)
    }

    pub fn facets(&self) -> Facets {
        pipeline::facets(&self.store)
    }

    pub fn session(&self) -> Session<'_> {
        Session::new(&self.store, self.prefs.load())
    }

    pub fn dark_mode(&self) -> bool {
        self.prefs.load()
    }

    pub fn set_dark_mode(&self, dark_mode: bool) -> Result<bool, AppError> {
        self.prefs.try_save(dark_mode)?;
        Ok(dark_mode)
    }

    pub fn toggle_dark_mode(&self) -> Result<bool, AppError> {
        self.set_dark_mode(!self.prefs.load())
    }

    /// An `open` id that does not resolve renders every dialog closed.
    pub fn render_page(&self, filter: &FilterState, order: SortOrder, open: Option<u32>) -> String {
        let model = PageModel {
            listing: self.listing(filter, order),
            reset: self.listing(&FilterState::default(), SortOrder::default()),
            details: self
                .store
                .records()
                .iter()
                .map(DetailView::from_record)
                .collect(),
        };
        let options = PageOptions {
            title: self.config.title.clone(),
            dark_mode: self.prefs.load(),
            open_detail: open.filter(|id| self.store.get(*id).is_some()),
        };
        let page = html::render_page(&model, &options);
        info!(
            shown = model.listing.cards.len(),
            total = self.store.len(),
            "rendered page"
        );
        page
    }
}

pub fn load_store(config: &ViewerConfig) -> Result<RecordStore, StoreError> {
    let loaded = match config.data.as_deref() {
        Some(path) => RecordStore::load(path),
        None => RecordStore::bundled(),
    };
    if let Err(err) = &loaded {
        error!(error = %err, "record store could not be loaded");
    }
    loaded
}
