//! The single owned UI state: active filters, sort, detail view and theme.
//!
//! Events mutate the session; the display list itself is always re-derived
//! through [`pipeline::compute`].

use tracing::debug;

use crate::domain::record::Record;
use crate::domain::sort::SortOrder;
use crate::listing::FilterState;
use crate::pipeline;
use crate::store::RecordStore;
use crate::view::{DetailView, ListingView};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeyPress {
    Enter,
    Space,
    Other(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CardTrigger {
    Click,
    /// A click that landed on one of the card's source links.
    LinkClick,
    Key(KeyPress),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UiEvent {
    Search(String),
    SetPosition(Option<String>),
    SetCrime(Option<String>),
    SetTag(Option<String>),
    SetYear(Option<String>),
    SetSort(SortOrder),
    Reset,
    ToggleDarkMode,
    ActivateCard { id: u32, trigger: CardTrigger },
    Escape,
    ClickOutside,
    Close,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DetailState {
    #[default]
    Closed,
    Open(u32),
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Outcome {
    pub recompute: bool,
    pub detail_changed: bool,
    pub theme_changed: bool,
}

impl Outcome {
    fn recompute() -> Self {
        Self {
            recompute: true,
            ..Self::default()
        }
    }

    fn detail(changed: bool) -> Self {
        Self {
            detail_changed: changed,
            ..Self::default()
        }
    }
}

#[derive(Debug, Clone)]
pub struct Session<'a> {
    store: &'a RecordStore,
    filter: FilterState,
    sort: SortOrder,
    detail: DetailState,
    dark_mode: bool,
}

impl<'a> Session<'a> {
    pub fn new(store: &'a RecordStore, dark_mode: bool) -> Self {
        Self {
            store,
            filter: FilterState::default(),
            sort: SortOrder::default(),
            detail: DetailState::Closed,
            dark_mode,
        }
    }

    pub fn filter(&self) -> &FilterState {
        &self.filter
    }

    pub fn sort(&self) -> SortOrder {
        self.sort
    }

    pub fn detail(&self) -> DetailState {
        self.detail
    }

    pub fn dark_mode(&self) -> bool {
        self.dark_mode
    }

    pub fn apply(&mut self, event: UiEvent) -> Outcome {
        debug!(?event, "session event");
        match event {
            UiEvent::Search(text) => {
                self.filter.query = Some(text);
                Outcome::recompute()
            }
            UiEvent::SetPosition(value) => {
                self.filter.position = value;
                Outcome::recompute()
            }
            UiEvent::SetCrime(value) => {
                self.filter.crime = value;
                Outcome::recompute()
            }
            UiEvent::SetTag(value) => {
                self.filter.tag = value;
                Outcome::recompute()
            }
            UiEvent::SetYear(value) => {
                self.filter.year = value;
                Outcome::recompute()
            }
            UiEvent::SetSort(order) => {
                self.sort = order;
                Outcome::recompute()
            }
            UiEvent::Reset => {
                self.reset();
                Outcome::recompute()
            }
            UiEvent::ToggleDarkMode => {
                self.dark_mode = !self.dark_mode;
                Outcome {
                    theme_changed: true,
                    ..Outcome::default()
                }
            }
            UiEvent::ActivateCard { id, trigger } => match trigger {
                CardTrigger::Click | CardTrigger::Key(KeyPress::Enter | KeyPress::Space) => {
                    Outcome::detail(self.open(id))
                }
                CardTrigger::LinkClick | CardTrigger::Key(KeyPress::Other(_)) => Outcome::default(),
            },
            UiEvent::Escape | UiEvent::ClickOutside | UiEvent::Close => {
                Outcome::detail(self.close())
            }
        }
    }

    /// Opens only when `id` resolves; otherwise the view stays as it was.
    pub fn open(&mut self, id: u32) -> bool {
        if self.store.get(id).is_none() {
            debug!(id, "ignoring detail request for unknown id");
            return false;
        }
        let changed = self.detail != DetailState::Open(id);
        self.detail = DetailState::Open(id);
        changed
    }

    pub fn close(&mut self) -> bool {
        let changed = self.detail != DetailState::Closed;
        self.detail = DetailState::Closed;
        changed
    }

    pub fn reset(&mut self) {
        self.filter = FilterState::default();
        self.sort = SortOrder::default();
    }

    pub fn display(&self) -> Vec<&'a Record> {
        pipeline::compute(self.store, &self.filter, self.sort)
    }

    pub fn listing(&self, summary_chars: usize) -> ListingView {
        ListingView::build(&self.display(), &self.filter, summary_chars)
    }

    pub fn detail_view(&self) -> Option<DetailView> {
        match self.detail {
            DetailState::Open(id) => self.store.get(id).map(DetailView::from_record),
            DetailState::Closed => None,
        }
    }
}

#[cfg(test)]
#[path = "session_tests.rs"]
mod tests;
