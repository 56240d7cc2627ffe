//! Line-driven interactive browsing.
//!
//! A reader thread forwards input lines over a channel; the loop below owns
//! the [`Session`] and is the only place state changes. Search input is
//! debounced, every other command first flushes a pending search so events
//! apply in the order they were typed.

use std::io::{BufRead, Write};
use std::thread;
use std::time::{Duration, Instant};

use crossbeam_channel::{Receiver, RecvTimeoutError};
use tracing::{debug, warn};

use crate::app::{App, AppError};
use crate::debounce::Debouncer;
use crate::domain::sort::SortOrder;
use crate::pipeline::Facets;
use crate::session::{CardTrigger, KeyPress, Session, UiEvent};
use crate::ui::{self, Palette};

pub const RESET_HINT: &str = "type `reset` to clear filters";

const HELP: &[&str] = &[
    "commands:",
    "  search <text> | /<text>     search names, descriptions and tags",
    "  position|crime|tag|year <value|all>",
    "  sort <name-asc|name-desc|year-desc|year-asc>",
    "  reset                       clear filters and sort",
    "  open <id>                   show entry details",
    "  key <enter|space|other> <id>",
    "  link <id>                   follow a source link without opening details",
    "  close | esc | outside       close the detail view",
    "  theme                       toggle dark mode",
    "  facets                      list filter options",
    "  help | quit",
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Search(String),
    Event(UiEvent),
    Facets,
    Help,
    Quit,
    Nothing,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BrowseStats {
    pub renders: usize,
    pub events: usize,
}

pub struct BrowseOptions {
    pub debounce: Duration,
    pub palette: Palette,
}

pub fn parse_command(line: &str) -> Result<Command, String> {
    let line = line.trim();
    if line.is_empty() {
        return Ok(Command::Nothing);
    }
    if let Some(text) = line.strip_prefix('/') {
        return Ok(Command::Search(text.to_string()));
    }
    let (verb, rest) = match line.split_once(char::is_whitespace) {
        Some((verb, rest)) => (verb, rest.trim()),
        None => (line, ""),
    };

    let command = match verb.to_ascii_lowercase().as_str() {
        "search" | "s" => Command::Search(rest.to_string()),
        "position" => Command::Event(UiEvent::SetPosition(selection(rest))),
        "crime" => Command::Event(UiEvent::SetCrime(selection(rest))),
        "tag" => Command::Event(UiEvent::SetTag(selection(rest))),
        "year" => Command::Event(UiEvent::SetYear(selection(rest))),
        "sort" => {
            let order = rest.parse::<SortOrder>().map_err(|err| err.to_string())?;
            Command::Event(UiEvent::SetSort(order))
        }
        "reset" => Command::Event(UiEvent::Reset),
        "open" => Command::Event(UiEvent::ActivateCard {
            id: parse_id(rest)?,
            trigger: CardTrigger::Click,
        }),
        "link" => Command::Event(UiEvent::ActivateCard {
            id: parse_id(rest)?,
            trigger: CardTrigger::LinkClick,
        }),
        "key" => {
            let (key, id) = rest
                .split_once(char::is_whitespace)
                .ok_or_else(|| "usage: key <enter|space|other> <id>".to_string())?;
            let key = match key.to_ascii_lowercase().as_str() {
                "enter" => KeyPress::Enter,
                "space" => KeyPress::Space,
                _ => KeyPress::Other(key.to_string()),
            };
            Command::Event(UiEvent::ActivateCard {
                id: parse_id(id.trim())?,
                trigger: CardTrigger::Key(key),
            })
        }
        "close" => Command::Event(UiEvent::Close),
        "esc" | "escape" => Command::Event(UiEvent::Escape),
        "outside" => Command::Event(UiEvent::ClickOutside),
        "theme" | "dark" => Command::Event(UiEvent::ToggleDarkMode),
        "facets" => Command::Facets,
        "help" | "?" => Command::Help,
        "quit" | "exit" | "q" => Command::Quit,
        other => return Err(format!("unknown command '{other}' (try `help`)")),
    };
    Ok(command)
}

fn selection(raw: &str) -> Option<String> {
    if raw.is_empty() {
        None
    } else {
        Some(raw.to_string())
    }
}

fn parse_id(raw: &str) -> Result<u32, String> {
    raw.parse::<u32>()
        .map_err(|_| format!("invalid entry id '{raw}'"))
}

pub fn spawn_reader<R>(input: R) -> Receiver<String>
where
    R: BufRead + Send + 'static,
{
    let (tx, rx) = crossbeam_channel::unbounded();
    thread::spawn(move || {
        for line in input.lines() {
            match line {
                Ok(line) => {
                    if tx.send(line).is_err() {
                        break;
                    }
                }
                Err(err) => {
                    warn!(error = %err, "stopped reading browse input");
                    break;
                }
            }
        }
    });
    rx
}

pub fn run<R>(
    app: &App,
    input: R,
    out: &mut dyn Write,
    options: BrowseOptions,
) -> Result<BrowseStats, AppError>
where
    R: BufRead + Send + 'static,
{
    let lines = spawn_reader(input);
    let mut browser = Browser {
        app,
        session: app.session(),
        search: Debouncer::new(options.debounce),
        palette: options.palette,
        stats: BrowseStats::default(),
    };

    browser.render_listing(out)?;
    loop {
        let received = match browser.search.deadline() {
            Some(deadline) => lines.recv_deadline(deadline),
            None => lines.recv().map_err(|_| RecvTimeoutError::Disconnected),
        };
        match received {
            Ok(line) => {
                if !browser.handle_line(&line, out)? {
                    break;
                }
            }
            Err(RecvTimeoutError::Timeout) => {
                if let Some(text) = browser.search.poll(Instant::now()) {
                    browser.dispatch(UiEvent::Search(text), out)?;
                }
            }
            Err(RecvTimeoutError::Disconnected) => {
                browser.flush_search(out)?;
                break;
            }
        }
    }
    debug!(renders = browser.stats.renders, events = browser.stats.events, "browse finished");
    Ok(browser.stats)
}

struct Browser<'a> {
    app: &'a App,
    session: Session<'a>,
    search: Debouncer<String>,
    palette: Palette,
    stats: BrowseStats,
}

impl Browser<'_> {
    /// Returns `false` once the user asked to quit.
    fn handle_line(&mut self, line: &str, out: &mut dyn Write) -> Result<bool, AppError> {
        let command = match parse_command(line) {
            Ok(command) => command,
            Err(message) => {
                writeln!(out, "{}", self.palette.dim(&message))?;
                return Ok(true);
            }
        };
        if let Command::Search(text) = command {
            self.search.push(text, Instant::now());
            return Ok(true);
        }

        self.flush_search(out)?;
        match command {
            Command::Search(_) | Command::Nothing => {}
            Command::Event(event) => self.dispatch(event, out)?,
            Command::Facets => self.write_facets(&self.app.facets(), out)?,
            Command::Help => {
                for line in HELP {
                    writeln!(out, "{line}")?;
                }
            }
            Command::Quit => return Ok(false),
        }
        Ok(true)
    }

    fn flush_search(&mut self, out: &mut dyn Write) -> Result<(), AppError> {
        if let Some(text) = self.search.flush() {
            self.dispatch(UiEvent::Search(text), out)?;
        }
        Ok(())
    }

    fn dispatch(&mut self, event: UiEvent, out: &mut dyn Write) -> Result<(), AppError> {
        self.stats.events += 1;
        let outcome = self.session.apply(event);
        if outcome.theme_changed {
            let dark = self.session.dark_mode();
            self.app.prefs().save(dark);
            self.palette = self.palette.with_dark(dark);
            let theme = if dark { "dark" } else { "light" };
            writeln!(out, "{}", self.palette.dim(&format!("theme: {theme}")))?;
        }
        if outcome.detail_changed {
            match self.session.detail_view() {
                Some(detail) => {
                    for line in ui::format_detail(&detail, &self.palette) {
                        writeln!(out, "{line}")?;
                    }
                }
                None => writeln!(out, "{}", self.palette.dim("detail closed"))?,
            }
        }
        if outcome.recompute {
            self.render_listing(out)?;
        }
        Ok(())
    }

    fn render_listing(&mut self, out: &mut dyn Write) -> Result<(), AppError> {
        self.stats.renders += 1;
        let listing = self.session.listing(self.app.config().summary_chars);
        for line in ui::format_listing(&listing, &self.palette, RESET_HINT) {
            writeln!(out, "{line}")?;
        }
        Ok(())
    }

    fn write_facets(&self, facets: &Facets, out: &mut dyn Write) -> Result<(), AppError> {
        for line in ui::format_facets(facets, &self.palette) {
            writeln!(out, "{line}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "browse_tests.rs"]
mod tests;
