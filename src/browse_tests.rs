use std::io::Cursor;
use std::path::PathBuf;
use std::time::Duration;

use super::{parse_command, run, BrowseOptions, BrowseStats, Command, RESET_HINT};
use crate::app::App;
use crate::config::ViewerConfig;
use crate::domain::sort::SortOrder;
use crate::session::{CardTrigger, KeyPress, UiEvent};
use crate::ui::{Palette, EMPTY_STATE_MESSAGE};

fn unique_dir(prefix: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("{}-{}", prefix, uuid::Uuid::now_v7()));
    std::fs::create_dir_all(&dir).expect("temp dir should be creatable");
    dir
}

fn app(prefix: &str) -> App {
    let dir = unique_dir(prefix);
    App::open(ViewerConfig::default(), dir.join("prefs.sqlite")).expect("app should open")
}

fn browse(app: &App, script: &str) -> (BrowseStats, String) {
    let mut out = Vec::new();
    let options = BrowseOptions {
        debounce: Duration::from_secs(30),
        palette: Palette::plain(),
    };
    let stats = run(app, Cursor::new(script.as_bytes().to_vec()), &mut out, options)
        .expect("browse should finish");
    (stats, String::from_utf8(out).expect("output should be utf8"))
}

fn last_count(output: &str) -> &str {
    output
        .lines()
        .filter(|line| line.starts_with("Showing "))
        .last()
        .expect("a count line should be printed")
}

#[test]
fn parses_commands() {
    assert_eq!(
        parse_command("/clergy"),
        Ok(Command::Search("clergy".to_string()))
    );
    assert_eq!(parse_command("search"), Ok(Command::Search(String::new())));
    assert_eq!(
        parse_command("year all"),
        Ok(Command::Event(UiEvent::SetYear(Some("all".to_string()))))
    );
    assert_eq!(
        parse_command("crime   Child Abuse "),
        Ok(Command::Event(UiEvent::SetCrime(Some(
            "Child Abuse".to_string()
        ))))
    );
    assert_eq!(parse_command("tag"), Ok(Command::Event(UiEvent::SetTag(None))));
    assert_eq!(
        parse_command("sort newest"),
        Ok(Command::Event(UiEvent::SetSort(SortOrder::YearDesc)))
    );
    assert_eq!(
        parse_command("key space 4"),
        Ok(Command::Event(UiEvent::ActivateCard {
            id: 4,
            trigger: CardTrigger::Key(KeyPress::Space),
        }))
    );
    assert_eq!(parse_command("   "), Ok(Command::Nothing));
    assert_eq!(parse_command("QUIT"), Ok(Command::Quit));
}

#[test]
fn rejects_malformed_commands() {
    assert!(parse_command("sort sideways").is_err());
    assert!(parse_command("open abc").is_err());
    assert!(parse_command("key enter").is_err());
    assert!(parse_command("dance").is_err());
}

#[test]
fn renders_initial_listing_on_start() {
    let app = app("casebook-browse-start");
    let (stats, output) = browse(&app, "");
    assert_eq!(stats, BrowseStats { renders: 1, events: 0 });
    assert!(output.starts_with("Casebook\n"));
    assert_eq!(last_count(&output), "Showing 15 entries");
}

#[test]
fn burst_of_search_input_recomputes_once() {
    let app = app("casebook-browse-burst");
    let (stats, output) = browse(&app, "search c\nsearch cl\nsearch cler\n/clergy\n");
    assert_eq!(stats, BrowseStats { renders: 2, events: 1 });
    assert!(output.contains("filters: query=clergy"));
    assert_eq!(last_count(&output), "Showing 3 entries");
}

#[test]
fn pending_search_applies_before_following_command() {
    let app = app("casebook-browse-order");
    let (stats, output) = browse(&app, "search clergy\nreset\n");
    assert_eq!(stats, BrowseStats { renders: 3, events: 2 });
    assert!(output.contains("Showing 3 entries"));
    assert_eq!(last_count(&output), "Showing 15 entries");
}

#[test]
fn empty_result_prints_message_and_reset_hint() {
    let app = app("casebook-browse-empty");
    let (_, output) = browse(&app, "search zzzz-no-match\n");
    assert!(output.contains(EMPTY_STATE_MESSAGE));
    assert!(output.contains(RESET_HINT));
    assert_eq!(last_count(&output), "Showing 0 entries");
}

#[test]
fn opening_details_follows_card_triggers() {
    let app = app("casebook-browse-detail");
    let (stats, output) = browse(&app, "key tab 7\nlink 7\nopen 404\nkey enter 7\nesc\nesc\n");
    assert_eq!(stats.renders, 1);
    assert_eq!(stats.events, 6);
    assert_eq!(output.matches("Sample Entry Seven\n").count(), 1);
    assert!(output.contains("id:  7"));
    assert_eq!(output.matches("detail closed").count(), 1);
}

#[test]
fn theme_toggle_is_persisted() {
    let app = app("casebook-browse-theme");
    let (_, output) = browse(&app, "theme\n");
    assert!(output.contains("theme: dark"));
    assert!(app.dark_mode());

    let (_, output) = browse(&app, "dark\n");
    assert!(output.contains("theme: light"));
    assert!(!app.dark_mode());
}

#[test]
fn quit_stops_before_remaining_input() {
    let app = app("casebook-browse-quit");
    let (stats, _) = browse(&app, "quit\nsearch clergy\n");
    assert_eq!(stats, BrowseStats { renders: 1, events: 0 });
}

#[test]
fn unknown_command_reports_and_continues() {
    let app = app("casebook-browse-unknown");
    let (stats, output) = browse(&app, "dance\nyear 2018\n");
    assert!(output.contains("unknown command 'dance'"));
    assert_eq!(stats.events, 1);
    assert_eq!(last_count(&output), "Showing 2 entries");
}
