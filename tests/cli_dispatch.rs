use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::{Command, Output, Stdio};

use serde_json::Value;
use uuid::Uuid;

fn unique_workspace(prefix: &str) -> PathBuf {
    let path = std::env::temp_dir().join(format!("{prefix}-{}", Uuid::now_v7()));
    std::fs::create_dir_all(&path).expect("workspace should be creatable");
    path
}

fn casebook(cwd: &Path) -> Command {
    let mut command = Command::new(env!("CARGO_BIN_EXE_casebook"));
    command
        .current_dir(cwd)
        .env_remove("CASEBOOK_DATA")
        .env_remove("CASEBOOK_CONFIG")
        .env_remove("CASEBOOK_LOG")
        .env("NO_COLOR", "1")
        .arg("--prefs-db")
        .arg(cwd.join("prefs.sqlite"));
    command
}

fn run_casebook(cwd: &Path, args: &[&str]) -> Output {
    casebook(cwd)
        .args(args)
        .output()
        .expect("casebook command should run")
}

fn assert_success(output: &Output) {
    assert!(
        output.status.success(),
        "stdout:\n{}\nstderr:\n{}",
        String::from_utf8_lossy(&output.stdout),
        String::from_utf8_lossy(&output.stderr)
    );
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

fn ids(value: &Value) -> Vec<u64> {
    value
        .as_array()
        .expect("json array expected")
        .iter()
        .map(|entry| entry["id"].as_u64().expect("numeric id"))
        .collect()
}

#[test]
fn ls_filters_by_year_and_sorts_by_name() {
    let root = unique_workspace("casebook-cli-year");
    let output = run_casebook(&root, &["ls", "--year", "2018"]);
    assert_success(&output);

    let text = stdout(&output);
    let lines = text.lines().collect::<Vec<_>>();
    assert_eq!(lines[0], "Casebook");
    assert_eq!(lines[1], "filters: year=2018");
    assert_eq!(lines[2], "#14 Sample Entry Fourteen (2018)");
    assert!(text.contains("#1 Sample Entry One (2018)"));
    assert_eq!(lines.last().copied(), Some("Showing 2 entries"));
}

#[test]
fn ls_json_applies_query_and_sort() {
    let root = unique_workspace("casebook-cli-query");
    let output = run_casebook(&root, &["ls", "--json", "-q", "  CLERGY "]);
    assert_success(&output);
    let value: Value = serde_json::from_slice(&output.stdout).expect("ls json should parse");
    assert_eq!(ids(&value), vec![8, 15, 2]);

    let output = run_casebook(
        &root,
        &["ls", "--json", "-q", "clergy", "--sort", "year-desc"],
    );
    assert_success(&output);
    let value: Value = serde_json::from_slice(&output.stdout).expect("ls json should parse");
    assert_eq!(ids(&value), vec![8, 15, 2]);
}

#[test]
fn ls_all_sentinel_and_blank_values_do_not_filter() {
    let root = unique_workspace("casebook-cli-all");
    let output = run_casebook(
        &root,
        &["ls", "--json", "--position", "ALL", "--tag", "  ", "--year", "all"],
    );
    assert_success(&output);
    let value: Value = serde_json::from_slice(&output.stdout).expect("ls json should parse");
    assert_eq!(value.as_array().map(Vec::len), Some(15));
}

#[test]
fn ls_without_matches_prints_empty_state() {
    let root = unique_workspace("casebook-cli-empty");
    let output = run_casebook(&root, &["ls", "--year", "1850"]);
    assert_success(&output);
    let text = stdout(&output);
    assert!(text.contains("No entries match the current filters."));
    assert!(text.trim_end().ends_with("Showing 0 entries"));
}

#[test]
fn show_prints_details_and_rejects_unknown_id() {
    let root = unique_workspace("casebook-cli-show");
    let output = run_casebook(&root, &["show", "13", "--json"]);
    assert_success(&output);
    let value: Value = serde_json::from_slice(&output.stdout).expect("show json should parse");
    assert_eq!(value["id"], 13);
    assert_eq!(value["year"], "Year Unknown");

    let missing = run_casebook(&root, &["show", "404"]);
    assert!(!missing.status.success());
    assert!(String::from_utf8_lossy(&missing.stderr).contains("entry '404' not found"));
}

#[test]
fn facets_json_lists_sorted_distinct_values() {
    let root = unique_workspace("casebook-cli-facets");
    let output = run_casebook(&root, &["facets", "--json"]);
    assert_success(&output);
    let value: Value = serde_json::from_slice(&output.stdout).expect("facets json should parse");
    assert_eq!(value["all"], "all");
    assert_eq!(value["positions"][0], "Bishop");
    let years = value["years"].as_array().expect("years array");
    assert_eq!(years.first(), Some(&Value::from(2014)));
    assert_eq!(years.last(), Some(&Value::from(2022)));
}

#[test]
fn render_escapes_record_text_and_skips_unsafe_links() {
    let root = unique_workspace("casebook-cli-render");
    let data = root.join("records.json");
    std::fs::write(
        &data,
        r#"[
  {
    "id": 1,
    "name": "<script>alert(1)</script>",
    "position": ["Judge"],
    "crime": ["Fraud"],
    "description": "Tom & Jerry",
    "sources": ["javascript:alert(1)", "https://example.com/a?b=1&c=2"],
    "tags": [],
    "year": 2019
  }
]"#,
    )
    .expect("data should be writable");
    let page_path = root.join("out/page.html");
    let output = run_casebook(
        &root,
        &[
            "--data",
            data.to_str().expect("utf8 path"),
            "render",
            "-o",
            page_path.to_str().expect("utf8 path"),
        ],
    );
    assert_success(&output);

    let page = std::fs::read_to_string(&page_path).expect("page should be written");
    assert!(page.starts_with("<!DOCTYPE html>"));
    assert!(page.contains("&lt;script&gt;alert(1)&lt;/script&gt;"));
    assert!(!page.contains("<script>alert(1)"));
    assert!(page.contains("Tom &amp; Jerry"));
    assert!(!page.contains(r#"href="javascript:"#));
    assert!(page.contains(r#"href="https://example.com/a?b=1&amp;c=2""#));
    assert!(page.contains("Showing 1 entry"));
}

#[test]
fn render_with_missing_data_writes_error_page_and_fails() {
    let root = unique_workspace("casebook-cli-render-missing");
    let page_path = root.join("page.html");
    let output = run_casebook(
        &root,
        &[
            "--data",
            "does-not-exist.json",
            "render",
            "--output",
            page_path.to_str().expect("utf8 path"),
        ],
    );
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("error:"));
    let page = std::fs::read_to_string(&page_path).expect("error page should be written");
    assert!(page.contains("Error: Database not found."));
    assert!(!page.contains("resultsContainer"));
}

#[test]
fn config_file_in_working_directory_sets_title_and_data() {
    let root = unique_workspace("casebook-cli-config");
    std::fs::write(
        root.join("records.json"),
        r#"[{"id": 5, "name": "Only Entry", "position": [], "crime": [], "description": "", "sources": [], "tags": []}]"#,
    )
    .expect("data should be writable");
    std::fs::write(
        root.join("casebook.toml"),
        "title = \"Ledger\"\ndata = \"records.json\"\n",
    )
    .expect("config should be writable");

    let output = run_casebook(&root, &["render"]);
    assert_success(&output);
    let page = stdout(&output);
    assert!(page.contains("<title>Ledger</title>"));
    assert!(page.contains("Only Entry"));
    assert!(page.contains("Year Unknown"));
}

#[test]
fn theme_toggle_persists_between_runs() {
    let root = unique_workspace("casebook-cli-theme");
    let output = run_casebook(&root, &["theme"]);
    assert_success(&output);
    assert_eq!(stdout(&output).trim(), "light");

    let output = run_casebook(&root, &["theme", "toggle"]);
    assert_success(&output);
    assert_eq!(stdout(&output).trim(), "dark");

    let output = run_casebook(&root, &["theme", "show"]);
    assert_eq!(stdout(&output).trim(), "dark");

    let output = run_casebook(&root, &["render"]);
    assert_success(&output);
    assert!(stdout(&output).contains(r#"<body class="dark-mode">"#));

    let output = run_casebook(&root, &["theme", "set", "light"]);
    assert_eq!(stdout(&output).trim(), "light");
}

#[test]
fn browse_reads_commands_from_stdin() {
    let root = unique_workspace("casebook-cli-browse");
    let mut child = casebook(&root)
        .arg("browse")
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .expect("browse should spawn");
    child
        .stdin
        .take()
        .expect("stdin should be piped")
        .write_all(b"search clergy\nopen 8\nesc\nreset\nquit\n")
        .expect("stdin should be writable");
    let output = child.wait_with_output().expect("browse should finish");
    assert_success(&output);

    let text = stdout(&output);
    assert!(text.contains("filters: query=clergy"));
    assert!(text.contains("Showing 3 entries"));
    assert!(text.contains("id:  8"));
    assert!(text.contains("detail closed"));
    assert!(text.trim_end().ends_with("Showing 15 entries"));
}
