//! Self-contained HTML page for the directory: card grid, count label,
//! empty state with reset, detail dialogs and the dark-mode toggle.
//!
//! Markup is assembled with `format!`; every record-supplied string goes
//! through [`html_escape`] first.

use crate::view::{CardView, DetailView, ListingView, SourceLink};

const PAGE_CSS: &str = r#"
:root { --bg: #f7f7f9; --fg: #1f2330; --card: #ffffff; --muted: #5b6170; --accent: #2f5bd3; --border: #dcdfe6; }
body.dark-mode { --bg: #14161c; --fg: #e6e8ee; --card: #1e2129; --muted: #9aa1b2; --accent: #7aa2ff; --border: #323644; }
* { box-sizing: border-box; }
body { margin: 0; font-family: system-ui, sans-serif; background: var(--bg); color: var(--fg); }
.site-header { display: flex; align-items: center; justify-content: space-between; padding: 1rem 2rem; border-bottom: 1px solid var(--border); }
.theme-toggle { background: none; border: 1px solid var(--border); border-radius: 6px; padding: 0.3rem 0.6rem; cursor: pointer; color: var(--fg); }
main { padding: 1.5rem 2rem; }
.results-count { color: var(--muted); margin: 0 0 0.25rem; }
.active-filters { color: var(--muted); font-size: 0.85rem; margin: 0 0 1rem; }
.results-grid { display: grid; grid-template-columns: repeat(auto-fill, minmax(320px, 1fr)); gap: 1rem; }
.card { background: var(--card); border: 1px solid var(--border); border-radius: 8px; padding: 1rem; cursor: pointer; }
.card:focus { outline: 2px solid var(--accent); }
.card-header, .modal-header { display: flex; justify-content: space-between; gap: 1rem; align-items: baseline; }
.card-name, .modal-title { margin: 0; font-size: 1.1rem; }
.card-year, .modal-year { color: var(--muted); white-space: nowrap; }
.card-section, .modal-section { margin-top: 0.75rem; }
.card-label { font-size: 0.75rem; text-transform: uppercase; color: var(--muted); margin-bottom: 0.25rem; }
.badge { display: inline-block; border-radius: 999px; padding: 0.1rem 0.6rem; margin: 0 0.25rem 0.25rem 0; font-size: 0.8rem; border: 1px solid var(--border); }
.badge.crime { border-color: #d35b5b; }
.badge.tag { border-style: dashed; }
.source-link { color: var(--accent); margin-right: 0.75rem; }
.empty-state { text-align: center; padding: 3rem 1rem; color: var(--muted); }
.reset-button { background: var(--accent); color: #fff; border: none; border-radius: 6px; padding: 0.5rem 1rem; cursor: pointer; }
.modal { position: fixed; inset: 0; background: rgba(0, 0, 0, 0.55); display: flex; align-items: center; justify-content: center; padding: 1rem; }
.modal[hidden] { display: none; }
.modal-content { background: var(--card); border-radius: 10px; max-width: 720px; width: 100%; max-height: 90vh; overflow-y: auto; padding: 1.5rem; position: relative; }
.modal-close { position: absolute; top: 0.5rem; right: 0.75rem; background: none; border: none; font-size: 1.5rem; color: var(--fg); cursor: pointer; }
.error-state { padding: 3rem 2rem; text-align: center; }
"#;

const PAGE_JS: &str = r#"
(function () {
  var body = document.body;
  var toggle = document.getElementById('darkModeToggle');
  var results = document.getElementById('resultsContainer');
  var emptyState = document.getElementById('emptyState');
  var count = document.getElementById('resultsCount');
  var resetTemplate = document.getElementById('resetTemplate');

  function applyTheme(dark) {
    body.classList.toggle('dark-mode', dark);
    toggle.querySelector('.icon').textContent = dark ? '☀️' : '🌙';
  }

  var stored = null;
  try { stored = localStorage.getItem('darkMode'); } catch (e) {}
  if (stored !== null) { applyTheme(stored === 'true'); }

  toggle.addEventListener('click', function () {
    var dark = !body.classList.contains('dark-mode');
    applyTheme(dark);
    try { localStorage.setItem('darkMode', String(dark)); } catch (e) {}
  });

  function closeDetail() {
    document.querySelectorAll('.modal').forEach(function (modal) { modal.hidden = true; });
    body.style.overflow = '';
  }

  function openDetail(id) {
    var modal = document.getElementById('entry-' + id);
    if (!modal) { return; }
    closeDetail();
    modal.hidden = false;
    body.style.overflow = 'hidden';
    var close = modal.querySelector('.modal-close');
    if (close) { close.focus(); }
  }

  function wireCards(root) {
    root.querySelectorAll('.card').forEach(function (card) {
      card.addEventListener('click', function (event) {
        if (event.target.closest('a')) { return; }
        openDetail(card.dataset.id);
      });
      card.addEventListener('keydown', function (event) {
        if (event.key === 'Enter' || event.key === ' ') {
          event.preventDefault();
          openDetail(card.dataset.id);
        }
      });
    });
  }

  document.querySelectorAll('.modal').forEach(function (modal) {
    modal.addEventListener('click', function (event) {
      if (event.target === modal) { closeDetail(); }
    });
    modal.querySelector('.modal-close').addEventListener('click', closeDetail);
  });

  document.addEventListener('keydown', function (event) {
    if (event.key === 'Escape') { closeDetail(); }
  });

  document.querySelectorAll('[data-action="reset"]').forEach(function (button) {
    button.addEventListener('click', function () {
      results.innerHTML = resetTemplate.innerHTML;
      results.hidden = false;
      if (emptyState) { emptyState.hidden = true; }
      count.textContent = resetTemplate.dataset.count;
      var filters = document.getElementById('activeFilters');
      if (filters) { filters.remove(); }
      wireCards(results);
    });
  });

  wireCards(results);
})();
"#;

#[derive(Debug, Clone)]
pub struct PageOptions {
    pub title: String,
    pub dark_mode: bool,
    /// Rendered visible; every other dialog starts hidden.
    pub open_detail: Option<u32>,
}

impl Default for PageOptions {
    fn default() -> Self {
        Self {
            title: "Casebook".to_string(),
            dark_mode: false,
            open_detail: None,
        }
    }
}

/// Everything one page shows. `reset` is the unfiltered, default-sorted listing
/// the reset action swaps in; `details` covers the whole store because the
/// detail view is not subject to filters.
#[derive(Debug, Clone)]
pub struct PageModel {
    pub listing: ListingView,
    pub reset: ListingView,
    pub details: Vec<DetailView>,
}

pub fn html_escape(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

pub fn render_page(model: &PageModel, options: &PageOptions) -> String {
    let body_class = if options.dark_mode { "dark-mode" } else { "" };
    let icon = if options.dark_mode { "\u{2600}\u{fe0f}" } else { "\u{1f319}" };
    let filters = model
        .listing
        .filters
        .as_deref()
        .map(|summary| {
            format!(
                r#"<p id="activeFilters" class="active-filters">Filters: {}</p>"#,
                html_escape(summary)
            )
        })
        .unwrap_or_default();
    let (grid_hidden, empty_hidden) = if model.listing.is_empty() {
        (" hidden", "")
    } else {
        ("", " hidden")
    };
    let details = model
        .details
        .iter()
        .map(|detail| render_detail(detail, options.open_detail == Some(detail.id)))
        .collect::<Vec<_>>()
        .join("\n");

    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width, initial-scale=1">
<title>{title}</title>
<style>{css}</style>
</head>
<body class="{body_class}">
<header class="site-header">
<h1>{title}</h1>
<button id="darkModeToggle" class="theme-toggle" type="button" aria-label="Toggle dark mode"><span class="icon">{icon}</span></button>
</header>
<main>
<p id="resultsCount" class="results-count" aria-live="polite">{count}</p>
{filters}
<section id="resultsContainer" class="results-grid"{grid_hidden}>
{cards}
</section>
<section id="emptyState" class="empty-state"{empty_hidden}>
<p>No entries match the current filters.</p>
<button type="button" class="reset-button" data-action="reset">Reset filters</button>
</section>
<template id="resetTemplate" data-count="{reset_count}">
{reset_cards}
</template>
</main>
{details}
<script>{js}</script>
</body>
</html>
"#,
        title = html_escape(&options.title),
        css = PAGE_CSS,
        count = html_escape(&model.listing.count_label),
        cards = render_cards(&model.listing.cards),
        reset_count = html_escape(&model.reset.count_label),
        reset_cards = render_cards(&model.reset.cards),
        js = PAGE_JS,
    )
}

/// The degraded page shown when the record store cannot be loaded.
pub fn render_error_page(title: &str, message: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<title>{title}</title>
<style>{css}</style>
</head>
<body>
<main class="error-state">
<p>{message}</p>
</main>
</body>
</html>
"#,
        title = html_escape(title),
        css = PAGE_CSS,
        message = html_escape(message),
    )
}

fn render_cards(cards: &[CardView]) -> String {
    cards
        .iter()
        .map(render_card)
        .collect::<Vec<_>>()
        .join("\n")
}

fn render_card(card: &CardView) -> String {
    let name = html_escape(&card.name);
    format!(
        r#"<article class="card" data-id="{id}" role="button" tabindex="0" aria-label="View details for {name}">
<div class="card-header"><h2 class="card-name">{name}</h2><span class="card-year">{year}</span></div>
<div class="card-section"><div class="card-label">Position(s)</div><div class="card-positions">{positions}</div></div>
<div class="card-section"><div class="card-label">Allegation(s)</div><div class="card-crimes">{crimes}</div></div>
{tags}<div class="card-section"><div class="card-label">Description</div><p class="card-description">{summary}</p></div>
<div class="card-sources"><div class="card-label">Sources</div>{sources}</div>
</article>"#,
        id = card.id,
        year = html_escape(&card.year),
        positions = badges(&card.positions, "position"),
        crimes = badges(&card.crimes, "crime"),
        tags = tag_section(&card.tags, "card-section"),
        summary = html_escape(&card.summary),
        sources = source_links(&card.sources),
    )
}

fn render_detail(detail: &DetailView, open: bool) -> String {
    let hidden = if open { "" } else { " hidden" };
    format!(
        r#"<div id="entry-{id}" class="modal" role="dialog" aria-modal="true" aria-labelledby="entry-{id}-title"{hidden}>
<div class="modal-content">
<button type="button" class="modal-close" aria-label="Close">&times;</button>
<div class="modal-header"><h2 class="modal-title" id="entry-{id}-title">{name}</h2><span class="modal-year">{year}</span></div>
<div class="modal-section"><div class="card-label">Position(s)</div><div class="card-positions">{positions}</div></div>
<div class="modal-section"><div class="card-label">Allegation(s)</div><div class="card-crimes">{crimes}</div></div>
{tags}<div class="modal-section"><div class="card-label">Description</div><p class="modal-description">{description}</p></div>
<div class="modal-section"><div class="card-label">Sources</div>{sources}</div>
</div>
</div>"#,
        id = detail.id,
        name = html_escape(&detail.name),
        year = html_escape(&detail.year),
        positions = badges(&detail.positions, "position"),
        crimes = badges(&detail.crimes, "crime"),
        tags = tag_section(&detail.tags, "modal-section"),
        description = html_escape(&detail.description),
        sources = source_links(&detail.sources),
    )
}

fn badges(values: &[String], kind: &str) -> String {
    values
        .iter()
        .map(|value| format!(r#"<span class="badge {kind}">{}</span>"#, html_escape(value)))
        .collect()
}

fn tag_section(tags: &[String], section_class: &str) -> String {
    if tags.is_empty() {
        return String::new();
    }
    format!(
        r#"<div class="{section_class}"><div class="card-label">Tags</div><div class="card-tags">{}</div></div>
"#,
        badges(tags, "tag")
    )
}

fn source_links(sources: &[SourceLink]) -> String {
    sources
        .iter()
        .map(|source| {
            if is_linkable(&source.url) {
                format!(
                    r#"<a href="{url}" class="source-link" target="_blank" rel="noopener noreferrer">{label}</a>"#,
                    url = html_escape(&source.url),
                    label = html_escape(&source.label),
                )
            } else {
                format!(
                    r#"<span class="source-link" title="{url}">{label}</span>"#,
                    url = html_escape(&source.url),
                    label = html_escape(&source.label),
                )
            }
        })
        .collect()
}

// Escaping alone does not neutralise `javascript:` and friends in an href.
fn is_linkable(url: &str) -> bool {
    let lower = url.trim_start().to_ascii_lowercase();
    lower.starts_with("https://") || lower.starts_with("http://")
}

#[cfg(test)]
#[path = "html_tests.rs"]
mod tests;
