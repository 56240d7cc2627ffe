use std::io::{self, IsTerminal};

use crate::pipeline::Facets;
use crate::view::{CardView, DetailView, ListingView, SourceLink};

pub const EMPTY_STATE_MESSAGE: &str = "No entries match the current filters.";

pub fn print_listing(listing: &ListingView, palette: &Palette, reset_hint: &str) {
    for line in format_listing(listing, palette, reset_hint) {
        println!("{line}");
    }
}

pub fn print_detail(detail: &DetailView, palette: &Palette) {
    for line in format_detail(detail, palette) {
        println!("{line}");
    }
}

pub fn format_listing(listing: &ListingView, palette: &Palette, reset_hint: &str) -> Vec<String> {
    let mut lines = vec![palette.heading("Casebook")];
    if let Some(summary) = listing.filters.as_deref() {
        lines.push(palette.dim(&format!("filters: {summary}")));
    }

    if listing.is_empty() {
        lines.push(palette.dim(EMPTY_STATE_MESSAGE));
        lines.push(palette.dim(reset_hint));
        lines.push(listing.count_label.clone());
        return lines;
    }

    for (index, card) in listing.cards.iter().enumerate() {
        if index > 0 {
            lines.push(String::new());
        }
        lines.extend(format_card(card, palette));
    }
    lines.push(String::new());
    lines.push(palette.dim(&listing.count_label));
    lines
}

fn format_card(card: &CardView, palette: &Palette) -> Vec<String> {
    let mut lines = vec![format!(
        "{} {} {}",
        palette.id(&format!("#{}", card.id)),
        palette.name(&card.name),
        palette.dim(&format!("({})", card.year))
    )];
    push_labelled(&mut lines, "positions", &card.positions, palette);
    push_labelled(&mut lines, "allegations", &card.crimes, palette);
    if !card.tags.is_empty() {
        lines.push(format!(
            "  {}",
            palette.tags(&format!("#{}", card.tags.join(" #")))
        ));
    }
    lines.push(format!("  {}", card.summary));
    if !card.sources.is_empty() {
        lines.push(format!("  {}", format_sources_inline(&card.sources)));
    }
    lines
}

pub fn format_detail(detail: &DetailView, palette: &Palette) -> Vec<String> {
    let mut lines = vec![
        palette.heading(&detail.name),
        format!("{}  {}", palette.label("id:"), detail.id),
        format!("{}  {}", palette.label("year:"), detail.year),
    ];
    push_labelled(&mut lines, "positions", &detail.positions, palette);
    push_labelled(&mut lines, "allegations", &detail.crimes, palette);
    if !detail.tags.is_empty() {
        lines.push(format!(
            "{}  {}",
            palette.label("tags:"),
            detail.tags.join(", ")
        ));
    }
    lines.push(palette.label("description:"));
    for paragraph in detail.description.lines() {
        lines.push(format!("  {paragraph}"));
    }
    if !detail.sources.is_empty() {
        lines.push(palette.label("sources:"));
        for source in &detail.sources {
            lines.push(format!("  {}: {}", source.label, source.url));
        }
    }
    lines
}

pub fn print_facets(facets: &Facets, palette: &Palette) {
    for line in format_facets(facets, palette) {
        println!("{line}");
    }
}

pub fn format_facets(facets: &Facets, palette: &Palette) -> Vec<String> {
    let years = facets
        .years
        .iter()
        .map(i32::to_string)
        .collect::<Vec<_>>();
    let mut lines = Vec::new();
    for (label, values) in [
        ("positions", facets.positions.as_slice()),
        ("crimes", facets.crimes.as_slice()),
        ("tags", facets.tags.as_slice()),
        ("years", years.as_slice()),
    ] {
        lines.push(palette.heading(&format!("{label} ({})", values.len())));
        lines.push(format!("  {}", facets.all));
        lines.extend(values.iter().map(|value| format!("  {value}")));
    }
    lines
}

fn push_labelled(lines: &mut Vec<String>, label: &str, values: &[String], palette: &Palette) {
    if values.is_empty() {
        return;
    }
    lines.push(format!(
        "  {} {}",
        palette.label(&format!("{label}:")),
        values.join(", ")
    ));
}

fn format_sources_inline(sources: &[SourceLink]) -> String {
    sources
        .iter()
        .map(|source| format!("[{}] {}", source.label, source.url))
        .collect::<Vec<_>>()
        .join("  ")
}

pub struct Palette {
    enabled: bool,
    dark: bool,
}

impl Palette {
    pub fn auto(dark: bool) -> Self {
        let enabled = std::env::var_os("NO_COLOR").is_none() && io::stdout().is_terminal();
        Self { enabled, dark }
    }

    #[cfg(test)]
    pub fn plain() -> Self {
        Self {
            enabled: false,
            dark: false,
        }
    }

    pub fn with_dark(&self, dark: bool) -> Self {
        Self {
            enabled: self.enabled,
            dark,
        }
    }

    fn paint(&self, code: &str, text: &str) -> String {
        if self.enabled {
            format!("\x1b[{code}m{text}\x1b[0m")
        } else {
            text.to_string()
        }
    }

    pub fn heading(&self, text: &str) -> String {
        self.paint(if self.dark { "1;96" } else { "1;36" }, text)
    }

    pub fn dim(&self, text: &str) -> String {
        self.paint("2", text)
    }

    fn id(&self, text: &str) -> String {
        self.paint(if self.dark { "1;94" } else { "1;34" }, text)
    }

    fn name(&self, text: &str) -> String {
        self.paint(if self.dark { "1;97" } else { "1;30" }, text)
    }

    fn label(&self, text: &str) -> String {
        self.paint(if self.dark { "95" } else { "35" }, text)
    }

    fn tags(&self, text: &str) -> String {
        self.paint("90", text)
    }
}

#[cfg(test)]
#[path = "ui_tests.rs"]
mod tests;
