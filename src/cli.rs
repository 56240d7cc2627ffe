use std::path::PathBuf;

use clap::builder::styling::{AnsiColor, Effects, Styles};
use clap::{Args, CommandFactory, Parser, Subcommand, ValueEnum};
use clap_complete::Shell;

use crate::domain::sort::SortOrder;
use crate::listing::FilterState;

fn cli_styles() -> Styles {
    Styles::styled()
        .header(AnsiColor::BrightCyan.on_default() | Effects::BOLD)
        .usage(AnsiColor::BrightYellow.on_default() | Effects::BOLD)
        .literal(AnsiColor::BrightGreen.on_default() | Effects::BOLD)
        .placeholder(AnsiColor::BrightMagenta.on_default())
}

pub fn styled_command() -> clap::Command {
    Cli::command()
}

#[derive(Debug, Parser)]
#[command(name = "casebook")]
#[command(bin_name = "casebook")]
#[command(version)]
#[command(about = "Browse, filter and publish a casebook of documented entries")]
#[command(styles = cli_styles())]
pub struct Cli {
    #[arg(
        short = 'D',
        long,
        env = "CASEBOOK_DATA",
        help = "JSON record array or chunk manifest. Uses the bundled sample when omitted."
    )]
    pub data: Option<PathBuf>,

    #[arg(
        long,
        env = "CASEBOOK_PREFS_DB",
        default_value = ".casebook/prefs.sqlite",
        help = "Path to the SQLite preference database."
    )]
    pub prefs_db: PathBuf,

    #[arg(
        long,
        env = "CASEBOOK_CONFIG",
        help = "Viewer config file (defaults to ./casebook.toml when present)."
    )]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    #[command(about = "List entries with filtering and sorting.")]
    Ls(ListArgs),
    #[command(about = "Show one entry in full.")]
    Show(ShowArgs),
    #[command(about = "List the values offered by each filter.")]
    Facets(FacetsArgs),
    #[command(about = "Render the listing as a standalone HTML page.")]
    Render(RenderArgs),
    #[command(about = "Browse interactively, one command per line on stdin.")]
    Browse,
    #[command(about = "Show or change the persisted theme.")]
    Theme(ThemeArgs),
    #[command(about = "Generate shell completions.")]
    Completions(CompletionsArgs),
}

#[derive(Debug, Args, Default)]
pub struct FilterArgs {
    #[arg(short = 'q', long, help = "Case-insensitive text search.")]
    pub query: Option<String>,

    #[arg(short = 'p', long, help = "Exact position, or `all`.")]
    pub position: Option<String>,

    #[arg(short = 'c', long, help = "Exact allegation, or `all`.")]
    pub crime: Option<String>,

    #[arg(short = 'g', long, help = "Exact tag, or `all`.")]
    pub tag: Option<String>,

    #[arg(short = 'y', long, help = "Year, or `all`.")]
    pub year: Option<String>,

    #[arg(
        short = 's',
        long,
        default_value_t = SortOrder::NameAsc,
        help = "Sort order: name-asc, name-desc, year-desc or year-asc."
    )]
    pub sort: SortOrder,
}

impl FilterArgs {
    pub fn filter_state(&self) -> FilterState {
        FilterState {
            query: self.query.clone(),
            position: self.position.clone(),
            crime: self.crime.clone(),
            tag: self.tag.clone(),
            year: self.year.clone(),
        }
    }
}

#[derive(Debug, Args)]
pub struct ListArgs {
    #[command(flatten)]
    pub filter: FilterArgs,

    #[arg(short = 'j', long, help = "Render machine-readable JSON.")]
    pub json: bool,
}

#[derive(Debug, Args)]
pub struct ShowArgs {
    #[arg(help = "Entry id.")]
    pub id: u32,

    #[arg(short = 'j', long, help = "Render machine-readable JSON.")]
    pub json: bool,
}

#[derive(Debug, Args)]
pub struct FacetsArgs {
    #[arg(short = 'j', long, help = "Render machine-readable JSON.")]
    pub json: bool,
}

#[derive(Debug, Args)]
pub struct RenderArgs {
    #[command(flatten)]
    pub filter: FilterArgs,

    #[arg(short = 'o', long, help = "Write the page here instead of stdout.")]
    pub output: Option<PathBuf>,

    #[arg(long, help = "Render with this entry's detail dialog open.")]
    pub open: Option<u32>,

    #[arg(long, help = "Page title (overrides the config file).")]
    pub title: Option<String>,
}

#[derive(Debug, Args)]
pub struct ThemeArgs {
    #[command(subcommand)]
    pub command: Option<ThemeSubcommands>,
}

#[derive(Debug, Subcommand)]
pub enum ThemeSubcommands {
    #[command(about = "Print the current theme.")]
    Show,
    #[command(about = "Flip between light and dark.")]
    Toggle,
    #[command(about = "Set the theme explicitly.")]
    Set(ThemeSetArgs),
}

#[derive(Debug, Args)]
pub struct ThemeSetArgs {
    #[arg(value_enum)]
    pub theme: ThemeChoice,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ThemeChoice {
    Light,
    Dark,
}

impl ThemeChoice {
    pub fn is_dark(self) -> bool {
        self == ThemeChoice::Dark
    }
}

#[derive(Debug, Args)]
pub struct CompletionsArgs {
    #[arg(value_enum, help = "Shell to generate for. Auto-detected if omitted.")]
    pub shell: Option<Shell>,
}

#[cfg(test)]
#[path = "cli_tests.rs"]
mod tests;
