mod app;
mod browse;
mod cli;
mod completions;
mod config;
mod db;
mod debounce;
mod domain;
mod html;
mod listing;
mod pipeline;
mod prefs;
mod session;
mod store;
mod ui;
mod view;

use std::io::{self, Write};
use std::path::Path;

use tracing_subscriber::EnvFilter;

const LOG_ENV: &str = "CASEBOOK_LOG";

fn main() {
    init_tracing();
    if let Err(err) = run() {
        eprintln!("error: {}", err);
        std::process::exit(1);
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .try_init();
}

fn print_json(value: &impl serde::Serialize) -> Result<(), app::AppError> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn run() -> Result<(), app::AppError> {
    use clap::Parser;
    use cli::{Commands, ThemeSubcommands};

    let cli = cli::Cli::parse();
    if let Commands::Completions(args) = &cli.command {
        return completions::run_completions_command(args.shell);
    }

    let config = config::ViewerConfig::load(cli.config.as_deref())?.with_data_override(cli.data);
    if let Commands::Render(args) = &cli.command {
        return run_render(args, config, cli.prefs_db);
    }

    let app = app::App::open(config, cli.prefs_db)?;
    match cli.command {
        Commands::Ls(args) => {
            let filter = args.filter.filter_state();
            if args.json {
                print_json(&app.list(&filter, args.filter.sort))?;
            } else {
                let listing = app.listing(&filter, args.filter.sort);
                ui::print_listing(
                    &listing,
                    &ui::Palette::auto(app.dark_mode()),
                    "clear the filters to see every entry",
                );
            }
        }
        Commands::Show(args) => {
            let detail = app.show(args.id).ok_or(app::AppError::NotFound(args.id))?;
            if args.json {
                print_json(&detail)?;
            } else {
                ui::print_detail(&detail, &ui::Palette::auto(app.dark_mode()));
            }
        }
        Commands::Facets(args) => {
            let facets = app.facets();
            if args.json {
                print_json(&facets)?;
            } else {
                ui::print_facets(&facets, &ui::Palette::auto(app.dark_mode()));
            }
        }
        Commands::Browse => {
            let options = browse::BrowseOptions {
                debounce: app.config().search_debounce,
                palette: ui::Palette::auto(app.dark_mode()),
            };
            let stdin = io::BufReader::new(io::stdin());
            let mut stdout = io::stdout().lock();
            browse::run(&app, stdin, &mut stdout, options)?;
        }
        Commands::Theme(args) => {
            let dark = match args.command.unwrap_or(ThemeSubcommands::Show) {
                ThemeSubcommands::Show => app.prefs().try_load()?,
                ThemeSubcommands::Toggle => app.toggle_dark_mode()?,
                ThemeSubcommands::Set(set) => app.set_dark_mode(set.theme.is_dark())?,
            };
            println!("{}", if dark { "dark" } else { "light" });
        }
        Commands::Render(_) | Commands::Completions(_) => {}
    }
    Ok(())
}

fn run_render(
    args: &cli::RenderArgs,
    mut config: config::ViewerConfig,
    prefs_db: std::path::PathBuf,
) -> Result<(), app::AppError> {
    if let Some(title) = &args.title {
        config.title = title.clone();
    }
    let store = match app::load_store(&config) {
        Ok(store) => store,
        Err(err) => {
            let page = html::render_error_page(&config.title, app::STORE_UNAVAILABLE_MESSAGE);
            write_page(args.output.as_deref(), &page)?;
            return Err(err.into());
        }
    };
    let app = app::App::with_store(store, config, prefs_db);
    let page = app.render_page(&args.filter.filter_state(), args.filter.sort, args.open);
    write_page(args.output.as_deref(), &page)
}

fn write_page(output: Option<&Path>, page: &str) -> Result<(), app::AppError> {
    match output {
        Some(path) => {
            if let Some(parent) = path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
                std::fs::create_dir_all(parent)?;
            }
            std::fs::write(path, page)?;
        }
        None => {
            let mut stdout = io::stdout().lock();
            stdout.write_all(page.as_bytes())?;
            stdout.flush()?;
        }
    }
    Ok(())
}
