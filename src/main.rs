//! Main entry point for the episode-browser CLI application.

use clap::Parser;
use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use episode_browser::config::Config;
use episode_browser::store::{EpisodeStore, LoadState};
use episode_browser::tui::{draw, next_key_press, Action, App};
use log::{debug, info, warn};
use ratatui::prelude::*;
use std::fs::{self, File};
use std::io::{self, stdout};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tokio::sync::watch;

/// Command-line arguments for the episode-browser application.
#[derive(Parser, Debug)]
#[command(
    name = "episode-browser",
    version,
    about = "Browse, filter and sort Doctor Who episodes",
    long_about = "Fetches the episode dataset once and shows it as a filterable, sortable table in a TUI."
)]
struct Args {
    /// URL of the episode dataset (overrides config)
    #[arg(short, long)]
    url: Option<String>,

    /// Sort within the filtered view instead of the full dataset
    #[arg(short, long)]
    compose: bool,

    /// Directory holding the era images (overrides config)
    #[arg(short, long)]
    assets_dir: Option<String>,

    /// Log verbosity level: 0=error, 1=warn, 2=info, 3=debug, 4=trace
    #[arg(short, long, default_value_t = 1)]
    log: u8,

    /// Write logs to this file (default: episode-browser.log in the cache dir)
    #[arg(long)]
    log_file: Option<PathBuf>,

    /// Write a default config file if none exists, print its path and exit
    #[arg(long)]
    init_config: bool,
}

/// Initialize the terminal for TUI rendering.
fn init_terminal() -> io::Result<Terminal<CrosstermBackend<io::Stdout>>> {
    enable_raw_mode()?;
    execute!(stdout(), EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout());
    Terminal::new(backend)
}

/// Restore the terminal to its original state.
fn restore_terminal() -> io::Result<()> {
    disable_raw_mode()?;
    execute!(stdout(), LeaveAlternateScreen)?;
    Ok(())
}

/// Set up env_logger writing to `log_file`. Falls back to stderr when no
/// file can be opened.
fn init_logging(level: u8, log_file: Option<PathBuf>) {
    let log_level = match level {
        0 => log::LevelFilter::Error,
        1 => log::LevelFilter::Warn,
        2 => log::LevelFilter::Info,
        3 => log::LevelFilter::Debug,
        _ => log::LevelFilter::Trace,
    };

    let mut builder = env_logger::Builder::new();
    builder
        .filter_level(log_level)
        .format_timestamp(None)
        .format_target(false);

    let mut open_error = None;
    if let Some(path) = &log_file {
        match open_log_file(path) {
            Ok(file) => {
                builder.target(env_logger::Target::Pipe(Box::new(file)));
            }
            Err(e) => open_error = Some(e),
        }
    }

    builder.init();
    debug!("Log level set to {:?}", log_level);
    if let (Some(path), Some(e)) = (&log_file, open_error) {
        warn!("Could not open log file {}: {}", path.display(), e);
    }
}

fn open_log_file(path: &Path) -> io::Result<File> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    File::create(path)
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let log_file = args
        .log_file
        .clone()
        .or_else(|| Config::get_log_path().ok());
    init_logging(args.log, log_file);

    if args.init_config {
        let path = Config::create_default_if_missing()?;
        println!("{}", path.display());
        return Ok(());
    }

    // Load config
    let config = Config::load().unwrap_or_else(|e| {
        warn!("Failed to load config: {}. Using defaults.", e);
        Config::new()
    });

    // Merge config with CLI args
    let source_url = args.url.clone().unwrap_or_else(|| config.source_url.clone());
    let assets_dir = args
        .assets_dir
        .clone()
        .unwrap_or_else(|| config.assets_dir.clone());
    let compose = args.compose || config.compose_filter_and_sort;

    info!("Loading episodes from {}", source_url);

    // One load, shared by every consumer
    let store = EpisodeStore::new();
    let mut load_rx = store.subscribe();
    let load_task = store.spawn_load(source_url, Duration::from_secs(config.timeout_secs));

    let mut terminal = init_terminal()?;
    let mut app = App::new(compose, PathBuf::from(assets_dir));

    let result = run_app(&mut terminal, &mut app, &mut load_rx);

    // Restore terminal
    restore_terminal()?;
    load_task.abort();

    result
}

fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
    load_rx: &mut watch::Receiver<LoadState>,
) -> Result<(), Box<dyn std::error::Error>> {
    loop {
        if load_rx.has_changed().unwrap_or(false) {
            let state = load_rx.borrow_and_update().clone();
            app.apply_load_state(&state);
        }

        terminal.draw(|f| draw(f, app))?;

        if let Some(key) = next_key_press(Duration::from_millis(100))? {
            match app.handle_input(key) {
                Action::Quit => break,
                Action::Sorted(sort_key, direction) => {
                    debug!("Header {} activated ({})", sort_key, direction.as_str());
                }
                Action::FiltersChanged => {
                    debug!("{} episodes visible", app.view().len());
                }
                Action::None => {}
            }
        }

        if app.should_quit {
            break;
        }
    }

    Ok(())
}
