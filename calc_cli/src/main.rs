//! # Calci
//!
//! Terminal scientific calculator built on `calc_core`.
//! Built with Ratatui for a rich TUI experience.
//!
//! History, memory and theme persist to a JSON store file. Logs go to a file
//! so they never draw over the TUI.

mod app;
mod config;
mod export;
mod keymap;
mod keypad;
mod store;
mod ui;

use std::fs::{self, OpenOptions};
use std::io;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, Once};
use std::time::Duration;

use anyhow::{Context, Result};
use calc_core::persistence::{DARK_MODE_KEY, HISTORY_KEY, MEMORY_KEY};
use calc_core::{Calculator, FileStore, MemoryStore, PersistencePort};
use clap::Parser;
use crossterm::cursor::Show;
use crossterm::event::{self, Event, KeyEventKind};
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use crossterm::ExecutableCommand;
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use crate::app::App;
use crate::config::Settings;
use crate::keypad::KeypadKind;
use crate::store::{WriteBehindStore, WriteFailures};

/// Redraw interval; short enough for the press highlight to clear on time
const TICK: Duration = Duration::from_millis(50);

#[derive(Parser)]
#[command(name = "calci")]
#[command(about = "Calci - terminal scientific calculator")]
#[command(version)]
struct Cli {
    /// Settings file (default: <config dir>/calci/config.json)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Store file for history, memory and theme
    #[arg(long)]
    store: Option<PathBuf>,

    /// Directory for history exports
    #[arg(long)]
    export_dir: Option<PathBuf>,

    /// Log file
    #[arg(long)]
    log_file: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// Start on the advanced keypad
    #[arg(long)]
    advanced: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let (mut settings, config_warning) = config::load(cli.config.as_deref());
    apply_overrides(&mut settings, &cli);

    init_logging(&settings.log_file, cli.verbose)?;
    if let Some(warning) = &config_warning {
        warn!("{}", warning);
    }
    info!(version = env!("CARGO_PKG_VERSION"), "calci starting");

    let OpenedStore {
        port,
        status,
        failures,
    } = open_store(&settings.store_path);
    let log_file = settings.log_file.clone();
    let calc = Calculator::new(port);
    let mut app = App::new(calc, settings, status.or(config_warning));

    let result = run_tui(&mut app);

    // Drains pending store writes and releases the file lock
    drop(app);
    if let Some(lost) = failures.map(|f| f.count()).filter(|&n| n > 0) {
        warn!(lost, "store writes failed during the session");
        eprintln!(
            "calci: {} store write(s) failed; see {}",
            lost,
            log_file.display()
        );
    }
    info!("calci stopped");

    result
}

fn apply_overrides(settings: &mut Settings, cli: &Cli) {
    if let Some(path) = &cli.store {
        settings.store_path = path.clone();
    }
    if let Some(dir) = &cli.export_dir {
        settings.export_dir = dir.clone();
    }
    if let Some(path) = &cli.log_file {
        settings.log_file = path.clone();
    }
    if cli.advanced {
        settings.initial_keypad = KeypadKind::Advanced;
    }
}

fn init_logging(path: &Path, verbose: bool) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create log directory {}", parent.display()))?;
    }
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("Failed to open log file {}", path.display()))?;

    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_ansi(false)
        .with_writer(Mutex::new(file))
        .init();
    Ok(())
}

struct OpenedStore {
    port: Box<dyn PersistencePort>,
    /// Status line for the user when the in-memory fallback is taken
    status: Option<String>,
    /// Present when the file store is in use
    failures: Option<WriteFailures>,
}

/// Open the file store behind a write-behind worker, or fall back to memory.
fn open_store(path: &Path) -> OpenedStore {
    let user = std::env::var("USER")
        .or_else(|_| std::env::var("USERNAME"))
        .unwrap_or_else(|_| "calci".to_string());

    let opened = FileStore::open(path, user)
        .map_err(anyhow::Error::from)
        .and_then(|file_store| {
            WriteBehindStore::spawn(file_store, &[HISTORY_KEY, MEMORY_KEY, DARK_MODE_KEY])
                .context("Failed to start store worker")
        });

    match opened {
        Ok(store) => OpenedStore {
            failures: Some(store.failures()),
            port: Box::new(store),
            status: None,
        },
        Err(e) => {
            warn!(path = %path.display(), error = %format!("{:#}", e), "store unavailable, using memory");
            OpenedStore {
                port: Box::new(MemoryStore::new()),
                status: Some(format!("Store unavailable ({:#}); nothing will be saved", e)),
                failures: None,
            }
        }
    }
}

/// Raw mode plus alternate screen, undone on drop and on panic.
struct TerminalGuard;

impl TerminalGuard {
    fn enter() -> Result<Self> {
        install_panic_hook();
        enable_raw_mode().context("Failed to enable raw mode")?;
        // From here on every exit path restores the terminal
        let guard = TerminalGuard;
        io::stdout()
            .execute(EnterAlternateScreen)
            .context("Failed to enter alternate screen")?;
        Ok(guard)
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        restore_terminal();
    }
}

fn restore_terminal() {
    let _ = disable_raw_mode();
    let mut stdout = io::stdout();
    let _ = stdout.execute(LeaveAlternateScreen);
    let _ = stdout.execute(Show);
}

/// Restore the terminal before the panic message is printed.
fn install_panic_hook() {
    static HOOK: Once = Once::new();
    HOOK.call_once(|| {
        let previous = std::panic::take_hook();
        std::panic::set_hook(Box::new(move |info| {
            restore_terminal();
            previous(info);
        }));
    });
}

fn run_tui(app: &mut App) -> Result<()> {
    let _guard = TerminalGuard::enter()?;
    let backend = CrosstermBackend::new(io::stdout());
    let mut terminal = Terminal::new(backend).context("Failed to create terminal")?;

    run_loop(&mut terminal, app)
}

fn run_loop(terminal: &mut Terminal<CrosstermBackend<io::Stdout>>, app: &mut App) -> Result<()> {
    while !app.should_quit() {
        terminal.draw(|f| ui::draw(f, app))?;

        if event::poll(TICK).context("Failed to poll events")? {
            if let Event::Key(key) = event::read().context("Failed to read event")? {
                if key.kind == KeyEventKind::Press {
                    app.handle_key(key);
                }
            }
        }
    }
    Ok(())
}
