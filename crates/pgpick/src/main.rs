use std::env;
use std::io::{self, Stdout};

use anyhow::{Context, Result};
use crossterm::execute;
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;
use tracing::{error, info};

use pgpick::app::{App, ExitAction, SelectionController};
use pgpick::config;
use pgpick::launch::{launch, ClientCommand};
use pgpick::logging::init_logging;
use pgpick::pgpass::PgpassFile;

fn print_version() {
    println!("pgpick {}", env!("CARGO_PKG_VERSION"));
}

fn print_usage() {
    eprintln!("pgpick - pick a ~/.pgpass connection and open psql");
    eprintln!();
    eprintln!("Usage: pgpick [OPTIONS]");
    eprintln!();
    eprintln!("Options:");
    eprintln!("  -h, --help        Print this help message");
    eprintln!("  -V, --version     Print version information");
    eprintln!();
    eprintln!("Keys:");
    eprintln!("  j/k, arrows       Move");
    eprintln!("  f or /            Edit the filter (Enter apply, Esc cancel)");
    eprintln!("  c                 Clear the filter");
    eprintln!("  r                 Reload the credentials file");
    eprintln!("  Enter             Connect to the selected entry");
    eprintln!("  q, Esc, Ctrl+c    Quit");
    eprintln!();
    eprintln!("Configuration:");
    if let Some(path) = config::config_path() {
        eprintln!("  Config file: {}", path.display());
    }
}

fn main() -> Result<()> {
    let args: Vec<String> = env::args().collect();

    if args.iter().any(|a| a == "-h" || a == "--help") {
        print_usage();
        return Ok(());
    }

    if args.iter().any(|a| a == "-V" || a == "--version") {
        print_version();
        return Ok(());
    }

    // Load configuration from ~/.config/pgpick/config.toml
    let cfg = config::load_config().unwrap_or_else(|e| {
        eprintln!("Warning: Failed to load config: {:#}", e);
        config::Config::default()
    });

    let log_guard = init_logging(&cfg.log, &cfg.log_dir())
        .map_err(|e| eprintln!("Warning: Logging disabled: {:#}", e))
        .ok();

    let pgpass_path = cfg
        .pgpass_path()
        .context("Could not determine the home directory for ~/.pgpass")?;

    // Nothing to show without connections, so a load failure ends here.
    let controller = match SelectionController::load(PgpassFile::new(&pgpass_path)) {
        Ok(controller) => controller,
        Err(e) => {
            error!(error = %e, "failed to load connections");
            return Err(e.into());
        }
    };

    let mut terminal =
        init_terminal().context("failed to initialize terminal; are you running in a real TTY?")?;

    let mut app = App::new(controller);
    let res = app.run(&mut terminal);

    restore_terminal(terminal)?;

    match res? {
        ExitAction::None => {
            info!("quit without connecting");
            Ok(())
        }
        ExitAction::ConnectToSelected(conn) => {
            let cmd =
                ClientCommand::for_connection(&conn, &cfg.client, Some(pgpass_path.as_path()))?;
            info!(command = %cmd.display(), "launching client");

            // exec does not run destructors; flush the log first.
            drop(log_guard);

            let code = launch(&cmd)?;
            std::process::exit(code);
        }
    }
}

fn init_terminal() -> Result<Terminal<CrosstermBackend<Stdout>>> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;

    let backend = CrosstermBackend::new(stdout);
    let terminal = Terminal::new(backend)?;
    Ok(terminal)
}

fn restore_terminal(mut terminal: Terminal<CrosstermBackend<Stdout>>) -> Result<()> {
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;
    Ok(())
}
