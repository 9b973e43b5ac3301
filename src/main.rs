//! leadsheet - terminal viewer for business lead spreadsheets
//!
//! Loads an Excel or CSV sheet, lets the user filter and page through the
//! records, mark each one verified, evaluate and comment it, and export the
//! annotated table again.

use std::io;
use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::{Backend, CrosstermBackend},
    Terminal,
};

use leadsheet::application::{App, AppMode};
use leadsheet::infrastructure::{logging, Config, WorkbookRepository};
use leadsheet::presentation::{render_ui, InputHandler};

#[derive(Parser, Debug)]
#[command(name = "leadsheet", version, about = "Review and annotate lead spreadsheets in the terminal")]
struct Cli {
    /// Spreadsheet to open on startup (.xlsx, .xls, .ods or .csv)
    file: Option<PathBuf>,

    /// JSON configuration file
    #[arg(long)]
    config: Option<PathBuf>,

    /// Default export destination
    #[arg(long)]
    export: Option<PathBuf>,

    /// Append log records to this file
    #[arg(long)]
    log_file: Option<PathBuf>,

    /// Log at debug level
    #[arg(short, long)]
    verbose: bool,
}

impl Cli {
    fn config(&self) -> anyhow::Result<Config> {
        let mut config = match &self.config {
            Some(path) => Config::load(path)
                .with_context(|| format!("failed to read config {}", path.display()))?,
            None => Config::default(),
        };
        if let Some(export) = &self.export {
            config.export_path = export.clone();
        }
        if let Some(log_file) = &self.log_file {
            config.log_file = Some(log_file.clone());
        }
        if self.verbose {
            config.log_level = "debug".to_string();
        }
        Ok(config)
    }
}

/// Entry point.
///
/// Configuration problems are reported before the terminal switches to the
/// alternate screen; a file passed on the command line that fails to load
/// only produces a status message.
fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = cli.config()?;
    let log_buffer = logging::install(&config).context("failed to install logger")?;
    log::info!("leadsheet {} starting", env!("CARGO_PKG_VERSION"));

    let mut app = App::new(config.export_path.clone(), Some(log_buffer));
    if let Some(path) = &cli.file {
        let result = WorkbookRepository::load_table(path)
            .map(|(table, report)| (table, report, path.display().to_string()))
            .map_err(|e| e.to_string());
        app.set_load_result(result);
    }

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let res = run_app(&mut terminal, &mut app);

    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    log::info!("leadsheet exiting");
    res?;
    Ok(())
}

/// Draws and dispatches key presses until `q` is pressed in normal mode.
fn run_app<B: Backend>(terminal: &mut Terminal<B>, app: &mut App) -> io::Result<()> {
    loop {
        terminal.draw(|f| render_ui(f, app))?;

        if let Event::Key(key) = event::read()? {
            if key.kind == KeyEventKind::Press {
                match key.code {
                    KeyCode::Char('q') if matches!(app.mode, AppMode::Normal) => return Ok(()),
                    _ => InputHandler::handle_key_event(app, key.code, key.modifiers),
                }
            }
        }
    }
}
