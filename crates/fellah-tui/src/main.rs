//! Fellah
//!
//! Bilingual (Arabic/French) agricultural-financing demo: marketing pages,
//! mocked farmer and banker flows, scripted legal-advisor chat, and
//! read-aloud. Runs as a TUI by default; subcommands run headless.

use std::io;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use clap::Parser;
use crossterm::event::{self, Event, KeyEventKind};
use crossterm::execute;
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;
use tracing::info;

use fellah_core::config::{self, Config};
use fellah_core::i18n::Language;
use fellah_core::repository::{ApplicationRepository, SqliteRepository};
use fellah_core::storage::Database;
use fellah_core::tracing_init::{init_tracing, LogTarget};
use fellah_speech::{CommandBackend, Speaker, SpeakerConfig};

use fellah_tui::app::App;
use fellah_tui::headless;
use fellah_tui::input;
use fellah_tui::services::Services;
use fellah_tui::ui;

#[derive(Parser, Debug)]
#[command(name = "fellah")]
#[command(version, about = "Bilingual agricultural-financing demo", long_about = None)]
struct Cli {
    /// Database file (defaults to the configured path)
    #[arg(long)]
    db: Option<PathBuf>,

    /// Use an ephemeral in-memory database
    #[arg(long)]
    memory: bool,

    /// UI language: ar or fr
    #[arg(short, long)]
    lang: Option<String>,

    #[command(subcommand)]
    command: Option<headless::Command>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut config = config::load_config()?;
    if cli.db.is_some() {
        config.storage.database_path = cli.db.clone();
    }
    if let Some(lang) = &cli.lang {
        config.ui.language = lang.clone();
    }
    let language = config.language();

    // Log to stderr in both modes so stdout stays clean for JSON output and
    // the terminal frame; headless gets a chattier default.
    let is_headless = cli.command.is_some();
    if is_headless {
        init_tracing("fellah=info", LogTarget::Stderr, false);
    } else {
        init_tracing(
            &format!("fellah={}", config.ui.log_level),
            LogTarget::Stderr,
            false,
        );
    }

    info!(version = env!("CARGO_PKG_VERSION"), "Starting fellah");

    let db = open_database(&cli, &config).await?;
    let repo: Arc<dyn ApplicationRepository> = Arc::new(SqliteRepository::new(db.clone()));

    match cli.command {
        Some(command) => headless::run(command, repo, language, &config.speech).await,
        None => run_tui(db, repo, &config, language).await,
    }
}

async fn open_database(cli: &Cli, config: &Config) -> anyhow::Result<Database> {
    if cli.memory {
        return Ok(Database::open_in_memory().await?);
    }
    let path = config
        .storage
        .database_path
        .clone()
        .or_else(config::default_database_path)
        .context("no database path configured and no config directory available")?;
    Ok(Database::open(&path).await?)
}

/// Run the interactive TUI mode.
async fn run_tui(
    db: Database,
    repo: Arc<dyn ApplicationRepository>,
    config: &Config,
    language: Language,
) -> anyhow::Result<()> {
    // Set up terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = run_tui_loop(&mut terminal, db, repo, config, language).await;

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result
}

/// Main TUI event loop.
async fn run_tui_loop<B: ratatui::backend::Backend>(
    terminal: &mut Terminal<B>,
    db: Database,
    repo: Arc<dyn ApplicationRepository>,
    config: &Config,
    language: Language,
) -> anyhow::Result<()>
where
    <B as ratatui::backend::Backend>::Error: Send + Sync + 'static,
{
    let speech_backend = Arc::new(CommandBackend::new(&config.speech.program));
    let (speaker, mut speech_events) = Speaker::new(
        speech_backend,
        SpeakerConfig {
            voices_timeout: Duration::from_millis(config.speech.voices_timeout_ms),
        },
    );
    let mut services = Services::new(db, repo, speaker, &config.speech);
    let mut app = App::new(language);

    loop {
        terminal.draw(|frame| ui::draw(frame, &app))?;

        // Poll with a timeout so speech events keep flowing while idle.
        let has_terminal_event =
            tokio::task::block_in_place(|| event::poll(Duration::from_millis(50)))?;

        if has_terminal_event {
            if let Event::Key(key) = tokio::task::block_in_place(event::read)? {
                if key.kind == KeyEventKind::Press {
                    input::handle_key(&mut app, &mut services, key.code, key.modifiers).await;
                }
            }
        }

        // Drain speech events (non-blocking).
        while let Ok(speech_event) = speech_events.try_recv() {
            app.handle_speech_event(speech_event);
        }

        if app.should_quit {
            break;
        }
    }

    Ok(())
}
