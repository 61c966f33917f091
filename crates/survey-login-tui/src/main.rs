//! survey-login - sign in to the Survey API from the terminal.
//!
//! Shows a login form, stores the returned token, and opens a dashboard
//! listing the user's surveys. A stored token skips the form on the next
//! start.

mod app;
mod ui;

use std::io::{self, Write};
use std::time::Duration;

use anyhow::{Context, Result};
use crossterm::{
    event::{self, Event, KeyCode, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use tracing::{info, warn};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use survey_login_core::models::SignupRequest;
use survey_login_core::{ApiClient, Config};

use app::{App, Screen};
use ui::input::handle_input;
use ui::render::render;

// ============================================================================
// Constants
// ============================================================================

/// Timeout for polling terminal events (in milliseconds)
const EVENT_POLL_TIMEOUT_MS: u64 = 100;

/// Log file name inside the cache directory
const LOG_FILE: &str = "survey-login.log";

const USAGE: &str = "\
Usage: survey-login [COMMAND]

Commands:
  (none)      Open the login form, or the dashboard if already signed in
  --signup    Create an account
  --logout    Forget the stored token
  --ping      Check that the API is reachable
  --help      Show this message

Environment:
  SURVEY_API_BASE_URL   API base URL (default https://survey-site-98jc.onrender.com)
  SURVEY_USERNAME       Prefill the username field
  SURVEY_PASSWORD       Prefill the password field
  RUST_LOG              Log filter (default warn)";

fn env_filter() -> EnvFilter {
    // Use RUST_LOG env var to control log level (e.g., RUST_LOG=debug)
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
}

/// Log to stderr for one-shot commands
fn init_stderr_tracing() {
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(io::stderr))
        .with(env_filter())
        .init();
}

/// Log to a file while the TUI owns the terminal
fn init_file_tracing(config: &Config) -> Result<WorkerGuard> {
    let log_dir = config.cache_dir()?;
    std::fs::create_dir_all(&log_dir)
        .with_context(|| format!("Failed to create {}", log_dir.display()))?;

    let appender = tracing_appender::rolling::never(log_dir, LOG_FILE);
    let (writer, guard) = tracing_appender::non_blocking(appender);

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(writer).with_ansi(false))
        .with(env_filter())
        .init();
    Ok(guard)
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present (silently ignore if not found)
    let _ = dotenvy::dotenv();

    let config = Config::load().unwrap_or_else(|e| {
        eprintln!("Warning: failed to load config ({}), using defaults", e);
        Config::default()
    });

    let args: Vec<String> = std::env::args().collect();
    if let Some(command) = args.get(1) {
        init_stderr_tracing();
        return match command.as_str() {
            "--signup" => signup(&config).await,
            "--logout" => logout(&config),
            "--ping" => ping(&config).await,
            "--help" | "-h" => {
                println!("{}", USAGE);
                Ok(())
            }
            other => {
                eprintln!("Unknown command: {}\n\n{}", other, USAGE);
                std::process::exit(2);
            }
        };
    }

    let _guard = init_file_tracing(&config)?;
    info!("survey-login starting");

    let mut app = App::new(config)?;
    app.resume_session().await;

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = run_app(&mut terminal, &mut app).await;

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(e) = result {
        eprintln!("Error: {}", e);
    }

    info!("survey-login shutting down");
    Ok(())
}

async fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
) -> Result<()> {
    loop {
        terminal.draw(|f| render(f, app))?;

        if event::poll(Duration::from_millis(EVENT_POLL_TIMEOUT_MS))? {
            if let Event::Key(key) = event::read()? {
                // Ctrl+C to quit
                if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
                    return Ok(());
                }

                if handle_input(app, key).await? {
                    return Ok(());
                }
            }
        }

        if matches!(app.screen, Screen::Quitting) {
            return Ok(());
        }
    }
}

// ============================================================================
// One-shot commands
// ============================================================================

fn prompt(label: &str) -> Result<String> {
    print!("{}: ", label);
    io::stdout().flush()?;

    let mut input = String::new();
    io::stdin().read_line(&mut input)?;
    Ok(input.trim().to_string())
}

/// Create an account interactively
async fn signup(config: &Config) -> Result<()> {
    println!("\n=== Survey Site Sign Up ===\n");

    let username = prompt("Username")?;
    let email = prompt("Email")?;
    let password = rpassword::prompt_password("Password: ")?;

    let api = ApiClient::with_base_url(config.api_base_url.clone())?;
    let request = SignupRequest {
        username: username.clone(),
        email,
        password,
    };

    match api.signup(&request).await {
        Ok(message) => {
            println!("{}", message);
            let mut config = config.clone();
            config.last_username = Some(username);
            if let Err(e) = config.save() {
                warn!(error = %e, "Failed to save config");
            }
            println!("Run `survey-login` to sign in.");
            Ok(())
        }
        Err(e) => Err(e.context("Sign up failed")),
    }
}

fn logout(config: &Config) -> Result<()> {
    config.token_store()?.clear()?;
    println!("Signed out.");
    Ok(())
}

async fn ping(config: &Config) -> Result<()> {
    let api = ApiClient::with_base_url(config.api_base_url.clone())?;
    let message = api
        .probe()
        .await
        .with_context(|| format!("{} is not reachable", api.base_url()))?;
    println!("{}: {}", api.base_url(), message);
    Ok(())
}
