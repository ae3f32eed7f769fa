//! bookswipe - Terminal Book Discovery
//!
//! Shows one randomly discovered book at a time. Skip it or like it; liked
//! books are collected in a gallery for the rest of the session.

use std::io;
use std::sync::Arc;
use std::time::Duration;
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::{Backend, CrosstermBackend},
    Terminal,
};
use tracing::info;

use bookswipe::application::{App, AppMode};
use bookswipe::infrastructure::{init_logging, install_panic_hook, Config, GoogleBooksClient};
use bookswipe::presentation::{render_ui, InputHandler};

/// How long to wait for a key press before checking on the book search.
const TICK: Duration = Duration::from_millis(100);

/// Entry point for the bookswipe terminal application.
///
/// Loads configuration from the environment, routes logs to a file, sets up
/// the terminal interface and runs the main event loop until the user quits.
///
/// # Errors
///
/// Returns an error if the configuration is invalid, the log file or HTTP
/// client cannot be set up, or the terminal interface fails.
fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load()?;
    init_logging(&config.log_file)?;
    config.log_summary();

    let lookup = GoogleBooksClient::new(&config.api_url, config.http_timeout)?;
    let mut app = App::new(Arc::new(lookup), config.generator.clone(), config.retry);

    install_panic_hook();
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    app.start_fetch();
    let res = run_app(&mut terminal, &mut app);
    app.shutdown();

    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        println!("{err:?}");
    }

    info!(liked = app.liked.len(), "session ended");
    Ok(())
}

/// Main application event loop.
///
/// Redraws, applies any progress from the background search, and handles
/// key presses. Continues until the user presses 'q' outside of dialogs.
///
/// # Errors
///
/// Returns an IO error if terminal operations fail.
fn run_app<B: Backend>(terminal: &mut Terminal<B>, app: &mut App) -> io::Result<()> {
    loop {
        app.poll_fetch();
        terminal.draw(|f| render_ui(f, app))?;

        if !event::poll(TICK)? {
            continue;
        }

        if let Event::Key(key) = event::read()? {
            if key.kind == KeyEventKind::Press {
                match key.code {
                    KeyCode::Char('q') if matches!(app.mode, AppMode::Swipe | AppMode::Liked) => return Ok(()),
                    _ => InputHandler::handle_key_event(app, key.code, key.modifiers),
                }
            }
        }
    }
}
