//! Terminal User Interface Module
//!
//! Interactive client for the search and ingest services, built with Ratatui.
//!
//! # Layout
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │            Job Search Console    ● search  ● ingest          │
//! └──────────────────────────────────────────────────────────────┘
//!  Search │ Upload
//! ┌─ Query ──────────────────────────────────────────────────────┐
//! │ Search job listings...                                       │
//! └──────────────────────────────────────────────────────────────┘
//!  Results: [5]    [ ] Use AI
//!  Got 3 result(s)
//! ┌─ Results (3) ────────────────────────────────────────────────┐
//! │ [1] Backend Engineer                                         │
//! │     Full-time at Acme                                        │
//! └──────────────────────────────────────────────────────────────┘
//!  [Enter] Search [Tab] Focus [↑↓] Scroll [F2] Switch [F1] Help
//! ```
//!
//! The upload view swaps the middle region for a mode selector (JSON, form,
//! spreadsheet) and the selected panel.

pub mod app;
pub mod event;
pub mod theme;
pub mod ui;
pub mod widgets;

pub use app::{App, AppEvent, View};
pub use event::{AppAction, EventHandler};

use crate::config::Config;
use crate::ingest::IngestClient;
use crate::search::SearchClient;
use crossterm::{
    event::{DisableBracketedPaste, DisableMouseCapture, EnableBracketedPaste, EnableMouseCapture},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::backend::CrosstermBackend;
use ratatui::layout::Rect;
use ratatui::Terminal;
use std::io::{self, Stdout};
use std::sync::Arc;
use std::time::Duration;
use tracing::{error, info};

/// Type alias for our terminal backend
pub type Tui = Terminal<CrosstermBackend<Stdout>>;

/// Initialize the terminal for TUI mode
pub fn init_terminal() -> anyhow::Result<Tui> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture, EnableBracketedPaste)?;
    let backend = CrosstermBackend::new(stdout);
    let terminal = Terminal::new(backend)?;
    Ok(terminal)
}

/// Restore the terminal to its original state
pub fn restore_terminal(terminal: &mut Tui) -> anyhow::Result<()> {
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        DisableBracketedPaste,
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;
    Ok(())
}

/// Run the TUI application
pub async fn run(config: Config) -> anyhow::Result<()> {
    info!(
        search = %config.search.base_url,
        ingest = %config.ingest.base_url,
        "Starting TUI mode"
    );

    let search = Arc::new(SearchClient::new(&config.search)?);
    let ingest = Arc::new(IngestClient::new(&config.ingest)?);
    let mut app = App::new(&config, search, ingest);

    let mut terminal = init_terminal()?;
    let mut events = EventHandler::new(Duration::from_millis(100));

    app.refresh_health();
    let result = run_app(&mut terminal, &mut app, &mut events).await;

    if let Err(e) = restore_terminal(&mut terminal) {
        error!("Failed to restore terminal: {}", e);
    }

    result
}

/// Main application loop
async fn run_app(terminal: &mut Tui, app: &mut App, events: &mut EventHandler) -> anyhow::Result<()> {
    loop {
        // Results of background requests
        app.poll_events();

        let size = terminal.size()?;
        app.calculate_scroll_bounds(Rect::new(0, 0, size.width, size.height));
        terminal.draw(|frame| ui::render(frame, app))?;

        // Blocks until a key, a paste or the next tick
        match events.next().await {
            Some(AppAction::Quit) | Some(AppAction::ForceQuit) | None => break,
            Some(action) => app.handle_action(action),
        }
    }

    info!("TUI exited normally");
    Ok(())
}
