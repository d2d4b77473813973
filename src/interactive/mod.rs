//! Interactive terminal UI for the occupancy overview
//!
//! Navigate the weekly crew-occupancy chart, adjust filters, and drill down
//! into the projects behind any week's count, without leaving the terminal.

pub mod app;
pub mod events;
pub mod filter_form;
pub mod messages;
pub mod occupancy_chart;
pub mod ui;
pub mod utils;
pub mod week_detail;

pub use app::App;
pub use events::EventHandler;

use anyhow::{anyhow, Result};
use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io;

use crate::config::Config;
use crate::dashboard::DashboardClient;

/// Run the interactive UI application
pub async fn run_interactive() -> Result<()> {
    // Interactive mode needs existing credentials; the CLI commands own the
    // first-run setup dialogue
    let config = Config::load().map_err(|_| {
        anyhow!("No dashboard configuration found. Run `bezetting overview` once to set it up.")
    })?;
    let client = DashboardClient::new(config.base_url.clone(), config.api_key.clone());

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Create app and run
    let mut app = App::new(client).await?;
    let res = run_app(&mut terminal, &mut app).await;

    // Restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        eprintln!("Error: {:?}", err);
    }

    Ok(())
}

/// Main application loop
async fn run_app<B: ratatui::backend::Backend>(
    terminal: &mut Terminal<B>,
    app: &mut App,
) -> Result<()> {
    let event_handler = EventHandler::new();

    loop {
        app.prune_messages();

        // Draw UI
        terminal.draw(|f| ui::draw(f, app))?;

        // Handle events
        if let Some(event) = event_handler.next()? {
            if !app.handle_event(event).await? {
                break;
            }
        }
    }

    Ok(())
}

// Made with Bob
