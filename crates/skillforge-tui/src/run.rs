//! Main event loop for the terminal wizard.
//!
//! Sets up the terminal in raw mode with an alternate screen, runs the
//! draw-and-poll loop, and restores the terminal on exit.

use std::io;

use crossterm::event::{self, Event};
use crossterm::execute;
use crossterm::terminal::{EnterAlternateScreen, LeaveAlternateScreen};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;

use crate::error::Result;
use crate::ui;
use crate::wizard::{AppAction, Wizard};

/// Run the wizard event loop.
///
/// Takes ownership of the terminal for the duration of the session: raw mode
/// is enabled and an alternate screen buffer is used so the user's existing
/// terminal content is preserved.
///
/// # Errors
///
/// Returns a [`TuiError`](crate::error::TuiError) if terminal setup, drawing,
/// or event handling fails.
pub async fn run_tui(mut wizard: Wizard) -> Result<()> {
    // Set up the terminal.
    crossterm::terminal::enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    tracing::info!("wizard event loop started");

    // Main event loop.
    let result = event_loop(&mut terminal, &mut wizard).await;

    // Restore the terminal regardless of whether the loop succeeded.
    crossterm::terminal::disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    tracing::info!("wizard event loop ended");

    result
}

/// The inner event loop, separated so terminal cleanup always runs.
async fn event_loop(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    wizard: &mut Wizard,
) -> Result<()> {
    loop {
        // Draw the current state.
        terminal.draw(|frame| ui::draw(frame, wizard))?;

        // Poll for crossterm events with a short timeout so we can also
        // check for build/deploy completions.
        if event::poll(std::time::Duration::from_millis(50))?
            && let Event::Key(key) = event::read()?
            && key.kind == crossterm::event::KeyEventKind::Press
            && wizard.handle_key(key) == AppAction::Quit
        {
            break;
        }

        // Check for completions from the background task.
        wizard.process_events();
    }

    Ok(())
}
