//! # Terminal User Interface Module
//!
//! Questo modulo contiene l'interfaccia a form del compressore:
//! - `app`: stato dell'applicazione, event loop, worker thread
//! - `ui`: rendering ratatui
//!
//! Più le funzioni di setup/ripristino del terminale (raw mode e
//! alternate screen via `crossterm`).

pub mod app;
pub mod ui;

pub use app::App;

use anyhow::Result;
use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io;

/// Sets up the terminal for the TUI application.
pub fn setup_terminal() -> Result<Terminal<CrosstermBackend<io::Stdout>>> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    Terminal::new(backend).map_err(Into::into)
}

/// Restores the terminal to its original state.
///
/// Must be called on exit so the terminal is left in a clean state.
pub fn restore_terminal(terminal: &mut Terminal<CrosstermBackend<io::Stdout>>) -> Result<()> {
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;
    Ok(())
}
