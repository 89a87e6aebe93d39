//! Interactive drawing screen
//!
//! Shows the spinning preview, the drawn numbers and the remaining pool
//! sizes using ratatui.

mod app;
mod event;
mod ui;
mod utils;
mod views;

use std::panic::{self, AssertUnwindSafe};
use std::path::Path;

use anyhow::{anyhow, Result};

use super::Output;
use crate::storage::{Config, HistoryStore};
use app::App;
use event::EventHandler;

/// Launch the TUI
pub fn run(output: &Output, config: &Config, seed: Option<u64>, export: Option<&Path>) -> Result<()> {
    output.verbose_ctx("tui", "Initializing TUI application");

    // Build the session before touching the terminal so config errors print normally
    let mut app = App::new(&config.draw, seed)?;

    let mut terminal = ui::init_terminal()?;

    // Wake often enough that ticks land close to their deadline
    let frame_ms = (config.draw.tick_ms / 2).clamp(10, 50);
    let event_handler = EventHandler::new(frame_ms);

    // Run the main loop with panic safety
    // This ensures terminal is restored even if the app panics
    let result = panic::catch_unwind(AssertUnwindSafe(|| {
        app.run(&mut terminal, event_handler)
    }));

    // Always restore terminal, even on panic
    let restore_result = ui::restore_terminal();

    match result {
        Ok(inner_result) => {
            restore_result?;
            inner_result?;
        }
        Err(panic_payload) => {
            let _ = restore_result;
            return if let Some(s) = panic_payload.downcast_ref::<&str>() {
                Err(anyhow!("TUI panicked: {}", s))
            } else if let Some(s) = panic_payload.downcast_ref::<String>() {
                Err(anyhow!("TUI panicked: {}", s))
            } else {
                Err(anyhow!("TUI panicked with unknown error"))
            };
        }
    }

    let history = app.session().history();
    output.verbose_ctx("tui", &format!("Session ended with {} draw(s)", history.len()));

    if let Some(path) = export {
        HistoryStore::new(path).write_all(history)?;
        output.success(&format!("Wrote {} draw(s) to {}", history.len(), path.display()));
    }

    Ok(())
}
