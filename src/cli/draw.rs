//! Headless draw command
//!
//! Runs the same start/tick/stop cycle as the interactive screen, without
//! waiting between ticks.

use std::path::Path;

use anyhow::{Context, Result};

use super::output::Output;
use crate::domain::DrawSession;
use crate::storage::{Config, HistoryStore};

/// Commit `count` draws and print them
pub fn run(
    output: &Output,
    config: &Config,
    count: usize,
    seed: Option<u64>,
    export: Option<&Path>,
) -> Result<()> {
    let options = config.draw.session_options(seed);
    let mut session = DrawSession::new(&config.draw.categories, options)
        .context("Invalid category configuration")?;

    output.verbose_ctx(
        "draw",
        &format!(
            "Drawing {} number(s) from {} pending, {} preview ticks each, seed {:?}",
            count,
            session.registry().remaining(),
            config.draw.spin_ticks,
            options.seed
        ),
    );

    for _ in 0..count {
        if let Err(e) = session.start() {
            match e.rejection() {
                Some(reason) => {
                    output.warn(&format!(
                        "Stopped after {} draw(s): {}",
                        session.history().len(),
                        reason
                    ));
                    break;
                }
                None => return Err(e.into()),
            }
        }

        for _ in 0..config.draw.spin_ticks {
            if let Some(preview) = session.tick() {
                output.verbose_ctx("draw", &format!("preview {}", preview));
            }
        }

        let entry = session.stop()?;
        output.entry(&entry, false);
    }

    if output.is_json() {
        let entries: Vec<_> = session.history().all().collect();
        output.data(&serde_json::json!({
            "draws": entries,
            "remaining": session.registry().remaining(),
            "exhausted": session.is_exhausted(),
        }));
    } else if session.is_exhausted() {
        println!();
        println!("All numbers have been drawn!");
    }

    if let Some(path) = export {
        HistoryStore::new(path).write_all(session.history())?;
        output.verbose_ctx("draw", &format!("Exported history to: {}", path.display()));
        if !output.is_json() {
            println!("History written to {}", path.display());
        }
    }

    Ok(())
}
