//! Show an exported draw history

use std::path::Path;

use anyhow::Result;

use super::output::Output;
use crate::storage::HistoryStore;

pub fn run(output: &Output, path: &Path) -> Result<()> {
    let store = HistoryStore::new(path);
    let entries = store.read_all()?;
    output.verbose_ctx("history", &format!("Read {} entries from {}", entries.len(), path.display()));

    if output.is_json() {
        output.data(&entries);
    } else if entries.is_empty() {
        println!("No draws recorded in {}", path.display());
    } else {
        println!("{:>4}  {:>6}  {:<16} TIME", "#", "NUMBER", "CATEGORY");
        println!("{}", "-".repeat(50));
        for entry in &entries {
            output.entry(entry, true);
        }
        println!();
        println!("{} draw(s)", entries.len());
    }

    Ok(())
}
