//! JSONL export of the draw history
//!
//! Each committed draw is one JSON object per line, in commit order.
//! The engine keeps history in memory only; this store is how a finished
//! event is saved and shown again later.

use std::fs::{self, File, OpenOptions};
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use fs2::FileExt;

use crate::domain::HistoryEntry;

/// Store for exported history in JSONL format
pub struct HistoryStore {
    path: PathBuf,
}

impl HistoryStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Reads all entries in file order
    pub fn read_all(&self) -> Result<Vec<HistoryEntry>> {
        let file = File::open(&self.path)
            .with_context(|| format!("Failed to open history: {}", self.path.display()))?;

        file.lock_shared()
            .context("Failed to acquire read lock on history")?;

        let reader = BufReader::new(&file);
        let mut entries = Vec::new();

        for (line_num, line) in reader.lines().enumerate() {
            let line = line.with_context(|| format!("Failed to read line {}", line_num + 1))?;

            if line.trim().is_empty() {
                continue;
            }

            let entry: HistoryEntry = serde_json::from_str(&line)
                .with_context(|| format!("Failed to parse history entry at line {}", line_num + 1))?;
            entries.push(entry);
        }

        Ok(entries)
    }

    /// Writes the given entries, replacing any previous export
    pub fn write_all<'a>(&self, entries: impl IntoIterator<Item = &'a HistoryEntry>) -> Result<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
        }

        let temp_path = self.path.with_extension("jsonl.tmp");

        {
            let file = OpenOptions::new()
                .write(true)
                .create(true)
                .truncate(true)
                .open(&temp_path)
                .with_context(|| format!("Failed to create temp file: {}", temp_path.display()))?;

            file.lock_exclusive()
                .context("Failed to acquire write lock on history")?;

            let mut writer = BufWriter::new(&file);
            for entry in entries {
                let line = serde_json::to_string(entry).context("Failed to serialize history entry")?;
                writeln!(writer, "{}", line).context("Failed to write history entry")?;
            }

            writer.flush().context("Failed to flush history")?;
        }

        fs::rename(&temp_path, &self.path).with_context(|| {
            format!(
                "Failed to rename {} to {}",
                temp_path.display(),
                self.path.display()
            )
        })?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Draw, DrawValue, HistoryLedger};
    use chrono::Utc;
    use tempfile::TempDir;

    fn ledger() -> HistoryLedger {
        let mut ledger = HistoryLedger::new();
        for (category, number, suffix) in [("red", 12, None), ("tickets", 3, Some("T"))] {
            ledger.append(
                Draw {
                    category: category.into(),
                    value: DrawValue {
                        number,
                        suffix: suffix.map(String::from),
                    },
                },
                Utc::now(),
            );
        }
        ledger
    }

    #[test]
    fn write_then_read_keeps_order() {
        let dir = TempDir::new().unwrap();
        let store = HistoryStore::new(dir.path().join("draws.jsonl"));
        let ledger = ledger();

        store.write_all(ledger.all()).unwrap();
        let entries = store.read_all().unwrap();

        assert_eq!(entries, ledger.all().cloned().collect::<Vec<_>>());
        assert_eq!(entries[1].value.to_string(), "3T");
        assert!(!dir.path().join("draws.jsonl.tmp").exists());
    }

    #[test]
    fn write_replaces_previous_export() {
        let dir = TempDir::new().unwrap();
        let store = HistoryStore::new(dir.path().join("draws.jsonl"));

        store.write_all(ledger().all()).unwrap();
        store.write_all(&HistoryLedger::new()).unwrap();

        assert!(store.read_all().unwrap().is_empty());
    }

    #[test]
    fn read_skips_blank_lines() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("draws.jsonl");
        let line = serde_json::to_string(ledger().last().unwrap()).unwrap();
        fs::write(&path, format!("\n{}\n\n", line)).unwrap();

        let entries = HistoryStore::new(&path).read_all().unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].category.as_str(), "tickets");
    }

    #[test]
    fn read_missing_file_fails() {
        let dir = TempDir::new().unwrap();
        let store = HistoryStore::new(dir.path().join("missing.jsonl"));
        assert!(store.read_all().is_err());
    }
}
