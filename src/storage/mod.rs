//! # Storage Layer
//!
//! Configuration loading and history export.
//!
//! | Data | Format | Location |
//! |------|--------|----------|
//! | Config | TOML | `--config`, `./tombola.toml`, or the global config dir |
//! | History export | JSONL (one entry per line) | path given with `--export` |
//!
//! The draw engine itself never touches the filesystem.

mod config;
mod history;

pub use config::{Config, DrawConfig, SettingsError, CONFIG_FILE};
pub use history::HistoryStore;
