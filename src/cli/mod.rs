//! # Command-Line Interface
//!
//! User-facing commands and output formatting.
//!
//! | Command | Purpose |
//! |---------|---------|
//! | `init` | Write a default `tombola.toml` |
//! | `pools` | Show categories, weights and selection shares |
//! | `draw` | Commit draws without the interactive screen |
//! | `spin` | Interactive drawing screen |
//! | `history` | Show an exported draw history |
//!
//! ## Output Formats
//!
//! All commands support the `--format` flag:
//! - `text` (default) - Human-readable output
//! - `json` - Machine-parseable JSON
//!
//! ## Verbose Mode
//!
//! Use `--verbose` (or `-v`) for debug output:
//! ```bash
//! tombola --verbose draw -n 3
//! ```
//!
//! ## Entry Point
//!
//! Call [`run()`] to parse arguments and execute the appropriate command.

mod app;
mod draw;
mod history_cmd;
mod output;
mod pools;
mod tui;

pub use app::{run, Cli, Commands};
pub use output::{Output, OutputFormat};
