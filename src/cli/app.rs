//! Main CLI application structure

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};

use super::output::{Output, OutputFormat};
use super::{draw, history_cmd, pools, tui};
use crate::storage::{Config, CONFIG_FILE};

#[derive(Parser)]
#[command(name = "tombola")]
#[command(author, version, about = "Live raffle drawing from weighted number pools")]
#[command(propagate_version = true)]
pub struct Cli {
    /// Output format
    #[arg(long, short = 'f', global = true, default_value = "text")]
    pub format: OutputFormat,

    /// Enable verbose output for debugging
    #[arg(long, short = 'v', global = true)]
    pub verbose: bool,

    /// Path to a config file (defaults to ./tombola.toml, then the global config)
    #[arg(long, short = 'c', global = true, env = "TOMBOLA_CONFIG")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Write a default config file
    Init {
        /// Where to write the config
        #[arg(default_value = CONFIG_FILE)]
        path: PathBuf,

        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },

    /// Show configured pools and their selection shares
    Pools,

    /// Draw numbers without the interactive screen
    Draw {
        /// Number of draws to commit
        #[arg(long, short = 'n', default_value = "1")]
        count: usize,

        /// Seed for reproducible draws
        #[arg(long)]
        seed: Option<u64>,

        /// Write the drawn numbers to a JSONL file
        #[arg(long)]
        export: Option<PathBuf>,
    },

    /// Run the interactive drawing screen
    Spin {
        /// Seed for reproducible draws
        #[arg(long)]
        seed: Option<u64>,

        /// Write the drawn numbers to a JSONL file on exit
        #[arg(long)]
        export: Option<PathBuf>,
    },

    /// Show a previously exported draw history
    History {
        /// JSONL file written by --export
        path: PathBuf,
    },
}

/// Main entry point for the CLI
pub fn run() -> Result<()> {
    let cli = Cli::parse();
    let output = Output::new(cli.format, cli.verbose);

    output.verbose("Tombola starting");

    match cli.command {
        Commands::Init { path, force } => {
            output.verbose_ctx("init", &format!("Writing default config to: {}", path.display()));
            if Config::write_default(&path, force)? {
                output.success(&format!("Wrote config to {}", path.display()));
            } else {
                output.success(&format!(
                    "Config already exists at {} (use --force to overwrite)",
                    path.display()
                ));
            }
        }

        Commands::Pools => {
            let config = load_config(&output, cli.config.as_deref())?;
            pools::run(&output, &config)?
        }

        Commands::Draw { count, seed, export } => {
            let config = load_config(&output, cli.config.as_deref())?;
            draw::run(&output, &config, count, seed, export.as_deref())?
        }

        Commands::Spin { seed, export } => {
            let config = load_config(&output, cli.config.as_deref())?;
            tui::run(&output, &config, seed, export.as_deref())?
        }

        Commands::History { path } => history_cmd::run(&output, &path)?,
    }

    output.verbose("Command completed successfully");
    Ok(())
}

fn load_config(output: &Output, explicit: Option<&std::path::Path>) -> Result<Config> {
    let config = Config::load(explicit)?;
    match &config.source {
        Some(path) => output.verbose_ctx("config", &format!("Loaded config from: {}", path.display())),
        None => output.verbose_ctx("config", "No config file found, using defaults"),
    }
    Ok(config)
}
