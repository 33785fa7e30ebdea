//! `rosemary` command-line entry point.
//!
//! # Responsibility
//! - Resolve configuration, start logging, load the data file.
//! - Run one subcommand and save the data file when it mutated the store.

mod commands;
mod config;
mod render;

use anyhow::{Context, Result};
use clap::Parser;
use commands::{execute, Command};
use config::{CliConfig, DEFAULT_DATA_FILE};
use log::info;
use rosemary_core::{init_logging, load_from_file, save_to_file, Rosemary};
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(name = "rosemary")]
#[command(version)]
#[command(about = "Personal knowledge graph of tagged, connected notes")]
struct Cli {
    /// JSON data file
    #[arg(long, env = "ROSEMARY_DATA_FILE", default_value = DEFAULT_DATA_FILE)]
    data_file: PathBuf,

    /// Absolute directory for log files; logging is off when unset
    #[arg(long, env = "ROSEMARY_LOG_DIR")]
    log_dir: Option<PathBuf>,

    /// trace|debug|info|warn|error
    #[arg(long, env = "ROSEMARY_LOG_LEVEL")]
    log_level: Option<String>,

    /// Seed for reproducible ids and random chains
    #[arg(long, env = "ROSEMARY_SEED")]
    seed: Option<u64>,

    #[command(subcommand)]
    command: Command,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = CliConfig::new(cli.data_file, cli.log_dir, cli.log_level);

    if let Some(log_dir) = &config.log_dir {
        init_logging(&config.log_level, log_dir)
            .context("failed to initialize logging")?;
    }

    let mut store = match cli.seed {
        Some(seed) => Rosemary::seeded(seed),
        None => Rosemary::new(),
    };
    load_from_file(&mut store, &config.data_file)
        .with_context(|| format!("failed to load `{}`", config.data_file.display()))?;

    let outcome = execute(&mut store, cli.command)?;
    if outcome.mutated {
        save_to_file(&store, &config.data_file)
            .with_context(|| format!("failed to save `{}`", config.data_file.display()))?;
        info!(
            "event=cli_save module=cli status=ok leaves={}",
            store.leaf_count()
        );
    }
    if !outcome.output.is_empty() {
        println!("{}", outcome.output);
    }
    Ok(())
}
