//! # mt-cli
//!
//! Command-line interface for Monthly Targets.
//!
//! - `mt demo` — walk the demo month through all three dashboards
//! - `mt board` — print the supervisor's target board
//! - `mt replay <file>` — apply a JSONL command script
//! - `mt shell` — interactive session on one shared workbench

mod commands;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use mt_workbench::WorkbenchConfig;
use tracing_subscriber::EnvFilter;

/// Monthly Targets — issue targets, run activities, track progress.
#[derive(Parser)]
#[command(name = "mt", version, about)]
struct Cli {
    /// Project root directory; config is read from `.mt/config.toml` inside it.
    #[arg(long, default_value = ".")]
    project_root: PathBuf,

    /// Config file to use instead of `<project-root>/.mt/config.toml`.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Start from an empty ledger instead of the demo data.
    #[arg(long)]
    no_seed: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Walk through issuing, accepting and completing on every dashboard.
    Demo,
    /// Print every target with its progress.
    Board {
        /// Only show targets for this month (YYYY-MM).
        #[arg(long)]
        month: Option<String>,
    },
    /// Apply a JSONL command script.
    Replay {
        /// Script file, one command per line.
        file: PathBuf,
        /// Print step reports as JSON lines.
        #[arg(long)]
        json: bool,
        /// Write the final targets and activities to this JSON file.
        #[arg(long)]
        export: Option<PathBuf>,
    },
    /// Interactive session.
    Shell,
}

fn main() -> anyhow::Result<()> {
    // Logs go to stderr so they don't mix with tables on stdout.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::from_default_env()
                .add_directive("mt_ledger=warn".parse()?)
                .add_directive("mt_workbench=warn".parse()?),
        )
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .init();

    let cli = Cli::parse();
    let mut config = match &cli.config {
        Some(path) => WorkbenchConfig::load(path)?,
        None => {
            let root = cli
                .project_root
                .canonicalize()
                .unwrap_or(cli.project_root.clone());
            WorkbenchConfig::for_project(&root)
        }
    };
    if cli.no_seed {
        config.seed_demo_data = false;
    }

    match &cli.command {
        Commands::Demo => commands::demo::execute(config),
        Commands::Board { month } => commands::board::execute(config, month.as_deref()),
        Commands::Replay { file, json, export } => {
            commands::replay::execute(config, file, *json, export.as_deref())
        }
        Commands::Shell => commands::shell::execute(config),
    }
}
