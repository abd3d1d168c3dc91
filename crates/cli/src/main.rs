// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! queuectl - durable job queue control

mod color;
mod commands;
mod output;

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use queuectl_storage::Store;

use commands::config::ConfigCommand;
use commands::job::{EnqueueArgs, ListArgs, RetryArgs};
use output::OutputFormat;

#[derive(Parser)]
#[command(name = "queuectl", version, about = "Durable job queue control")]
struct Cli {
    /// Path to the store database (overrides QUEUECTL_DB_PATH and the
    /// configured default)
    #[arg(long, global = true)]
    db_path: Option<PathBuf>,

    /// Output format
    #[arg(short = 'o', long = "output", value_enum, default_value_t, global = true)]
    output: OutputFormat,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Submit a new job
    Enqueue(EnqueueArgs),
    /// Show a single job
    Get { id: String },
    /// List jobs, optionally filtered by state
    List(ListArgs),
    /// Aggregate job counts by state
    Counts,
    /// Move a dead-letter job back to pending
    Retry(RetryArgs),
    /// Read or write store-persisted configuration
    Config {
        #[command(subcommand)]
        command: ConfigCommand,
    },
    /// Start a worker pool under a fresh supervisor
    Start {
        /// Number of worker processes
        #[arg(default_value_t = 1)]
        n: u32,
    },
    /// Request graceful shutdown of the running supervisor
    Stop,
    /// Report whether a supervisor is running, and how many workers
    Status,
}

fn main() {
    if let Err(e) = run() {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::command_with_styles();
    let format = cli.output;
    let db_path = Store::resolve_db_path(cli.db_path.as_deref());

    // Supervisor control commands never touch the store directly (they
    // talk to a separate supervisor process via the filesystem markers),
    // so they're dispatched before a `Store` is opened.
    match cli.command {
        Commands::Start { n } => return commands::supervisor::start(&db_path, n),
        Commands::Stop => return commands::supervisor::stop(&db_path),
        Commands::Status => return commands::supervisor::status(&db_path, format),
        Commands::Enqueue(args) => {
            let store = Store::open(&db_path)?;
            commands::job::enqueue(&store, args, format)
        }
        Commands::Get { id } => {
            let store = Store::open(&db_path)?;
            commands::job::get(&store, &id, format)
        }
        Commands::List(args) => {
            let store = Store::open(&db_path)?;
            commands::job::list(&store, args, format)
        }
        Commands::Counts => {
            let store = Store::open(&db_path)?;
            commands::job::counts(&store, format)
        }
        Commands::Retry(args) => {
            let store = Store::open(&db_path)?;
            commands::job::retry(&store, args, format)
        }
        Commands::Config { command } => {
            let store = Store::open(&db_path)?;
            commands::config::handle(&store, command)
        }
    }
}

impl Cli {
    /// Parse argv, applying the project's clap color styles.
    fn command_with_styles() -> Cli {
        use clap::CommandFactory;
        let matches = Cli::command().styles(color::styles()).get_matches();
        <Cli as clap::FromArgMatches>::from_arg_matches(&matches).unwrap_or_else(|e| e.exit())
    }
}
