// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! gw - keep feature branches in sync with trunk, and undo what went wrong

mod commands;
mod error;
mod output;
mod workspace;

use clap::{Parser, Subcommand};
use commands::{clean, history, sync, undo};
use error::GwError;
use std::path::PathBuf;
use std::process::ExitCode;
use workspace::Workspace;

/// Environment variable holding the log filter
const LOG_ENV: &str = "GW_LOG";

#[derive(Parser)]
#[command(
    name = "gw",
    version,
    about = "gw - Git workflow assistant: sync with trunk, undo, clean up"
)]
struct Cli {
    /// Repository directory (defaults to the current directory)
    #[arg(long, global = true)]
    repo: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Rebase the current branch onto the latest trunk and push it
    Sync(sync::SyncArgs),
    /// Undo recent operations
    Undo(undo::UndoArgs),
    /// List recorded operations
    History(history::HistoryArgs),
    /// Delete branches that have landed
    Clean(clean::CleanArgs),
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    setup_logging();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            report(&e);
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let ws = Workspace::open(cli.repo).await?;

    match cli.command {
        Commands::Sync(args) => sync::sync(args, &ws).await,
        Commands::Undo(args) => undo::undo(args, &ws).await,
        Commands::History(args) => history::history(args, &ws),
        Commands::Clean(args) => clean::clean(args, &ws).await,
    }
}

fn setup_logging() {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr).with_target(false))
        .init();
}

fn report(err: &anyhow::Error) {
    match err.downcast_ref::<GwError>() {
        Some(gw) => eprint!("{}", gw),
        None => eprintln!("error: {:#}", err),
    }
}
