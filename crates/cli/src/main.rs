// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! rcp - recipe execution engine CLI (§6).

mod commands;
mod registry;

use anyhow::Result;
use clap::{Parser, Subcommand};

use commands::{analyze, autoroll, bundle, doc, fetch, lint, manual_roll, run, test_cmd};

#[derive(Parser)]
#[command(name = "rcp", version, about = "Recipe execution engine")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a recipe to completion (§6 `run`).
    Run(run::RunArgs),
    /// Run or train simulation specs (§6 `test run` / `test train`).
    Test(test_cmd::TestArgs),
    /// Resolve a repo's manifest and dependency closure (§6 `fetch`).
    Fetch(fetch::FetchArgs),
    /// Package a repo's resolved closure for distribution (§6 `bundle`).
    Bundle(bundle::BundleArgs),
    /// Regenerate a recipe's README from its DEPS (§6 `doc`).
    Doc(doc::DocArgs),
    /// Check a repo's recipes/modules against static rules (§6 `lint`).
    Lint(lint::LintArgs),
    /// Report module reachability/statistics for a repo (§6 `analyze`).
    Analyze(analyze::AnalyzeArgs),
    /// Pin one dependency to a specific revision by hand (§6 `manual_roll`).
    ManualRoll(manual_roll::ManualRollArgs),
    /// Bump every dependency to its latest revision (§6 `autoroll`).
    Autoroll(autoroll::AutorollArgs),
}

#[tokio::main]
async fn main() {
    install_tracing();
    if let Err(e) = run_dispatch().await {
        eprintln!("Error: {e:#}");
        std::process::exit(1);
    }
}

fn install_tracing() {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr))
        .try_init();
}

async fn run_dispatch() -> Result<()> {
    let cli = Cli::parse();
    match cli.command {
        Commands::Run(args) => run::handle(args).await,
        Commands::Test(args) => test_cmd::handle(args).await,
        Commands::Fetch(args) => fetch::handle(args).await,
        Commands::Bundle(args) => bundle::handle(args).await,
        Commands::Doc(args) => doc::handle(args).await,
        Commands::Lint(args) => lint::handle(args).await,
        Commands::Analyze(args) => analyze::handle(args).await,
        Commands::ManualRoll(args) => manual_roll::handle(args).await,
        Commands::Autoroll(args) => autoroll::handle(args).await,
    }
}
