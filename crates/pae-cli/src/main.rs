mod cli;
mod commands;
mod config;
mod error;
mod logging;
mod utils;

use crate::cli::{Cli, Commands};
use crate::error::{CliError, Result};
use clap::Parser;
use tracing::{debug, error, info};

fn main() {
    let cli = Cli::parse();
    if let Err(e) = run_app(cli) {
        eprintln!("\n❌ Error: {}", e);
        std::process::exit(1);
    }
}

fn run_app(cli: Cli) -> Result<()> {
    logging::setup_logging(cli.verbose, cli.quiet, cli.log_file.as_deref())?;
    info!("PAEConst v{}", env!("CARGO_PKG_VERSION"));
    debug!("Parsed arguments: {:?}", &cli);

    if let Some(threads) = cli.threads {
        configure_thread_pool(threads)?;
    }

    let outcome = match cli.command {
        Commands::Run(args) => commands::run::run(args),
    };
    if let Err(e) = &outcome {
        error!("Run aborted: {}", e);
    }
    outcome
}

fn configure_thread_pool(threads: usize) -> Result<()> {
    info!("Using {} worker thread(s) for cluster classification.", threads);
    rayon::ThreadPoolBuilder::new()
        .num_threads(threads)
        .build_global()
        .map_err(|e| CliError::Other(anyhow::anyhow!("Failed to build global thread pool: {}", e)))
}
