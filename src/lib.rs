pub mod ai;
pub mod cli;
pub mod config;
pub mod pipeline;

use clap::Parser;
use cli::Cli;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

pub fn run() -> ExitCode {
    // Load .env file - current dir first, then its parent
    config::load_dotenv();

    // Initialize tracing with RUST_LOG env filter
    // Default: warn for most crates, info for our crate (per-file progress visible)
    // Logs go to stderr; stdout carries analysis reports and the completion line
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("warn,testforge_lib=info")),
        )
        .init();

    let cli = Cli::parse();

    // One file at a time: a single-threaded runtime is all the pipeline needs
    let runtime = match tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
    {
        Ok(runtime) => runtime,
        Err(e) => {
            tracing::error!("Failed to start async runtime: {}", e);
            return ExitCode::FAILURE;
        }
    };

    runtime.block_on(cli.run())
}
