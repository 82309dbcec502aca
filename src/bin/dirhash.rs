//! dirhash CLI Binary
//!
//! Hashes a directory tree and writes the `results` file.

use anyhow::Context;
use clap::Parser;
use dirhash::cli::{Cli, RunContext};
use dirhash::logging::init_logging;
use std::process;
use tracing::{error, info};

fn main() {
    let cli = Cli::parse();

    if let Err(e) = run(&cli) {
        error!("Run failed: {:#}", e);
        // Debug output carries the full cause chain (and a backtrace when
        // RUST_BACKTRACE is set).
        eprintln!("Error: {:?}", e);
        process::exit(1);
    }
}

fn run(cli: &Cli) -> anyhow::Result<()> {
    let context = RunContext::from_cli(cli).context("Invalid configuration")?;

    init_logging(&context.config().logging).context("Failed to initialize logging")?;
    info!("dirhash starting");

    println!("input path: {}", context.root().display());

    let summary = context
        .execute()
        .with_context(|| format!("Failed to hash {}", context.root().display()))?;

    info!(
        root_digest = %summary.root_digest,
        entry_count = summary.entry_count,
        output = %summary.output_path.display(),
        "Run completed successfully"
    );
    Ok(())
}
