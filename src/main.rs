use anyhow::Context;
use bisync::commands::sync;
use bisync::config::Cli;
use bisync::Config;
use clap::Parser;
use tracing_subscriber::EnvFilter;

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    // Converting validates both roots before anything is scanned
    let config = Config::try_from(cli).context("cannot start sync")?;

    let summary = sync::run(config).context("sync aborted")?;
    if !summary.is_clean() {
        tracing::warn!(failed = summary.failures.len(), "some files could not be copied");
    }

    Ok(())
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}
