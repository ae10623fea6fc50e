//! Orbweaver main entry point
//!
//! Command-line interface for the Orbweaver web crawler.

use clap::Parser;
use orbweaver::config::load_config;
use orbweaver::crawler::crawl;
use orbweaver::sink::LogSink;
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

/// Orbweaver: a concurrent web crawler
///
/// Orbweaver fetches pages starting from the configured seed URLs,
/// extracts outbound links, and follows newly discovered URLs through a
/// bounded-concurrency download/extract pipeline until no work remains.
#[derive(Parser, Debug)]
#[command(name = "orbweaver")]
#[command(version = "0.3.0")]
#[command(about = "A concurrent web crawler", long_about = None)]
struct Cli {
    /// Path to TOML configuration file
    #[arg(value_name = "CONFIG")]
    config: PathBuf,

    /// Seed URLs in addition to those in the configuration file
    #[arg(short, long, value_name = "URL")]
    seed: Vec<String>,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Setup logging based on verbosity
    setup_logging(cli.verbose, cli.quiet);

    // Load and validate configuration
    tracing::info!("Loading configuration from: {}", cli.config.display());
    let mut config = load_config(&cli.config)?;
    config.site.seeds.extend(cli.seed);

    if config.site.seeds.is_empty() {
        anyhow::bail!("no seed URLs given (config [site] seeds or --seed)");
    }

    // Run the crawler; exits non-zero on configuration errors
    crawl(config, Arc::new(LogSink)).await?;

    tracing::info!("Crawl completed successfully");
    Ok(())
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        // Only show errors
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("orbweaver=info,warn"),
            1 => EnvFilter::new("orbweaver=debug,info"),
            2 => EnvFilter::new("orbweaver=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}
