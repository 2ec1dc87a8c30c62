//! # feedgen
//!
//! Demo runner for the feed batch fan-out: seeds in-memory feeds, submits
//! `GenerateFeed` for each, and lets a worker group drain the bus.

mod cli;
mod commands;
mod demo;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;
use tracing_subscriber::{EnvFilter, Layer, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use feedgen_core::config::{FeedgenConfig, LogFormat};

use cli::{Cli, Commands};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = match &cli.command {
        Commands::Run(args) => match &args.config {
            Some(path) => FeedgenConfig::load(path)
                .with_context(|| format!("failed to load {}", path.display()))?,
            None => FeedgenConfig::default(),
        },
        Commands::Validate(_) => FeedgenConfig::default(),
    };

    init_logging(&cli, &config)?;
    info!(version = env!("CARGO_PKG_VERSION"), "feedgen starting");

    let result = match &cli.command {
        Commands::Run(args) => commands::run(args, &config).await,
        Commands::Validate(args) => commands::validate(args),
    };

    if let Err(ref e) = result {
        tracing::error!(error = %e, "command failed");
    }
    result
}

/// CLI flags win over the config file; `RUST_LOG` wins over both.
fn init_logging(cli: &Cli, config: &FeedgenConfig) -> Result<()> {
    let filter = if cli.quiet {
        EnvFilter::new("warn")
    } else {
        let default_level = match cli.verbose {
            0 => config.logging.level.as_str(),
            1 => "debug",
            _ => "trace",
        };
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level))
    };

    let format = cli
        .log_format
        .map(LogFormat::from)
        .unwrap_or(config.logging.format);

    let fmt_layer = match format {
        LogFormat::Json => fmt::layer()
            .json()
            .with_target(true)
            .with_thread_ids(true)
            .with_file(true)
            .with_line_number(true)
            .with_writer(std::io::stderr)
            .boxed(),
        LogFormat::Pretty => fmt::layer().pretty().with_writer(std::io::stderr).boxed(),
        LogFormat::Compact => fmt::layer().compact().with_writer(std::io::stderr).boxed(),
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt_layer)
        .try_init()
        .context("failed to initialize tracing subscriber")?;
    Ok(())
}
