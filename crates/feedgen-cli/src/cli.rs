//! CLI argument definitions.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

/// feedgen - fan feed generation out into batch commands
#[derive(Parser, Debug)]
#[command(name = "feedgen", version, about = "Feed batch fan-out demo runner")]
pub struct Cli {
    /// Increase logging verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Only log warnings and errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Log output format (overrides the config file)
    #[arg(long, value_enum, global = true, env = "FEEDGEN_LOG_FORMAT")]
    pub log_format: Option<LogFormat>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Seed demo feeds, generate them and report the result
    Run(RunArgs),

    /// Check a configuration file and print the effective settings
    Validate(ValidateArgs),
}

#[derive(Parser, Debug, Clone)]
pub struct RunArgs {
    /// Configuration file (TOML); defaults apply when omitted
    #[arg(short, long, env = "FEEDGEN_CONFIG")]
    pub config: Option<PathBuf>,

    /// Number of demo feeds to generate
    #[arg(short = 'n', long, default_value_t = 2)]
    pub feeds: u32,

    /// Products in the demo catalog
    #[arg(long, default_value_t = 250)]
    pub products: u32,

    /// Products per batch
    #[arg(long, default_value_t = 100, value_parser = clap::value_parser!(u32).range(1..))]
    pub batch_size: u32,

    /// Also submit a feed whose feed type is not registered
    #[arg(long)]
    pub with_broken_feed: bool,

    /// Give up waiting for the bus after this many seconds
    #[arg(long, default_value_t = 30)]
    pub timeout_secs: u64,
}

#[derive(Parser, Debug, Clone)]
pub struct ValidateArgs {
    /// Configuration file (TOML)
    #[arg(short, long, default_value = "feedgen.toml", env = "FEEDGEN_CONFIG")]
    pub config: PathBuf,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogFormat {
    Pretty,
    Compact,
    Json,
}

impl From<LogFormat> for feedgen_core::config::LogFormat {
    fn from(format: LogFormat) -> Self {
        match format {
            LogFormat::Pretty => Self::Pretty,
            LogFormat::Compact => Self::Compact,
            LogFormat::Json => Self::Json,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn run_defaults() {
        let cli = Cli::try_parse_from(["feedgen", "run"]).unwrap();
        let Commands::Run(args) = cli.command else {
            panic!("expected run");
        };
        assert_eq!(args.feeds, 2);
        assert_eq!(args.batch_size, 100);
        assert!(args.config.is_none());
        assert!(!args.with_broken_feed);
    }

    #[test]
    fn zero_batch_size_is_rejected() {
        assert!(Cli::try_parse_from(["feedgen", "run", "--batch-size", "0"]).is_err());
    }
}
