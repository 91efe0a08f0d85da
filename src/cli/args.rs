//! Command-line argument definitions

use std::path::PathBuf;

use clap::Args;

/// Logging options
#[derive(Args, Debug, Clone, Default)]
pub struct LoggingArgs {
    /// Logging level (trace, debug, info, warn, error)
    #[arg(long, value_name = "LEVEL")]
    pub log_level: Option<String>,

    /// Log output format (pretty, compact, json)
    #[arg(long, value_name = "FORMAT")]
    pub log_format: Option<String>,
}

/// Overrides for the configuration file
#[derive(Args, Debug, Clone, Default)]
pub struct ConfigArgs {
    /// Configuration file (default: <config dir>/otrim/config.toml)
    #[arg(short = 'c', long = "config", value_name = "FILE", env = "OTRIM_CONFIG")]
    pub config: Option<PathBuf>,

    /// Re-encode trims larger than this many MB
    #[arg(long = "max-size", value_name = "MB", value_parser = clap::value_parser!(u32).range(1..))]
    pub max_size: Option<u32>,

    /// Do not generate gallery thumbnails
    #[arg(long)]
    pub no_thumbnails: bool,
}
