//! CLI module for OTrim
//!
//! This module handles command-line argument parsing and launch mode selection.

use clap::Parser;

pub mod args;
pub mod commands;
pub mod launch;

/// OTrim video trimmer
///
/// With a video file, opens the trimmer on it. With a directory (or -g for
/// the current one), opens a gallery of the videos it contains. Without
/// arguments, asks for a file with the desktop file selector.
#[derive(Parser, Debug)]
#[command(name = "otrim")]
#[command(about = "OTrim - Trim videos and pick them from a gallery")]
#[command(version)]
pub struct Cli {
    /// Video file to trim, or directory to browse
    #[arg(value_name = "PATH", conflicts_with = "gallery")]
    pub path: Option<String>,

    /// Open a gallery of the videos in the current directory
    #[arg(short = 'g', long)]
    pub gallery: bool,

    #[command(flatten)]
    pub logging: args::LoggingArgs,

    #[command(flatten)]
    pub config: args::ConfigArgs,
}

pub use launch::{resolve_launch, LaunchMode};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_path_and_gallery_conflict() {
        assert!(Cli::try_parse_from(["otrim", "-g", "clip.mp4"]).is_err());
    }

    #[test]
    fn test_parse_options() {
        let cli = Cli::try_parse_from([
            "otrim",
            "--max-size",
            "25",
            "--no-thumbnails",
            "--log-level",
            "debug",
            "videos",
        ])
        .unwrap();
        assert_eq!(cli.path.as_deref(), Some("videos"));
        assert_eq!(cli.config.max_size, Some(25));
        assert!(cli.config.no_thumbnails);
        assert_eq!(cli.logging.log_level.as_deref(), Some("debug"));
        assert!(Cli::try_parse_from(["otrim", "--max-size", "0"]).is_err());
    }
}
