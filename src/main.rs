//! OTrim video trimmer
//!
//! Trims a video between two handles with ffmpeg stream copy, re-encodes the
//! result to fit a size limit, and copies or saves it. A gallery mode lists
//! the videos in a directory and opens each one in its own trimmer.
//!
//! # Usage
//!
//! ```bash
//! otrim clip.mp4       # trimmer on a file
//! otrim ~/Videos       # gallery of a directory
//! otrim -g             # gallery of the current directory
//! otrim                # pick a file with zenity or kdialog
//! ```

use std::ffi::OsString;
use std::io::Write;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{debug, error, info};

use otrim::app::DefaultAppContainer;
use otrim::cli::{commands, launch, resolve_launch, Cli, LaunchMode};
use otrim::config_initialization::initialize_configuration_hierarchy;
use otrim::utils::logging::init_logging;

#[tokio::main]
async fn main() {
    let code = match run(Cli::parse()).await {
        Ok(()) => 0,
        Err(e) => {
            error!("{:#}", e);
            eprintln!("Error: {:#}", e);
            1
        }
    };

    // stdin readers would keep the runtime from shutting down
    let _ = std::io::stdout().flush();
    std::process::exit(code);
}

async fn run(cli: Cli) -> Result<()> {
    let (config, sources) = initialize_configuration_hierarchy(&cli)?;
    init_logging(&config.logging);
    sources.log();
    info!("Starting OTrim {}", env!("CARGO_PKG_VERSION"));

    let container = DefaultAppContainer::new(&config, trimmer_launch_args(&cli))
        .context("Failed to set up the application")?;

    let cwd = launch::current_dir()?;
    let mode = resolve_launch(cli.path.as_deref(), cli.gallery, &cwd)?;
    debug!(?mode, "Resolved launch mode");

    match mode {
        LaunchMode::Trimmer(video) => {
            commands::run_trimmer(&container, Some(video.to_string_lossy().into_owned())).await?
        }
        LaunchMode::Gallery(dir) => commands::run_gallery(&container, &dir).await?,
        LaunchMode::Pick => commands::pick(&container, &cwd).await?,
    }

    info!("OTrim finished");
    Ok(())
}

/// Options a trimmer started from the gallery inherits
fn trimmer_launch_args(cli: &Cli) -> Vec<OsString> {
    let mut args = Vec::new();
    if let Some(config) = &cli.config.config {
        args.push(OsString::from("--config"));
        args.push(config.clone().into_os_string());
    }
    if let Some(max_size) = cli.config.max_size {
        args.push(OsString::from("--max-size"));
        args.push(OsString::from(max_size.to_string()));
    }
    if let Some(level) = &cli.logging.log_level {
        args.push(OsString::from("--log-level"));
        args.push(OsString::from(level));
    }
    args
}
