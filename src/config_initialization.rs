//! Configuration initialization and hierarchy management

use std::path::PathBuf;

use tracing::{debug, info};

use crate::adapters::toml_config::{AppConfig, TomlConfigAdapter};
use crate::cli::Cli;
use crate::error::{OtrimError, OtrimResult};
use crate::utils::logging::{LogFormat, LogLevel};

/// Where the effective configuration came from
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConfigSources {
    pub file: Option<PathBuf>,
    pub env_overrides: usize,
    pub cli_overrides: usize,
}

impl ConfigSources {
    /// Report the sources; call once logging is up
    pub fn log(&self) {
        match &self.file {
            Some(path) => info!("Loaded configuration from: {}", path.display()),
            None => debug!("No configuration file, using defaults"),
        }
        if self.env_overrides > 0 {
            info!("Applied {} environment variable overrides", self.env_overrides);
        }
        if self.cli_overrides > 0 {
            info!("Applied {} CLI configuration overrides", self.cli_overrides);
        }
    }
}

/// Build the configuration following precedence: CLI > Env > File > Defaults
pub fn initialize_configuration_hierarchy(cli: &Cli) -> OtrimResult<(AppConfig, ConfigSources)> {
    initialize_with_env(cli, std::env::vars(), TomlConfigAdapter::default_config_path())
}

/// Same as `initialize_configuration_hierarchy` with explicit inputs
pub fn initialize_with_env<I>(
    cli: &Cli,
    env: I,
    default_file: Option<PathBuf>,
) -> OtrimResult<(AppConfig, ConfigSources)>
where
    I: IntoIterator<Item = (String, String)>,
{
    let mut sources = ConfigSources::default();

    // Step 1 and 2: defaults, then the file if there is one
    let mut config = match load_config_file(cli, default_file)? {
        Some((path, config)) => {
            sources.file = Some(path);
            config
        }
        None => AppConfig::default(),
    };

    // Step 3: environment
    sources.env_overrides = TomlConfigAdapter::apply_env_overrides(&mut config, env)
        .map_err(config_error)?;

    // Step 4: command line
    sources.cli_overrides = apply_cli_configuration_overrides(&mut config, cli)?;

    TomlConfigAdapter::validate(&config).map_err(config_error)?;
    Ok((config, sources))
}

/// An explicit `--config` must exist; the default location is optional
fn load_config_file(
    cli: &Cli,
    default_file: Option<PathBuf>,
) -> OtrimResult<Option<(PathBuf, AppConfig)>> {
    let path = match (&cli.config.config, default_file) {
        (Some(explicit), _) => explicit.clone(),
        (None, Some(default)) if default.is_file() => default,
        _ => return Ok(None),
    };
    let config = TomlConfigAdapter::load_config(&path).map_err(config_error)?;
    Ok(Some((path, config)))
}

fn apply_cli_configuration_overrides(config: &mut AppConfig, cli: &Cli) -> OtrimResult<usize> {
    let mut cli_overrides = 0;

    if let Some(level) = &cli.logging.log_level {
        config.logging.level = LogLevel::parse(level).map_err(config_error)?;
        cli_overrides += 1;
    }
    if let Some(format) = &cli.logging.log_format {
        config.logging.format = LogFormat::parse(format).map_err(config_error)?;
        cli_overrides += 1;
    }
    if let Some(max_size) = cli.config.max_size {
        config.trim.max_size_mb = max_size;
        cli_overrides += 1;
    }
    if cli.config.no_thumbnails {
        config.gallery.thumbnails = false;
        cli_overrides += 1;
    }

    Ok(cli_overrides)
}

fn config_error(e: crate::domain::errors::DomainError) -> OtrimError {
    OtrimError::ConfigError {
        message: e.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use clap::Parser;

    use super::*;

    fn env(pairs: &[(&str, &str)]) -> Vec<(String, String)> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_defaults_without_file() {
        let cli = Cli::parse_from(["otrim"]);
        let (config, sources) = initialize_with_env(&cli, Vec::new(), None).unwrap();
        assert_eq!(config, AppConfig::default());
        assert_eq!(sources, ConfigSources::default());
    }

    #[test]
    fn test_precedence_cli_over_env_over_file() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("config.toml");
        std::fs::write(
            &file,
            "[trim]\nmax_size_mb = 10\naudio_bitrate_kbps = 96\n[gallery]\nthumbnail_width = 200\n",
        )
        .unwrap();

        let cli = Cli::parse_from(["otrim", "--max-size", "30"]);
        let (config, sources) = initialize_with_env(
            &cli,
            env(&[("OTRIM_MAX_SIZE_MB", "20"), ("OTRIM_THUMBNAILS", "false")]),
            Some(file.clone()),
        )
        .unwrap();

        assert_eq!(config.trim.max_size_mb, 30);
        assert!(!config.gallery.thumbnails);
        assert_eq!(config.trim.audio_bitrate_kbps, 96);
        assert_eq!(config.gallery.thumbnail_width, 200);
        assert_eq!(sources.file, Some(file));
        assert_eq!(sources.env_overrides, 2);
        assert_eq!(sources.cli_overrides, 1);
    }

    #[test]
    fn test_explicit_missing_config_fails() {
        let cli = Cli::parse_from(["otrim", "--config", "/nonexistent/otrim.toml"]);
        assert!(matches!(
            initialize_with_env(&cli, Vec::new(), None),
            Err(OtrimError::ConfigError { .. })
        ));
    }

    #[test]
    fn test_bad_log_level_fails() {
        let cli = Cli::parse_from(["otrim", "--log-level", "chatty"]);
        assert!(initialize_with_env(&cli, Vec::new(), None).is_err());
    }
}
