// TOML config adapter - Configuration management using TOML files

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::domain::errors::*;
use crate::domain::rules::VideoExtensions;
use crate::utils::logging::{LogFormat, LogLevel, LoggingConfig};

/// External tool locations
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ToolsConfig {
    pub ffmpeg: String,
    pub ffprobe: String,
}

impl Default for ToolsConfig {
    fn default() -> Self {
        Self {
            ffmpeg: "ffmpeg".to_string(),
            ffprobe: "ffprobe".to_string(),
        }
    }
}

/// Trim and re-encode settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrimConfig {
    /// Size cap for auto-compression, in MB
    pub max_size_mb: u32,
    /// Re-encode after a commit when the cut exceeds `max_size_mb`
    pub auto_compress: bool,
    pub audio_bitrate_kbps: u32,
    pub preset: String,
}

impl Default for TrimConfig {
    fn default() -> Self {
        Self {
            max_size_mb: 50,
            auto_compress: true,
            audio_bitrate_kbps: 128,
            preset: "medium".to_string(),
        }
    }
}

/// Gallery listing and thumbnails
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GalleryConfig {
    pub extensions: Vec<String>,
    pub thumbnails: bool,
    pub thumbnail_width: u32,
    pub thumbnail_concurrency: usize,
    pub thumbnail_timeout_secs: u64,
    /// Overrides the cache location for generated thumbnails
    #[serde(skip_serializing_if = "Option::is_none")]
    pub thumbnail_dir: Option<PathBuf>,
}

impl Default for GalleryConfig {
    fn default() -> Self {
        Self {
            extensions: VideoExtensions::defaults(),
            thumbnails: true,
            thumbnail_width: 320,
            thumbnail_concurrency: 4,
            thumbnail_timeout_secs: 10,
            thumbnail_dir: None,
        }
    }
}

/// Per-window presentation settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewConfig {
    pub notification_timeout_ms: u64,
    pub nudge_step_ms: u64,
    pub timeline_width: usize,
}

impl Default for ViewConfig {
    fn default() -> Self {
        Self {
            notification_timeout_ms: 5000,
            nudge_step_ms: 100,
            timeline_width: 60,
        }
    }
}

/// Complete application configuration
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub tools: ToolsConfig,
    pub trim: TrimConfig,
    pub gallery: GalleryConfig,
    pub view: ViewConfig,
    pub logging: LoggingConfig,
}

/// TOML configuration adapter
pub struct TomlConfigAdapter;

impl TomlConfigAdapter {
    /// Get default config file path (`<config dir>/otrim/config.toml`)
    pub fn default_config_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("org", "otrim", "otrim")
            .map(|dirs| dirs.config_dir().join("config.toml"))
    }

    /// Default thumbnail cache directory
    pub fn default_thumbnail_dir() -> PathBuf {
        directories::ProjectDirs::from("org", "otrim", "otrim")
            .map(|dirs| dirs.cache_dir().join("thumbnails"))
            .unwrap_or_else(|| std::env::temp_dir().join("otrim_thumbnails"))
    }

    /// Deserialize config from TOML string
    pub fn parse(toml_content: &str) -> Result<AppConfig, DomainError> {
        toml::from_str(toml_content)
            .map_err(|e| DomainError::BadArgs(format!("Failed to parse TOML config: {}", e)))
    }

    /// Load configuration from file
    pub fn load_config(path: &Path) -> Result<AppConfig, DomainError> {
        if !path.exists() {
            return Err(DomainError::FileNotFound(format!(
                "Config file does not exist: {}",
                path.display()
            )));
        }

        let content = std::fs::read_to_string(path)
            .map_err(|e| DomainError::FsFail(format!("Failed to read config file: {}", e)))?;
        let config = Self::parse(&content)?;
        tracing::debug!(path = %path.display(), "Loaded configuration file");
        Ok(config)
    }

    /// Serialize config to TOML string
    pub fn serialize(config: &AppConfig) -> Result<String, DomainError> {
        toml::to_string_pretty(config)
            .map_err(|e| DomainError::BadArgs(format!("Failed to serialize config: {}", e)))
    }

    /// Apply `OTRIM_*` overrides; returns how many were applied
    pub fn apply_env_overrides<I>(config: &mut AppConfig, vars: I) -> Result<usize, DomainError>
    where
        I: IntoIterator<Item = (String, String)>,
    {
        let mut applied = 0;
        for (key, value) in vars {
            let matched = match key.as_str() {
                "OTRIM_FFMPEG" => {
                    config.tools.ffmpeg = value.clone();
                    true
                }
                "OTRIM_FFPROBE" => {
                    config.tools.ffprobe = value.clone();
                    true
                }
                "OTRIM_MAX_SIZE_MB" => {
                    config.trim.max_size_mb = parse_value(&key, &value)?;
                    true
                }
                "OTRIM_AUTO_COMPRESS" => {
                    config.trim.auto_compress = parse_value(&key, &value)?;
                    true
                }
                "OTRIM_THUMBNAILS" => {
                    config.gallery.thumbnails = parse_value(&key, &value)?;
                    true
                }
                "OTRIM_NOTIFICATION_TIMEOUT_MS" => {
                    config.view.notification_timeout_ms = parse_value(&key, &value)?;
                    true
                }
                "OTRIM_LOG_LEVEL" => {
                    config.logging.level = LogLevel::parse(&value)?;
                    true
                }
                "OTRIM_LOG_FORMAT" => {
                    config.logging.format = LogFormat::parse(&value)?;
                    true
                }
                _ => false,
            };
            if matched {
                tracing::debug!("Found environment override: {} = {}", key, value);
                applied += 1;
            }
        }
        Ok(applied)
    }

    /// Validate configuration
    pub fn validate(config: &AppConfig) -> Result<(), DomainError> {
        if config.trim.max_size_mb == 0 {
            return Err(DomainError::BadArgs(
                "trim.max_size_mb must be at least 1".to_string(),
            ));
        }
        if config.gallery.thumbnail_concurrency == 0 {
            return Err(DomainError::BadArgs(
                "gallery.thumbnail_concurrency must be at least 1".to_string(),
            ));
        }
        if config.gallery.extensions.is_empty() {
            return Err(DomainError::BadArgs(
                "gallery.extensions cannot be empty".to_string(),
            ));
        }
        if config.tools.ffmpeg.trim().is_empty() || config.tools.ffprobe.trim().is_empty() {
            return Err(DomainError::BadArgs(
                "tools.ffmpeg and tools.ffprobe must be set".to_string(),
            ));
        }
        Ok(())
    }
}

fn parse_value<T: std::str::FromStr>(key: &str, value: &str) -> Result<T, DomainError> {
    value
        .trim()
        .parse()
        .map_err(|_| DomainError::BadArgs(format!("Invalid value for {}: {}", key, value)))
}
