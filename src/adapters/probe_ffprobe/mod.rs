//! FFprobe adapter for media file probing
//!
//! Runs `ffprobe` with JSON output and reads the container-level duration.

use std::ffi::OsStr;
use std::path::Path;

use async_trait::async_trait;
use serde::Deserialize;

use crate::adapters::process::CommandRunner;
use crate::domain::errors::*;
use crate::domain::model::*;
use crate::ports::*;

#[derive(Debug, Deserialize)]
struct ProbeOutput {
    format: Option<ProbeFormat>,
}

#[derive(Debug, Deserialize)]
struct ProbeFormat {
    duration: Option<String>,
    format_name: Option<String>,
    size: Option<String>,
}

/// FFprobe-based probe adapter
pub struct FFprobeAdapter {
    ffprobe: String,
    runner: CommandRunner,
}

impl FFprobeAdapter {
    /// Create new FFprobe adapter using the given executable
    pub fn new(ffprobe: impl Into<String>) -> Self {
        Self {
            ffprobe: ffprobe.into(),
            runner: CommandRunner::new(),
        }
    }

    /// Turn ffprobe's JSON into `MediaInfo`
    pub fn parse_output(path: &Path, json: &str) -> Result<MediaInfo, DomainError> {
        let output: ProbeOutput = serde_json::from_str(json).map_err(|e| {
            DomainError::InvalidFormat(format!("Failed to parse ffprobe output: {}", e))
        })?;
        let format = output.format.ok_or_else(|| {
            DomainError::InvalidFormat(format!("{} has no container information", path.display()))
        })?;

        let duration = format
            .duration
            .as_deref()
            .and_then(|d| d.trim().parse::<f64>().ok())
            .map(TimeSpec::from_seconds)
            .unwrap_or_default();

        Ok(MediaInfo {
            path: path.to_path_buf(),
            duration,
            format_name: format.format_name,
            size_bytes: format.size.and_then(|s| s.trim().parse::<u64>().ok()),
        })
    }
}

#[async_trait]
impl MediaProbePort for FFprobeAdapter {
    async fn probe_media(&self, path: &Path) -> Result<MediaInfo, DomainError> {
        if !path.is_file() {
            return Err(DomainError::FileNotFound(path.display().to_string()));
        }

        let output = self
            .runner
            .run(
                &self.ffprobe,
                [
                    OsStr::new("-v"),
                    OsStr::new("error"),
                    OsStr::new("-show_entries"),
                    OsStr::new("format=duration,format_name,size"),
                    OsStr::new("-of"),
                    OsStr::new("json"),
                    path.as_os_str(),
                ],
            )
            .await?;

        if !output.success {
            return Err(DomainError::InvalidFormat(format!(
                "{}: {}",
                path.display(),
                output.error_summary()
            )));
        }

        let info = Self::parse_output(path, &output.stdout)?;
        tracing::debug!(
            path = %path.display(),
            duration_ms = info.duration.millis,
            format = ?info.format_name,
            "Probed media file"
        );
        Ok(info)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_duration_and_format() {
        let json = r#"{"format": {"duration": "12.345678", "format_name": "mov,mp4,m4a", "size": "1048576"}}"#;
        let info = FFprobeAdapter::parse_output(Path::new("/v/a.mp4"), json).unwrap();
        assert_eq!(info.duration, TimeSpec::from_millis(12_346));
        assert_eq!(info.format_name.as_deref(), Some("mov,mp4,m4a"));
        assert_eq!(info.size_bytes, Some(1_048_576));
    }

    #[test]
    fn test_missing_duration_is_zero() {
        let json = r#"{"format": {"format_name": "image2"}}"#;
        let info = FFprobeAdapter::parse_output(Path::new("a.png"), json).unwrap();
        assert_eq!(info.duration, TimeSpec::default());
    }

    #[test]
    fn test_garbage_is_invalid_format() {
        let result = FFprobeAdapter::parse_output(Path::new("a.mp4"), "not json");
        assert!(matches!(result, Err(DomainError::InvalidFormat(_))));
        let result = FFprobeAdapter::parse_output(Path::new("a.mp4"), "{}");
        assert!(matches!(result, Err(DomainError::InvalidFormat(_))));
    }

    #[tokio::test]
    async fn test_missing_file() {
        let adapter = FFprobeAdapter::new("ffprobe");
        let result = adapter.probe_media(Path::new("/nonexistent/clip.mp4")).await;
        assert!(matches!(result, Err(DomainError::FileNotFound(_))));
    }
}
