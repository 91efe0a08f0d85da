//! FFmpeg execution adapter
//!
//! Cuts by stream copy (keyframe-aligned, no re-encode) and re-encodes to
//! h264/aac when a size cap must be met.

use std::ffi::OsString;
use std::path::Path;

use async_trait::async_trait;

use crate::adapters::process::CommandRunner;
use crate::domain::errors::*;
use crate::ports::*;

/// FFmpeg-based execution adapter
pub struct FFmpegAdapter {
    ffmpeg: String,
    preset: String,
    runner: CommandRunner,
}

impl FFmpegAdapter {
    /// Create new FFmpeg adapter
    pub fn new(ffmpeg: impl Into<String>, preset: impl Into<String>) -> Self {
        Self {
            ffmpeg: ffmpeg.into(),
            preset: preset.into(),
            runner: CommandRunner::new(),
        }
    }

    /// Arguments for a stream-copy cut of `[start, end)`
    pub fn trim_args(request: &TrimRequest) -> Vec<OsString> {
        vec![
            "-y".into(),
            "-i".into(),
            request.source.clone().into_os_string(),
            "-ss".into(),
            format_seconds(request.start.as_seconds()).into(),
            "-t".into(),
            format_seconds(request.length().as_seconds()).into(),
            "-c".into(),
            "copy".into(),
            request.output.clone().into_os_string(),
        ]
    }

    /// Arguments for a bitrate-targeted h264/aac re-encode
    pub fn compress_args(&self, request: &CompressRequest) -> Vec<OsString> {
        vec![
            "-y".into(),
            "-i".into(),
            request.input.clone().into_os_string(),
            "-c:v".into(),
            "libx264".into(),
            "-b:v".into(),
            request.video_bitrate.to_string().into(),
            "-preset".into(),
            self.preset.clone().into(),
            "-c:a".into(),
            "aac".into(),
            "-b:a".into(),
            format!("{}k", request.audio_bitrate_kbps).into(),
            request.output.clone().into_os_string(),
        ]
    }

    async fn ensure_output(path: &Path) -> Result<(), DomainError> {
        match tokio::fs::metadata(path).await {
            Ok(meta) if meta.len() > 0 => Ok(()),
            _ => Err(DomainError::ProcessingError(format!(
                "ffmpeg produced no output at {}",
                path.display()
            ))),
        }
    }
}

fn format_seconds(seconds: f64) -> String {
    format!("{:.3}", seconds)
}

#[async_trait]
impl TrimPort for FFmpegAdapter {
    async fn trim(&self, request: &TrimRequest) -> Result<(), DomainError> {
        if request.length().millis == 0 {
            return Err(DomainError::InvalidTimeRange(
                "selection is empty".to_string(),
            ));
        }

        tracing::info!(
            source = %request.source.display(),
            start = %request.start,
            end = %request.end,
            output = %request.output.display(),
            "Trimming video"
        );
        self.runner
            .run_checked(&self.ffmpeg, Self::trim_args(request))
            .await?;
        Self::ensure_output(&request.output).await
    }

    async fn compress(&self, request: &CompressRequest) -> Result<(), DomainError> {
        tracing::info!(
            input = %request.input.display(),
            video_bitrate = request.video_bitrate,
            "Compressing video"
        );
        self.runner
            .run_checked(&self.ffmpeg, self.compress_args(request))
            .await?;
        Self::ensure_output(&request.output).await
    }
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use super::*;
    use crate::domain::model::TimeSpec;

    fn strings(args: Vec<OsString>) -> Vec<String> {
        args.into_iter()
            .map(|a| a.to_string_lossy().into_owned())
            .collect()
    }

    #[test]
    fn test_trim_args_stream_copy() {
        let request = TrimRequest {
            source: PathBuf::from("/v/in.mp4"),
            start: TimeSpec::from_millis(1_500),
            end: TimeSpec::from_millis(4_000),
            output: PathBuf::from("/tmp/out.mp4"),
        };
        assert_eq!(
            strings(FFmpegAdapter::trim_args(&request)),
            vec![
                "-y", "-i", "/v/in.mp4", "-ss", "1.500", "-t", "2.500", "-c", "copy",
                "/tmp/out.mp4"
            ]
        );
    }

    #[test]
    fn test_compress_args() {
        let adapter = FFmpegAdapter::new("ffmpeg", "medium");
        let request = CompressRequest {
            input: PathBuf::from("a.mp4"),
            output: PathBuf::from("b.mp4"),
            video_bitrate: 2_000_000,
            audio_bitrate_kbps: 128,
        };
        let args = strings(adapter.compress_args(&request));
        assert!(args.windows(2).any(|w| w == ["-b:v", "2000000"]));
        assert!(args.windows(2).any(|w| w == ["-preset", "medium"]));
        assert!(args.windows(2).any(|w| w == ["-b:a", "128k"]));
        assert_eq!(args.last().map(String::as_str), Some("b.mp4"));
    }

    #[tokio::test]
    async fn test_output_must_be_nonempty() {
        let dir = tempfile::tempdir().unwrap();
        let empty = dir.path().join("empty.mp4");
        let full = dir.path().join("full.mp4");
        std::fs::write(&empty, b"").unwrap();
        std::fs::write(&full, b"data").unwrap();

        assert!(FFmpegAdapter::ensure_output(&full).await.is_ok());
        assert!(matches!(
            FFmpegAdapter::ensure_output(&empty).await,
            Err(DomainError::ProcessingError(_))
        ));
        assert!(FFmpegAdapter::ensure_output(&dir.path().join("missing.mp4"))
            .await
            .is_err());
    }

    #[tokio::test]
    async fn test_missing_ffmpeg_is_unavailable() {
        let adapter = FFmpegAdapter::new("otrim-no-such-ffmpeg", "medium");
        let request = TrimRequest {
            source: PathBuf::from("in.mp4"),
            start: TimeSpec::from_millis(0),
            end: TimeSpec::from_millis(1_000),
            output: PathBuf::from("out.mp4"),
        };
        assert!(matches!(
            adapter.trim(&request).await,
            Err(DomainError::ToolUnavailable(_))
        ));
    }
}
