//! Gallery thumbnails via a single ffmpeg frame grab
//!
//! Frames are cached under a directory keyed by a hash of the source path.
//! When extraction fails a system `video-x-generic` icon stands in.

use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::time::Duration;

use async_trait::async_trait;

use crate::adapters::process::CommandRunner;
use crate::ports::*;

/// Icon locations tried, in order, when no frame can be extracted
pub const FALLBACK_ICONS: &[&str] = &[
    "/usr/share/icons/breeze/mimetypes/64/video-x-generic.svg",
    "/usr/share/icons/hicolor/64x64/mimetypes/video-x-generic.png",
    "/usr/share/icons/hicolor/scalable/mimetypes/video-x-generic.svg",
    "/usr/share/icons/Adwaita/64x64/mimetypes/video-x-generic.png",
];

pub struct FFmpegThumbnailAdapter {
    ffmpeg: String,
    cache_dir: PathBuf,
    width: u32,
    runner: CommandRunner,
    fallback_icons: Vec<PathBuf>,
}

impl FFmpegThumbnailAdapter {
    pub fn new(ffmpeg: impl Into<String>, cache_dir: PathBuf, width: u32, timeout: Duration) -> Self {
        Self {
            ffmpeg: ffmpeg.into(),
            cache_dir,
            width,
            runner: CommandRunner::with_timeout(timeout),
            fallback_icons: FALLBACK_ICONS.iter().map(PathBuf::from).collect(),
        }
    }

    /// Replace the icon search list
    pub fn with_fallback_icons(mut self, icons: Vec<PathBuf>) -> Self {
        self.fallback_icons = icons;
        self
    }

    /// Cache location for `video`'s thumbnail
    pub fn cache_path(&self, video: &Path) -> PathBuf {
        let hash = blake3::hash(video.to_string_lossy().as_bytes());
        self.cache_dir.join(format!("{}.jpg", hash.to_hex()))
    }

    fn frame_args(&self, video: &Path, output: &Path) -> Vec<OsString> {
        vec![
            "-y".into(),
            "-i".into(),
            video.as_os_str().to_owned(),
            "-ss".into(),
            "00:00:01".into(),
            "-vframes".into(),
            "1".into(),
            "-vf".into(),
            format!("scale={}:-1", self.width).into(),
            output.as_os_str().to_owned(),
        ]
    }

    async fn extract_frame(&self, video: &Path, output: &Path) -> bool {
        if let Err(e) = tokio::fs::create_dir_all(&self.cache_dir).await {
            tracing::warn!(dir = %self.cache_dir.display(), error = %e, "Cannot create thumbnail cache");
            return false;
        }

        match self.runner.run(&self.ffmpeg, self.frame_args(video, output)).await {
            Ok(result) if result.success => is_nonempty_file(output).await,
            Ok(result) => {
                tracing::debug!(
                    video = %video.display(),
                    reason = %result.error_summary(),
                    "Thumbnail generation failed"
                );
                false
            }
            Err(e) => {
                tracing::debug!(video = %video.display(), error = %e, "Thumbnail generation failed");
                false
            }
        }
    }

    async fn fallback_icon(&self) -> Option<PathBuf> {
        for icon in &self.fallback_icons {
            if tokio::fs::metadata(icon).await.is_ok() {
                return Some(icon.clone());
            }
        }
        None
    }
}

async fn is_nonempty_file(path: &Path) -> bool {
    tokio::fs::metadata(path)
        .await
        .map(|meta| meta.is_file() && meta.len() > 0)
        .unwrap_or(false)
}

#[async_trait]
impl ThumbnailPort for FFmpegThumbnailAdapter {
    async fn thumbnail_for(&self, video: &Path) -> Option<PathBuf> {
        let cached = self.cache_path(video);
        if is_nonempty_file(&cached).await {
            return Some(cached);
        }
        if self.extract_frame(video, &cached).await {
            return Some(cached);
        }
        self.fallback_icon().await
    }
}
