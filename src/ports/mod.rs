// Ports - Interface definitions (contracts)

use std::path::{Path, PathBuf};

use async_trait::async_trait;

use crate::domain::errors::*;
use crate::domain::model::*;

/// Port for media file probing
#[async_trait]
pub trait MediaProbePort: Send + Sync {
    /// Probe a media file; fails when the file is not readable as media
    async fn probe_media(&self, path: &Path) -> Result<MediaInfo, DomainError>;
}

/// A cut request handed to the trim tool
#[derive(Debug, Clone, PartialEq)]
pub struct TrimRequest {
    pub source: PathBuf,
    pub start: TimeSpec,
    pub end: TimeSpec,
    pub output: PathBuf,
}

impl TrimRequest {
    pub fn length(&self) -> TimeSpec {
        TimeSpec::from_millis(self.end.millis.saturating_sub(self.start.millis))
    }
}

/// A size-capped re-encode request
#[derive(Debug, Clone, PartialEq)]
pub struct CompressRequest {
    pub input: PathBuf,
    pub output: PathBuf,
    pub video_bitrate: u64,
    pub audio_bitrate_kbps: u32,
}

/// Port for the external cut/transcode operation
#[async_trait]
pub trait TrimPort: Send + Sync {
    /// Produce `request.output` covering `[start, end)` of the source
    async fn trim(&self, request: &TrimRequest) -> Result<(), DomainError>;

    /// Re-encode `request.input` at the requested bitrate
    async fn compress(&self, request: &CompressRequest) -> Result<(), DomainError>;
}

/// Port for per-file thumbnail generation (best effort)
#[async_trait]
pub trait ThumbnailPort: Send + Sync {
    /// Path of an image representing `video`, or `None` when nothing could be produced
    async fn thumbnail_for(&self, video: &Path) -> Option<PathBuf>;
}

/// Port for the desktop clipboard
#[async_trait]
pub trait ClipboardPort: Send + Sync {
    /// Offer `file` for pasting into other applications
    async fn copy_file(&self, file: &Path) -> Result<(), DomainError>;
}

/// Port for desktop file dialogs
#[async_trait]
pub trait DialogPort: Send + Sync {
    /// Whether any dialog tool can be started on this system
    async fn is_available(&self) -> bool;

    /// Ask the user for a video to open; `Ok(None)` when nothing was chosen
    async fn pick_video(&self, start_dir: &Path) -> Result<Option<PathBuf>, DomainError>;

    /// Ask the user where to save; `Ok(None)` when cancelled
    async fn save_location(&self, suggested: &Path) -> Result<Option<PathBuf>, DomainError>;
}

/// Port for file system operations
#[async_trait]
pub trait FsPort: Send + Sync {
    /// Non-recursive listing of regular files in `dir` with metadata
    async fn list_files(&self, dir: &Path) -> Result<Vec<FileRecord>, DomainError>;

    /// Get file size
    async fn file_size(&self, path: &Path) -> Result<u64, DomainError>;

    /// Check if a readable regular file exists
    async fn file_exists(&self, path: &Path) -> bool;

    /// Copy file, returning bytes written
    async fn copy_file(&self, from: &Path, to: &Path) -> Result<u64, DomainError>;
}

/// Port for starting another instance of this program
pub trait LauncherPort: Send + Sync {
    /// Hand the terminal to a trimmer on `video`. May replace the current
    /// process, in which case it only returns on failure
    fn launch_trimmer(&self, video: &Path) -> Result<(), DomainError>;
}
