// Trim interactor - Drives one trim session from load to save

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use tempfile::TempDir;

use crate::app::notifications::NotificationCenter;
use crate::domain::errors::*;
use crate::domain::model::*;
use crate::domain::rules::*;
use crate::ports::*;
use crate::utils::PathUtils;

/// Knobs the trim workflow reads from configuration
#[derive(Debug, Clone, PartialEq)]
pub struct TrimSettings {
    pub max_size_mb: u32,
    pub auto_compress: bool,
    pub audio_bitrate_kbps: u32,
    pub notification_timeout: Duration,
}

impl Default for TrimSettings {
    fn default() -> Self {
        Self {
            max_size_mb: 50,
            auto_compress: true,
            audio_bitrate_kbps: 128,
            notification_timeout: Duration::from_millis(5000),
        }
    }
}

/// Ports used by the trimmer
#[derive(Clone)]
pub struct TrimPorts {
    pub probe: Arc<dyn MediaProbePort>,
    pub trimmer: Arc<dyn TrimPort>,
    pub clipboard: Arc<dyn ClipboardPort>,
    pub dialog: Arc<dyn DialogPort>,
    pub fs: Arc<dyn FsPort>,
}

/// Controller for the trimmer view.
///
/// Every user-facing failure is reported through the notification center
/// as well as returned, so the view only has to print notifications.
pub struct TrimController {
    ports: TrimPorts,
    settings: TrimSettings,
    session: TrimSession,
    notifications: NotificationCenter,
    work_dir: TempDir,
}

impl TrimController {
    /// Create a controller with its own temporary directory for artifacts
    pub fn new(ports: TrimPorts, settings: TrimSettings) -> Result<Self, DomainError> {
        let work_dir = tempfile::Builder::new()
            .prefix("otrim_")
            .tempdir()
            .map_err(|e| DomainError::FsFail(format!("Failed to create temp directory: {}", e)))?;
        Ok(Self {
            notifications: NotificationCenter::new(settings.notification_timeout),
            ports,
            settings,
            session: TrimSession::new(),
            work_dir,
        })
    }

    pub fn session(&self) -> &TrimSession {
        &self.session
    }

    pub fn settings(&self) -> &TrimSettings {
        &self.settings
    }

    pub fn notifications(&mut self) -> &mut NotificationCenter {
        &mut self.notifications
    }

    /// Where trims and re-encodes are written
    pub fn work_dir(&self) -> &Path {
        self.work_dir.path()
    }

    /// Probe port, for running the duration lookup off the view loop
    pub fn prober(&self) -> Arc<dyn MediaProbePort> {
        Arc::clone(&self.ports.probe)
    }

    /// Start a new session on `input` (plain path or `file://` URL).
    ///
    /// The duration is unknown until `on_media_loaded` is called with the
    /// probe result.
    pub async fn load_file(&mut self, input: &str) -> Result<PathBuf, DomainError> {
        let path = PathUtils::normalize_input(input);
        if !self.ports.fs.file_exists(&path).await {
            // The current session and its cut stay usable
            let error = DomainError::FileNotFound(path.display().to_string());
            self.notifications.error(format!("Cannot open video: {}", error));
            return Err(error);
        }

        tracing::info!(path = %path.display(), "Loading video");
        self.session.load(path.clone());
        Ok(path)
    }

    /// Apply the media layer's answer for `path`.
    ///
    /// Answers for a file other than the current one are ignored.
    pub fn on_media_loaded(&mut self, path: &Path, result: Result<MediaInfo, DomainError>) {
        if self.session.source_path() != Some(path) {
            tracing::debug!(path = %path.display(), "Ignoring stale probe result");
            return;
        }
        match result {
            Ok(info) => {
                self.session.set_duration(info.duration);
                if info.duration.millis == 0 {
                    self.notifications
                        .error("Could not determine the video duration");
                } else {
                    self.notifications.info(format!(
                        "Loaded {} ({})",
                        PathUtils::display_name(path),
                        info.duration
                    ));
                }
            }
            Err(e) => {
                self.notifications
                    .error(format!("Failed to load video: {}", e));
            }
        }
    }

    /// Move the start handle; rejected moves leave both bounds unchanged
    pub fn set_start(&mut self, position: TimeSpec) -> Result<TimeSpec, DomainError> {
        let result = self.session.set_start(position);
        self.report_rejection(&result);
        result
    }

    /// Move the end handle; rejected moves leave both bounds unchanged
    pub fn set_end(&mut self, position: TimeSpec) -> Result<TimeSpec, DomainError> {
        let result = self.session.set_end(position);
        self.report_rejection(&result);
        result
    }

    pub fn nudge_start(&mut self, delta_ms: i64) -> Result<TimeSpec, DomainError> {
        let target = BoundsPolicy::offset(self.session.start(), delta_ms);
        self.set_start(target)
    }

    pub fn nudge_end(&mut self, delta_ms: i64) -> Result<TimeSpec, DomainError> {
        let target = BoundsPolicy::offset(self.session.end(), delta_ms);
        self.set_end(target)
    }

    fn report_rejection(&mut self, result: &Result<TimeSpec, DomainError>) {
        if let Err(e) = result {
            self.notifications.error(e.to_string());
        }
    }

    /// Cut the current selection into the work directory.
    ///
    /// When auto-compression is enabled and the cut is larger than the
    /// configured cap, it is re-encoded afterwards; a failed re-encode keeps
    /// the uncompressed cut.
    pub async fn commit_trim(&mut self) -> Result<(), DomainError> {
        if let Err(e) = self.session.ensure_committable() {
            self.notifications.error(e.to_string());
            return Err(e);
        }
        let source = match self.session.source_path() {
            Some(source) => source.to_path_buf(),
            None => return Err(DomainError::InvalidState("No video loaded".to_string())),
        };

        let request = TrimRequest {
            output: self
                .work_dir
                .path()
                .join(PathUtils::trimmed_file_name(&source)),
            source,
            start: self.session.start(),
            end: self.session.end(),
        };

        if let Err(e) = self.ports.trimmer.trim(&request).await {
            self.session.commit_failed();
            self.notifications
                .error(format!("Error trimming video: {}", e));
            return Err(e);
        }

        let size_bytes = self.ports.fs.file_size(&request.output).await.unwrap_or(0);
        self.session
            .commit(TrimArtifact::new(request.output.clone(), size_bytes));
        tracing::info!(
            output = %request.output.display(),
            size = %SizeFormatter::format(size_bytes),
            "Trim created"
        );
        self.notifications
            .success("Trim created and ready to save or copy");

        if self.settings.auto_compress
            && !CompressionPlanner::fits(size_bytes, self.settings.max_size_mb)
        {
            // Failure is already reported; the uncompressed cut remains usable
            let _ = self.compress_to_size(self.settings.max_size_mb).await;
        }
        Ok(())
    }

    /// Re-encode the committed cut so it fits in `max_size_mb`
    pub async fn compress_to_size(&mut self, max_size_mb: u32) -> Result<(), DomainError> {
        let artifact = match self.session.ensure_artifact() {
            Ok(artifact) => artifact.clone(),
            Err(e) => {
                self.notifications.error(e.to_string());
                return Err(e);
            }
        };

        if CompressionPlanner::fits(artifact.size_bytes, max_size_mb) {
            self.notifications
                .info("Video already fits size requirement");
            return Ok(());
        }

        let duration = match self.ports.probe.probe_media(&artifact.trimmed).await {
            Ok(info) if info.duration.millis > 0 => info.duration,
            _ => self.session.selection(),
        };

        let video_bitrate = match CompressionPlanner::target_bitrate(max_size_mb, duration) {
            Ok(bitrate) => bitrate,
            Err(e) => {
                self.notifications
                    .error(format!("Error compressing video: {}", e));
                return Err(e);
            }
        };

        let request = CompressRequest {
            input: artifact.trimmed.clone(),
            output: self.work_dir.path().join(PathUtils::compressed_file_name()),
            video_bitrate,
            audio_bitrate_kbps: self.settings.audio_bitrate_kbps,
        };
        self.notifications.info(format!(
            "Compressing {} to fit {} MB",
            SizeFormatter::format(artifact.size_bytes),
            max_size_mb
        ));

        if let Err(e) = self.ports.trimmer.compress(&request).await {
            self.notifications.error(format!(
                "Error compressing video, keeping the uncompressed trim: {}",
                e
            ));
            return Err(e);
        }

        let compressed_size = self.ports.fs.file_size(&request.output).await.unwrap_or(0);
        self.session.attach_compressed(request.output);
        self.notifications.success(format!(
            "Compressed to {:.1}MB",
            SizeFormatter::megabytes(compressed_size)
        ));
        Ok(())
    }

    /// Put the deliverable on the clipboard
    pub async fn copy_result(&mut self) -> Result<(), DomainError> {
        let deliverable = match self.session.ensure_artifact() {
            Ok(artifact) => artifact.deliverable().to_path_buf(),
            Err(e) => {
                self.notifications.error(e.to_string());
                return Err(e);
            }
        };

        match self.ports.clipboard.copy_file(&deliverable).await {
            Ok(()) => {
                let size = self.ports.fs.file_size(&deliverable).await.unwrap_or(0);
                self.notifications.success(format!(
                    "Video copied to clipboard ({:.1}MB)",
                    SizeFormatter::megabytes(size)
                ));
                Ok(())
            }
            Err(e) => {
                self.notifications
                    .error(format!("Clipboard operation error: {}", e));
                Err(e)
            }
        }
    }

    /// Save the deliverable to `dest`, or ask the dialog port when `None`.
    ///
    /// Returns `Ok(None)` when the dialog was cancelled.
    pub async fn save_result(
        &mut self,
        dest: Option<PathBuf>,
    ) -> Result<Option<PathBuf>, DomainError> {
        let deliverable = match self.session.ensure_artifact() {
            Ok(artifact) => artifact.deliverable().to_path_buf(),
            Err(e) => {
                self.notifications.error(e.to_string());
                return Err(e);
            }
        };

        let dest = match dest {
            Some(dest) => dest,
            None => match self.ask_save_location().await {
                Ok(Some(dest)) => dest,
                Ok(None) => return Ok(None),
                Err(e) => {
                    self.notifications
                        .error(format!("Error saving file: {}", e));
                    return Err(e);
                }
            },
        };

        match self.ports.fs.copy_file(&deliverable, &dest).await {
            Ok(bytes) => {
                self.notifications.success(format!(
                    "Saved to: {} ({:.1}MB)",
                    dest.display(),
                    SizeFormatter::megabytes(bytes)
                ));
                Ok(Some(dest))
            }
            Err(e) => {
                self.notifications
                    .error(format!("Error saving file: {}", e));
                Err(e)
            }
        }
    }

    async fn ask_save_location(&self) -> Result<Option<PathBuf>, DomainError> {
        let source = self
            .session
            .source_path()
            .ok_or_else(|| DomainError::InvalidState("No video loaded".to_string()))?;
        let suggested = PathUtils::suggested_save_path(source, &PathUtils::home_dir());
        self.ports.dialog.save_location(&suggested).await
    }
}
