// Gallery interactor - Directory listing, ordering and hand-off to the trimmer

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use crate::app::notifications::NotificationCenter;
use crate::domain::errors::*;
use crate::domain::model::*;
use crate::domain::rules::*;
use crate::ports::*;
use crate::utils::PathUtils;

/// A thumbnail to produce for the load identified by `generation`
#[derive(Debug, Clone, PartialEq)]
pub struct ThumbnailJob {
    pub generation: u64,
    pub video: PathBuf,
}

/// Controller for the gallery view
pub struct GalleryController {
    fs: Arc<dyn FsPort>,
    launcher: Arc<dyn LauncherPort>,
    extensions: Vec<String>,
    model: GalleryModel,
    directory: Option<PathBuf>,
    notifications: NotificationCenter,
}

impl GalleryController {
    pub fn new(
        fs: Arc<dyn FsPort>,
        launcher: Arc<dyn LauncherPort>,
        extensions: Vec<String>,
        notification_timeout: Duration,
    ) -> Self {
        Self {
            fs,
            launcher,
            extensions,
            model: GalleryModel::new(),
            directory: None,
            notifications: NotificationCenter::new(notification_timeout),
        }
    }

    pub fn model(&self) -> &GalleryModel {
        &self.model
    }

    pub fn directory(&self) -> Option<&Path> {
        self.directory.as_deref()
    }

    pub fn notifications(&mut self) -> &mut NotificationCenter {
        &mut self.notifications
    }

    /// Replace the collection with the videos directly inside `dir`.
    ///
    /// An unreadable directory empties the collection and raises an error
    /// notification. Returns the number of videos found.
    pub async fn load_from_directory(&mut self, dir: &Path) -> Result<usize, DomainError> {
        self.directory = Some(dir.to_path_buf());
        let records = match self.fs.list_files(dir).await {
            Ok(records) => records,
            Err(e) => {
                self.model.clear();
                self.notifications
                    .error(format!("Error loading videos: {}", e));
                return Err(e);
            }
        };

        let videos: Vec<FileRecord> = records
            .into_iter()
            .filter(|record| VideoExtensions::is_video(&record.path, &self.extensions))
            .collect();
        let generation = self.model.replace(videos);
        tracing::info!(
            dir = %dir.display(),
            count = self.model.len(),
            generation,
            "Loaded gallery"
        );
        Ok(self.model.len())
    }

    /// Re-scan the last directory
    pub async fn reload(&mut self) -> Result<usize, DomainError> {
        match self.directory.clone() {
            Some(dir) => self.load_from_directory(&dir).await,
            None => Err(DomainError::InvalidState(
                "No directory loaded".to_string(),
            )),
        }
    }

    /// Thumbnails still missing for the current load
    pub fn thumbnail_jobs(&self) -> Vec<ThumbnailJob> {
        let generation = self.model.generation();
        self.model
            .entries()
            .iter()
            .filter(|entry| entry.thumbnail_path.is_none())
            .map(|entry| ThumbnailJob {
                generation,
                video: entry.path.clone(),
            })
            .collect()
    }

    /// Apply a finished thumbnail; stale or empty results change nothing
    pub fn on_thumbnail(&mut self, job: &ThumbnailJob, thumbnail: Option<PathBuf>) -> bool {
        match thumbnail {
            Some(thumbnail) => self
                .model
                .set_thumbnail(job.generation, &job.video, thumbnail),
            None => false,
        }
    }

    pub fn sort_by(&mut self, field: SortField) {
        self.sort(SortSpec::ascending(field));
    }

    pub fn sort_by_descending(&mut self, field: SortField) {
        self.sort(SortSpec::descending(field));
    }

    pub fn sort(&mut self, spec: SortSpec) {
        tracing::debug!(field = ?spec.field, direction = ?spec.direction, "Sorting gallery");
        self.model.sort_by(spec);
    }

    /// Resolve a 1-based position or a path to an entry of the collection
    pub fn resolve(&self, target: &str) -> Option<PathBuf> {
        let target = target.trim();
        if let Ok(position) = target.parse::<usize>() {
            return position
                .checked_sub(1)
                .and_then(|index| self.model.get(index))
                .map(|entry| entry.path.clone());
        }
        let path = PathUtils::normalize_input(target);
        self.model.find(&path).map(|entry| entry.path.clone())
    }

    pub fn select_video(&mut self, path: &Path) -> Result<&GalleryEntry, DomainError> {
        match self.model.select(path) {
            Ok(entry) => Ok(entry),
            Err(e) => {
                self.notifications.error(format!("Not in gallery: {}", path.display()));
                Err(e)
            }
        }
    }

    /// Hand the terminal to a trimmer on `path`. On unix this only returns
    /// on failure; otherwise the caller is expected to exit after
    pub fn open_video_in_trimmer(&mut self, path: &Path) -> Result<(), DomainError> {
        self.model.select(path).ok();
        match self.launcher.launch_trimmer(path) {
            Ok(()) => Ok(()),
            Err(e) => {
                self.notifications
                    .error(format!("Error launching trimmer: {}", e));
                Err(e)
            }
        }
    }
}
