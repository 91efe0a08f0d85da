use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use otrim::adapters::FsLocalAdapter;
use otrim::app::GalleryController;
use otrim::domain::model::SortField;
use otrim::domain::rules::VideoExtensions;
use otrim::ports::LauncherPort;
use otrim::DomainError;
use tempfile::TempDir;

#[derive(Default)]
struct RecordingLauncher {
    launched: Mutex<Vec<PathBuf>>,
}

impl LauncherPort for RecordingLauncher {
    fn launch_trimmer(&self, video: &Path) -> Result<(), DomainError> {
        self.launched.lock().unwrap().push(video.to_path_buf());
        Ok(())
    }
}

fn controller(launcher: Arc<RecordingLauncher>) -> GalleryController {
    GalleryController::new(
        Arc::new(FsLocalAdapter::new()),
        launcher,
        VideoExtensions::defaults(),
        Duration::from_secs(5),
    )
}

fn video_dir() -> TempDir {
    let dir = TempDir::new().unwrap();
    std::fs::write(dir.path().join("beta.MKV"), vec![0u8; 300]).unwrap();
    std::fs::write(dir.path().join("alpha.mp4"), vec![0u8; 100]).unwrap();
    std::fs::write(dir.path().join("gamma.webm"), vec![0u8; 200]).unwrap();
    std::fs::write(dir.path().join("readme.txt"), b"not a video").unwrap();
    std::fs::create_dir(dir.path().join("nested.mp4")).unwrap();
    dir
}

fn names(controller: &GalleryController) -> Vec<String> {
    controller
        .model()
        .entries()
        .iter()
        .map(|entry| entry.display_name.clone())
        .collect()
}

#[tokio::test]
async fn test_load_keeps_only_video_files() {
    let dir = video_dir();
    let mut gallery = controller(Arc::default());

    assert_eq!(gallery.load_from_directory(dir.path()).await.unwrap(), 3);
    let mut found = names(&gallery);
    found.sort();
    assert_eq!(found, vec!["alpha.mp4", "beta.MKV", "gamma.webm"]);
}

#[tokio::test]
async fn test_reload_is_idempotent() {
    let dir = video_dir();
    let mut gallery = controller(Arc::default());
    gallery.load_from_directory(dir.path()).await.unwrap();
    gallery.sort_by(SortField::Name);
    let first = names(&gallery);

    assert_eq!(gallery.reload().await.unwrap(), 3);
    assert_eq!(names(&gallery), first);
}

#[tokio::test]
async fn test_sort_by_size_and_name() {
    let dir = video_dir();
    let mut gallery = controller(Arc::default());
    gallery.load_from_directory(dir.path()).await.unwrap();

    gallery.sort_by(SortField::Size);
    assert_eq!(names(&gallery), vec!["alpha.mp4", "gamma.webm", "beta.MKV"]);

    gallery.sort_by_descending(SortField::Name);
    assert_eq!(names(&gallery), vec!["gamma.webm", "beta.MKV", "alpha.mp4"]);
}

#[tokio::test]
async fn test_empty_directory() {
    let dir = TempDir::new().unwrap();
    let mut gallery = controller(Arc::default());

    assert_eq!(gallery.load_from_directory(dir.path()).await.unwrap(), 0);
    assert!(gallery.model().is_empty());
}

#[tokio::test]
async fn test_missing_directory_is_error() {
    let dir = TempDir::new().unwrap();
    let mut gallery = controller(Arc::default());

    assert!(gallery
        .load_from_directory(&dir.path().join("gone"))
        .await
        .is_err());
    assert!(gallery.model().is_empty());
    assert!(gallery.notifications().last().is_some());
}

#[tokio::test]
async fn test_open_by_position_launches_trimmer() {
    let dir = video_dir();
    let launcher = Arc::new(RecordingLauncher::default());
    let mut gallery = controller(Arc::clone(&launcher));
    gallery.load_from_directory(dir.path()).await.unwrap();
    gallery.sort_by(SortField::Name);

    let target = gallery.resolve("2").unwrap();
    gallery.open_video_in_trimmer(&target).unwrap();

    assert_eq!(
        *launcher.launched.lock().unwrap(),
        vec![dir.path().join("beta.MKV")]
    );
    assert_eq!(gallery.model().selected(), Some(target.as_path()));
}
