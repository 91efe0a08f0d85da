//! Command implementations

use std::io::Write;
use std::path::Path;

use tokio::io::BufReader;
use tracing::{info, warn};

use crate::app::AppContainer;
use crate::error::{OtrimError, OtrimResult};
use crate::views::gallery::{GalleryOutcome, GalleryView};
use crate::views::trimmer::TrimmerView;

/// Open the trimmer, optionally on `video`, reading commands from stdin
pub async fn run_trimmer(container: &dyn AppContainer, video: Option<String>) -> OtrimResult<()> {
    info!(video = ?video, "Starting trimmer");
    let controller = container.trim_controller()?;
    let view = TrimmerView::new(controller, container.config().view.clone());
    let mut stdout = std::io::stdout();
    view.run(video, BufReader::new(tokio::io::stdin()), &mut stdout)
        .await
}

/// Open the gallery on `dir`. A directory that cannot be listed ends the process.
pub async fn run_gallery(container: &dyn AppContainer, dir: &Path) -> OtrimResult<()> {
    info!("Starting gallery on {}", dir.display());
    let mut controller = container.gallery_controller();
    controller
        .load_from_directory(dir)
        .await
        .map_err(|e| OtrimError::UnreadableDirectory {
            path: dir.to_path_buf(),
            message: e.to_string(),
        })?;

    let view = GalleryView::new(
        controller,
        container.thumbnail_port(),
        container.config().gallery.thumbnail_concurrency,
    );
    let mut stdout = std::io::stdout();
    match view
        .run(BufReader::new(tokio::io::stdin()), &mut stdout)
        .await?
    {
        GalleryOutcome::Launched(video) => info!("Gallery closed after opening {}", video.display()),
        GalleryOutcome::Closed => info!("Gallery closed"),
    }
    Ok(())
}

/// No path given: ask with the desktop file selector, then trim the choice
pub async fn pick(container: &dyn AppContainer, start_dir: &Path) -> OtrimResult<()> {
    let dialog = container.dialog_port();
    if !dialog.is_available().await {
        return Err(OtrimError::NoSelector);
    }

    match dialog.pick_video(start_dir).await? {
        Some(video) => run_trimmer(container, Some(video.to_string_lossy().into_owned())).await,
        None => {
            warn!("File selection cancelled");
            let mut stdout = std::io::stdout();
            writeln!(stdout, "No file selected")?;
            Ok(())
        }
    }
}
