//! Launch mode selection from the command line

use std::path::{Path, PathBuf};

use crate::error::{OtrimError, OtrimResult};

/// Which window the process opens
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LaunchMode {
    /// Trimmer on a file
    Trimmer(PathBuf),
    /// Gallery of a directory
    Gallery(PathBuf),
    /// No path given: ask with the file selector
    Pick,
}

/// Decide the launch mode.
///
/// `-g` opens the gallery on `cwd`; a directory opens the gallery on it; a
/// file opens the trimmer. Anything else is an error.
pub fn resolve_launch(path: Option<&str>, gallery: bool, cwd: &Path) -> OtrimResult<LaunchMode> {
    if gallery {
        return Ok(LaunchMode::Gallery(cwd.to_path_buf()));
    }

    let Some(raw) = path else {
        return Ok(LaunchMode::Pick);
    };
    let raw = raw.trim();
    let raw = raw.strip_prefix("file://").unwrap_or(raw);
    let candidate = PathBuf::from(raw);
    let path = if candidate.is_absolute() {
        candidate
    } else {
        cwd.join(candidate)
    };

    if path.is_dir() {
        Ok(LaunchMode::Gallery(path))
    } else if path.is_file() {
        Ok(LaunchMode::Trimmer(path))
    } else {
        Err(OtrimError::PathNotFound { path })
    }
}

/// Absolute working directory used for relative paths and `-g`
pub fn current_dir() -> OtrimResult<PathBuf> {
    Ok(std::env::current_dir()?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gallery_flag_uses_cwd() {
        let dir = tempfile::tempdir().unwrap();
        assert_eq!(
            resolve_launch(None, true, dir.path()).unwrap(),
            LaunchMode::Gallery(dir.path().to_path_buf())
        );
    }

    #[test]
    fn test_directory_opens_gallery() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir(dir.path().join("videos")).unwrap();
        assert_eq!(
            resolve_launch(Some("videos"), false, dir.path()).unwrap(),
            LaunchMode::Gallery(dir.path().join("videos"))
        );
    }

    #[test]
    fn test_file_opens_trimmer() {
        let dir = tempfile::tempdir().unwrap();
        let video = dir.path().join("clip.mp4");
        std::fs::write(&video, b"x").unwrap();
        let url = format!("file://{}", video.display());
        assert_eq!(
            resolve_launch(Some(&url), false, Path::new("/")).unwrap(),
            LaunchMode::Trimmer(video)
        );
    }

    #[test]
    fn test_missing_path_is_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(matches!(
            resolve_launch(Some("nope.mp4"), false, dir.path()),
            Err(OtrimError::PathNotFound { .. })
        ));
    }

    #[test]
    fn test_no_argument_picks() {
        assert_eq!(
            resolve_launch(None, false, Path::new("/")).unwrap(),
            LaunchMode::Pick
        );
    }
}
