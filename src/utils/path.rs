//! Path helpers shared by the views and adapters

use std::path::{Path, PathBuf};

/// Path utilities
pub struct PathUtils;

impl PathUtils {
    /// Turn user input (plain path or `file://` URL) into an absolute path
    pub fn normalize_input(input: &str) -> PathBuf {
        let raw = input.trim();
        let raw = raw.strip_prefix("file://").unwrap_or(raw);
        let path = PathBuf::from(raw);
        if path.is_absolute() {
            return path;
        }
        match std::env::current_dir() {
            Ok(cwd) => cwd.join(path),
            Err(_) => path,
        }
    }

    /// `file://` URI for clipboard transfer
    pub fn file_uri(path: &Path) -> String {
        format!("file://{}", path.display())
    }

    /// Get file extension (lowercase, without dot)
    pub fn get_extension(path: &Path) -> Option<String> {
        path.extension()
            .map(|ext| ext.to_string_lossy().to_lowercase())
    }

    /// File name shown to the user
    pub fn display_name(path: &Path) -> String {
        path.file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string())
    }

    /// Suggested save location: `<dir>/trimmed_<original name>`
    pub fn suggested_save_path(source: &Path, dir: &Path) -> PathBuf {
        dir.join(format!("trimmed_{}", Self::display_name(source)))
    }

    /// Name of the temporary cut, keeping the source container when known
    pub fn trimmed_file_name(source: &Path) -> String {
        let extension = Self::get_extension(source).unwrap_or_else(|| "mp4".to_string());
        format!("trimmed_video_{}.{}", std::process::id(), extension)
    }

    /// Name of the temporary re-encode; always mp4 since it is h264/aac
    pub fn compressed_file_name() -> String {
        format!("compressed_video_{}.mp4", std::process::id())
    }

    /// The user's home directory, falling back to the working directory
    pub fn home_dir() -> PathBuf {
        directories::UserDirs::new()
            .map(|dirs| dirs.home_dir().to_path_buf())
            .or_else(|| std::env::current_dir().ok())
            .unwrap_or_else(|| PathBuf::from("."))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_strips_file_scheme() {
        assert_eq!(
            PathUtils::normalize_input("file:///home/me/clip.mp4"),
            PathBuf::from("/home/me/clip.mp4")
        );
    }

    #[test]
    fn test_normalize_makes_relative_absolute() {
        let path = PathUtils::normalize_input("clip.mp4");
        assert!(path.is_absolute());
        assert!(path.ends_with("clip.mp4"));
    }

    #[test]
    fn test_suggested_save_path() {
        let suggested =
            PathUtils::suggested_save_path(Path::new("/videos/Holiday.MOV"), Path::new("/home/me"));
        assert_eq!(suggested, PathBuf::from("/home/me/trimmed_Holiday.MOV"));
    }

    #[test]
    fn test_trimmed_name_keeps_container() {
        assert!(PathUtils::trimmed_file_name(Path::new("a.MKV")).ends_with(".mkv"));
        assert!(PathUtils::trimmed_file_name(Path::new("noext")).ends_with(".mp4"));
    }

    #[test]
    fn test_file_uri() {
        assert_eq!(
            PathUtils::file_uri(Path::new("/tmp/out.mp4")),
            "file:///tmp/out.mp4"
        );
    }
}
