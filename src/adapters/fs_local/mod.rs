// Local filesystem adapter - Directory listing and file copies

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use chrono::{DateTime, Local};
use walkdir::WalkDir;

use crate::domain::errors::*;
use crate::domain::model::*;
use crate::ports::*;

/// Filesystem adapter for the local disk
#[derive(Debug, Clone, Default)]
pub struct FsLocalAdapter;

impl FsLocalAdapter {
    pub fn new() -> Self {
        Self
    }

    /// Blocking listing of the regular files directly inside `dir`
    fn list_files_blocking(dir: &Path) -> Result<Vec<FileRecord>, DomainError> {
        let meta = std::fs::metadata(dir).map_err(|e| {
            DomainError::FsFail(format!("Cannot read directory {}: {}", dir.display(), e))
        })?;
        if !meta.is_dir() {
            return Err(DomainError::FsFail(format!(
                "{} is not a directory",
                dir.display()
            )));
        }

        let mut records = Vec::new();
        for entry in WalkDir::new(dir).min_depth(1).max_depth(1).follow_links(true) {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) if e.depth() == 0 => {
                    return Err(DomainError::FsFail(format!(
                        "Cannot read directory {}: {}",
                        dir.display(),
                        e
                    )))
                }
                Err(e) => {
                    tracing::debug!(error = %e, "Skipping unreadable entry");
                    continue;
                }
            };
            if !entry.file_type().is_file() {
                continue;
            }
            let metadata = match entry.metadata() {
                Ok(metadata) => metadata,
                Err(e) => {
                    tracing::debug!(path = %entry.path().display(), error = %e, "Skipping entry without metadata");
                    continue;
                }
            };
            let modified: DateTime<Local> = metadata
                .modified()
                .map(DateTime::from)
                .unwrap_or_else(|_| Local::now());
            records.push(FileRecord {
                path: entry.into_path(),
                size_bytes: metadata.len(),
                modified,
            });
        }
        Ok(records)
    }
}

#[async_trait]
impl FsPort for FsLocalAdapter {
    async fn list_files(&self, dir: &Path) -> Result<Vec<FileRecord>, DomainError> {
        let dir: PathBuf = dir.to_path_buf();
        tokio::task::spawn_blocking(move || Self::list_files_blocking(&dir))
            .await
            .map_err(|e| DomainError::FsFail(format!("Directory scan aborted: {}", e)))?
    }

    async fn file_size(&self, path: &Path) -> Result<u64, DomainError> {
        tokio::fs::metadata(path)
            .await
            .map(|meta| meta.len())
            .map_err(|e| DomainError::FsFail(format!("Failed to get file size: {}", e)))
    }

    async fn file_exists(&self, path: &Path) -> bool {
        tokio::fs::metadata(path)
            .await
            .map(|meta| meta.is_file())
            .unwrap_or(false)
    }

    async fn copy_file(&self, from: &Path, to: &Path) -> Result<u64, DomainError> {
        if !self.file_exists(from).await {
            return Err(DomainError::FileNotFound(from.display().to_string()));
        }
        tokio::fs::copy(from, to)
            .await
            .map_err(|e| DomainError::FsFail(format!("Failed to copy file: {}", e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_lists_only_top_level_files() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("a.mp4"), b"12345").unwrap();
        std::fs::write(dir.path().join("notes.txt"), b"x").unwrap();
        std::fs::create_dir(dir.path().join("nested")).unwrap();
        std::fs::write(dir.path().join("nested").join("b.mp4"), b"x").unwrap();

        let mut records = FsLocalAdapter::new().list_files(dir.path()).await.unwrap();
        records.sort_by(|a, b| a.path.cmp(&b.path));
        let names: Vec<_> = records
            .iter()
            .map(|r| r.path.file_name().unwrap().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, vec!["a.mp4", "notes.txt"]);
        assert_eq!(records[0].size_bytes, 5);
    }

    #[tokio::test]
    async fn test_missing_directory_fails() {
        let result = FsLocalAdapter::new()
            .list_files(Path::new("/nonexistent/otrim/dir"))
            .await;
        assert!(matches!(result, Err(DomainError::FsFail(_))));
    }

    #[tokio::test]
    async fn test_copy_file() {
        let dir = tempfile::tempdir().unwrap();
        let from = dir.path().join("in.mp4");
        let to = dir.path().join("out.mp4");
        std::fs::write(&from, b"abc").unwrap();

        let fs = FsLocalAdapter::new();
        assert_eq!(fs.copy_file(&from, &to).await.unwrap(), 3);
        assert!(fs.file_exists(&to).await);
        assert_eq!(fs.file_size(&to).await.unwrap(), 3);
        assert!(matches!(
            fs.copy_file(&dir.path().join("missing"), &to).await,
            Err(DomainError::FileNotFound(_))
        ));
    }
}
