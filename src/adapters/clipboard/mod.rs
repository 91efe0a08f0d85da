//! Desktop clipboard adapter
//!
//! Wayland first (`wl-copy`), X11 (`xclip`) when wl-copy is missing.

use std::path::Path;
use std::time::Duration;

use async_trait::async_trait;

use crate::adapters::process::CommandRunner;
use crate::domain::errors::*;
use crate::ports::*;
use crate::utils::PathUtils;

/// Clipboard backed by wl-clipboard or xclip
pub struct ClipboardAdapter {
    runner: CommandRunner,
    wl_copy: String,
    xclip: String,
}

impl Default for ClipboardAdapter {
    fn default() -> Self {
        Self::new()
    }
}

impl ClipboardAdapter {
    pub fn new() -> Self {
        Self::with_programs("wl-copy", "xclip")
    }

    /// Use specific clipboard executables
    pub fn with_programs(wl_copy: impl Into<String>, xclip: impl Into<String>) -> Self {
        Self {
            runner: CommandRunner::with_timeout(Duration::from_secs(2)),
            wl_copy: wl_copy.into(),
            xclip: xclip.into(),
        }
    }

    async fn copy_wayland(&self, uri: &str, plain: &str) -> Result<(), DomainError> {
        let ok = self
            .runner
            .run_quiet(&self.wl_copy, ["-t", "text/uri-list", uri], None)
            .await?;
        if !ok {
            return Err(DomainError::ProcessingError(
                "wl-copy could not set the clipboard".to_string(),
            ));
        }
        // Plain path in the primary selection; not fatal when it fails
        match self.runner.run_quiet(&self.wl_copy, ["-p", plain], None).await {
            Ok(true) => {}
            Ok(false) | Err(_) => tracing::debug!("wl-copy could not set the primary selection"),
        }
        Ok(())
    }

    async fn copy_x11(&self, uri: &str) -> Result<(), DomainError> {
        let ok = self
            .runner
            .run_quiet(
                &self.xclip,
                ["-selection", "clipboard", "-t", "text/uri-list"],
                Some(format!("{}\n", uri).as_bytes()),
            )
            .await?;
        if !ok {
            return Err(DomainError::ProcessingError(
                "xclip could not set the clipboard".to_string(),
            ));
        }
        Ok(())
    }
}

#[async_trait]
impl ClipboardPort for ClipboardAdapter {
    async fn copy_file(&self, file: &Path) -> Result<(), DomainError> {
        let uri = PathUtils::file_uri(file);
        let plain = file.display().to_string();

        match self.copy_wayland(&uri, &plain).await {
            Err(DomainError::ToolUnavailable(_)) => {
                tracing::debug!("wl-copy not found, trying xclip");
                self.copy_x11(&uri).await.map_err(|e| match e {
                    DomainError::ToolUnavailable(_) => DomainError::ToolUnavailable(
                        "No clipboard tool found. Install wl-clipboard or xclip".to_string(),
                    ),
                    other => other,
                })
            }
            other => other,
        }
    }
}
