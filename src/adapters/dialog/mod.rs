//! Native file dialogs through zenity or kdialog

use std::ffi::OsString;
use std::path::{Path, PathBuf};

use async_trait::async_trait;

use crate::adapters::process::CommandRunner;
use crate::domain::errors::*;
use crate::ports::*;

/// Which dialog program to drive
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DialogTool {
    Zenity,
    Kdialog,
}

impl DialogTool {
    pub fn program(&self) -> &'static str {
        match self {
            DialogTool::Zenity => "zenity",
            DialogTool::Kdialog => "kdialog",
        }
    }

    /// Arguments for an "open video" dialog
    pub fn open_args(&self, start_dir: &Path, extensions: &[String]) -> Vec<OsString> {
        let patterns: Vec<String> = extensions.iter().map(|ext| format!("*.{}", ext)).collect();
        match self {
            DialogTool::Zenity => vec![
                "--file-selection".into(),
                "--title=Select a video to trim".into(),
                format!("--filename={}/", start_dir.display()).into(),
                format!("--file-filter=Videos | {}", patterns.join(" ")).into(),
            ],
            DialogTool::Kdialog => vec![
                "--getopenfilename".into(),
                start_dir.as_os_str().to_owned(),
                format!("Video files ({})", patterns.join(" ")).into(),
            ],
        }
    }

    /// Arguments for a "save as" dialog proposing `suggested`
    pub fn save_args(&self, suggested: &Path) -> Vec<OsString> {
        let filter = suggested
            .extension()
            .map(|ext| format!("*.{}", ext.to_string_lossy()))
            .unwrap_or_else(|| "*".to_string());
        match self {
            DialogTool::Zenity => vec![
                "--file-selection".into(),
                "--save".into(),
                "--confirm-overwrite".into(),
                format!("--filename={}", suggested.display()).into(),
            ],
            DialogTool::Kdialog => vec![
                "--getsavefilename".into(),
                suggested.as_os_str().to_owned(),
                format!("Video files ({})", filter).into(),
            ],
        }
    }
}

/// File dialogs; the first installed tool wins
pub struct DialogAdapter {
    tools: Vec<DialogTool>,
    extensions: Vec<String>,
    runner: CommandRunner,
}

impl DialogAdapter {
    pub fn new(extensions: Vec<String>) -> Self {
        Self::with_tools(vec![DialogTool::Zenity, DialogTool::Kdialog], extensions)
    }

    pub fn with_tools(tools: Vec<DialogTool>, extensions: Vec<String>) -> Self {
        Self {
            tools,
            extensions,
            runner: CommandRunner::new(),
        }
    }

    /// Run the first tool that can be started. Exit status 1 means the user
    /// cancelled; any other failure is an error.
    async fn ask<F>(&self, build_args: F) -> Result<Option<PathBuf>, DomainError>
    where
        F: Fn(DialogTool) -> Vec<OsString>,
    {
        for tool in &self.tools {
            match self.runner.run(tool.program(), build_args(*tool)).await {
                Err(DomainError::ToolUnavailable(_)) => continue,
                Err(e) => return Err(e),
                Ok(output) if output.success => {
                    let chosen = output.stdout.trim();
                    if chosen.is_empty() {
                        return Ok(None);
                    }
                    return Ok(Some(PathBuf::from(chosen)));
                }
                Ok(output) if output.code == Some(1) => return Ok(None),
                Ok(output) => {
                    return Err(DomainError::ProcessingError(format!(
                        "{}: {}",
                        tool.program(),
                        output.error_summary()
                    )))
                }
            }
        }
        Err(DomainError::ToolUnavailable(
            "No file dialog available (install zenity or kdialog)".to_string(),
        ))
    }
}

#[async_trait]
impl DialogPort for DialogAdapter {
    async fn is_available(&self) -> bool {
        for tool in &self.tools {
            if self
                .runner
                .run_quiet(tool.program(), ["--version"], None)
                .await
                .is_ok()
            {
                return true;
            }
        }
        false
    }

    async fn pick_video(&self, start_dir: &Path) -> Result<Option<PathBuf>, DomainError> {
        self.ask(|tool| tool.open_args(start_dir, &self.extensions))
            .await
    }

    async fn save_location(&self, suggested: &Path) -> Result<Option<PathBuf>, DomainError> {
        self.ask(|tool| tool.save_args(suggested)).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strings(args: Vec<OsString>) -> Vec<String> {
        args.into_iter()
            .map(|a| a.to_string_lossy().into_owned())
            .collect()
    }

    #[test]
    fn test_kdialog_save_args() {
        let args = strings(DialogTool::Kdialog.save_args(Path::new("/home/me/trimmed_a.mkv")));
        assert_eq!(
            args,
            vec!["--getsavefilename", "/home/me/trimmed_a.mkv", "Video files (*.mkv)"]
        );
    }

    #[test]
    fn test_zenity_open_args_filter() {
        let args = strings(
            DialogTool::Zenity.open_args(Path::new("/v"), &["mp4".to_string(), "mkv".to_string()]),
        );
        assert!(args.contains(&"--filename=/v/".to_string()));
        assert!(args.contains(&"--file-filter=Videos | *.mp4 *.mkv".to_string()));
    }

    #[tokio::test]
    async fn test_no_tool_installed() {
        let dialog = DialogAdapter::with_tools(Vec::new(), Vec::new());
        assert!(!dialog.is_available().await);
        assert!(matches!(
            dialog.pick_video(Path::new("/")).await,
            Err(DomainError::ToolUnavailable(_))
        ));
    }
}
