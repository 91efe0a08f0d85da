//! Hands the terminal over to a trimmer for a chosen video

use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use crate::domain::errors::*;
use crate::ports::*;

/// How the trimmer takes over from the gallery
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Handoff {
    /// Replace the current process image (unix)
    Exec,
    /// Run the trimmer as a child on the same terminal and wait for it
    SpawnAndWait,
}

impl Default for Handoff {
    fn default() -> Self {
        if cfg!(unix) {
            Handoff::Exec
        } else {
            Handoff::SpawnAndWait
        }
    }
}

/// Re-executes the current binary in trimmer mode
pub struct SelfLauncher {
    program: PathBuf,
    /// Forwarded before the video path, e.g. `--config <file>`
    extra_args: Vec<OsString>,
    handoff: Handoff,
}

impl SelfLauncher {
    /// Launcher for the running executable
    pub fn current(extra_args: Vec<OsString>) -> Result<Self, DomainError> {
        let program = std::env::current_exe().map_err(|e| {
            DomainError::ToolUnavailable(format!("Cannot locate the running executable: {}", e))
        })?;
        Ok(Self::with_program(program, extra_args))
    }

    pub fn with_program(program: PathBuf, extra_args: Vec<OsString>) -> Self {
        Self {
            program,
            extra_args,
            handoff: Handoff::default(),
        }
    }

    pub fn with_handoff(mut self, handoff: Handoff) -> Self {
        self.handoff = handoff;
        self
    }

    pub fn handoff(&self) -> Handoff {
        self.handoff
    }

    /// Full argument list for launching on `video`
    pub fn args_for(&self, video: &Path) -> Vec<OsString> {
        let mut args = self.extra_args.clone();
        args.push(video.as_os_str().to_owned());
        args
    }

    /// The trimmer command; it shares this process's terminal
    fn command_for(&self, video: &Path) -> Command {
        let mut command = Command::new(&self.program);
        command
            .args(self.args_for(video))
            .stdin(Stdio::inherit())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit());
        command
    }

    #[cfg(unix)]
    fn exec(&self, video: &Path) -> Result<(), DomainError> {
        use std::os::unix::process::CommandExt;

        tracing::info!(video = %video.display(), "Replacing gallery with trimmer");
        // Only returns when the exec failed
        let error = self.command_for(video).exec();
        Err(DomainError::ProcessingError(format!(
            "Failed to launch trimmer: {}",
            error
        )))
    }

    #[cfg(not(unix))]
    fn exec(&self, video: &Path) -> Result<(), DomainError> {
        self.spawn_and_wait(video)
    }

    fn spawn_and_wait(&self, video: &Path) -> Result<(), DomainError> {
        let mut child = self.command_for(video).spawn().map_err(|e| {
            DomainError::ProcessingError(format!("Failed to launch trimmer: {}", e))
        })?;
        tracing::info!(pid = child.id(), video = %video.display(), "Launched trimmer");
        let status = child
            .wait()
            .map_err(|e| DomainError::ProcessingError(format!("Trimmer failed: {}", e)))?;
        tracing::debug!(?status, "Trimmer exited");
        Ok(())
    }
}

impl LauncherPort for SelfLauncher {
    fn launch_trimmer(&self, video: &Path) -> Result<(), DomainError> {
        match self.handoff {
            Handoff::Exec => self.exec(video),
            Handoff::SpawnAndWait => self.spawn_and_wait(video),
        }
    }
}
