//! External command execution shared by the tool adapters

use std::ffi::OsStr;
use std::io::ErrorKind;
use std::process::Stdio;
use std::time::Duration;

use tokio::io::AsyncWriteExt;
use tokio::process::Command;

use crate::domain::errors::*;

/// Captured result of one external command
#[derive(Debug, Clone)]
pub struct CommandOutput {
    pub stdout: String,
    pub stderr: String,
    pub success: bool,
    pub code: Option<i32>,
}

impl CommandOutput {
    /// Last non-empty stderr line, which is where ffmpeg puts its reason
    pub fn error_summary(&self) -> String {
        self.stderr
            .lines()
            .rev()
            .find(|line| !line.trim().is_empty())
            .map(|line| line.trim().to_string())
            .unwrap_or_else(|| match self.code {
                Some(code) => format!("exited with status {}", code),
                None => "terminated by signal".to_string(),
            })
    }
}

/// Runs external programs and captures their output
#[derive(Debug, Clone, Default)]
pub struct CommandRunner {
    timeout: Option<Duration>,
}

impl CommandRunner {
    pub fn new() -> Self {
        Self { timeout: None }
    }

    /// Kill the child when it runs longer than `timeout`
    pub fn with_timeout(timeout: Duration) -> Self {
        Self {
            timeout: Some(timeout),
        }
    }

    /// Run `program` with `args`, waiting for it to exit.
    ///
    /// A program that cannot be started maps to `ToolUnavailable`; a
    /// non-zero exit is returned as an unsuccessful `CommandOutput`.
    pub async fn run<I, S>(&self, program: &str, args: I) -> Result<CommandOutput, DomainError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<OsStr>,
    {
        let mut command = Command::new(program);
        command
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);

        tracing::debug!(program, "Running external command");

        let child = command.spawn().map_err(|e| spawn_error(program, e))?;
        let output = match self.timeout {
            Some(limit) => tokio::time::timeout(limit, child.wait_with_output())
                .await
                .map_err(|_| {
                    DomainError::ProcessingError(format!(
                        "{} timed out after {}s",
                        program,
                        limit.as_secs()
                    ))
                })?,
            None => child.wait_with_output().await,
        }
        .map_err(|e| DomainError::ProcessingError(format!("{} failed: {}", program, e)))?;

        let result = CommandOutput {
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
            success: output.status.success(),
            code: output.status.code(),
        };
        if !result.success {
            tracing::debug!(program, code = ?result.code, "External command failed");
        }
        Ok(result)
    }

    /// Like `run`, but a non-zero exit becomes `ProcessingError`
    pub async fn run_checked<I, S>(
        &self,
        program: &str,
        args: I,
    ) -> Result<CommandOutput, DomainError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<OsStr>,
    {
        let output = self.run(program, args).await?;
        if !output.success {
            return Err(DomainError::ProcessingError(format!(
                "{}: {}",
                program,
                output.error_summary()
            )));
        }
        Ok(output)
    }

    /// Run a program whose output is not needed, optionally feeding `input`
    /// on stdin. Output is discarded so tools that fork a background server
    /// (wl-copy, xclip) do not keep a pipe open.
    pub async fn run_quiet<I, S>(
        &self,
        program: &str,
        args: I,
        input: Option<&[u8]>,
    ) -> Result<bool, DomainError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<OsStr>,
    {
        let mut command = Command::new(program);
        command
            .args(args)
            .stdin(if input.is_some() {
                Stdio::piped()
            } else {
                Stdio::null()
            })
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .kill_on_drop(true);

        let mut child = command.spawn().map_err(|e| spawn_error(program, e))?;
        if let (Some(bytes), Some(mut stdin)) = (input, child.stdin.take()) {
            stdin
                .write_all(bytes)
                .await
                .map_err(|e| DomainError::ProcessingError(format!("{} failed: {}", program, e)))?;
        }

        let wait = child.wait();
        let status = match self.timeout {
            Some(limit) => tokio::time::timeout(limit, wait).await.map_err(|_| {
                DomainError::ProcessingError(format!("{} did not finish", program))
            })?,
            None => wait.await,
        }
        .map_err(|e| DomainError::ProcessingError(format!("{} failed: {}", program, e)))?;
        Ok(status.success())
    }
}

fn spawn_error(program: &str, error: std::io::Error) -> DomainError {
    if error.kind() == ErrorKind::NotFound {
        DomainError::ToolUnavailable(format!("{} is not installed or not on PATH", program))
    } else {
        DomainError::ToolUnavailable(format!("{} could not be started: {}", program, error))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_missing_program_is_unavailable() {
        let runner = CommandRunner::new();
        let result = runner
            .run("otrim-definitely-not-a-real-tool", ["--version"])
            .await;
        assert!(matches!(result, Err(DomainError::ToolUnavailable(_))));
    }

    #[cfg(target_os = "linux")]
    #[tokio::test]
    async fn test_quiet_run_kills_child_on_timeout() {
        let dir = tempfile::tempdir().unwrap();
        let pid_file = dir.path().join("pid");
        let runner = CommandRunner::with_timeout(Duration::from_millis(300));
        let script = format!("echo $$ > '{}'; exec sleep 30", pid_file.display());

        let result = runner.run_quiet("sh", ["-c", script.as_str()], None).await;
        assert!(matches!(result, Err(DomainError::ProcessingError(_))));

        tokio::time::sleep(Duration::from_millis(200)).await;
        let pid = std::fs::read_to_string(&pid_file).unwrap();
        let stat = std::fs::read_to_string(format!("/proc/{}/stat", pid.trim()));
        // Gone, or a zombie waiting to be reaped
        let alive = match stat {
            Ok(stat) => !stat
                .rsplit_once(')')
                .map(|(_, rest)| rest.trim_start().starts_with('Z'))
                .unwrap_or(false),
            Err(_) => false,
        };
        assert!(!alive, "timed-out child still running");
    }

    #[test]
    fn test_error_summary_uses_last_stderr_line() {
        let output = CommandOutput {
            stdout: String::new(),
            stderr: "first\nsecond problem\n\n".to_string(),
            success: false,
            code: Some(1),
        };
        assert_eq!(output.error_summary(), "second problem");
    }

    #[test]
    fn test_error_summary_without_stderr() {
        let output = CommandOutput {
            stdout: String::new(),
            stderr: String::new(),
            success: false,
            code: Some(3),
        };
        assert_eq!(output.error_summary(), "exited with status 3");
    }
}
