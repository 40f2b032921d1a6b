//! External tool execution with captured logs.
//!
//! Every tool invoked by the pipeline has its stdout and stderr redirected
//! into a log file inside the scratch directory. When the tool fails the log
//! is read back and attached to the returned [`ToolFailure`], because the
//! scratch directory is deleted before the user gets to look at it.

use crate::bundler::error::{ErrorExt, Result, ToolFailure};
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::time::Duration;
use tokio::process::Command;

/// A single external tool invocation.
#[derive(Debug, Clone)]
pub struct ToolCommand {
    program: PathBuf,
    args: Vec<OsString>,
}

impl ToolCommand {
    /// Starts a command for the given executable.
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
        }
    }

    /// Appends one argument.
    pub fn arg(mut self, arg: impl Into<OsString>) -> Self {
        self.args.push(arg.into());
        self
    }

    /// Appends several arguments.
    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<OsString>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    /// Human-readable command line, used in logs and error messages.
    pub fn display(&self) -> String {
        let mut line = self.program.display().to_string();
        for arg in &self.args {
            let arg = arg.to_string_lossy();
            line.push(' ');
            if arg.contains(char::is_whitespace) {
                line.push('"');
                line.push_str(&arg);
                line.push('"');
            } else {
                line.push_str(&arg);
            }
        }
        line
    }

    /// Runs the command to completion with output written to `log_path`.
    ///
    /// The outer `Result` reports problems with the log file itself. The inner
    /// one is the tool's outcome: spawn errors, timeouts and non-zero exits all
    /// become a [`ToolFailure`] carrying whatever the tool logged.
    pub async fn run_logged(
        &self,
        log_path: &Path,
        timeout: Option<Duration>,
    ) -> Result<std::result::Result<(), ToolFailure>> {
        let command_line = self.display();
        log::debug!("Running {} (log: {})", command_line, log_path.display());

        let log_file = std::fs::File::create(log_path).fs_context("creating tool log", log_path)?;
        let stderr_file = log_file
            .try_clone()
            .fs_context("duplicating tool log handle", log_path)?;

        let spawned = Command::new(&self.program)
            .args(&self.args)
            .stdin(Stdio::null())
            .stdout(Stdio::from(log_file))
            .stderr(Stdio::from(stderr_file))
            .kill_on_drop(true)
            .spawn();

        let mut child = match spawned {
            Ok(child) => child,
            Err(e) => {
                return Ok(Err(ToolFailure {
                    command: command_line,
                    reason: format!("could not be started: {}", e),
                    log: String::new(),
                }));
            }
        };

        let waited = match timeout {
            None => Some(child.wait().await),
            Some(limit) => match tokio::time::timeout(limit, child.wait()).await {
                Ok(status) => Some(status),
                Err(_) => {
                    log::warn!(
                        "{} did not finish within {}s, killing it",
                        command_line,
                        limit.as_secs()
                    );
                    let _ = child.kill().await;
                    None
                }
            },
        };

        let reason = match waited {
            Some(Ok(status)) if status.success() => return Ok(Ok(())),
            Some(Ok(status)) => match status.code() {
                Some(code) => format!("exited with status {}", code),
                None => "was terminated by a signal".to_string(),
            },
            Some(Err(e)) => format!("could not be waited on: {}", e),
            None => format!(
                "timed out after {}s",
                timeout.map(|t| t.as_secs()).unwrap_or_default()
            ),
        };

        let log = tokio::fs::read(log_path)
            .await
            .map(|bytes| String::from_utf8_lossy(&bytes).into_owned())
            .unwrap_or_default();

        Ok(Err(ToolFailure {
            command: command_line,
            reason,
            log,
        }))
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;

    fn sh(script: &str) -> ToolCommand {
        ToolCommand::new("/bin/sh").arg("-c").arg(script)
    }

    #[tokio::test]
    async fn successful_tool_writes_log() {
        let dir = tempfile::tempdir().unwrap();
        let log = dir.path().join("ok.log");

        let outcome = sh("echo packaged").run_logged(&log, None).await.unwrap();

        assert!(outcome.is_ok());
        assert_eq!(std::fs::read_to_string(&log).unwrap(), "packaged\n");
    }

    #[tokio::test]
    async fn failing_tool_returns_stdout_and_stderr() {
        let dir = tempfile::tempdir().unwrap();
        let log = dir.path().join("fail.log");

        let failure = sh("echo first; echo second >&2; exit 3")
            .run_logged(&log, None)
            .await
            .unwrap()
            .unwrap_err();

        assert_eq!(failure.reason, "exited with status 3");
        assert!(failure.log.contains("first"));
        assert!(failure.log.contains("second"));
    }

    #[tokio::test]
    async fn missing_program_is_a_tool_failure() {
        let dir = tempfile::tempdir().unwrap();
        let log = dir.path().join("missing.log");

        let failure = ToolCommand::new(dir.path().join("no-such-tool"))
            .run_logged(&log, None)
            .await
            .unwrap()
            .unwrap_err();

        assert!(failure.reason.starts_with("could not be started"));
    }

    #[tokio::test]
    async fn timeout_kills_hung_tool() {
        let dir = tempfile::tempdir().unwrap();
        let log = dir.path().join("hang.log");

        let failure = sh("sleep 30")
            .run_logged(&log, Some(Duration::from_millis(200)))
            .await
            .unwrap()
            .unwrap_err();

        assert!(failure.reason.starts_with("timed out"));
    }

    #[test]
    fn display_quotes_arguments_with_spaces() {
        let cmd = ToolCommand::new("/usr/bin/osacompile")
            .arg("-o")
            .arg("/tmp/Uninstall Product.app");
        assert_eq!(
            cmd.display(),
            "/usr/bin/osacompile -o \"/tmp/Uninstall Product.app\""
        );
    }
}
