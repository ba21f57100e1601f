//! External command execution
//!
//! Every interaction with the outside world beyond the manifest and the terminal
//! goes through the [CommandRunner] trait:
//!
//! - [ShellRunner]: runs command lines through the platform shell
//! - [mock::MockRunner]: records commands for testing without spawning anything
//!
//! # Failure semantics
//!
//! A command that exits non-zero (or cannot be started) produces
//! [BuildError::CommandFailed]. Callers propagate it with `?`, so nothing after a
//! failed command runs. Setting [RunOptions::ignore_error] opts out: the failure is
//! logged and `Ok(None)` is returned instead.

pub mod mock;

pub use mock::MockRunner;

use std::path::PathBuf;
use std::process::{Command, ExitStatus, Output, Stdio};

use tracing::{debug, warn};

use crate::error::{BuildError, Result};

/// Options for a single command invocation
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RunOptions {
    /// Capture stdout/stderr instead of streaming them to the console
    pub silent: bool,
    /// Swallow a failure and return `Ok(None)` instead of an error
    pub ignore_error: bool,
    /// Extra environment variables for the child process
    pub env: Vec<(String, String)>,
}

impl RunOptions {
    /// Stream output, fail on error
    pub fn streamed() -> Self {
        RunOptions::default()
    }

    /// Capture output, fail on error
    pub fn silent() -> Self {
        RunOptions {
            silent: true,
            ..RunOptions::default()
        }
    }

    pub fn ignore_error(mut self) -> Self {
        self.ignore_error = true;
        self
    }

    pub fn with_env(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.env.push((key.into(), value.into()));
        self
    }
}

/// Result of a successful command
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandOutcome {
    /// Captured stdout (empty when output was streamed)
    pub stdout: String,
    /// Captured stderr (empty when output was streamed)
    pub stderr: String,
}

/// Synchronous external command execution
///
/// Implementations block until the command exits.
///
/// ## Returns
/// * `Ok(Some(outcome))` - command exited successfully
/// * `Ok(None)` - command failed and [RunOptions::ignore_error] was set
/// * `Err(BuildError::CommandFailed)` - command failed or could not be started
pub trait CommandRunner {
    fn run(&self, command: &str, options: &RunOptions) -> Result<Option<CommandOutcome>>;
}

impl<T: CommandRunner + ?Sized> CommandRunner for &T {
    fn run(&self, command: &str, options: &RunOptions) -> Result<Option<CommandOutcome>> {
        (**self).run(command, options)
    }
}

/// Runs command lines through `sh -c` (or `cmd /C` on Windows)
#[derive(Debug, Clone, Default)]
pub struct ShellRunner {
    working_dir: Option<PathBuf>,
}

impl ShellRunner {
    pub fn new() -> Self {
        ShellRunner::default()
    }

    /// Run every command from `dir` instead of the current directory
    pub fn in_dir(dir: impl Into<PathBuf>) -> Self {
        ShellRunner {
            working_dir: Some(dir.into()),
        }
    }

    fn shell_command(command: &str) -> Command {
        if cfg!(windows) {
            let mut cmd = Command::new("cmd");
            cmd.arg("/C").arg(command);
            cmd
        } else {
            let mut cmd = Command::new("sh");
            cmd.arg("-c").arg(command);
            cmd
        }
    }

    fn spawn(&self, command: &str, options: &RunOptions) -> std::io::Result<(ExitStatus, CommandOutcome)> {
        let mut cmd = Self::shell_command(command);
        if let Some(dir) = &self.working_dir {
            cmd.current_dir(dir);
        }
        for (key, value) in &options.env {
            cmd.env(key, value);
        }

        if options.silent {
            let Output {
                status,
                stdout,
                stderr,
            } = cmd.stdin(Stdio::null()).output()?;
            let outcome = CommandOutcome {
                stdout: String::from_utf8_lossy(&stdout).into_owned(),
                stderr: String::from_utf8_lossy(&stderr).into_owned(),
            };
            Ok((status, outcome))
        } else {
            let status = cmd
                .stdin(Stdio::inherit())
                .stdout(Stdio::inherit())
                .stderr(Stdio::inherit())
                .status()?;
            Ok((status, CommandOutcome::default()))
        }
    }
}

impl CommandRunner for ShellRunner {
    fn run(&self, command: &str, options: &RunOptions) -> Result<Option<CommandOutcome>> {
        debug!(command, silent = options.silent, "running command");

        let failure = match self.spawn(command, options) {
            Ok((status, outcome)) if status.success() => return Ok(Some(outcome)),
            Ok((status, outcome)) => {
                let stderr = outcome.stderr.trim();
                if stderr.is_empty() {
                    status.to_string()
                } else {
                    format!("{}: {}", status, stderr)
                }
            }
            Err(e) => format!("failed to start: {}", e),
        };

        if options.ignore_error {
            warn!(command, reason = %failure, "ignoring failed command");
            return Ok(None);
        }

        Err(BuildError::command_failed(command, failure))
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;

    #[test]
    fn test_successful_command() {
        let runner = ShellRunner::new();
        let outcome = runner.run("true", &RunOptions::streamed()).unwrap();
        assert_eq!(outcome, Some(CommandOutcome::default()));
    }

    #[test]
    fn test_silent_captures_output() {
        let runner = ShellRunner::new();
        let outcome = runner
            .run("echo hello; echo oops >&2", &RunOptions::silent())
            .unwrap()
            .unwrap();
        assert_eq!(outcome.stdout.trim(), "hello");
        assert_eq!(outcome.stderr.trim(), "oops");
    }

    #[test]
    fn test_failed_command_is_error() {
        let runner = ShellRunner::new();
        let err = runner.run("exit 3", &RunOptions::silent()).unwrap_err();
        match err {
            BuildError::CommandFailed { command, status } => {
                assert_eq!(command, "exit 3");
                assert!(status.contains('3'), "status was: {}", status);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_failed_command_includes_stderr_when_silent() {
        let runner = ShellRunner::new();
        let err = runner
            .run("echo broken >&2; exit 1", &RunOptions::silent())
            .unwrap_err();
        assert!(err.to_string().contains("broken"));
    }

    #[test]
    fn test_ignore_error_returns_none() {
        let runner = ShellRunner::new();
        let outcome = runner
            .run("exit 1", &RunOptions::silent().ignore_error())
            .unwrap();
        assert!(outcome.is_none());
    }

    #[test]
    fn test_env_is_passed_to_child() {
        let runner = ShellRunner::new();
        let options = RunOptions::silent().with_env("RELEASE_BUILD_VERSION", "1.4.3");
        let outcome = runner
            .run("printf %s \"$RELEASE_BUILD_VERSION\"", &options)
            .unwrap()
            .unwrap();
        assert_eq!(outcome.stdout, "1.4.3");
    }

    #[test]
    fn test_working_dir() {
        let dir = tempfile::tempdir().unwrap();
        let runner = ShellRunner::in_dir(dir.path());
        runner
            .run("touch marker", &RunOptions::silent())
            .unwrap()
            .unwrap();
        assert!(dir.path().join("marker").exists());
    }
}
