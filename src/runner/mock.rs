use crate::error::{BuildError, Result};
use crate::runner::{CommandOutcome, CommandRunner, RunOptions};
use std::collections::{HashMap, HashSet};
use std::fs;
use std::path::PathBuf;
use std::sync::Mutex;

/// Mock runner for testing without spawning processes
///
/// Records every command it is asked to run. Commands registered with
/// [MockRunner::fail] exit non-zero; commands registered with
/// [MockRunner::on_success_write] write a file when they "succeed", which lets tests
/// stand in for tools that mutate the manifest.
#[derive(Debug, Default)]
pub struct MockRunner {
    calls: Mutex<Vec<String>>,
    failing: HashSet<String>,
    writes: HashMap<String, (PathBuf, String)>,
    stdout: HashMap<String, String>,
}

impl MockRunner {
    /// Create a runner where every command succeeds
    pub fn new() -> Self {
        Self::default()
    }

    /// Make `command` exit non-zero
    pub fn fail(mut self, command: impl Into<String>) -> Self {
        self.failing.insert(command.into());
        self
    }

    /// Write `contents` to `path` when `command` runs successfully
    pub fn on_success_write(
        mut self,
        command: impl Into<String>,
        path: impl Into<PathBuf>,
        contents: impl Into<String>,
    ) -> Self {
        self.writes
            .insert(command.into(), (path.into(), contents.into()));
        self
    }

    /// Output returned for `command` when run silently
    pub fn with_stdout(mut self, command: impl Into<String>, stdout: impl Into<String>) -> Self {
        self.stdout.insert(command.into(), stdout.into());
        self
    }

    /// Commands run so far, in order
    pub fn calls(&self) -> Vec<String> {
        self.calls
            .lock()
            .map(|calls| calls.clone())
            .unwrap_or_default()
    }

    /// Whether `command` has been run
    pub fn ran(&self, command: &str) -> bool {
        self.calls().iter().any(|call| call == command)
    }
}

impl CommandRunner for MockRunner {
    fn run(&self, command: &str, options: &RunOptions) -> Result<Option<CommandOutcome>> {
        if let Ok(mut calls) = self.calls.lock() {
            calls.push(command.to_string());
        }

        if self.failing.contains(command) {
            if options.ignore_error {
                return Ok(None);
            }
            return Err(BuildError::command_failed(command, "exit status: 1"));
        }

        if let Some((path, contents)) = self.writes.get(command) {
            fs::write(path, contents)?;
        }

        let stdout = if options.silent {
            self.stdout.get(command).cloned().unwrap_or_default()
        } else {
            String::new()
        };

        Ok(Some(CommandOutcome {
            stdout,
            stderr: String::new(),
        }))
    }
}
