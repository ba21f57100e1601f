use std::fmt;
use std::path::PathBuf;

use thiserror::Error;

/// Unified error type for release-build operations
#[derive(Error, Debug)]
pub enum BuildError {
    #[error("Cannot read version from {}: {reason}", .path.display())]
    ManifestRead { path: PathBuf, reason: String },

    #[error("Cannot write version to {}: {reason}", .path.display())]
    ManifestWrite { path: PathBuf, reason: String },

    #[error("Invalid option '{0}'. Choose a number from 1 to 5")]
    InvalidSelection(String),

    #[error("Invalid version format '{0}'. Use semantic versioning (e.g., 1.2.3)")]
    InvalidVersionFormat(String),

    #[error("Cannot apply a {bump} bump to {version}: the version number would overflow")]
    VersionOverflow { version: String, bump: &'static str },

    #[error("Error executing: {command} ({status})")]
    CommandFailed { command: String, status: String },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience type alias for Results in release-build
pub type Result<T> = std::result::Result<T, BuildError>;

impl BuildError {
    /// Create a manifest read error with context
    pub fn manifest_read(path: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        BuildError::ManifestRead {
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// Create a manifest write error with context
    pub fn manifest_write(path: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        BuildError::ManifestWrite {
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// Create a command failure for the given command line
    pub fn command_failed(command: impl Into<String>, status: impl Into<String>) -> Self {
        BuildError::CommandFailed {
            command: command.into(),
            status: status.into(),
        }
    }

    /// Create a configuration error with context
    pub fn config(msg: impl Into<String>) -> Self {
        BuildError::Config(msg.into())
    }
}

/// Pipeline position of a build run.
///
/// A run moves strictly forward through these stages. When it aborts, the stage it
/// had last reached is reported alongside the error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BuildStage {
    Start,
    VersionDecided,
    Compiled,
    Packaged,
    Done,
}

impl BuildStage {
    /// Human-readable description of the work that follows this stage
    pub fn activity(&self) -> &'static str {
        match self {
            BuildStage::Start => "deciding the version",
            BuildStage::VersionDecided => "compiling",
            BuildStage::Compiled => "packaging",
            BuildStage::Packaged => "reporting the result",
            BuildStage::Done => "finishing",
        }
    }
}

impl fmt::Display for BuildStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.activity())
    }
}

/// An aborted build run: the error plus the stage it happened in
#[derive(Error, Debug)]
#[error("{error} (while {stage})")]
pub struct BuildFailure {
    pub stage: BuildStage,
    pub error: BuildError,
}

impl BuildFailure {
    pub fn new(stage: BuildStage, error: BuildError) -> Self {
        BuildFailure { stage, error }
    }
}
