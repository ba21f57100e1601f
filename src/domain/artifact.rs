use crate::domain::version::Version;
use std::fmt;

/// Packaged output file name (e.g., "claude-code-chat-1.4.3.vsix")
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Artifact {
    pub name: String,
}

impl Artifact {
    /// Build the conventional `<product>-<version>.<extension>` name
    pub fn new(product: &str, version: &Version, extension: &str) -> Self {
        let extension = extension.trim_start_matches('.');
        let name = if extension.is_empty() {
            format!("{}-{}", product, version)
        } else {
            format!("{}-{}.{}", product, version, extension)
        };
        Artifact { name }
    }
}

impl fmt::Display for Artifact {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

/// Outcome of a completed build run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildResult {
    /// Version the artifact was built with
    pub version: Version,
    /// Name of the packaged artifact
    pub artifact: Artifact,
}
