use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::domain::{Artifact, Version};
use crate::error::{BuildError, Result};

/// File name searched for in the current directory and the user config directory
pub const CONFIG_FILE_NAME: &str = "release-build.toml";

/// Placeholder in the version command replaced by `patch`/`minor`/`major` or a literal version
pub const VERSION_PLACEHOLDER: &str = "{version}";

/// Represents the complete configuration for release-build.
///
/// Names the product and its artifact, locates the manifest, and lists the external
/// commands the pipeline runs.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct Config {
    /// Name shown in the banner
    #[serde(default = "default_display_name")]
    pub display_name: String,

    /// Product identifier used in the artifact name
    #[serde(default = "default_product")]
    pub product: String,

    /// Artifact file extension (without the dot)
    #[serde(default = "default_artifact_extension")]
    pub artifact_extension: String,

    /// Manifest holding the authoritative version
    #[serde(default = "default_manifest")]
    pub manifest: PathBuf,

    #[serde(default)]
    pub commands: CommandsConfig,

    #[serde(default)]
    pub behavior: BehaviorConfig,
}

fn default_display_name() -> String {
    "Claude Code Chat".to_string()
}

fn default_product() -> String {
    "claude-code-chat".to_string()
}

fn default_artifact_extension() -> String {
    "vsix".to_string()
}

fn default_manifest() -> PathBuf {
    PathBuf::from("package.json")
}

/// External commands run by the pipeline.
///
/// An empty `version` command makes release-build write the manifest itself.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct CommandsConfig {
    #[serde(default = "default_version_command")]
    pub version: String,

    #[serde(default = "default_compile_command")]
    pub compile: String,

    #[serde(default = "default_package_command")]
    pub package: String,
}

fn default_version_command() -> String {
    "npm version {version} --no-git-tag-version".to_string()
}

fn default_compile_command() -> String {
    "npm run compile".to_string()
}

fn default_package_command() -> String {
    "npx vsce package".to_string()
}

impl Default for CommandsConfig {
    fn default() -> Self {
        CommandsConfig {
            version: default_version_command(),
            compile: default_compile_command(),
            package: default_package_command(),
        }
    }
}

impl CommandsConfig {
    /// Version command for a bump keyword or literal version, or `None` when the
    /// manifest should be written directly
    pub fn version_command(&self, target: &str) -> Option<String> {
        let template = self.version.trim();
        if template.is_empty() {
            None
        } else {
            Some(template.replace(VERSION_PLACEHOLDER, target))
        }
    }
}

/// Configuration for behavior customization.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct BehaviorConfig {
    /// Style console output with colors
    #[serde(default = "default_color")]
    pub color: bool,
}

fn default_color() -> bool {
    true
}

impl Default for BehaviorConfig {
    fn default() -> Self {
        BehaviorConfig {
            color: default_color(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Config {
            display_name: default_display_name(),
            product: default_product(),
            artifact_extension: default_artifact_extension(),
            manifest: default_manifest(),
            commands: CommandsConfig::default(),
            behavior: BehaviorConfig::default(),
        }
    }
}

impl Config {
    /// Artifact name for a given version
    pub fn artifact_for(&self, version: &Version) -> Artifact {
        Artifact::new(&self.product, version, &self.artifact_extension)
    }

    /// Check values that serde cannot
    pub fn validate(&self) -> Result<()> {
        if self.product.trim().is_empty() {
            return Err(BuildError::config("product must not be empty"));
        }
        if self.commands.compile.trim().is_empty() {
            return Err(BuildError::config("commands.compile must not be empty"));
        }
        if self.commands.package.trim().is_empty() {
            return Err(BuildError::config("commands.package must not be empty"));
        }
        let version = self.commands.version.trim();
        if !version.is_empty() && !version.contains(VERSION_PLACEHOLDER) {
            return Err(BuildError::config(format!(
                "commands.version must contain the {} placeholder",
                VERSION_PLACEHOLDER
            )));
        }
        Ok(())
    }
}

/// Loads configuration from file or returns defaults.
///
/// Attempts to load configuration in the following order:
/// 1. Custom path provided as parameter
/// 2. `release-build.toml` in current directory
/// 3. `release-build.toml` in the user config directory
/// 4. Default configuration if no file found
///
/// # Returns
/// * `Ok(Config)` - Loaded or default configuration
/// * `Err` - If a file exists but cannot be read, parsed or validated
pub fn load_config(config_path: Option<&str>) -> Result<Config> {
    let path = if let Some(path) = config_path {
        PathBuf::from(path)
    } else if Path::new(CONFIG_FILE_NAME).exists() {
        PathBuf::from(CONFIG_FILE_NAME)
    } else if let Some(path) = dirs::config_dir()
        .map(|dir| dir.join(CONFIG_FILE_NAME))
        .filter(|path| path.exists())
    {
        path
    } else {
        return Ok(Config::default());
    };

    let config_str = fs::read_to_string(&path)
        .map_err(|e| BuildError::config(format!("cannot read {}: {}", path.display(), e)))?;
    let config: Config = toml::from_str(&config_str)
        .map_err(|e| BuildError::config(format!("invalid {}: {}", path.display(), e)))?;
    config.validate()?;
    Ok(config)
}
