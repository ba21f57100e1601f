//! Package manifest access: the file that owns the authoritative version.
//!
//! Supports npm-style `package.json` (top-level `"version"`) and TOML manifests
//! (`[package].version` in Cargo.toml, `[project].version` in pyproject.toml, or a
//! top-level `version` key).

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::domain::Version;
use crate::error::{BuildError, Result};

/// Manifest syntax, detected from the file extension
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ManifestFormat {
    Json,
    Toml,
}

impl ManifestFormat {
    /// Detect the format from a manifest path
    pub fn detect(path: &Path) -> Result<Self> {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("json") => Ok(ManifestFormat::Json),
            Some(ext) if ext.eq_ignore_ascii_case("toml") => Ok(ManifestFormat::Toml),
            _ => Err(BuildError::manifest_read(
                path,
                "unsupported manifest type (expected a .json or .toml file)",
            )),
        }
    }
}

/// Tables searched for a TOML `version` key, in order; `None` is the document root
const TOML_VERSION_TABLES: [Option<&str>; 3] = [Some("package"), Some("project"), None];

/// Handle on the on-disk manifest
#[derive(Debug, Clone)]
pub struct ManifestStore {
    path: PathBuf,
}

impl ManifestStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        ManifestStore { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the current version from the manifest.
    ///
    /// Fails with [`BuildError::ManifestRead`] if the file is missing or unreadable,
    /// cannot be parsed, has no version field, or the version is not plain
    /// `MAJOR.MINOR.PATCH`.
    pub fn read_version(&self) -> Result<Version> {
        let format = ManifestFormat::detect(&self.path)?;
        let content = fs::read_to_string(&self.path)
            .map_err(|e| BuildError::manifest_read(&self.path, format!("failed to read: {}", e)))?;

        let raw = match format {
            ManifestFormat::Json => read_json_version(&self.path, &content)?,
            ManifestFormat::Toml => read_toml_version(&self.path, &content)?,
        };

        let version = Version::parse(&raw).map_err(|_| {
            BuildError::manifest_read(
                &self.path,
                format!("version '{}' is not in MAJOR.MINOR.PATCH form", raw),
            )
        })?;

        debug!(path = %self.path.display(), %version, "read manifest version");
        Ok(version)
    }

    /// Replace the manifest's version field.
    ///
    /// The document is edited in memory and written through a temp file in the same
    /// directory that is then renamed over the original, so a failure leaves the
    /// manifest untouched.
    pub fn write_version(&self, version: &Version) -> Result<()> {
        let format = ManifestFormat::detect(&self.path)?;
        let content = fs::read_to_string(&self.path).map_err(|e| {
            BuildError::manifest_write(&self.path, format!("failed to read: {}", e))
        })?;

        let updated = match format {
            ManifestFormat::Json => update_json_version(&self.path, &content, version)?,
            ManifestFormat::Toml => update_toml_version(&self.path, &content, version)?,
        };

        write_atomic(&self.path, &updated)?;
        debug!(path = %self.path.display(), %version, "wrote manifest version");
        Ok(())
    }
}

// --- JSON ---

fn parse_json(path: &Path, content: &str) -> Result<serde_json::Value> {
    serde_json::from_str(content)
        .map_err(|e| BuildError::manifest_read(path, format!("invalid JSON: {}", e)))
}

fn read_json_version(path: &Path, content: &str) -> Result<String> {
    let json = parse_json(path, content)?;
    json.get("version")
        .and_then(|v| v.as_str())
        .map(str::to_string)
        .ok_or_else(|| BuildError::manifest_read(path, "no string \"version\" field"))
}

fn update_json_version(path: &Path, content: &str, version: &Version) -> Result<String> {
    let mut json = parse_json(path, content)?;
    let Some(object) = json.as_object_mut() else {
        return Err(BuildError::manifest_write(path, "top level is not a JSON object"));
    };
    object.insert(
        "version".to_string(),
        serde_json::Value::String(version.to_string()),
    );

    let output = serde_json::to_string_pretty(&json)
        .map_err(|e| BuildError::manifest_write(path, format!("failed to serialize: {}", e)))?;

    // npm uses trailing newline
    Ok(format!("{}\n", output))
}

// --- TOML ---

fn parse_toml(path: &Path, content: &str) -> Result<toml_edit::DocumentMut> {
    content
        .parse::<toml_edit::DocumentMut>()
        .map_err(|e| BuildError::manifest_read(path, format!("invalid TOML: {}", e)))
}

fn toml_version_item<'a>(
    doc: &'a toml_edit::DocumentMut,
    table: Option<&str>,
) -> Option<&'a toml_edit::Item> {
    match table {
        Some(name) => doc.get(name).and_then(|t| t.get("version")),
        None => doc.get("version"),
    }
}

fn read_toml_version(path: &Path, content: &str) -> Result<String> {
    let doc = parse_toml(path, content)?;
    TOML_VERSION_TABLES
        .iter()
        .find_map(|table| toml_version_item(&doc, *table).and_then(|item| item.as_str()))
        .map(str::to_string)
        .ok_or_else(|| {
            BuildError::manifest_read(
                path,
                "no version in [package], [project] or at the top level",
            )
        })
}

fn update_toml_version(path: &Path, content: &str, version: &Version) -> Result<String> {
    let mut doc = parse_toml(path, content)?;
    let table = TOML_VERSION_TABLES
        .iter()
        .copied()
        .find(|table| toml_version_item(&doc, *table).is_some_and(|item| item.is_str()))
        .ok_or_else(|| {
            BuildError::manifest_write(
                path,
                "no version in [package], [project] or at the top level",
            )
        })?;

    let value = toml_edit::value(version.to_string());
    match table {
        Some(name) => doc[name]["version"] = value,
        None => doc["version"] = value,
    }

    Ok(doc.to_string())
}

// --- Shared helpers ---

fn write_atomic(path: &Path, content: &str) -> Result<()> {
    let parent = match path.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => dir,
        _ => Path::new("."),
    };

    let mut temp_file = tempfile::NamedTempFile::new_in(parent)
        .map_err(|e| BuildError::manifest_write(path, format!("cannot create temp file: {}", e)))?;
    temp_file
        .write_all(content.as_bytes())
        .map_err(|e| BuildError::manifest_write(path, format!("cannot write temp file: {}", e)))?;
    temp_file
        .as_file()
        .sync_all()
        .map_err(|e| BuildError::manifest_write(path, format!("cannot sync temp file: {}", e)))?;
    temp_file
        .persist(path)
        .map_err(|e| BuildError::manifest_write(path, format!("cannot replace manifest: {}", e)))?;

    Ok(())
}
