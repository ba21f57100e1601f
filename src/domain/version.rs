use crate::error::{BuildError, Result};
use std::fmt;

/// Semantic version representation (`MAJOR.MINOR.PATCH`, nothing else)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Version {
    pub major: u64,
    pub minor: u64,
    pub patch: u64,
}

impl Version {
    /// Create a new version
    pub fn new(major: u64, minor: u64, patch: u64) -> Self {
        Version {
            major,
            minor,
            patch,
        }
    }

    /// Parse a plain `MAJOR.MINOR.PATCH` string (e.g., "1.4.2").
    ///
    /// Leading zeros, pre-release tags and build metadata are all rejected.
    pub fn parse(text: &str) -> Result<Self> {
        let parsed = semver::Version::parse(text)
            .map_err(|_| BuildError::InvalidVersionFormat(text.to_string()))?;

        if !parsed.pre.is_empty() || !parsed.build.is_empty() {
            return Err(BuildError::InvalidVersionFormat(text.to_string()));
        }

        Ok(Version::new(parsed.major, parsed.minor, parsed.patch))
    }

    /// Bump version according to bump type.
    ///
    /// Fails with [BuildError::VersionOverflow] when the incremented component is
    /// already `u64::MAX`.
    pub fn bump(&self, bump_type: VersionBump) -> Result<Self> {
        let overflow = || BuildError::VersionOverflow {
            version: self.to_string(),
            bump: bump_type.name(),
        };
        let next = match bump_type {
            VersionBump::Major => Version {
                major: self.major.checked_add(1).ok_or_else(overflow)?,
                minor: 0,
                patch: 0,
            },
            VersionBump::Minor => Version {
                major: self.major,
                minor: self.minor.checked_add(1).ok_or_else(overflow)?,
                patch: 0,
            },
            VersionBump::Patch => Version {
                major: self.major,
                minor: self.minor,
                patch: self.patch.checked_add(1).ok_or_else(overflow)?,
            },
        };
        Ok(next)
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.patch)
    }
}

/// Computed version increment
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VersionBump {
    Major,
    Minor,
    Patch,
}

impl VersionBump {
    /// Keyword understood by version tools such as `npm version`
    pub fn name(&self) -> &'static str {
        match self {
            VersionBump::Major => "major",
            VersionBump::Minor => "minor",
            VersionBump::Patch => "patch",
        }
    }
}

/// Operator's menu choice
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BumpKind {
    Patch,
    Minor,
    Major,
    Skip,
    Custom,
}

impl BumpKind {
    /// Menu order; option `n` is `ALL[n - 1]`
    pub const ALL: [BumpKind; 5] = [
        BumpKind::Patch,
        BumpKind::Minor,
        BumpKind::Major,
        BumpKind::Skip,
        BumpKind::Custom,
    ];

    /// Map a menu answer ("1".."5") to a choice
    pub fn from_choice(input: &str) -> Result<Self> {
        let choice = input.trim();
        match choice {
            "1" => Ok(BumpKind::Patch),
            "2" => Ok(BumpKind::Minor),
            "3" => Ok(BumpKind::Major),
            "4" => Ok(BumpKind::Skip),
            "5" => Ok(BumpKind::Custom),
            other => Err(BuildError::InvalidSelection(other.to_string())),
        }
    }

    /// The computed bump behind this choice, if any
    pub fn as_bump(&self) -> Option<VersionBump> {
        match self {
            BumpKind::Patch => Some(VersionBump::Patch),
            BumpKind::Minor => Some(VersionBump::Minor),
            BumpKind::Major => Some(VersionBump::Major),
            BumpKind::Skip | BumpKind::Custom => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            BumpKind::Patch => "patch",
            BumpKind::Minor => "minor",
            BumpKind::Major => "major",
            BumpKind::Skip => "skip",
            BumpKind::Custom => "custom",
        }
    }
}
