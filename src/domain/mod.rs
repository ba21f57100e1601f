//! Domain logic - pure version and artifact rules, no I/O

pub mod artifact;
pub mod version;

pub use artifact::{Artifact, BuildResult};
pub use version::{BumpKind, Version, VersionBump};
