pub mod cli;
pub mod config;
pub mod domain;
pub mod error;
pub mod manifest;
pub mod runner;
pub mod ui;

pub use error::{BuildError, BuildFailure, BuildStage, Result};
