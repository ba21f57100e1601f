//! Main build workflow orchestration
//!
//! Runs the release flow as a forward-only state machine:
//!
//! `Start -> VersionDecided -> Compiled -> Packaged -> Done`
//!
//! Any error aborts the run; the stage reached at that point is reported with it.

use std::io::{BufRead, Write};

use tracing::debug;

use crate::config::Config;
use crate::domain::{BuildResult, BumpKind, Version, VersionBump};
use crate::error::{BuildFailure, BuildStage, Result};
use crate::manifest::ManifestStore;
use crate::runner::{CommandRunner, RunOptions};
use crate::ui::{formatter, Prompter, Tone};

/// Environment variable carrying the decided version to the build commands
pub const VERSION_ENV: &str = "RELEASE_BUILD_VERSION";

/// Environment variable carrying the expected artifact name to the build commands
pub const ARTIFACT_ENV: &str = "RELEASE_BUILD_ARTIFACT";

/// Composes manifest, prompter and command runner into one build run
pub struct BuildOrchestrator<'a, R, W, C> {
    config: &'a Config,
    store: ManifestStore,
    runner: C,
    prompter: Prompter<R, W>,
    stage: BuildStage,
}

impl<'a, R, W, C> BuildOrchestrator<'a, R, W, C>
where
    R: BufRead,
    W: Write,
    C: CommandRunner,
{
    pub fn new(
        config: &'a Config,
        store: ManifestStore,
        runner: C,
        prompter: Prompter<R, W>,
    ) -> Self {
        BuildOrchestrator {
            config,
            store,
            runner,
            prompter,
            stage: BuildStage::Start,
        }
    }

    /// Stage reached so far
    pub fn stage(&self) -> BuildStage {
        self.stage
    }

    /// Give back the prompter (and with it the output sink)
    pub fn into_prompter(self) -> Prompter<R, W> {
        self.prompter
    }

    /// Run the whole flow once.
    ///
    /// # Returns
    /// * `Ok(BuildResult)` - final version and artifact name
    /// * `Err(BuildFailure)` - the first error, tagged with the stage it aborted in
    pub fn run(&mut self) -> std::result::Result<BuildResult, BuildFailure> {
        self.stage = BuildStage::Start;
        self.execute()
            .map_err(|error| BuildFailure::new(self.stage, error))
    }

    fn execute(&mut self) -> Result<BuildResult> {
        self.prompter.blank()?;
        for line in formatter::banner(&format!("{} Build Tool", self.config.display_name)) {
            self.prompter.say(&line, Tone::Info)?;
        }
        self.prompter.blank()?;

        let current = self.store.read_version()?;
        self.prompter
            .say(&format!("Current version: {}", current), Tone::Success)?;
        self.prompter.blank()?;

        let version = self.decide_version(current)?;
        self.advance(BuildStage::VersionDecided);

        let artifact = self.config.artifact_for(&version);
        let build_options = RunOptions::streamed()
            .with_env(VERSION_ENV, version.to_string())
            .with_env(ARTIFACT_ENV, artifact.name.clone());

        self.prompter.blank()?;
        self.prompter
            .say(&format!("Building version: {}", version), Tone::Success)?;
        self.prompter.blank()?;

        self.prompter.say("Compiling sources...", Tone::Warning)?;
        self.runner
            .run(&self.config.commands.compile, &build_options)?;
        self.advance(BuildStage::Compiled);

        self.prompter.say(
            &format!(
                "Packaging {}...",
                self.config.artifact_extension.to_uppercase()
            ),
            Tone::Warning,
        )?;
        self.runner
            .run(&self.config.commands.package, &build_options)?;
        self.advance(BuildStage::Packaged);

        let result = BuildResult { version, artifact };
        self.report(&result)?;
        self.advance(BuildStage::Done);
        Ok(result)
    }

    /// Collect the operator's choice and commit the resulting version
    fn decide_version(&mut self, current: Version) -> Result<Version> {
        let kind = self.prompter.choose_bump(&current)?;
        debug!(choice = kind.name(), "bump selected");

        match (kind, kind.as_bump()) {
            (_, Some(bump)) => {
                self.prompter
                    .say(&formatter::applying_line(kind, None), Tone::Warning)?;
                self.apply_bump(current, bump)
            }
            (BumpKind::Custom, None) => {
                // Validated before anything touches the manifest
                let custom = self.prompter.ask_custom_version()?;
                self.prompter
                    .say(&formatter::applying_line(kind, Some(&custom)), Tone::Warning)?;
                self.set_version(&custom.to_string(), &custom)?;
                Ok(custom)
            }
            (_, None) => {
                self.prompter
                    .say(&formatter::applying_line(kind, None), Tone::Warning)?;
                Ok(current)
            }
        }
    }

    /// Mutate the manifest for a computed bump, then re-read it.
    ///
    /// The re-read value is the committed version; the local candidate is only what
    /// the menu showed.
    fn apply_bump(&mut self, current: Version, bump: VersionBump) -> Result<Version> {
        let candidate = current.bump(bump)?;
        self.set_version(bump.name(), &candidate)?;

        let committed = self.store.read_version()?;
        if committed != candidate {
            debug!(%candidate, %committed, "version tool committed a different version");
        }
        Ok(committed)
    }

    /// Hand `target` to the version command, or write `fallback` directly when no
    /// command is configured
    fn set_version(&mut self, target: &str, fallback: &Version) -> Result<()> {
        match self.config.commands.version_command(target) {
            Some(command) => {
                self.runner.run(&command, &RunOptions::streamed())?;
            }
            None => self.store.write_version(fallback)?,
        }
        Ok(())
    }

    fn report(&mut self, result: &BuildResult) -> Result<()> {
        self.prompter.blank()?;
        for line in formatter::banner("Build Complete!") {
            self.prompter.say(&line, Tone::Success)?;
        }
        self.prompter.blank()?;

        let (output_line, version_line) = formatter::summary_lines(result);
        self.prompter.say(&output_line, Tone::Info)?;
        self.prompter.say(&version_line, Tone::Success)?;
        self.prompter.blank()?;
        Ok(())
    }

    fn advance(&mut self, next: BuildStage) {
        debug!(from = ?self.stage, to = ?next, "stage transition");
        self.stage = next;
    }
}
