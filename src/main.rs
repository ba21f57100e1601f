use std::io;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use release_build::cli::BuildOrchestrator;
use release_build::config;
use release_build::manifest::ManifestStore;
use release_build::runner::ShellRunner;
use release_build::ui::{Prompter, Theme, Tone};

#[derive(clap::Parser)]
#[command(
    name = "release-build",
    about = "Bump the package version, then compile and package a release build"
)]
struct Args {
    #[arg(short, long, help = "Custom configuration file path")]
    config: Option<String>,

    #[arg(short, long, help = "Manifest holding the version (overrides config)")]
    manifest: Option<PathBuf>,

    #[arg(long, help = "Disable colored output")]
    no_color: bool,

    #[arg(
        long,
        help = "Log level (trace, debug, info, warn, error); overrides RUST_LOG"
    )]
    log_level: Option<String>,

    #[arg(short, long, help = "Print version information")]
    version: bool,
}

fn main() {
    let args = Args::parse();

    if args.version {
        println!("release-build {}", env!("CARGO_PKG_VERSION"));
        return;
    }

    init_logging(args.log_level.as_deref());

    // Replaced by the configured theme once the config has loaded
    let mut error_theme = Theme::new(!args.no_color && console::colors_enabled_stderr());
    if let Err(e) = run(args, &mut error_theme) {
        let message = format!("Build failed: {:#}", e);
        eprintln!("{}", error_theme.paint(&message, Tone::Error));
        std::process::exit(1);
    }
}

/// An explicit `--log-level` wins; otherwise `RUST_LOG`, then `warn`
fn init_logging(level: Option<&str>) {
    let filter = match level {
        Some(level) => EnvFilter::try_new(level).ok(),
        None => EnvFilter::try_from_default_env().ok(),
    }
    .unwrap_or_else(|| EnvFilter::new("warn"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(io::stderr)
        .init();
}

fn run(args: Args, error_theme: &mut Theme) -> Result<()> {
    let mut config = config::load_config(args.config.as_deref())
        .context("Error loading config")?;
    if let Some(manifest) = args.manifest {
        config.manifest = manifest;
    }
    if args.no_color {
        config.behavior.color = false;
    }

    *error_theme = Theme::new(config.behavior.color && console::colors_enabled_stderr());
    let theme = Theme::new(config.behavior.color && console::colors_enabled());
    let store = ManifestStore::new(config.manifest.clone());
    let prompter = Prompter::new(io::stdin().lock(), io::stdout().lock(), theme);

    let mut orchestrator = BuildOrchestrator::new(&config, store, ShellRunner::new(), prompter);
    orchestrator.run()?;
    Ok(())
}
