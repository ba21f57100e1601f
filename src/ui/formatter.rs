//! Pure formatting functions for UI output.
//!
//! Nothing here touches the terminal; [crate::ui::Prompter] does the writing.

use console::Style;

use crate::domain::{BuildResult, BumpKind, Version, VersionBump};

/// Semantic colour of a console line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tone {
    Plain,
    Info,
    Success,
    Warning,
    Error,
}

/// Console styling, enabled or disabled explicitly rather than through global state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Theme {
    color: bool,
}

impl Theme {
    pub fn new(color: bool) -> Self {
        Theme { color }
    }

    /// Theme that never emits escape codes
    pub fn plain() -> Self {
        Theme::new(false)
    }

    /// Apply the tone's colour to `text`
    pub fn paint(&self, text: &str, tone: Tone) -> String {
        let style = match tone {
            Tone::Plain => return text.to_string(),
            Tone::Info => Style::new().blue(),
            Tone::Success => Style::new().green(),
            Tone::Warning => Style::new().yellow(),
            Tone::Error => Style::new().red(),
        };
        style.force_styling(self.color).apply_to(text).to_string()
    }
}

/// Banner framing a title, e.g. the tool header or the completion notice
pub fn banner(title: &str) -> Vec<String> {
    let rule = "=".repeat(32);
    vec![rule.clone(), format!("  {}", title), rule]
}

fn bump_hint(bump: VersionBump) -> &'static str {
    match bump {
        VersionBump::Patch => "Bug fixes",
        VersionBump::Minor => "New features",
        VersionBump::Major => "Breaking changes",
    }
}

/// One menu entry per [BumpKind], numbered from 1.
///
/// Computed bumps show the candidate version they would produce, or `n/a` when the
/// bump would overflow.
pub fn menu_lines(current: &Version) -> Vec<String> {
    BumpKind::ALL
        .iter()
        .enumerate()
        .map(|(i, kind)| {
            let label = format!("{}) {:<6}", i + 1, kind.name());
            match kind.as_bump() {
                Some(bump) => {
                    let candidate = current
                        .bump(bump)
                        .map_or_else(|_| "n/a".to_string(), |next| next.to_string());
                    format!(
                        "  {} ({} -> {}) - {}",
                        label,
                        current,
                        candidate,
                        bump_hint(bump)
                    )
                }
                None if *kind == BumpKind::Skip => format!("  {} - Keep current version", label),
                None => format!("  {} - Enter version manually", label),
            }
        })
        .collect()
}

/// Status line announcing how the version is about to change
pub fn applying_line(kind: BumpKind, target: Option<&Version>) -> String {
    match (kind, target) {
        (BumpKind::Skip, _) => "Keeping current version...".to_string(),
        (BumpKind::Custom, Some(version)) => format!("Setting version to {}...", version),
        (kind, _) => format!("Bumping {} version...", kind.name()),
    }
}

/// Final summary lines after a successful build
pub fn summary_lines(result: &BuildResult) -> (String, String) {
    (
        format!("Output: {}", result.artifact),
        format!("Version: {}", result.version),
    )
}
