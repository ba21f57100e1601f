//! User interface module - interaction (prompts) and formatting.
//!
//! Separates concerns:
//! - `formatter` - Pure formatting functions
//! - This module - Line-based prompts over any reader/writer pair

use std::io::{self, BufRead, Write};
use std::sync::OnceLock;

use regex::Regex;

use crate::domain::{BumpKind, Version};
use crate::error::{BuildError, Result};

pub mod formatter;

pub use formatter::{Theme, Tone};

/// Shape a custom version must have before it is parsed
const CUSTOM_VERSION_PATTERN: &str = r"^[0-9]+\.[0-9]+\.[0-9]+$";

fn custom_version_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(CUSTOM_VERSION_PATTERN).expect("static pattern is valid"))
}

/// Validates a version typed by the operator.
///
/// The input (trimmed) must be three dot-separated runs of digits and must parse as a
/// plain version, so leading zeros are rejected too.
///
/// # Examples
///
/// ```ignore
/// validate_custom_version("2.0.0")       // Ok(Version(2,0,0))
/// validate_custom_version("1.2")         // Err - too few components
/// validate_custom_version("2.0.0-beta")  // Err - pre-release not supported
/// ```
pub fn validate_custom_version(input: &str) -> Result<Version> {
    let candidate = input.trim();
    if !custom_version_regex().is_match(candidate) {
        return Err(BuildError::InvalidVersionFormat(candidate.to_string()));
    }
    Version::parse(candidate)
}

/// Blocking, line-based operator interaction.
///
/// All console output of a build run goes through here so it can be captured in tests.
pub struct Prompter<R, W> {
    input: R,
    output: W,
    theme: Theme,
}

impl<R: BufRead, W: Write> Prompter<R, W> {
    pub fn new(input: R, output: W, theme: Theme) -> Self {
        Prompter {
            input,
            output,
            theme,
        }
    }

    /// Print one line in the given tone
    pub fn say(&mut self, message: &str, tone: Tone) -> Result<()> {
        writeln!(self.output, "{}", self.theme.paint(message, tone))?;
        Ok(())
    }

    /// Print an empty line
    pub fn blank(&mut self) -> Result<()> {
        writeln!(self.output)?;
        Ok(())
    }

    /// Ask a question and block until one line of input arrives.
    ///
    /// Returns the line trimmed. Closed input is an error.
    pub fn ask(&mut self, question: &str) -> Result<String> {
        write!(self.output, "{}", question)?;
        self.output.flush()?;

        let mut input = String::new();
        if self.input.read_line(&mut input)? == 0 {
            return Err(BuildError::Io(io::Error::new(
                io::ErrorKind::UnexpectedEof,
                "input closed before an answer was given",
            )));
        }
        Ok(input.trim().to_string())
    }

    /// Show the bump menu for `current` and read the operator's choice.
    ///
    /// An answer outside 1-5 is an error; there is no re-prompt.
    pub fn choose_bump(&mut self, current: &Version) -> Result<BumpKind> {
        self.say("How would you like to bump the version?", Tone::Plain)?;
        self.blank()?;
        for line in formatter::menu_lines(current) {
            self.say(&line, Tone::Warning)?;
        }
        self.blank()?;

        let answer = self.ask("Select option [1-5]: ")?;
        BumpKind::from_choice(&answer)
    }

    /// Read and validate a custom version; an invalid one is an error, no re-prompt
    pub fn ask_custom_version(&mut self) -> Result<Version> {
        let answer = self.ask("Enter custom version (e.g., 1.2.3): ")?;
        validate_custom_version(&answer)
    }

    /// Give back the output sink
    pub fn into_output(self) -> W {
        self.output
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn prompter(input: &str) -> Prompter<Cursor<Vec<u8>>, Vec<u8>> {
        Prompter::new(
            Cursor::new(input.as_bytes().to_vec()),
            Vec::new(),
            Theme::plain(),
        )
    }

    #[test]
    fn test_validate_custom_version_valid() {
        assert_eq!(
            validate_custom_version("2.0.0").unwrap(),
            Version::new(2, 0, 0)
        );
        assert_eq!(
            validate_custom_version(" 10.20.30 ").unwrap(),
            Version::new(10, 20, 30)
        );
    }

    #[test]
    fn test_validate_custom_version_invalid() {
        for input in ["1.2", "a.b.c", "1.2.3.4", "2.0.0-beta", "v1.2.3", "", "1..3"] {
            assert!(
                matches!(
                    validate_custom_version(input),
                    Err(BuildError::InvalidVersionFormat(_))
                ),
                "'{}' should be rejected",
                input
            );
        }
    }

    #[test]
    fn test_validate_custom_version_rejects_non_ascii_digits() {
        assert!(validate_custom_version("١.٢.٣").is_err());
    }

    #[test]
    fn test_ask_trims_answer() {
        let mut p = prompter("  3  \n");
        assert_eq!(p.ask("Q: ").unwrap(), "3");
        let output = String::from_utf8(p.into_output()).unwrap();
        assert_eq!(output, "Q: ");
    }

    #[test]
    fn test_ask_on_closed_input() {
        let mut p = prompter("");
        let err = p.ask("Q: ").unwrap_err();
        assert!(matches!(err, BuildError::Io(ref e) if e.kind() == io::ErrorKind::UnexpectedEof));
    }

    #[test]
    fn test_choose_bump_shows_menu() {
        let mut p = prompter("2\n");
        let kind = p.choose_bump(&Version::new(1, 4, 2)).unwrap();
        assert_eq!(kind, BumpKind::Minor);

        let output = String::from_utf8(p.into_output()).unwrap();
        assert!(output.contains("How would you like to bump the version?"));
        assert!(output.contains("(1.4.2 -> 1.4.3)"));
        assert!(output.contains("(1.4.2 -> 1.5.0)"));
        assert!(output.contains("(1.4.2 -> 2.0.0)"));
        assert!(output.ends_with("Select option [1-5]: "));
    }

    #[test]
    fn test_choose_bump_invalid() {
        let mut p = prompter("7\n");
        assert!(matches!(
            p.choose_bump(&Version::new(1, 0, 0)),
            Err(BuildError::InvalidSelection(_))
        ));
    }

    #[test]
    fn test_ask_custom_version() {
        let mut p = prompter("3.1.4\n");
        assert_eq!(p.ask_custom_version().unwrap(), Version::new(3, 1, 4));

        let mut p = prompter("2.0.0-beta\n");
        assert!(p.ask_custom_version().is_err());
    }

    #[test]
    fn test_say_uses_theme() {
        let mut p = Prompter::new(
            Cursor::new(Vec::<u8>::new()),
            Vec::<u8>::new(),
            Theme::new(true),
        );
        p.say("done", Tone::Success).unwrap();
        let output = String::from_utf8(p.into_output()).unwrap();
        assert!(output.contains("\x1b["));
        assert!(output.contains("done"));
    }
}
