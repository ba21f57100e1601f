// tests/integration_test.rs
use std::io::Write;
use std::path::Path;
use std::process::{Command, Output, Stdio};

fn binary() -> Command {
    Command::new(env!("CARGO_BIN_EXE_release-build"))
}

#[test]
fn test_release_build_help() {
    let output = binary()
        .arg("--help")
        .output()
        .expect("Failed to execute command");

    assert!(output.status.success());
    let stdout = String::from_utf8(output.stdout).unwrap();
    assert!(stdout.contains("release-build"));
    assert!(stdout.contains("compile and package"));
}

#[test]
fn test_release_build_version() {
    let output = binary()
        .arg("--version")
        .output()
        .expect("Failed to execute command");

    assert!(output.status.success());
    let stdout = String::from_utf8(output.stdout).unwrap();
    assert!(stdout.starts_with("release-build "));
}

#[cfg(unix)]
mod pipeline_tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    // Helper: project dir with package.json and a config running plain shell commands
    fn setup_project(version: &str, compile: &str) -> TempDir {
        let dir = TempDir::new().expect("Could not create temp dir");
        fs::write(
            dir.path().join("package.json"),
            format!(r#"{{"name": "demo", "version": "{}"}}"#, version),
        )
        .unwrap();
        fs::write(
            dir.path().join("release-build.toml"),
            format!(
                r#"
display_name = "Demo"
product = "demo"
artifact_extension = "zip"

[commands]
version = ""
compile = "{}"
package = "printf %s \"$RELEASE_BUILD_ARTIFACT\" > packaged.txt"

[behavior]
color = false
"#,
                compile
            ),
        )
        .unwrap();
        dir
    }

    fn run_in(dir: &Path, input: &str) -> Output {
        run_with(dir, input, &[], &[])
    }

    fn run_with(dir: &Path, input: &str, args: &[&str], envs: &[(&str, &str)]) -> Output {
        let mut child = binary()
            .args(args)
            .envs(envs.iter().copied())
            .current_dir(dir)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .expect("Failed to start release-build");

        child
            .stdin
            .take()
            .unwrap()
            .write_all(input.as_bytes())
            .unwrap();
        child.wait_with_output().unwrap()
    }

    #[test]
    fn test_minor_bump_builds_artifact() {
        let dir = setup_project("1.4.2", "touch compiled.txt");
        let output = run_in(dir.path(), "2\n");

        assert!(
            output.status.success(),
            "stderr: {}",
            String::from_utf8_lossy(&output.stderr)
        );
        let stdout = String::from_utf8(output.stdout).unwrap();
        assert!(stdout.contains("Output: demo-1.5.0.zip"));
        assert!(stdout.contains("Version: 1.5.0"));

        let manifest = fs::read_to_string(dir.path().join("package.json")).unwrap();
        assert!(manifest.contains("\"version\": \"1.5.0\""));
        assert!(dir.path().join("compiled.txt").exists());
        assert_eq!(
            fs::read_to_string(dir.path().join("packaged.txt")).unwrap(),
            "demo-1.5.0.zip"
        );
    }

    #[test]
    fn test_compile_failure_exits_non_zero() {
        let dir = setup_project("1.4.2", "exit 1");
        let output = run_in(dir.path(), "4\n");

        assert_eq!(output.status.code(), Some(1));
        let stderr = String::from_utf8(output.stderr).unwrap();
        assert!(stderr.contains("Build failed"));
        assert!(stderr.contains("Error executing: exit 1"));
        assert!(!dir.path().join("packaged.txt").exists());
    }

    #[test]
    fn test_invalid_custom_version_exits_non_zero() {
        let dir = setup_project("1.4.2", "touch compiled.txt");
        let output = run_in(dir.path(), "5\n2.0.0-beta\n");

        assert_eq!(output.status.code(), Some(1));
        assert!(!dir.path().join("compiled.txt").exists());
        let manifest = fs::read_to_string(dir.path().join("package.json")).unwrap();
        assert!(manifest.contains("1.4.2"));
    }

    #[test]
    fn test_missing_manifest_exits_non_zero() {
        let dir = setup_project("1.4.2", "true");
        fs::remove_file(dir.path().join("package.json")).unwrap();
        let output = run_in(dir.path(), "1\n");

        assert_eq!(output.status.code(), Some(1));
        let stderr = String::from_utf8(output.stderr).unwrap();
        assert!(stderr.contains("Cannot read version"));
    }

    fn enable_color(dir: &Path) {
        let path = dir.join("release-build.toml");
        let config = fs::read_to_string(&path).unwrap();
        fs::write(&path, config.replace("color = false", "color = true")).unwrap();
    }

    #[test]
    fn test_failure_line_honors_color_setting() {
        let forced = [("CLICOLOR_FORCE", "1")];

        let dir = setup_project("1.4.2", "exit 1");
        let output = run_with(dir.path(), "4\n", &["--log-level", "off"], &forced);
        assert_eq!(output.status.code(), Some(1));
        let stderr = String::from_utf8(output.stderr).unwrap();
        assert!(stderr.contains("Build failed"));
        assert!(!stderr.contains("\x1b["), "stderr: {:?}", stderr);

        enable_color(dir.path());
        let output = run_with(dir.path(), "4\n", &["--log-level", "off"], &forced);
        let stderr = String::from_utf8(output.stderr).unwrap();
        assert!(stderr.contains("\x1b["), "stderr: {:?}", stderr);

        let output = run_with(
            dir.path(),
            "4\n",
            &["--log-level", "off", "--no-color"],
            &forced,
        );
        let stderr = String::from_utf8(output.stderr).unwrap();
        assert!(stderr.contains("Build failed"));
        assert!(!stderr.contains("\x1b["), "stderr: {:?}", stderr);
    }

    #[test]
    fn test_log_level_flag_overrides_rust_log() {
        let dir = setup_project("1.4.2", "true");

        let output = run_with(
            dir.path(),
            "4\n",
            &["--log-level", "debug"],
            &[("RUST_LOG", "off")],
        );
        assert!(output.status.success());
        let stderr = String::from_utf8(output.stderr).unwrap();
        assert!(stderr.contains("stage transition"), "stderr: {:?}", stderr);

        let output = run_with(dir.path(), "4\n", &[], &[("RUST_LOG", "debug")]);
        assert!(output.status.success());
        let stderr = String::from_utf8(output.stderr).unwrap();
        assert!(stderr.contains("stage transition"), "stderr: {:?}", stderr);

        let output = run_with(
            dir.path(),
            "4\n",
            &["--log-level", "warn"],
            &[("RUST_LOG", "debug")],
        );
        let stderr = String::from_utf8(output.stderr).unwrap();
        assert!(!stderr.contains("stage transition"), "stderr: {:?}", stderr);
    }
}
