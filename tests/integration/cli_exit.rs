//! Binary exit status and error output

use crate::integration::test_utils::write_project;
use std::path::Path;
use std::process::{Command, Output};
use tempfile::TempDir;

fn run_in(dir: &Path, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_schemagen"))
        .args(args)
        .current_dir(dir)
        .env("OTEL_SDK_DISABLED", "true")
        .env("SCHEMAGEN_LOG", "off")
        .output()
        .unwrap()
}

#[test]
fn test_missing_config_exits_with_two() {
    let temp_dir = TempDir::new().unwrap();
    let output = run_in(temp_dir.path(), &["-timeout", "2s"]);

    assert_eq!(output.status.code(), Some(2));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.starts_with("config::load"), "stderr: {stderr}");
    assert!(stderr.contains("no configuration file found"));
}

#[test]
fn test_invalid_timeout_is_rejected() {
    let temp_dir = TempDir::new().unwrap();
    let output = run_in(temp_dir.path(), &["-timeout", "soon"]);

    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("invalid duration"));
}

#[test]
fn test_generates_into_working_directory() {
    let temp_dir = TempDir::new().unwrap();
    write_project(temp_dir.path());
    let output = run_in(temp_dir.path(), &["--timeout", "5s"]);

    assert!(
        output.status.success(),
        "stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    assert!(temp_dir.path().join("model/enums_gen.rs").exists());
    assert!(temp_dir.path().join("model/models_gen.rs").exists());
}

#[test]
fn test_expired_timeout_exits_with_two() {
    let temp_dir = TempDir::new().unwrap();
    write_project(temp_dir.path());
    let output = run_in(temp_dir.path(), &["-timeout", "1ns"]);

    assert_eq!(output.status.code(), Some(2));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("deadline exceeded"), "stderr: {stderr}");
    assert!(!temp_dir.path().join("model/models_gen.rs").exists());
}
