//! End-to-end tests running the shfmt binary

#![warn(clippy::all)]
#![warn(clippy::pedantic)]

use std::fs;
use std::io::Write;
use std::path::Path;
use std::process::{Command, Output, Stdio};

fn shfmt(args: &[&str], cwd: &Path, stdin: &str) -> Output {
    let mut child = Command::new(env!("CARGO_BIN_EXE_shfmt"))
        .args(args)
        .current_dir(cwd)
        .env("HOME", cwd)
        .env_remove("FORCE_COLOR")
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .expect("failed to spawn shfmt");
    child
        .stdin
        .take()
        .unwrap()
        .write_all(stdin.as_bytes())
        .unwrap();
    child.wait_with_output().unwrap()
}

fn stdout(output: &Output) -> String {
    String::from_utf8(output.stdout.clone()).unwrap()
}

fn stderr(output: &Output) -> String {
    String::from_utf8(output.stderr.clone()).unwrap()
}

#[test]
fn test_stdin_to_stdout() {
    let dir = tempfile::tempdir().unwrap();
    let output = shfmt(&[], dir.path(), "if a;then\nb\nfi");
    assert_eq!(stdout(&output), "if a; then\n\tb\nfi\n");
    assert_eq!(output.status.code(), Some(0));
}

#[test]
fn test_stdin_parse_error() {
    let dir = tempfile::tempdir().unwrap();
    let output = shfmt(&[], dir.path(), "echo 'unterminated\n");
    assert_eq!(output.status.code(), Some(1));
    assert!(stderr(&output).starts_with("<standard input>:"));
}

#[test]
fn test_write_on_stdin_is_usage_error() {
    let dir = tempfile::tempdir().unwrap();
    let output = shfmt(&["-w"], dir.path(), "echo\n");
    assert_eq!(output.status.code(), Some(1));
    assert!(stderr(&output).contains("-w cannot be used on standard input"));
    assert_eq!(stdout(&output), "");
}

#[test]
fn test_bad_flags_exit_with_usage_status() {
    let dir = tempfile::tempdir().unwrap();
    for args in [&["--ln", "zsh"][..], &["-p", "--ln", "bash"], &["--no-such-flag"]] {
        let output = shfmt(args, dir.path(), "");
        assert_eq!(output.status.code(), Some(1), "{args:?}");
        assert!(stderr(&output).contains("error:"), "{args:?}");
        assert_eq!(stdout(&output), "");
    }
}

#[test]
fn test_version_exits_zero() {
    let dir = tempfile::tempdir().unwrap();
    let output = shfmt(&["--version"], dir.path(), "");
    assert_eq!(output.status.code(), Some(0));
    assert!(stdout(&output).contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn test_tojson_with_paths_is_usage_error() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("a.sh"), "echo\n").unwrap();
    let output = shfmt(&["--tojson", "a.sh"], dir.path(), "");
    assert_eq!(output.status.code(), Some(1));
    assert!(stderr(&output).contains("-tojson can only be used with stdin/out"));
}

#[test]
fn test_tojson_on_stdin() {
    let dir = tempfile::tempdir().unwrap();
    let output = shfmt(&["--tojson"], dir.path(), "echo hi\n");
    assert_eq!(output.status.code(), Some(0));
    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json["Type"], "File");
}

#[test]
fn test_diff_exit_status() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("ok.sh"), "echo ok\n").unwrap();
    let clean = shfmt(&["-d", "."], dir.path(), "");
    assert_eq!(clean.status.code(), Some(0));
    assert_eq!(stdout(&clean), "");

    fs::write(dir.path().join("bad.sh"), "echo   bad\n").unwrap();
    let changed = shfmt(&["-d", "."], dir.path(), "");
    assert_eq!(changed.status.code(), Some(1));
    assert!(stdout(&changed).contains("+echo bad\n"));
    // a diff is not an error message
    assert_eq!(stderr(&changed), "");
}

#[test]
fn test_missing_root_stops_run() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("a.sh"), "echo  a\n").unwrap();
    let output = shfmt(&["-l", "missing", "a.sh"], dir.path(), "");
    assert_eq!(output.status.code(), Some(1));
    assert!(stderr(&output).starts_with("missing: "));
    assert_eq!(stdout(&output), "");
}

#[test]
fn test_discovered_config_file() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join(".shfmt.toml"), "indent = 3\n").unwrap();
    let output = shfmt(&[], dir.path(), "{\nfoo\n}\n");
    assert_eq!(stdout(&output), "{\n   foo\n}\n");

    // command line wins over the file
    let output = shfmt(&["-i", "1"], dir.path(), "{\nfoo\n}\n");
    assert_eq!(stdout(&output), "{\n foo\n}\n");
}

#[test]
fn test_invalid_indent_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let output = shfmt(&["-i", "100"], dir.path(), "echo\n");
    assert_eq!(output.status.code(), Some(1));
    assert!(stderr(&output).contains("Invalid configuration"));
}

#[test]
fn test_forced_color_diff() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("a.sh"), "echo  a\n").unwrap();
    let output = Command::new(env!("CARGO_BIN_EXE_shfmt"))
        .args(["-d", "a.sh"])
        .current_dir(dir.path())
        .env("HOME", dir.path())
        .env("FORCE_COLOR", "true")
        .output()
        .unwrap();
    assert!(stdout(&output).contains("\x1b[31m-echo  a\x1b[0m\n"));
}
