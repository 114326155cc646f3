//! Compatibility tests against expected output
//!
//! These tests verify correct formatting by comparing shfmt output against
//! golden files under `tests/fixtures/out`, and check that the golden files
//! are themselves stable under formatting.

#![warn(clippy::all)]
#![warn(clippy::pedantic)]

use std::fs;
use std::path::Path;

use shfmt::process::{Formatter, SourceFile};
use shfmt::{Config, LangVariant};

/// Format a source string with the given configuration
fn format_str(src: &str, name: &str, config: &Config) -> String {
    let config = config.clone().finalize();
    let source = SourceFile::from_path(Path::new(name), src.as_bytes().to_vec());
    let result = Formatter::new(&config)
        .format(&source)
        .unwrap_or_else(|e| panic!("shfmt failed on {name}: {e}"));
    String::from_utf8(result.formatted)
        .unwrap_or_else(|e| panic!("Invalid UTF-8 in output for {name}: {e}"))
}

/// Get paths relative to the project root
fn get_fixture_path(dir: &str, file: &str) -> String {
    format!("tests/fixtures/{dir}/{file}")
}

/// Run shfmt on a fixture and compare with its golden output
fn test_compatibility(file: &str, config: &Config) {
    let input_path = get_fixture_path("in", file);
    let expected_path = get_fixture_path("out", file);

    let input = fs::read_to_string(&input_path)
        .unwrap_or_else(|e| panic!("Failed to read input file {input_path}: {e}"));
    let expected = fs::read_to_string(&expected_path)
        .unwrap_or_else(|e| panic!("Failed to read expected file {expected_path}: {e}"));

    let result = format_str(&input, &input_path, config);
    assert_eq!(result, expected, "formatting mismatch for {input_path}");

    // Golden output is a fixed point
    let again = format_str(&expected, &expected_path, config);
    assert_eq!(again, expected, "golden file {expected_path} is not stable");
}

// ============================================================================
// Golden Files
// ============================================================================

#[test]
fn test_basic_compatibility() {
    test_compatibility("basic.sh", &Config::default());
}

#[test]
fn test_case_compatibility() {
    test_compatibility("case.sh", &Config::default());
}

#[test]
fn test_heredoc_compatibility() {
    test_compatibility("heredoc.sh", &Config::default());
}

#[test]
fn test_simplify_compatibility() {
    let config = Config {
        simplify: true,
        ..Default::default()
    };
    test_compatibility("simplify.sh", &config);
}

// ============================================================================
// Individual Feature Tests - Smaller scope for debugging
// ============================================================================

#[test]
fn test_compat_indent_spaces() {
    let config = Config {
        indent: 4,
        ..Default::default()
    };
    assert_eq!(
        format_str("while read l; do\necho $l\ndone\n", "t.sh", &config),
        "while read l; do\n    echo $l\ndone\n"
    );
}

#[test]
fn test_compat_case_indent() {
    let config = Config {
        switch_case_indent: true,
        indent: 2,
        ..Default::default()
    };
    assert_eq!(
        format_str("case $x in\na) foo ;;\nesac\n", "t.sh", &config),
        "case $x in\n  a) foo ;;\nesac\n"
    );
}

#[test]
fn test_compat_binary_next_line() {
    let config = Config {
        binary_next_line: true,
        ..Default::default()
    };
    assert_eq!(
        format_str("foo ||\n  bar\n", "t.sh", &config),
        "foo \\\n\t|| bar\n"
    );
}

#[test]
fn test_compat_space_redirects() {
    let config = Config {
        space_redirects: true,
        ..Default::default()
    };
    assert_eq!(
        format_str("echo x >out 2>&1\n", "t.sh", &config),
        "echo x > out 2>&1\n"
    );
}

#[test]
fn test_compat_minify() {
    let config = Config {
        minify: true,
        ..Default::default()
    };
    assert_eq!(
        format_str(
            "#!/bin/sh\n# comment\n\nfor i in 1 2; do\n  echo ${i} # loop\ndone\n",
            "t.sh",
            &config
        ),
        "#!/bin/sh\nfor i in 1 2; do\necho $i\ndone\n"
    );
}

#[test]
fn test_compat_posix_rejects_bash_tests() {
    let config = Config {
        language_variant: LangVariant::Posix,
        ..Default::default()
    };
    let source = SourceFile::from_path(Path::new("t.sh"), b"[[ -f x ]]\n".to_vec());
    let err = Formatter::new(&config).format(&source).unwrap_err();
    assert!(
        err.to_string().contains("tried parsing as posix"),
        "unexpected error: {err}"
    );

    let bash = Formatter::new(&Config::default());
    assert!(bash.format(&source).is_ok());
}
