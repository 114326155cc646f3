//! Regex patterns for shell syntax and script detection
//!
//! All patterns are compiled once at first use using `LazyLock`.

use std::sync::LazyLock;

use regex::bytes::Regex as BytesRegex;
use regex::Regex;

/// Build a regex from a compile-time constant pattern.
///
/// # Panics
///
/// Panics if the pattern is invalid. All patterns in this module are
/// compile-time constants that are verified by tests.
fn build_re(pattern: &str) -> Regex {
    Regex::new(pattern).unwrap_or_else(|_| panic!("Invalid regex pattern: {pattern}"))
}

// ===== SCRIPT DETECTION =====

/// Interpreter line naming a shell from the sh family
pub static SHEBANG_RE: LazyLock<BytesRegex> = LazyLock::new(|| {
    let pattern = r"^#!\s?/(usr/)?bin/(env\s+)?(sh|bash|dash|ksh|mksh|bats)(\s|$)";
    BytesRegex::new(pattern).unwrap_or_else(|_| panic!("Invalid regex pattern: {pattern}"))
});

/// File name extensions that always mark a shell script
pub static SCRIPT_EXT_RE: LazyLock<Regex> =
    LazyLock::new(|| build_re(r"\.(sh|bash|mksh|bats)$"));

/// Version control metadata directories, never descended into
pub static VCS_DIR_RE: LazyLock<Regex> = LazyLock::new(|| build_re(r"^\.(git|svn|hg)$"));

// ===== WORDS =====

/// Variable assignment prefix, e.g. `FOO=bar`, `arr[1]=x`, `PATH+=:/bin`
pub static ASSIGNMENT_RE: LazyLock<Regex> =
    LazyLock::new(|| build_re(r"^[A-Za-z_][A-Za-z0-9_]*(\[[^\]]*\])?\+?="));

/// Plain variable name
pub static NAME_RE: LazyLock<Regex> = LazyLock::new(|| build_re(r"^[A-Za-z_][A-Za-z0-9_]*$"));
