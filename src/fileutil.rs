//! Shell script detection.
//!
//! Decides from a directory entry's name, type and size whether it is a shell
//! script, might be one, or is not. Files that might be scripts are confirmed
//! by looking for a shell interpreter line in their first bytes.

use std::fs::FileType;

use crate::parser::patterns::{SCRIPT_EXT_RE, SHEBANG_RE, VCS_DIR_RE};

/// Bytes read from an ambiguous file to look for an interpreter line
pub const SHEBANG_PREFIX_LEN: usize = 32;

/// Files smaller than the shortest possible interpreter line cannot have one
const MIN_SHEBANG_SIZE: u64 = "#/bin/sh\n".len() as u64;

/// Base names of well-known shell files without a script extension
const SCRIPT_BASE_NAMES: &[&str] = &[
    ".bashrc",
    ".bash_profile",
    ".bash_login",
    ".bash_logout",
    ".profile",
    ".mkshrc",
    "PKGBUILD",
    "APKBUILD",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Classification {
    NotScript,
    /// Shell script by name alone
    ScriptDefinite,
    /// Shell script only if it starts with a shell interpreter line
    ScriptMaybe,
}

/// Classify a directory entry
///
/// `file_type` must not follow symlinks; links are never scripts.
#[must_use]
pub fn classify(name: &str, file_type: FileType, size: u64) -> Classification {
    if !file_type.is_file() {
        return Classification::NotScript;
    }
    if SCRIPT_BASE_NAMES.contains(&name) {
        return Classification::ScriptDefinite;
    }
    if name.starts_with('.') {
        return Classification::NotScript;
    }
    if SCRIPT_EXT_RE.is_match(name) {
        return Classification::ScriptDefinite;
    }
    if name.contains('.') || size < MIN_SHEBANG_SIZE {
        return Classification::NotScript;
    }
    Classification::ScriptMaybe
}

/// Whether `prefix` starts with a shell interpreter line
#[must_use]
pub fn has_shebang(prefix: &[u8]) -> bool {
    SHEBANG_RE.is_match(prefix)
}

/// Whether a directory holds version control metadata
#[must_use]
pub fn is_vcs_dir(name: &str) -> bool {
    VCS_DIR_RE.is_match(name)
}
