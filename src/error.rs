//! Error types and result aliases for shfmt.
//!
//! This module defines the error handling infrastructure:
//! - [`Result<T>`]: Type alias for `anyhow::Result<T>` used by the CLI plumbing
//! - [`ParseError`]: Malformed shell source, with position information
//! - [`FileError`]: Any per-file failure; recorded, never fatal to a batch
//! - [`UsageError`]: Invalid flag combinations, detected before any file is touched

use std::io;
use std::path::{Path, PathBuf};

use anyhow::Result as AnyhowResult;
use thiserror::Error;

use crate::parser::Pos;

pub type Result<T> = AnyhowResult<T>;

/// Malformed shell source
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{name}:{pos}: {message}")]
pub struct ParseError {
    /// Path or label of the source being parsed
    pub name: String,
    /// Position of the offending token
    pub pos: Pos,
    pub message: String,
}

impl ParseError {
    #[must_use]
    pub fn new(name: impl Into<String>, pos: Pos, message: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            pos,
            message: message.into(),
        }
    }
}

/// A failure processing a single file
#[derive(Debug, Error)]
pub enum FileError {
    /// Stat, open or read failure
    #[error("{}: {}", .path.display(), .source)]
    Read { path: PathBuf, source: io::Error },

    #[error(transparent)]
    Parse(#[from] ParseError),

    /// In-place rewrite failure
    #[error("{}: {}", .path.display(), .source)]
    Write { path: PathBuf, source: io::Error },

    /// Failure writing list, find or formatted output
    #[error("{}: writing output: {}", .path.display(), .source)]
    Output { path: PathBuf, source: io::Error },

    #[error("{}: computing diff: {}", .path.display(), .source)]
    Diff { path: PathBuf, source: io::Error },
}

impl FileError {
    /// Path of the file the error belongs to
    #[must_use]
    pub fn path(&self) -> &Path {
        match self {
            Self::Read { path, .. }
            | Self::Write { path, .. }
            | Self::Output { path, .. }
            | Self::Diff { path, .. } => path,
            Self::Parse(err) => Path::new(&err.name),
        }
    }

    pub(crate) fn read(path: &Path, source: io::Error) -> Self {
        Self::Read {
            path: path.to_path_buf(),
            source,
        }
    }

    pub(crate) fn output(path: &Path, source: io::Error) -> Self {
        Self::Output {
            path: path.to_path_buf(),
            source,
        }
    }
}

/// Invalid invocation; aborts the run before any file is processed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum UsageError {
    #[error("-w cannot be used on standard input")]
    WriteOnStdin,

    #[error("-tojson can only be used with stdin/out")]
    ToJsonWithPaths,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_error_display() {
        let pos = Pos {
            offset: 10,
            line: 2,
            col: 3,
        };
        let err = ParseError::new("foo.sh", pos, "\"if\" must end with \"fi\"");
        assert_eq!(err.to_string(), "foo.sh:2:3: \"if\" must end with \"fi\"");
    }

    #[test]
    fn test_file_error_prefixed_with_path() {
        let err = FileError::read(
            Path::new("dir/a.sh"),
            io::Error::new(io::ErrorKind::PermissionDenied, "permission denied"),
        );
        assert_eq!(err.to_string(), "dir/a.sh: permission denied");
        assert_eq!(err.path(), Path::new("dir/a.sh"));
    }

    #[test]
    fn test_parse_error_path() {
        let err: FileError = ParseError::new("x.sh", Pos::default(), "bad").into();
        assert_eq!(err.path(), Path::new("x.sh"));
    }

    #[test]
    fn test_usage_messages() {
        assert_eq!(
            UsageError::WriteOnStdin.to_string(),
            "-w cannot be used on standard input"
        );
        assert_eq!(
            UsageError::ToJsonWithPaths.to_string(),
            "-tojson can only be used with stdin/out"
        );
    }
}
