//! Formatting pipeline
//!
//! Implements the per-file formatting steps:
//! - Parse with the configured language variant, keeping comments
//! - Simplify (optional, always on when minifying)
//! - Print with the configured style options and compare with the input
//!
//! The syntax tree can also be written as JSON instead of being printed.

use std::borrow::Cow;
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::config::Config;
use crate::error::{FileError, ParseError};
use crate::format::{simplify, Printer};
use crate::parser::{File, Parser};

use super::dispatch::dispatch;
use super::outcome::Outcome;

/// Label used for source read from standard input
pub const STDIN_LABEL: &str = "<standard input>";

/// Where a source came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Origin {
    Stdin,
    Path,
}

/// A source file read fully into memory
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceFile {
    pub path: PathBuf,
    pub content: Vec<u8>,
    pub origin: Origin,
}

impl SourceFile {
    #[must_use]
    pub fn from_stdin(content: Vec<u8>) -> Self {
        Self {
            path: PathBuf::from(STDIN_LABEL),
            content,
            origin: Origin::Stdin,
        }
    }

    #[must_use]
    pub fn from_path(path: &Path, content: Vec<u8>) -> Self {
        Self {
            path: path.to_path_buf(),
            content,
            origin: Origin::Path,
        }
    }

    /// Name used in messages and diff labels
    #[must_use]
    pub fn name(&self) -> Cow<'_, str> {
        self.path.to_string_lossy()
    }
}

/// Result of formatting one source
#[derive(Debug)]
pub struct FormatResult<'a> {
    pub source: &'a SourceFile,
    pub formatted: Vec<u8>,
    /// Formatted bytes differ from the original
    pub changed: bool,
}

impl FormatResult<'_> {
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.source.path
    }

    #[must_use]
    pub fn original(&self) -> &[u8] {
        &self.source.content
    }
}

/// Parser and printer configured once for the whole run
#[derive(Debug, Clone)]
pub struct Formatter {
    parser: Parser,
    printer: Printer,
    simplify: bool,
}

impl Formatter {
    #[must_use]
    pub fn new(config: &Config) -> Self {
        Self {
            parser: Parser::new(config.parser_options()),
            printer: Printer::new(config.printer_options()),
            simplify: config.simplify_enabled(),
        }
    }

    /// Parse a source, simplifying the tree when configured
    ///
    /// # Errors
    ///
    /// Returns a [`ParseError`] carrying the source name and position.
    pub fn parse(&self, source: &SourceFile) -> std::result::Result<File, ParseError> {
        let mut file = self.parser.parse(&source.content, &source.name())?;
        if self.simplify {
            simplify(&mut file);
        }
        Ok(file)
    }

    /// Format a source
    ///
    /// # Errors
    ///
    /// Returns a [`ParseError`] if the source is not valid shell.
    pub fn format<'a>(
        &self,
        source: &'a SourceFile,
    ) -> std::result::Result<FormatResult<'a>, ParseError> {
        let file = self.parse(source)?;
        let formatted = self.printer.print(&file);
        let changed = formatted != source.content;
        Ok(FormatResult {
            source,
            formatted,
            changed,
        })
    }

    /// Write the syntax tree of a source as pretty-printed JSON
    ///
    /// # Errors
    ///
    /// Returns a [`FileError`] if parsing or writing fails.
    pub fn write_json<W: Write>(
        &self,
        source: &SourceFile,
        out: &mut W,
    ) -> std::result::Result<(), FileError> {
        let file = self.parse(source)?;
        serde_json::to_writer_pretty(&mut *out, &file)
            .map_err(|e| FileError::output(&source.path, e.into()))?;
        writeln!(out).map_err(|e| FileError::output(&source.path, e))
    }
}

/// Format one source and carry out the configured actions
///
/// # Errors
///
/// Returns a [`FileError`] for a parse failure or a failed action.
pub fn process_source<W: Write>(
    formatter: &Formatter,
    config: &Config,
    source: &SourceFile,
    out: &mut W,
) -> std::result::Result<Outcome, FileError> {
    let result = formatter.format(source)?;
    log::debug!(
        "formatted {} ({})",
        source.name(),
        if result.changed { "changed" } else { "unchanged" }
    );
    dispatch(config, &result, out)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn formatter(config: &Config) -> Formatter {
        Formatter::new(&config.clone().finalize())
    }

    #[test]
    fn test_format_changed_flag() {
        let f = formatter(&Config::default());
        let canonical = SourceFile::from_path(Path::new("a.sh"), b"echo hi\n".to_vec());
        assert!(!f.format(&canonical).unwrap().changed);

        let messy = SourceFile::from_path(Path::new("a.sh"), b"echo   hi".to_vec());
        let result = f.format(&messy).unwrap();
        assert!(result.changed);
        assert_eq!(result.formatted, b"echo hi\n");
    }

    #[test]
    fn test_parse_error_names_source() {
        let f = formatter(&Config::default());
        let source = SourceFile::from_stdin(b"if true; then\n".to_vec());
        let err = f.format(&source).unwrap_err();
        assert!(err.to_string().starts_with("<standard input>:1:1:"));
    }

    #[test]
    fn test_minify_simplifies_without_flag() {
        let src = b"#!/bin/sh\n# c\nfoo=${bar};\n\nif a; then\n  echo $((${x} + 1))\nfi\n".to_vec();
        let source = SourceFile::from_stdin(src);
        let minified = Config {
            minify: true,
            ..Config::default()
        };
        let both = Config {
            minify: true,
            simplify: true,
            ..Config::default()
        };
        // without finalize, the simplify pass must still run
        let unfinalized = Formatter::new(&minified);
        let expected = formatter(&both).format(&source).unwrap().formatted;
        assert_eq!(unfinalized.format(&source).unwrap().formatted, expected);
        assert_eq!(
            String::from_utf8(expected).unwrap(),
            "#!/bin/sh\nfoo=$bar\nif a; then\necho $((x + 1))\nfi\n"
        );
    }

    #[test]
    fn test_json_output() {
        let f = formatter(&Config::default());
        let source = SourceFile::from_stdin(b"echo hi\n".to_vec());
        let mut out = Vec::new();
        f.write_json(&source, &mut out).unwrap();
        let json: serde_json::Value = serde_json::from_slice(&out).unwrap();
        assert_eq!(json["Type"], "File");
        assert_eq!(json["Name"], "<standard input>");
        assert_eq!(json["Nodes"][0]["Type"], "Stmt");
        assert_eq!(json["Nodes"][0]["Parts"][1]["Text"], "hi");
    }

    #[test]
    fn test_json_simplified() {
        let config = Config {
            simplify: true,
            ..Config::default()
        };
        let f = formatter(&config);
        let source = SourceFile::from_stdin(b"echo ${a}\n".to_vec());
        let mut out = Vec::new();
        f.write_json(&source, &mut out).unwrap();
        let json: serde_json::Value = serde_json::from_slice(&out).unwrap();
        assert_eq!(json["Nodes"][0]["Parts"][1]["Text"], "$a");
    }
}
