//! Shell source parsing.
//!
//! This module turns shell source into a [`File`] syntax tree:
//! - [`InputStream`]: Splits source into logical lines of words, operators and redirects
//! - [`ScopeTracker`](crate::scope::ScopeTracker): Resolves block nesting into per-line indentation
//! - [`patterns`]: Precompiled regex patterns for script detection and shell words
//!
//! Words are kept verbatim, so quoting, expansions and here-document bodies are
//! preserved byte for byte through formatting.

pub mod ast;
pub mod patterns;
pub mod stream;

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ParseError;
use crate::scope::ScopeTracker;

pub use ast::{
    Blank, Break, Comment, CommentLine, File, Heredoc, Indent, Node, Op, Part, Pos, Redirect,
    Stmt, Word,
};
pub use stream::{InputStream, RawLine, RawStmt};

/// Shell language accepted by the parser
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LangVariant {
    #[default]
    Bash,
    Posix,
    Mksh,
}

impl FromStr for LangVariant {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "bash" => Ok(Self::Bash),
            "posix" => Ok(Self::Posix),
            "mksh" => Ok(Self::Mksh),
            other => Err(format!("unknown shell language: {other}")),
        }
    }
}

impl fmt::Display for LangVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Bash => "bash",
            Self::Posix => "posix",
            Self::Mksh => "mksh",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParserOptions {
    pub variant: LangVariant,
    /// Keep comments in the tree; minified output drops them
    pub keep_comments: bool,
}

impl Default for ParserOptions {
    fn default() -> Self {
        Self {
            variant: LangVariant::Bash,
            keep_comments: true,
        }
    }
}

/// Shell parser, configured once and reused for every file
#[derive(Debug, Clone, Default)]
pub struct Parser {
    options: ParserOptions,
}

impl Parser {
    #[must_use]
    pub fn new(options: ParserOptions) -> Self {
        Self { options }
    }

    /// Parse a complete source file
    ///
    /// # Errors
    ///
    /// Returns a [`ParseError`] naming `name` and the position of the first
    /// syntax error, or of the first byte that is not valid UTF-8.
    pub fn parse(&self, src: &[u8], name: &str) -> Result<File, ParseError> {
        let src = std::str::from_utf8(src)
            .map_err(|e| invalid_utf8(src, name, e.valid_up_to()))?;
        let keep_comments = self.options.keep_comments;

        let mut stream = InputStream::new(name, src, self.options.variant);
        let mut scopes = ScopeTracker::new(self.options.variant);
        let mut nodes = Vec::new();

        while let Some(line) = stream.next_line()? {
            match line {
                RawLine::Blank(pos) => nodes.push(Node::Blank(Blank { pos })),
                RawLine::Comment(comment) => {
                    if keep_comments {
                        nodes.push(Node::Comment(CommentLine {
                            indent: scopes.indent(),
                            comment,
                        }));
                    }
                }
                RawLine::Stmt(raw) => {
                    let indent = scopes
                        .process(&raw.parts)
                        .map_err(|e| e.into_parse_error(name))?;
                    nodes.push(Node::Stmt(Stmt {
                        pos: raw.pos,
                        indent,
                        parts: raw.parts,
                        comment: raw.comment.filter(|_| keep_comments),
                        heredocs: raw.heredocs,
                    }));
                }
            }
        }
        scopes.finish().map_err(|e| e.into_parse_error(name))?;

        Ok(File {
            name: name.to_string(),
            nodes,
        })
    }
}

fn invalid_utf8(src: &[u8], name: &str, offset: usize) -> ParseError {
    let before = &src[..offset];
    let line_start = before
        .iter()
        .rposition(|&b| b == b'\n')
        .map_or(0, |i| i + 1);
    let pos = Pos {
        offset,
        line: before.iter().filter(|&&b| b == b'\n').count() + 1,
        col: offset - line_start + 1,
    };
    ParseError::new(name, pos, "invalid UTF-8 encoding")
}
