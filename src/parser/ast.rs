//! Syntax tree for shell source.
//!
//! A [`File`] is a flat list of [`Node`]s, one per logical line. Block
//! structure (`if`/`fi`, loops, `case`, groups, subshells) is resolved at parse
//! time into an [`Indent`] on every line, which is all the printer needs.
//! Every type serializes to typed JSON with a `"Type"` tag.

use std::fmt;

use serde::Serialize;

/// Position in the source
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct Pos {
    /// Byte offset from the start of the source
    pub offset: usize,
    /// 1-based line
    pub line: usize,
    /// 1-based column, in bytes
    pub col: usize,
}

impl fmt::Display for Pos {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.col)
    }
}

/// Nesting of a line
///
/// `depth` counts enclosing blocks (a `case` only counts for lines in an arm
/// body); `case_depth` counts enclosing `case` clauses, which only indent
/// further when switch-case indentation is on.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct Indent {
    pub depth: usize,
    pub case_depth: usize,
}

impl Indent {
    /// Number of indentation units for this line
    #[must_use]
    pub fn levels(self, switch_case_indent: bool) -> usize {
        if switch_case_indent {
            self.depth + self.case_depth
        } else {
            self.depth
        }
    }
}

/// A parsed source file
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "Type", rename_all = "PascalCase")]
pub struct File {
    pub name: String,
    pub nodes: Vec<Node>,
}

/// One logical line
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "Type")]
pub enum Node {
    Stmt(Stmt),
    Comment(CommentLine),
    Blank(Blank),
}

/// A statement line: one or more commands joined by control operators
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct Stmt {
    pub pos: Pos,
    pub indent: Indent,
    pub parts: Vec<Part>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comment: Option<Comment>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub heredocs: Vec<Heredoc>,
}

/// A line holding only a comment
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct CommentLine {
    pub indent: Indent,
    pub comment: Comment,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct Blank {
    pub pos: Pos,
}

/// A `#` comment, including the leading `#`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct Comment {
    pub pos: Pos,
    pub text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pad: Option<String>,
}

/// Token of a statement line
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "Type")]
pub enum Part {
    Word(Word),
    Op(Op),
    Redirect(Redirect),
    /// Line continuation, either `\` + newline or a newline after `&&`, `||` or `|`
    Break(Break),
}

impl Part {
    /// Whitespace run preceding the part, kept only when longer than one byte
    #[must_use]
    pub fn pad(&self) -> Option<&str> {
        match self {
            Part::Word(w) => w.pad.as_deref(),
            Part::Op(o) => o.pad.as_deref(),
            Part::Redirect(r) => r.pad.as_deref(),
            Part::Break(_) => None,
        }
    }

    #[must_use]
    pub fn pos(&self) -> Pos {
        match self {
            Part::Word(w) => w.pos,
            Part::Op(o) => o.pos,
            Part::Redirect(r) => r.pos,
            Part::Break(b) => b.pos,
        }
    }

    /// The operator text if this is a control operator
    #[must_use]
    pub fn op(&self) -> Option<&str> {
        match self {
            Part::Op(o) => Some(&o.op),
            _ => None,
        }
    }

    /// The word text if this is a word
    #[must_use]
    pub fn word(&self) -> Option<&str> {
        match self {
            Part::Word(w) => Some(&w.text),
            _ => None,
        }
    }
}

/// A shell word, verbatim: quotes and expansions are not interpreted
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct Word {
    pub pos: Pos,
    pub text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pad: Option<String>,
}

/// Control operator such as `;`, `&&`, `|` or `;;`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct Op {
    pub pos: Pos,
    pub op: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pad: Option<String>,
}

/// Redirection: optional file descriptor, operator and target word
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct Redirect {
    pub pos: Pos,
    /// Operator including any leading file descriptor, e.g. `2>&`
    pub op: String,
    pub target: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pad: Option<String>,
}

impl Redirect {
    #[must_use]
    pub fn is_heredoc(&self) -> bool {
        let op = self.op.trim_start_matches(|c: char| c.is_ascii_digit());
        op == "<<" || op == "<<-"
    }

    /// Duplicating redirections such as `2>&1` never take a space
    #[must_use]
    pub fn is_dup(&self) -> bool {
        self.op.ends_with('&')
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct Break {
    pub pos: Pos,
}

/// Here-document body, verbatim up to and including the terminator line
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct Heredoc {
    pub pos: Pos,
    pub body: String,
}
