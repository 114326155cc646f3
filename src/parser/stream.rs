//! `InputStream` - Converts shell source into logical lines
//!
//! This module handles:
//! - Joining line continuations (`\` + newline, or a newline after `&&`, `||`, `|`)
//! - Keeping quoted strings and expansions as single words, even across lines
//! - Separating trailing comments from code
//! - Reading here-document bodies that follow a line
//! - Rejecting bash-only syntax when parsing as POSIX

use crate::error::ParseError;

use super::ast::{Break, Comment, Heredoc, Op, Part, Pos, Redirect, Word};
use super::LangVariant;

/// Operators in longest-match order
const OPERATORS: &[&str] = &[
    ";;&", ";;", ";&", ";", "&&", "&>>", "&>", "&", "||", "|&", "|", "(", ")", "<<<", "<<-", "<<",
    "<>", "<&", "<", ">>", ">&", ">|", ">",
];

/// Binary operators after which a newline does not end the statement
const CONTINUING_OPS: &[&str] = &["&&", "||", "|", "|&"];

/// Words after which a `[[` starts a test expression
const TEST_START_WORDS: &[&str] = &[
    "if", "then", "else", "elif", "while", "until", "do", "!", "{", "time",
];

/// A logical line as read from the source
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RawLine {
    Blank(Pos),
    Comment(Comment),
    Stmt(RawStmt),
}

/// Tokens of a statement line before block structure is applied
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawStmt {
    pub pos: Pos,
    pub parts: Vec<Part>,
    pub comment: Option<Comment>,
    pub heredocs: Vec<Heredoc>,
}

/// Here-document announced on the current line, body not yet read
struct PendingHeredoc {
    pos: Pos,
    terminator: String,
    strip_tabs: bool,
}

/// `InputStream` reads logical lines from shell source
pub struct InputStream<'a> {
    name: &'a str,
    src: &'a str,
    pos: usize,
    /// Byte offset at which each physical line starts
    line_starts: Vec<usize>,
    variant: LangVariant,
}

impl<'a> InputStream<'a> {
    /// Create a new `InputStream`
    ///
    /// # Arguments
    /// * `name` - Path or label used in error messages
    /// * `src` - The complete source text
    /// * `variant` - Shell language to accept
    #[must_use]
    pub fn new(name: &'a str, src: &'a str, variant: LangVariant) -> Self {
        let line_starts = std::iter::once(0)
            .chain(src.match_indices('\n').map(|(i, _)| i + 1))
            .collect();
        Self {
            name,
            src,
            pos: 0,
            line_starts,
            variant,
        }
    }

    /// Convert a byte offset to a line/column position
    #[must_use]
    pub fn pos_at(&self, offset: usize) -> Pos {
        let line = match self.line_starts.binary_search(&offset) {
            Ok(i) => i,
            Err(i) => i - 1,
        };
        Pos {
            offset,
            line: line + 1,
            col: offset - self.line_starts[line] + 1,
        }
    }

    /// Read the next logical line
    ///
    /// Returns None at EOF
    pub fn next_line(&mut self) -> Result<Option<RawLine>, ParseError> {
        let start = self.pos;
        let mut parts: Vec<Part> = Vec::new();
        let mut comment = None;
        let mut heredocs = Vec::new();
        let mut pending = Vec::new();
        let mut in_test = false;

        loop {
            let ws_start = self.pos;
            self.skip_blanks();
            let pad = if parts.is_empty() || matches!(parts.last(), Some(Part::Break(_))) {
                None
            } else {
                padding(&self.src[ws_start..self.pos])
            };
            let Some(c) = self.peek() else { break };
            let offset = self.pos;

            match c {
                b'\n' => {
                    self.advance(1);
                    if !pending.is_empty() {
                        self.read_heredocs(&mut pending, &mut heredocs)?;
                        break;
                    }
                    if comment.is_none() && ends_with_continuing_op(&parts) {
                        self.skip_blank_lines();
                        parts.push(Part::Break(Break {
                            pos: self.pos_at(offset),
                        }));
                        continue;
                    }
                    break;
                }
                // a backslash ending the input joins with nothing
                b'\\' if matches!(self.peek_at(1), Some(b'\n') | None) => {
                    self.advance(2);
                    if !parts.is_empty() && !matches!(parts.last(), Some(Part::Break(_))) {
                        parts.push(Part::Break(Break {
                            pos: self.pos_at(offset),
                        }));
                    }
                }
                b'#' => {
                    let src = self.src;
                    let end = src[offset..].find('\n').map_or(src.len(), |i| offset + i);
                    self.pos = end;
                    comment = Some(Comment {
                        pos: self.pos_at(offset),
                        text: src[offset..end].trim_end().to_string(),
                        pad,
                    });
                }
                _ if in_test => {
                    if self.rest().starts_with("]]") && self.is_boundary(2) {
                        self.advance(2);
                        in_test = false;
                        parts.push(Part::Word(Word {
                            pos: self.pos_at(offset),
                            text: "]]".to_string(),
                            pad,
                        }));
                    } else {
                        parts.push(Part::Word(self.scan_word(true, pad)?));
                    }
                }
                b'(' if self.peek_at(1) == Some(b'(') => {
                    self.bash_only(offset, "arithmetic commands")?;
                    self.advance(2);
                    self.scan_nested(b'(', b')', 2, offset)?;
                    parts.push(Part::Word(Word {
                        pos: self.pos_at(offset),
                        text: self.src[offset..self.pos].to_string(),
                        pad,
                    }));
                }
                b'<' | b'>' if self.peek_at(1) == Some(b'(') => {
                    parts.push(Part::Word(self.scan_word(false, pad)?));
                }
                b';' | b'&' | b'|' | b'(' | b')' | b'<' | b'>' => {
                    parts.push(self.scan_operator(pad, &mut pending)?);
                }
                b'0'..=b'9' if self.fd_redirect_len().is_some() => {
                    let fd_len = self.fd_redirect_len().unwrap_or_default();
                    parts.push(self.scan_redirect(fd_len, pad, &mut pending)?);
                }
                _ => {
                    let word = self.scan_word(false, pad)?;
                    if word.text == "[[" && test_may_start(&parts) {
                        self.bash_only(offset, "test expressions")?;
                        in_test = true;
                    }
                    parts.push(Part::Word(word));
                }
            }
        }

        if let Some(doc) = pending.first() {
            return Err(self.error(
                doc.pos.offset,
                format!("unclosed here-document '{}'", doc.terminator),
            ));
        }

        if matches!(parts.last(), Some(Part::Break(_))) {
            parts.pop();
        }
        if let Some(Part::Op(op)) = parts.last() {
            if self.pos >= self.src.len() && CONTINUING_OPS.contains(&op.op.as_str()) {
                return Err(ParseError::new(
                    self.name,
                    op.pos,
                    format!("\"{}\" must be followed by a statement", op.op),
                ));
            }
        }

        if parts.is_empty() {
            if let Some(comment) = comment {
                return Ok(Some(RawLine::Comment(comment)));
            }
            if self.pos == start {
                return Ok(None);
            }
            return Ok(Some(RawLine::Blank(self.pos_at(start))));
        }

        Ok(Some(RawLine::Stmt(RawStmt {
            pos: parts[0].pos(),
            parts,
            comment,
            heredocs,
        })))
    }

    fn error(&self, offset: usize, message: impl Into<String>) -> ParseError {
        ParseError::new(self.name, self.pos_at(offset), message)
    }

    fn bash_only(&self, offset: usize, what: &str) -> Result<(), ParseError> {
        if self.variant == LangVariant::Posix {
            return Err(self.error(
                offset,
                format!("{what} are a bash feature; tried parsing as posix"),
            ));
        }
        Ok(())
    }

    fn peek(&self) -> Option<u8> {
        self.src.as_bytes().get(self.pos).copied()
    }

    fn peek_at(&self, n: usize) -> Option<u8> {
        self.src.as_bytes().get(self.pos + n).copied()
    }

    fn rest(&self) -> &'a str {
        let src = self.src;
        &src[self.pos..]
    }

    fn advance(&mut self, n: usize) {
        self.pos = (self.pos + n).min(self.src.len());
    }

    /// Whether the byte `n` ahead ends a word
    fn is_boundary(&self, n: usize) -> bool {
        matches!(
            self.peek_at(n),
            None | Some(b' ' | b'\t' | b'\r' | b'\n' | b';' | b'&' | b'|' | b')')
        )
    }

    fn skip_blanks(&mut self) {
        while matches!(self.peek(), Some(b' ' | b'\t' | b'\r')) {
            self.advance(1);
        }
    }

    fn skip_blank_lines(&mut self) {
        loop {
            self.skip_blanks();
            if self.peek() != Some(b'\n') {
                break;
            }
            self.advance(1);
        }
    }

    /// Length of a file descriptor number directly followed by a redirect operator
    fn fd_redirect_len(&self) -> Option<usize> {
        let digits = self
            .rest()
            .bytes()
            .take_while(u8::is_ascii_digit)
            .count();
        match (self.peek_at(digits), self.peek_at(digits + 1)) {
            (Some(b'<' | b'>'), Some(b'(')) => None,
            (Some(b'<' | b'>'), _) => Some(digits),
            _ => None,
        }
    }

    fn scan_operator(
        &mut self,
        pad: Option<String>,
        pending: &mut Vec<PendingHeredoc>,
    ) -> Result<Part, ParseError> {
        let offset = self.pos;
        let rest = self.rest();
        let op = OPERATORS
            .iter()
            .copied()
            .find(|op| rest.starts_with(op))
            .ok_or_else(|| self.error(offset, "unexpected character"))?;
        if is_redirect_op(op) {
            return self.scan_redirect(0, pad, pending);
        }
        if op == "|&" {
            self.bash_only(offset, "\"|&\" pipes")?;
        }
        self.advance(op.len());
        Ok(Part::Op(Op {
            pos: self.pos_at(offset),
            op: op.to_string(),
            pad,
        }))
    }

    fn scan_redirect(
        &mut self,
        fd_len: usize,
        pad: Option<String>,
        pending: &mut Vec<PendingHeredoc>,
    ) -> Result<Part, ParseError> {
        let offset = self.pos;
        let after_fd = &self.rest()[fd_len..];
        let op = OPERATORS
            .iter()
            .copied()
            .find(|op| is_redirect_op(op) && after_fd.starts_with(op))
            .ok_or_else(|| self.error(offset, "expected a redirect operator"))?;
        match op {
            "<<<" => self.bash_only(offset, "herestrings")?,
            "&>" | "&>>" => self.bash_only(offset, "\"&>\" redirects")?,
            _ => {}
        }

        let op_text = self.src[offset..offset + fd_len + op.len()].to_string();
        self.advance(fd_len + op.len());
        self.skip_blanks();
        let target_missing = match self.peek() {
            None | Some(b'\n' | b';' | b'&' | b'|' | b'(' | b')' | b'#') => true,
            Some(b'<' | b'>') => self.peek_at(1) != Some(b'('),
            Some(b'\\') => self.peek_at(1).is_none(),
            _ => false,
        };
        if target_missing {
            return Err(self.error(offset, format!("\"{op}\" must be followed by a word")));
        }
        let target = self.scan_word(false, None)?;

        let pos = self.pos_at(offset);
        if op == "<<" || op == "<<-" {
            pending.push(PendingHeredoc {
                pos,
                terminator: unquote(&target.text),
                strip_tabs: op == "<<-",
            });
        }
        Ok(Part::Redirect(Redirect {
            pos,
            op: op_text,
            target: target.text,
            pad,
        }))
    }

    /// Scan a word, keeping quotes and expansions verbatim
    ///
    /// In a test expression only whitespace ends a word.
    fn scan_word(&mut self, test_mode: bool, pad: Option<String>) -> Result<Word, ParseError> {
        let start = self.pos;
        while let Some(c) = self.peek() {
            match c {
                b' ' | b'\t' | b'\r' | b'\n' => break,
                b';' | b'&' | b'|' | b')' if !test_mode => break,
                b'<' | b'>' if !test_mode => {
                    if self.peek_at(1) != Some(b'(') {
                        break;
                    }
                    let open = self.pos;
                    self.bash_only(open, "process substitutions")?;
                    self.advance(2);
                    self.scan_nested(b'(', b')', 1, open)?;
                }
                b'(' if !test_mode => {
                    // array assignments and extended globs
                    let prev = if self.pos > start {
                        Some(self.src.as_bytes()[self.pos - 1])
                    } else {
                        None
                    };
                    if !matches!(prev, Some(b'=' | b'@' | b'!' | b'+' | b'*' | b'?')) {
                        break;
                    }
                    let open = self.pos;
                    self.advance(1);
                    self.scan_nested(b'(', b')', 1, open)?;
                }
                b'\\' if self.peek_at(1).is_none() => break,
                b'\\' => self.advance(2),
                b'\'' => self.scan_single_quoted()?,
                b'"' => self.scan_double_quoted()?,
                b'`' => self.scan_backquote()?,
                b'$' => self.scan_dollar()?,
                _ => self.advance(1),
            }
        }
        Ok(Word {
            pos: self.pos_at(start),
            text: self.src[start..self.pos].to_string(),
            pad,
        })
    }

    fn scan_dollar(&mut self) -> Result<(), ParseError> {
        let open = self.pos;
        match self.peek_at(1) {
            Some(b'(') => {
                self.advance(2);
                self.scan_nested(b'(', b')', 1, open)
            }
            Some(b'{') => {
                self.advance(2);
                self.scan_nested(b'{', b'}', 1, open)
            }
            Some(b'\'') => {
                self.bash_only(open, "ANSI-C quotes")?;
                self.advance(1);
                self.scan_ansi_quoted()
            }
            _ => {
                self.advance(1);
                Ok(())
            }
        }
    }

    /// Scan up to the `close` byte that brings `depth` to zero
    fn scan_nested(
        &mut self,
        open: u8,
        close: u8,
        mut depth: usize,
        start: usize,
    ) -> Result<(), ParseError> {
        while let Some(c) = self.peek() {
            match c {
                b'\\' => self.advance(2),
                b'\'' if open == b'(' => self.scan_single_quoted()?,
                b'"' => self.scan_double_quoted()?,
                b'`' => self.scan_backquote()?,
                b'$' if matches!(self.peek_at(1), Some(b'(' | b'{')) => self.scan_dollar()?,
                _ if c == open => {
                    depth += 1;
                    self.advance(1);
                }
                _ if c == close => {
                    depth -= 1;
                    self.advance(1);
                    if depth == 0 {
                        return Ok(());
                    }
                }
                _ => self.advance(1),
            }
        }
        Err(self.error(
            start,
            format!(
                "reached EOF without matching {} with {}",
                open as char, close as char
            ),
        ))
    }

    fn scan_single_quoted(&mut self) -> Result<(), ParseError> {
        let start = self.pos;
        self.advance(1);
        match self.rest().find('\'') {
            Some(i) => {
                self.advance(i + 1);
                Ok(())
            }
            None => Err(self.error(start, "reached EOF without closing quote '")),
        }
    }

    fn scan_ansi_quoted(&mut self) -> Result<(), ParseError> {
        let start = self.pos;
        self.advance(1);
        while let Some(c) = self.peek() {
            match c {
                b'\\' => self.advance(2),
                b'\'' => {
                    self.advance(1);
                    return Ok(());
                }
                _ => self.advance(1),
            }
        }
        Err(self.error(start, "reached EOF without closing quote '"))
    }

    fn scan_double_quoted(&mut self) -> Result<(), ParseError> {
        let start = self.pos;
        self.advance(1);
        while let Some(c) = self.peek() {
            match c {
                b'\\' => self.advance(2),
                b'"' => {
                    self.advance(1);
                    return Ok(());
                }
                b'$' if matches!(self.peek_at(1), Some(b'(' | b'{')) => self.scan_dollar()?,
                b'`' => self.scan_backquote()?,
                _ => self.advance(1),
            }
        }
        Err(self.error(start, "reached EOF without closing quote \""))
    }

    fn scan_backquote(&mut self) -> Result<(), ParseError> {
        let start = self.pos;
        self.advance(1);
        while let Some(c) = self.peek() {
            match c {
                b'\\' => self.advance(2),
                b'`' => {
                    self.advance(1);
                    return Ok(());
                }
                _ => self.advance(1),
            }
        }
        Err(self.error(start, "reached EOF without closing quote `"))
    }

    /// Read the bodies of all here-documents announced on the line just ended
    fn read_heredocs(
        &mut self,
        pending: &mut Vec<PendingHeredoc>,
        heredocs: &mut Vec<Heredoc>,
    ) -> Result<(), ParseError> {
        let src = self.src;
        for doc in pending.drain(..) {
            let body_start = self.pos;
            loop {
                if self.pos >= src.len() {
                    return Err(self.error(
                        doc.pos.offset,
                        format!("unclosed here-document '{}'", doc.terminator),
                    ));
                }
                let line_end = src[self.pos..]
                    .find('\n')
                    .map_or(src.len(), |i| self.pos + i);
                let line = &src[self.pos..line_end];
                self.pos = (line_end + 1).min(src.len());
                let line = if doc.strip_tabs {
                    line.trim_start_matches('\t')
                } else {
                    line
                };
                if line == doc.terminator {
                    break;
                }
            }
            let mut body = src[body_start..self.pos].to_string();
            if !body.ends_with('\n') {
                body.push('\n');
            }
            heredocs.push(Heredoc { pos: doc.pos, body });
        }
        Ok(())
    }
}

fn is_redirect_op(op: &str) -> bool {
    op.starts_with('<') || op.starts_with('>') || op.starts_with("&>")
}

fn ends_with_continuing_op(parts: &[Part]) -> bool {
    parts
        .last()
        .and_then(Part::op)
        .is_some_and(|op| CONTINUING_OPS.contains(&op))
}

/// Whether a `[[` at this point is in command position
fn test_may_start(parts: &[Part]) -> bool {
    match parts.iter().rev().find(|p| !matches!(p, Part::Break(_))) {
        None => true,
        Some(Part::Op(op)) => op.op != ")",
        Some(Part::Word(word)) => TEST_START_WORDS.contains(&word.text.as_str()),
        Some(_) => false,
    }
}

/// Whitespace runs longer than one byte are kept for padding preservation
fn padding(ws: &str) -> Option<String> {
    (ws.len() > 1).then(|| ws.to_string())
}

/// Here-document terminator with quoting removed
fn unquote(word: &str) -> String {
    word.chars()
        .filter(|c| !matches!(c, '\'' | '"' | '\\'))
        .collect()
}
