//! Scope tracker - resolves compound command nesting into line indentation

use thiserror::Error;

use crate::error::ParseError;
use crate::parser::patterns::ASSIGNMENT_RE;
use crate::parser::{Indent, LangVariant, Op, Part, Pos, Word};

use super::types::{CasePhase, Scope, ScopeKind};

/// Malformed block structure, before the file name is known
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{pos}: {message}")]
pub struct ScopeError {
    pub pos: Pos,
    pub message: String,
}

impl ScopeError {
    fn new(pos: Pos, message: impl Into<String>) -> Self {
        Self {
            pos,
            message: message.into(),
        }
    }

    #[must_use]
    pub fn into_parse_error(self, name: &str) -> ParseError {
        ParseError::new(name, self.pos, self.message)
    }
}

/// Grammar position within one logical line
struct LineState {
    /// The next word would start a command, so keywords are recognized
    cmd_pos: bool,
    /// The previous word was a command name; `(` now declares a function
    after_cmd_word: bool,
    /// A `(` following a function name has not been closed yet
    func_parens: bool,
    /// `function` was seen and its name has not
    func_name_pending: bool,
    /// No word or operator has been seen on the line yet
    leading: bool,
    /// Indentation of the line
    level: Indent,
}

/// Tracks open compound commands across lines
#[derive(Debug, Clone)]
pub struct ScopeTracker {
    variant: LangVariant,
    stack: Vec<Scope>,
}

impl ScopeTracker {
    #[must_use]
    pub fn new(variant: LangVariant) -> Self {
        Self {
            variant,
            stack: Vec::new(),
        }
    }

    /// Indentation for a line starting now
    #[must_use]
    pub fn indent(&self) -> Indent {
        indent_of(&self.stack)
    }

    /// Process the parts of one statement line and return its indentation
    ///
    /// A line starting with a closing or continuing keyword (`fi`, `done`,
    /// `else`, `do`, ...) is outdented to the level of its opening keyword.
    ///
    /// # Errors
    ///
    /// Returns a [`ScopeError`] for keywords that do not fit the open scopes.
    pub fn process(&mut self, parts: &[Part]) -> Result<Indent, ScopeError> {
        let mut line = LineState {
            cmd_pos: true,
            after_cmd_word: false,
            func_parens: false,
            func_name_pending: false,
            leading: true,
            level: self.indent(),
        };
        for part in parts {
            match part {
                Part::Word(word) => self.word(word, &mut line)?,
                Part::Op(op) => self.op(op, &mut line)?,
                Part::Redirect(_) => {
                    line.after_cmd_word = false;
                    line.leading = false;
                }
                Part::Break(_) => {}
            }
        }
        Ok(line.level)
    }

    /// Check that every scope was closed
    ///
    /// # Errors
    ///
    /// Returns a [`ScopeError`] at the innermost scope still open.
    pub fn finish(&self) -> Result<(), ScopeError> {
        match self.stack.last() {
            Some(scope) => Err(ScopeError::new(
                scope.pos,
                format!(
                    "\"{}\" must end with \"{}\"",
                    scope.keyword,
                    scope.kind.closer()
                ),
            )),
            None => Ok(()),
        }
    }

    fn word(&mut self, word: &Word, line: &mut LineState) -> Result<(), ScopeError> {
        let leading = std::mem::replace(&mut line.leading, false);
        let text = word.text.as_str();

        if let Some(top) = self.stack.last_mut() {
            if top.in_patterns() {
                if text == "esac" && !top.pattern_words {
                    return self.close(ScopeKind::Case, word, leading, line);
                }
                top.pattern_words = true;
                return Ok(());
            }
            if top.kind == ScopeKind::Case && top.phase == CasePhase::Head {
                if text == "in" {
                    top.phase = CasePhase::Pattern;
                }
                return Ok(());
            }
        }

        if line.func_name_pending {
            line.func_name_pending = false;
            line.cmd_pos = true;
            line.after_cmd_word = true;
            return Ok(());
        }

        if !line.cmd_pos {
            line.after_cmd_word = false;
            return Ok(());
        }
        line.after_cmd_word = false;

        match text {
            "if" => self.open(ScopeKind::If, word),
            "while" | "until" => self.open(ScopeKind::Loop, word),
            "for" => {
                self.open(ScopeKind::Loop, word);
                line.cmd_pos = false;
            }
            "select" => {
                self.bash_only(word.pos, "\"select\" loops")?;
                self.open(ScopeKind::Loop, word);
                line.cmd_pos = false;
            }
            "case" => {
                self.open(ScopeKind::Case, word);
                line.cmd_pos = false;
            }
            "{" => self.open(ScopeKind::Group, word),
            "function" => {
                self.bash_only(word.pos, "\"function\" declarations")?;
                line.func_name_pending = true;
                line.cmd_pos = false;
            }
            "then" => {
                let top = self.expect_top(ScopeKind::If, word)?;
                top.seen_mid = true;
                self.outdent_mid(leading, line);
            }
            "elif" => {
                let top = self.expect_top(ScopeKind::If, word)?;
                top.seen_mid = false;
                self.outdent_mid(leading, line);
            }
            "else" => {
                self.expect_top(ScopeKind::If, word)?;
                self.outdent_mid(leading, line);
            }
            "do" => {
                let top = self.expect_top(ScopeKind::Loop, word)?;
                top.seen_mid = true;
                self.outdent_mid(leading, line);
            }
            "fi" | "done" | "esac" | "}" => {
                if let Some(kind) = ScopeKind::closed_by(text) {
                    self.close(kind, word, leading, line)?;
                }
                line.cmd_pos = false;
            }
            "!" | "time" => {}
            _ if ASSIGNMENT_RE.is_match(text) => {}
            _ => {
                line.cmd_pos = false;
                line.after_cmd_word = true;
            }
        }
        Ok(())
    }

    fn op(&mut self, op: &Op, line: &mut LineState) -> Result<(), ScopeError> {
        let leading = std::mem::replace(&mut line.leading, false);
        let after_cmd_word = std::mem::replace(&mut line.after_cmd_word, false);

        if let Some(top) = self.stack.last_mut() {
            if top.in_patterns() {
                match op.op.as_str() {
                    "(" if !top.pattern_words => return Ok(()),
                    "|" => return Ok(()),
                    ")" => {
                        top.phase = CasePhase::Body;
                        top.pattern_words = false;
                        line.cmd_pos = true;
                        return Ok(());
                    }
                    _ => {}
                }
            }
        }

        match op.op.as_str() {
            ";;" | ";&" | ";;&" => match self.stack.last_mut() {
                Some(top) if top.kind == ScopeKind::Case && top.phase == CasePhase::Body => {
                    top.phase = CasePhase::Pattern;
                    line.cmd_pos = true;
                }
                _ => {
                    return Err(ScopeError::new(
                        op.pos,
                        format!("\"{}\" can only be used in a case clause", op.op),
                    ))
                }
            },
            "(" => {
                if after_cmd_word {
                    line.func_parens = true;
                } else if line.cmd_pos {
                    self.stack
                        .push(Scope::new(ScopeKind::Subshell, "(", op.pos));
                } else {
                    return Err(ScopeError::new(
                        op.pos,
                        "a command can only contain words and redirects; encountered (",
                    ));
                }
            }
            ")" => {
                if line.func_parens {
                    line.func_parens = false;
                    line.cmd_pos = true;
                } else {
                    self.close_subshell(op, leading, line)?;
                    line.cmd_pos = false;
                }
            }
            _ => line.cmd_pos = true,
        }
        Ok(())
    }

    fn open(&mut self, kind: ScopeKind, word: &Word) {
        self.stack.push(Scope::new(kind, &word.text, word.pos));
    }

    fn bash_only(&self, pos: Pos, what: &str) -> Result<(), ScopeError> {
        if self.variant == LangVariant::Posix {
            return Err(ScopeError::new(
                pos,
                format!("{what} are a bash feature; tried parsing as posix"),
            ));
        }
        Ok(())
    }

    /// The innermost scope, which must be of `kind` for `word` to be valid
    fn expect_top(&mut self, kind: ScopeKind, word: &Word) -> Result<&mut Scope, ScopeError> {
        match self.stack.last_mut() {
            Some(top) if top.kind == kind => Ok(top),
            _ => Err(ScopeError::new(
                word.pos,
                format!("\"{}\" can only be used in {kind}", word.text),
            )),
        }
    }

    /// A leading `then`/`else`/`do` sits at the level of its opening keyword
    fn outdent_mid(&self, leading: bool, line: &mut LineState) {
        if leading {
            line.level = indent_of(&self.stack[..self.stack.len() - 1]);
        }
    }

    fn close(
        &mut self,
        kind: ScopeKind,
        word: &Word,
        leading: bool,
        line: &mut LineState,
    ) -> Result<(), ScopeError> {
        let Some(top) = self.stack.last() else {
            return Err(ScopeError::new(
                word.pos,
                format!("\"{}\" can only be used to end {kind}", word.text),
            ));
        };
        if top.kind != kind {
            return Err(ScopeError::new(
                top.pos,
                format!(
                    "\"{}\" must end with \"{}\"",
                    top.keyword,
                    top.kind.closer()
                ),
            ));
        }
        if let Some(mid) = kind.required_mid() {
            if !top.seen_mid {
                return Err(ScopeError::new(
                    top.pos,
                    format!("\"{}\" must be followed by \"{mid}\"", top.keyword),
                ));
            }
        }
        self.stack.pop();
        if leading {
            line.level = self.indent();
        }
        Ok(())
    }

    fn close_subshell(
        &mut self,
        op: &Op,
        leading: bool,
        line: &mut LineState,
    ) -> Result<(), ScopeError> {
        match self.stack.last() {
            Some(top) if top.kind == ScopeKind::Subshell => {
                self.stack.pop();
                if leading {
                    line.level = self.indent();
                }
                Ok(())
            }
            Some(top) => Err(ScopeError::new(
                top.pos,
                format!(
                    "\"{}\" must end with \"{}\"",
                    top.keyword,
                    top.kind.closer()
                ),
            )),
            None => Err(ScopeError::new(
                op.pos,
                "\")\" can only be used to end a subshell",
            )),
        }
    }
}

/// Indentation inside the given open scopes
fn indent_of(stack: &[Scope]) -> Indent {
    let mut indent = Indent::default();
    for scope in stack {
        if scope.kind == ScopeKind::Case {
            indent.case_depth += 1;
            if scope.phase == CasePhase::Body {
                indent.depth += 1;
            }
        } else {
            indent.depth += 1;
        }
    }
    indent
}
