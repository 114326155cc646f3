//! Scope types for shell compound commands

use std::fmt;

use crate::parser::Pos;

/// Shell compound command kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScopeKind {
    /// `if`/`then`/`elif`/`else`/`fi`
    If,
    /// `while`, `until`, `for` and `select`, closed by `done`
    Loop,
    /// `case`/`in`/`esac`
    Case,
    /// `{ ... }`, including function bodies
    Group,
    /// `( ... )`
    Subshell,
}

impl ScopeKind {
    /// Keyword or operator that ends the scope
    #[must_use]
    pub fn closer(self) -> &'static str {
        match self {
            ScopeKind::If => "fi",
            ScopeKind::Loop => "done",
            ScopeKind::Case => "esac",
            ScopeKind::Group => "}",
            ScopeKind::Subshell => ")",
        }
    }

    /// Keyword that must appear before the scope may close
    #[must_use]
    pub fn required_mid(self) -> Option<&'static str> {
        match self {
            ScopeKind::If => Some("then"),
            ScopeKind::Loop => Some("do"),
            _ => None,
        }
    }

    /// Scope kind closed by `word`, if any
    #[must_use]
    pub fn closed_by(word: &str) -> Option<Self> {
        match word {
            "fi" => Some(ScopeKind::If),
            "done" => Some(ScopeKind::Loop),
            "esac" => Some(ScopeKind::Case),
            "}" => Some(ScopeKind::Group),
            ")" => Some(ScopeKind::Subshell),
            _ => None,
        }
    }
}

impl fmt::Display for ScopeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ScopeKind::If => "an if",
            ScopeKind::Loop => "a loop",
            ScopeKind::Case => "a case",
            ScopeKind::Group => "a block",
            ScopeKind::Subshell => "a subshell",
        };
        write!(f, "{name}")
    }
}

/// Where a `case` clause is in its grammar
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CasePhase {
    /// Between `case` and `in`
    Head,
    /// Reading an arm's patterns, up to `)`
    Pattern,
    /// Inside an arm, up to `;;`, `;&` or `;;&`
    Body,
}

/// An open compound command
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Scope {
    pub kind: ScopeKind,
    /// Opening keyword as written, e.g. `while` or `{`
    pub keyword: String,
    pub pos: Pos,
    /// Whether `then` or `do` has been seen
    pub seen_mid: bool,
    pub phase: CasePhase,
    /// Whether the current case arm has any pattern words yet
    pub pattern_words: bool,
}

impl Scope {
    #[must_use]
    pub fn new(kind: ScopeKind, keyword: &str, pos: Pos) -> Self {
        Self {
            kind,
            keyword: keyword.to_string(),
            pos,
            seen_mid: false,
            phase: CasePhase::Head,
            pattern_words: false,
        }
    }

    /// Whether this is a `case` currently reading arm patterns
    #[must_use]
    pub fn in_patterns(&self) -> bool {
        self.kind == ScopeKind::Case && self.phase == CasePhase::Pattern
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_closers() {
        for kind in [
            ScopeKind::If,
            ScopeKind::Loop,
            ScopeKind::Case,
            ScopeKind::Group,
            ScopeKind::Subshell,
        ] {
            assert_eq!(ScopeKind::closed_by(kind.closer()), Some(kind));
        }
        assert_eq!(ScopeKind::closed_by("end"), None);
    }

    #[test]
    fn test_required_mid() {
        assert_eq!(ScopeKind::If.required_mid(), Some("then"));
        assert_eq!(ScopeKind::Loop.required_mid(), Some("do"));
        assert_eq!(ScopeKind::Group.required_mid(), None);
    }

    #[test]
    fn test_display() {
        assert_eq!(format!("{}", ScopeKind::If), "an if");
        assert_eq!(format!("{}", ScopeKind::Group), "a block");
    }
}
