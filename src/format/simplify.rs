//! Simplification pass - removes redundant syntax without changing behavior
//!
//! Rewrites applied:
//! - A trailing `;` ending a statement line is dropped
//! - `${name}` becomes `$name` when the next character cannot extend the name
//! - Inside `$(( ))` and `(( ))`, `$name` and `${name}` become `name`
//!
//! Single-quoted text and here-document bodies are never touched. The pass is
//! idempotent.

use crate::parser::patterns::NAME_RE;
use crate::parser::{File, Node, Part, Stmt};

/// Simplify every statement in a file
pub fn simplify(file: &mut File) {
    for node in &mut file.nodes {
        if let Node::Stmt(stmt) = node {
            simplify_stmt(stmt);
        }
    }
}

fn simplify_stmt(stmt: &mut Stmt) {
    if stmt.parts.len() > 1 && stmt.parts.last().and_then(Part::op) == Some(";") {
        stmt.parts.pop();
        while matches!(stmt.parts.last(), Some(Part::Break(_))) {
            stmt.parts.pop();
        }
    }

    for part in &mut stmt.parts {
        match part {
            Part::Word(word) => word.text = simplify_word(&word.text),
            Part::Redirect(redirect) if !redirect.is_heredoc() => {
                redirect.target = simplify_word(&redirect.target);
            }
            _ => {}
        }
    }
}

fn is_name_start(c: u8) -> bool {
    c.is_ascii_alphabetic() || c == b'_'
}

fn is_name_byte(c: u8) -> bool {
    c.is_ascii_alphanumeric() || c == b'_'
}

/// End of the character starting at byte `i`
fn char_end(text: &str, i: usize) -> usize {
    text.get(i..)
        .and_then(|rest| rest.chars().next())
        .map_or(text.len(), |c| i + c.len_utf8())
}

/// Index just past the `)` matching the `(` at `open`
fn matching_paren(text: &str, open: usize) -> usize {
    let b = text.as_bytes();
    let mut depth = 0usize;
    let mut i = open;
    while i < b.len() {
        match b[i] {
            b'\\' => i += 1,
            b'\'' => {
                i = text[i + 1..].find('\'').map_or(b.len(), |j| i + 1 + j);
            }
            b'(' => depth += 1,
            b')' => {
                depth -= 1;
                if depth == 0 {
                    return i + 1;
                }
            }
            _ => {}
        }
        i += 1;
    }
    b.len()
}

/// Simplify the expansions in one word
#[must_use]
pub fn simplify_word(text: &str) -> String {
    let b = text.as_bytes();
    let mut out = String::with_capacity(text.len());
    // paren depth of each open arithmetic context
    let mut arith: Vec<usize> = Vec::new();
    let mut in_double = false;
    let mut i = 0;

    if text.starts_with("((") {
        arith.push(0);
        out.push_str("((");
        i = 2;
    }

    while i < b.len() {
        match b[i] {
            b'\\' => {
                let end = char_end(text, i + 1);
                out.push_str(&text[i..end]);
                i = end;
            }
            b'\'' if !in_double => {
                let end = text[i + 1..].find('\'').map_or(b.len(), |j| i + j + 2);
                out.push_str(&text[i..end]);
                i = end;
            }
            b'"' => {
                in_double = !in_double;
                out.push('"');
                i += 1;
            }
            b'$' => i = simplify_dollar(text, i, &mut arith, &mut out),
            b'(' if !arith.is_empty() => {
                if let Some(depth) = arith.last_mut() {
                    *depth += 1;
                }
                out.push('(');
                i += 1;
            }
            b')' if !arith.is_empty() => {
                if arith.last() == Some(&0) && b.get(i + 1) == Some(&b')') {
                    arith.pop();
                    out.push_str("))");
                    i += 2;
                } else {
                    if let Some(depth) = arith.last_mut() {
                        *depth = depth.saturating_sub(1);
                    }
                    out.push(')');
                    i += 1;
                }
            }
            _ => {
                let end = char_end(text, i);
                out.push_str(&text[i..end]);
                i = end;
            }
        }
    }
    out
}

/// Rewrite the expansion starting with the `$` at byte `i`
///
/// Returns the index at which scanning continues.
fn simplify_dollar(text: &str, i: usize, arith: &mut Vec<usize>, out: &mut String) -> usize {
    let b = text.as_bytes();
    match b.get(i + 1).copied() {
        Some(b'(') if b.get(i + 2) == Some(&b'(') => {
            arith.push(0);
            out.push_str("$((");
            i + 3
        }
        Some(b'(') => {
            // command substitutions start a fresh context
            let end = matching_paren(text, i + 1);
            let inner_end = if text[..end].ends_with(')') { end - 1 } else { end };
            out.push_str("$(");
            out.push_str(&simplify_word(&text[i + 2..inner_end]));
            out.push_str(&text[inner_end..end]);
            end
        }
        Some(b'{') => {
            if let Some(close) = text[i + 2..].find('}').map(|j| i + 2 + j) {
                let name = &text[i + 2..close];
                if NAME_RE.is_match(name) {
                    let next = b.get(close + 1).copied();
                    let extends = next.is_some_and(is_name_byte);
                    if !arith.is_empty() && !extends && next != Some(b'[') {
                        out.push_str(name);
                    } else if arith.is_empty() && !extends {
                        out.push('$');
                        out.push_str(name);
                    } else {
                        out.push_str(&text[i..=close]);
                    }
                    return close + 1;
                }
            }
            out.push_str("${");
            i + 2
        }
        Some(c) if !arith.is_empty() && is_name_start(c) => {
            let end = i + 1 + b[i + 1..].iter().take_while(|&&c| is_name_byte(c)).count();
            if b.get(end) == Some(&b'[') {
                out.push_str(&text[i..end]);
            } else {
                out.push_str(&text[i + 1..end]);
            }
            end
        }
        Some(b'\'') => {
            let mut j = i + 2;
            while j < b.len() {
                match b[j] {
                    b'\\' => j += 2,
                    b'\'' => {
                        j += 1;
                        break;
                    }
                    _ => j += 1,
                }
            }
            let end = j.min(b.len());
            out.push_str(&text[i..end]);
            end
        }
        _ => {
            out.push('$');
            i + 1
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::Parser;
    use crate::format::{Printer, PrinterOptions};

    fn simplified(src: &str) -> String {
        let mut file = Parser::default().parse(src.as_bytes(), "t.sh").unwrap();
        simplify(&mut file);
        String::from_utf8(Printer::new(PrinterOptions::default()).print(&file)).unwrap()
    }

    #[test]
    fn test_braces_removed() {
        assert_eq!(simplify_word("${foo}"), "$foo");
        assert_eq!(simplify_word("\"${foo}/bar\""), "\"$foo/bar\"");
        assert_eq!(simplify_word("${foo}bar"), "${foo}bar");
        assert_eq!(simplify_word("${foo}_1"), "${foo}_1");
        assert_eq!(simplify_word("${foo:-x}"), "${foo:-x}");
        assert_eq!(simplify_word("${x:-${y}}"), "${x:-$y}");
        assert_eq!(simplify_word("${1}"), "${1}");
    }

    #[test]
    fn test_arithmetic_dollars_removed() {
        assert_eq!(simplify_word("$(($a + ${b}))"), "$((a + b))");
        assert_eq!(simplify_word("((i += $n))"), "((i += n))");
        assert_eq!(simplify_word("$((a[$i] + $1))"), "$((a[i] + $1))");
        assert_eq!(simplify_word("$(($arr[0]))"), "$(($arr[0]))");
        assert_eq!(simplify_word("$(( (x) * $y ))"), "$(( (x) * y ))");
        assert_eq!(simplify_word("$((1)) $a"), "$((1)) $a");
    }

    #[test]
    fn test_command_substitution_in_arithmetic() {
        assert_eq!(simplify_word("$(( $(echo $x) + 1 ))"), "$(( $(echo $x) + 1 ))");
        assert_eq!(simplify_word("$(echo ${x})"), "$(echo $x)");
    }

    #[test]
    fn test_single_quotes_untouched() {
        assert_eq!(simplify_word("'${foo}'"), "'${foo}'");
        assert_eq!(simplify_word("\"it's ${a}\""), "\"it's $a\"");
        assert_eq!(simplify_word("$'${a}'"), "$'${a}'");
    }

    #[test]
    fn test_trailing_semicolon() {
        assert_eq!(simplified("foo;\n"), "foo\n");
        assert_eq!(simplified("a; b;\n"), "a; b\n");
        assert_eq!(simplified("for x in a b;\ndo\n:\ndone\n"), "for x in a b\ndo\n\t:\ndone\n");
    }

    #[test]
    fn test_heredoc_untouched() {
        let src = "cat <<EOF\n${a}\nEOF\n";
        assert_eq!(simplified(src), src);
    }

    #[test]
    fn test_idempotent() {
        let src = "echo ${a} $((${b} + $c)) '${d}';\n";
        let once = simplified(src);
        assert_eq!(simplified(&once), once);
    }
}
