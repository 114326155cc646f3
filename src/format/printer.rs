//! `Printer` - Renders a syntax tree as canonical shell source
//!
//! Each logical line is printed at its block indentation with single spaces
//! between tokens. Line continuations are re-emitted one level deeper, and
//! binary operators at a continuation move to the end of the line or, with
//! binary-next-line, to the start of the next one.

use crate::parser::{CommentLine, File, Node, Part, Stmt};

/// Binary operators that may be split across lines
const BINARY_OPS: &[&str] = &["&&", "||", "|", "|&"];

/// Style options for printing
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PrinterOptions {
    /// Spaces per indentation level; 0 means tabs
    pub indent: usize,
    /// Binary operators start continuation lines instead of ending them
    pub binary_next_line: bool,
    /// Indent case patterns one level deeper than `case`
    pub switch_case_indent: bool,
    /// Put a space between redirect operators and their targets
    pub space_redirects: bool,
    /// Keep runs of whitespace between tokens as written
    pub keep_padding: bool,
    /// Smallest output: no indentation, comments, blank lines or continuations
    pub minify: bool,
}

/// A statement token after pairing line breaks with binary operators
#[derive(Debug, Clone, Copy)]
enum Item<'a> {
    Part(&'a Part),
    /// Plain `\` + newline continuation
    Break,
    /// Binary operator with a line break on one side of it
    BinaryBreak(&'a Part),
}

#[derive(Debug, Clone, Default)]
pub struct Printer {
    options: PrinterOptions,
}

impl Printer {
    #[must_use]
    pub fn new(options: PrinterOptions) -> Self {
        Self { options }
    }

    /// Print a file
    ///
    /// Runs of blank lines collapse to one; leading and trailing blank lines
    /// are dropped. An empty file prints nothing.
    #[must_use]
    pub fn print(&self, file: &File) -> Vec<u8> {
        let mut out = String::new();
        let mut printed_any = false;
        let mut pending_blank = false;

        for node in &file.nodes {
            match node {
                Node::Blank(_) => pending_blank = printed_any,
                Node::Comment(line) => {
                    if self.options.minify && !is_shebang(line) {
                        continue;
                    }
                    self.flush_blank(&mut out, &mut pending_blank);
                    self.print_comment_line(&mut out, line);
                    printed_any = true;
                }
                Node::Stmt(stmt) => {
                    self.flush_blank(&mut out, &mut pending_blank);
                    self.print_stmt(&mut out, stmt);
                    printed_any = true;
                }
            }
        }
        out.into_bytes()
    }

    fn flush_blank(&self, out: &mut String, pending_blank: &mut bool) {
        if std::mem::take(pending_blank) && !self.options.minify {
            out.push('\n');
        }
    }

    fn write_indent(&self, out: &mut String, levels: usize) {
        if self.options.minify {
            return;
        }
        if self.options.indent == 0 {
            out.push_str(&"\t".repeat(levels));
        } else {
            out.push_str(&" ".repeat(levels * self.options.indent));
        }
    }

    fn print_comment_line(&self, out: &mut String, line: &CommentLine) {
        self.write_indent(out, line.indent.levels(self.options.switch_case_indent));
        out.push_str(&line.comment.text);
        out.push('\n');
    }

    fn print_stmt(&self, out: &mut String, stmt: &Stmt) {
        let opts = self.options;
        let level = stmt.indent.levels(opts.switch_case_indent);
        self.write_indent(out, level);

        let mut prev: Option<&Part> = None;
        for item in items(&stmt.parts, opts.minify) {
            match item {
                Item::Part(part) => {
                    self.write_separator(out, prev, part);
                    self.write_part(out, part);
                    prev = Some(part);
                }
                Item::Break => {
                    out.push_str(" \\\n");
                    self.write_indent(out, level + 1);
                    prev = None;
                }
                Item::BinaryBreak(op) if opts.binary_next_line => {
                    out.push_str(" \\\n");
                    self.write_indent(out, level + 1);
                    self.write_part(out, op);
                    prev = Some(op);
                }
                Item::BinaryBreak(op) => {
                    self.write_separator(out, prev, op);
                    self.write_part(out, op);
                    out.push('\n');
                    self.write_indent(out, level + 1);
                    prev = None;
                }
            }
        }

        if let Some(comment) = stmt.comment.as_ref().filter(|_| !opts.minify) {
            match comment.pad.as_deref().filter(|_| opts.keep_padding) {
                Some(pad) => out.push_str(pad),
                None => out.push(' '),
            }
            out.push_str(&comment.text);
        }
        out.push('\n');

        for doc in &stmt.heredocs {
            out.push_str(&doc.body);
        }
    }

    fn write_separator(&self, out: &mut String, prev: Option<&Part>, next: &Part) {
        let Some(prev) = prev else { return };
        if self.options.keep_padding {
            if let Some(pad) = next.pad() {
                out.push_str(pad);
                return;
            }
        }
        if spaced(prev, next) {
            out.push(' ');
        }
    }

    fn write_part(&self, out: &mut String, part: &Part) {
        match part {
            Part::Word(word) => out.push_str(&word.text),
            Part::Op(op) => out.push_str(&op.op),
            Part::Redirect(redirect) => {
                out.push_str(&redirect.op);
                if self.options.space_redirects && !redirect.is_dup() {
                    out.push(' ');
                }
                out.push_str(&redirect.target);
            }
            Part::Break(_) => {}
        }
    }
}

/// Whether a single space separates two adjacent tokens
fn spaced(prev: &Part, next: &Part) -> bool {
    if matches!(next.op(), Some(";" | ")")) || prev.op() == Some("(") {
        return false;
    }
    // function declarations: `name()`
    !(next.op() == Some("(") && matches!(prev, Part::Word(_)))
}

fn is_binary(part: &Part) -> bool {
    part.op().is_some_and(|op| BINARY_OPS.contains(&op))
}

fn is_break(part: Option<&Part>) -> bool {
    matches!(part, Some(Part::Break(_)))
}

/// Pair each line break with an adjacent binary operator
fn items(parts: &[Part], minify: bool) -> Vec<Item<'_>> {
    let mut items = Vec::with_capacity(parts.len());
    let mut i = 0;
    while i < parts.len() {
        let part = &parts[i];
        match part {
            Part::Break(_) if minify => {}
            Part::Break(_) => match parts.get(i + 1) {
                Some(next) if is_binary(next) => {
                    items.push(Item::BinaryBreak(next));
                    i += 1;
                }
                _ => items.push(Item::Break),
            },
            _ if !minify && is_binary(part) && is_break(parts.get(i + 1)) => {
                items.push(Item::BinaryBreak(part));
                i += 1;
            }
            _ => items.push(Item::Part(part)),
        }
        if matches!(items.last(), Some(Item::BinaryBreak(_))) {
            while is_break(parts.get(i + 1)) {
                i += 1;
            }
        }
        i += 1;
    }
    items
}

/// An interpreter line at the very top of the file
fn is_shebang(line: &CommentLine) -> bool {
    line.comment.pos.line == 1 && line.comment.text.starts_with("#!")
}
