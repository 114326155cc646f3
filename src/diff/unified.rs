//! Unified diff output with GNU-style hunk headers

use std::io::{self, Write};
use std::ops::Range;

use super::myers::{myers, EditKind, EditOp};

/// Lines of context around each change
pub const CONTEXT: usize = 3;

const BOLD: &str = "\x1b[1m";
const CYAN: &str = "\x1b[36m";
const RED: &str = "\x1b[31m";
const GREEN: &str = "\x1b[32m";
const RESET: &str = "\x1b[0m";

/// Write a unified diff of two line lists
///
/// Lines keep their `\n` terminator; a line without one is the last line of
/// its input and gets a `\ No newline at end of file` marker. Identical
/// inputs write nothing.
///
/// # Errors
///
/// Returns any error from writing to `out`.
pub fn write_unified<W: Write>(
    out: &mut W,
    a: &[&[u8]],
    b: &[&[u8]],
    name_a: &str,
    name_b: &str,
    color: bool,
) -> io::Result<()> {
    let ops = myers(a, b);
    let hunks = hunks(&ops, CONTEXT);
    if hunks.is_empty() {
        return Ok(());
    }

    let paint = Paint { color };
    paint.line(out, BOLD, format!("--- {name_a}").as_bytes())?;
    paint.line(out, BOLD, format!("+++ {name_b}").as_bytes())?;

    for range in hunks {
        let ops = &ops[range];
        paint.line(out, CYAN, hunk_header(ops).as_bytes())?;
        for op in ops {
            let (style, prefix, line) = match op.kind {
                EditKind::Equal => ("", b' ', a[op.a]),
                EditKind::Delete => (RED, b'-', a[op.a]),
                EditKind::Insert => (GREEN, b'+', b[op.b]),
            };
            let mut text = Vec::with_capacity(line.len() + 1);
            text.push(prefix);
            text.extend_from_slice(line.strip_suffix(b"\n").unwrap_or(line));
            paint.line(out, style, &text)?;
            if !line.ends_with(b"\n") {
                out.write_all(b"\\ No newline at end of file\n")?;
            }
        }
    }
    Ok(())
}

/// Optional ANSI styling for whole lines
struct Paint {
    color: bool,
}

impl Paint {
    fn line<W: Write>(&self, out: &mut W, style: &str, text: &[u8]) -> io::Result<()> {
        if self.color && !style.is_empty() {
            out.write_all(style.as_bytes())?;
            out.write_all(text)?;
            out.write_all(RESET.as_bytes())?;
        } else {
            out.write_all(text)?;
        }
        out.write_all(b"\n")
    }
}

/// Group changes into hunks, merging those whose context would overlap
fn hunks(ops: &[EditOp], context: usize) -> Vec<Range<usize>> {
    let mut hunks: Vec<Range<usize>> = Vec::new();
    for (i, op) in ops.iter().enumerate() {
        if op.kind == EditKind::Equal {
            continue;
        }
        let start = i.saturating_sub(context);
        let end = (i + 1 + context).min(ops.len());
        match hunks.last_mut() {
            Some(last) if start <= last.end => last.end = end,
            _ => hunks.push(start..end),
        }
    }
    hunks
}

fn hunk_header(ops: &[EditOp]) -> String {
    let (a_start, b_start) = ops.first().map_or((0, 0), |op| (op.a, op.b));
    let a_len = ops.iter().filter(|op| op.kind != EditKind::Insert).count();
    let b_len = ops.iter().filter(|op| op.kind != EditKind::Delete).count();
    format!(
        "@@ -{} +{} @@",
        range(a_start, a_len),
        range(b_start, b_len)
    )
}

/// GNU range: `start` alone for one line, `start,0` naming the preceding line
/// for an empty range
fn range(start: usize, len: usize) -> String {
    match len {
        0 => format!("{start},0"),
        1 => format!("{}", start + 1),
        _ => format!("{},{len}", start + 1),
    }
}
