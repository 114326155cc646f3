//! Line diffs between original and formatted sources.
//!
//! - [`myers`]: Shortest edit script over any sequence of comparable items
//! - [`unified`]: Unified diff rendering with optional ANSI colors
//!
//! Input is treated as raw bytes split on `\n`; no text encoding is assumed.

pub mod myers;
pub mod unified;

use std::io::{self, Write};

pub use myers::{myers, EditKind, EditOp};
pub use unified::write_unified;

/// Split a buffer into lines, each keeping its `\n` terminator
#[must_use]
pub fn split_lines(data: &[u8]) -> Vec<&[u8]> {
    data.split_inclusive(|&b| b == b'\n').collect()
}

/// Write a unified diff between two buffers
///
/// # Errors
///
/// Returns any error from writing to `out`.
pub fn write_diff<W: Write>(
    out: &mut W,
    a: &[u8],
    b: &[u8],
    name_a: &str,
    name_b: &str,
    color: bool,
) -> io::Result<()> {
    write_unified(out, &split_lines(a), &split_lines(b), name_a, name_b, color)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_lines() {
        assert_eq!(split_lines(b"a\nb"), [&b"a\n"[..], &b"b"[..]]);
        assert_eq!(split_lines(b"a\n\n"), [&b"a\n"[..], &b"\n"[..]]);
        assert!(split_lines(b"").is_empty());
    }

    #[test]
    fn test_write_diff_binary_safe() {
        let mut out = Vec::new();
        write_diff(&mut out, b"\xff\n", b"\xfe\n", "x.orig", "x", false).unwrap();
        assert!(out.ends_with(b"-\xff\n+\xfe\n"));
    }
}
