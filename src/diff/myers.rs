//! Myers O(ND) shortest edit script
//!
//! Reference: Eugene W. Myers, "An O(ND) Difference Algorithm and Its
//! Variations", Algorithmica 1 (1986). The linear space refinement from
//! section 4b is used: the middle of an optimal path is found by searching
//! from both ends at once, and each half is then solved on its own.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditKind {
    Equal,
    Delete,
    Insert,
}

/// One step of an edit script
///
/// `a` and `b` are the positions in each sequence at which the step applies;
/// for a deletion `b` is where the deleted element would have been, and for
/// an insertion `a` likewise.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EditOp {
    pub kind: EditKind,
    pub a: usize,
    pub b: usize,
}

impl EditOp {
    fn new(kind: EditKind, a: usize, b: usize) -> Self {
        Self { kind, a, b }
    }
}

/// Shortest edit script turning `a` into `b`
///
/// Within each run of changes, deletions come before insertions.
#[must_use]
pub fn myers<T: PartialEq>(a: &[T], b: &[T]) -> Vec<EditOp> {
    let mut ops = Vec::with_capacity(a.len().max(b.len()));
    diff_range(a, b, 0, 0, &mut ops);
    deletions_first(&mut ops);
    ops
}

/// Append the edit script for `a` against `b`, which start at `a0` and `b0`
/// in the full sequences
fn diff_range<T: PartialEq>(a: &[T], b: &[T], a0: usize, b0: usize, ops: &mut Vec<EditOp>) {
    let prefix = a.iter().zip(b).take_while(|(x, y)| x == y).count();
    ops.extend((0..prefix).map(|i| EditOp::new(EditKind::Equal, a0 + i, b0 + i)));
    let (a, b) = (&a[prefix..], &b[prefix..]);
    let (a0, b0) = (a0 + prefix, b0 + prefix);

    let suffix = a
        .iter()
        .rev()
        .zip(b.iter().rev())
        .take_while(|(x, y)| x == y)
        .count();
    let (a, b) = (&a[..a.len() - suffix], &b[..b.len() - suffix]);

    if a.is_empty() {
        ops.extend((0..b.len()).map(|j| EditOp::new(EditKind::Insert, a0, b0 + j)));
    } else if b.is_empty() {
        ops.extend((0..a.len()).map(|i| EditOp::new(EditKind::Delete, a0 + i, b0)));
    } else {
        let (x, y) = split_point(a, b);
        diff_range(&a[..x], &b[..y], a0, b0, ops);
        diff_range(&a[x..], &b[y..], a0 + x, b0 + y, ops);
    }

    let (a_end, b_end) = (a0 + a.len(), b0 + b.len());
    ops.extend((0..suffix).map(|i| EditOp::new(EditKind::Equal, a_end + i, b_end + i)));
}

/// A point on an optimal path through the middle of the edit graph
///
/// `a` and `b` must be non-empty and differ in both their first and last
/// elements, so that the point splits the problem into two smaller ones.
#[allow(
    clippy::cast_possible_wrap,
    clippy::cast_sign_loss,
    clippy::many_single_char_names
)]
fn split_point<T: PartialEq>(a: &[T], b: &[T]) -> (usize, usize) {
    let (n, m) = (a.len(), b.len());
    let delta = n as isize - m as isize;
    let odd = delta & 1 == 1;
    let max = (n + m).div_ceil(2) as isize;

    // furthest x per diagonal; backward values count from the end of `a`
    let offset = max + 1;
    let at = |k: isize| (k + offset) as usize;
    let mut forward = vec![0usize; 2 * (max as usize) + 3];
    let mut backward = forward.clone();

    for d in 0..=max {
        for k in (-d..=d).rev().step_by(2) {
            let mut x = if k == -d || (k != d && forward[at(k - 1)] < forward[at(k + 1)]) {
                forward[at(k + 1)]
            } else {
                forward[at(k - 1)] + 1
            };
            let y = x as isize - k;
            let start = (x, y as usize);
            let in_grid = x <= n && (0..=m as isize).contains(&y);
            if in_grid {
                let mut y = y as usize;
                while x < n && y < m && a[x] == b[y] {
                    x += 1;
                    y += 1;
                }
            }
            forward[at(k)] = x;
            let c = delta - k;
            if odd && in_grid && c.abs() < d && x + backward[at(c)] >= n {
                return start;
            }
        }

        for c in (-d..=d).step_by(2) {
            let mut x = if c == -d || (c != d && backward[at(c - 1)] < backward[at(c + 1)]) {
                backward[at(c + 1)]
            } else {
                backward[at(c - 1)] + 1
            };
            let y = x as isize - c;
            let in_grid = x <= n && (0..=m as isize).contains(&y);
            let mut y = y.max(0) as usize;
            if in_grid {
                while x < n && y < m && a[n - 1 - x] == b[m - 1 - y] {
                    x += 1;
                    y += 1;
                }
            }
            backward[at(c)] = x;
            let k = delta - c;
            if !odd && in_grid && k.abs() <= d && x + forward[at(k)] >= n {
                return (n - x, m - y);
            }
        }
    }

    // unreachable for inputs meeting the precondition; any point keeps the
    // script valid
    (n, 0)
}

/// Reorder each run of changes so its deletions precede its insertions
fn deletions_first(ops: &mut [EditOp]) {
    let mut i = 0;
    while i < ops.len() {
        if ops[i].kind == EditKind::Equal {
            i += 1;
            continue;
        }
        let run_start = i;
        while i < ops.len() && ops[i].kind != EditKind::Equal {
            i += 1;
        }
        let run = &mut ops[run_start..i];
        let (a0, b0) = (run[0].a, run[0].b);
        let deleted: Vec<usize> = run
            .iter()
            .filter(|op| op.kind == EditKind::Delete)
            .map(|op| op.a)
            .collect();
        let inserted: Vec<usize> = run
            .iter()
            .filter(|op| op.kind == EditKind::Insert)
            .map(|op| op.b)
            .collect();
        let a_after = a0 + deleted.len();
        let reordered = deleted
            .iter()
            .map(|&a| EditOp::new(EditKind::Delete, a, b0))
            .chain(
                inserted
                    .iter()
                    .map(|&b| EditOp::new(EditKind::Insert, a_after, b)),
            );
        for (slot, op) in run.iter_mut().zip(reordered) {
            *slot = op;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(ops: &[EditOp]) -> String {
        ops.iter()
            .map(|op| match op.kind {
                EditKind::Equal => '=',
                EditKind::Delete => '-',
                EditKind::Insert => '+',
            })
            .collect()
    }

    /// Apply an edit script to `a`
    fn apply<'a>(ops: &[EditOp], a: &[&'a str], b: &[&'a str]) -> Vec<&'a str> {
        ops.iter()
            .filter_map(|op| match op.kind {
                EditKind::Equal => Some(a[op.a]),
                EditKind::Insert => Some(b[op.b]),
                EditKind::Delete => None,
            })
            .collect()
    }

    #[test]
    fn test_identical() {
        let a = ["x", "y"];
        assert_eq!(kinds(&myers(&a, &a)), "==");
    }

    #[test]
    fn test_empty() {
        let empty: [&str; 0] = [];
        assert!(myers(&empty, &empty).is_empty());
        assert_eq!(kinds(&myers(&empty, &["a", "b"])), "++");
        assert_eq!(kinds(&myers(&["a", "b"], &empty)), "--");
    }

    #[test]
    fn test_replacement() {
        let a = ["a", "b", "c"];
        let b = ["a", "x", "c"];
        let ops = myers(&a, &b);
        assert_eq!(kinds(&ops), "=-+=");
        assert_eq!(ops[1], EditOp::new(EditKind::Delete, 1, 1));
        assert_eq!(ops[2], EditOp::new(EditKind::Insert, 2, 1));
    }

    #[test]
    fn test_shortest_script() {
        let a = ["a", "b", "c", "a", "b", "b", "a"];
        let b = ["c", "b", "a", "b", "a", "c"];
        let ops = myers(&a, &b);
        let edits = ops.iter().filter(|op| op.kind != EditKind::Equal).count();
        assert_eq!(edits, 5);
        assert_eq!(apply(&ops, &a, &b), b);
    }

    #[test]
    fn test_fully_rewritten_input() {
        let a: Vec<String> = (0..2000).map(|i| format!("    echo line{i}")).collect();
        let b: Vec<String> = (0..2000).map(|i| format!("\techo line{i}")).collect();
        let ops = myers(&a, &b);
        assert_eq!(ops.len(), 4000);
        assert!(ops[..2000].iter().all(|op| op.kind == EditKind::Delete));
        assert!(ops[2000..].iter().all(|op| op.kind == EditKind::Insert));
        assert_eq!(ops[2000], EditOp::new(EditKind::Insert, 2000, 0));
    }

    #[test]
    fn test_interleaved_changes_apply() {
        let a: Vec<String> = (0..300).map(|i| format!("l{}", i % 7)).collect();
        let b: Vec<String> = (0..280).map(|i| format!("l{}", i % 5)).collect();
        let a_refs: Vec<&str> = a.iter().map(String::as_str).collect();
        let b_refs: Vec<&str> = b.iter().map(String::as_str).collect();
        let ops = myers(&a_refs, &b_refs);
        assert_eq!(apply(&ops, &a_refs, &b_refs), b_refs);
        assert_eq!(ops.iter().filter(|op| op.kind != EditKind::Insert).count(), 300);
        assert_eq!(ops.iter().filter(|op| op.kind != EditKind::Delete).count(), 280);
    }
}
