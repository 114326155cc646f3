//! Per-file outcomes and their aggregation over a run

use crate::error::FileError;

/// What happened to one file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// Formatting produced the original bytes
    Unchanged,
    /// Formatting changed the file; list, write or print actions fired
    Changed,
    /// Formatting changed the file and a diff was printed; fails the run
    ChangedViaDiff,
    /// Path printed in find mode
    Found,
    /// No shell interpreter line; not a script
    Skipped,
}

/// Aggregated result of processing any number of files
///
/// Errors are kept in the order they occurred.
#[derive(Debug, Default)]
pub struct ProcessOutcome {
    errors: Vec<FileError>,
    changed_via_diff: bool,
    formatted: usize,
    changed: usize,
}

impl ProcessOutcome {
    /// Record the result of processing one file
    pub fn record(&mut self, result: Result<Outcome, FileError>) {
        match result {
            Ok(outcome) => self.record_outcome(outcome),
            Err(err) => self.record_error(err),
        }
    }

    pub fn record_error(&mut self, err: FileError) {
        self.errors.push(err);
    }

    fn record_outcome(&mut self, outcome: Outcome) {
        match outcome {
            Outcome::Unchanged => self.formatted += 1,
            Outcome::Changed => {
                self.formatted += 1;
                self.changed += 1;
            }
            Outcome::ChangedViaDiff => {
                self.formatted += 1;
                self.changed += 1;
                self.changed_via_diff = true;
            }
            Outcome::Found | Outcome::Skipped => {}
        }
    }

    /// Fold another outcome into this one, keeping error order
    pub fn merge(&mut self, other: ProcessOutcome) {
        self.errors.extend(other.errors);
        self.changed_via_diff |= other.changed_via_diff;
        self.formatted += other.formatted;
        self.changed += other.changed;
    }

    #[must_use]
    pub fn errors(&self) -> &[FileError] {
        &self.errors
    }

    /// Whether any file differed while diffs were requested
    #[must_use]
    pub fn changed_via_diff(&self) -> bool {
        self.changed_via_diff
    }

    /// Number of files parsed and printed
    #[must_use]
    pub fn formatted(&self) -> usize {
        self.formatted
    }

    /// Number of formatted files whose output differed from the input
    #[must_use]
    pub fn changed(&self) -> usize {
        self.changed
    }

    #[must_use]
    pub fn is_success(&self) -> bool {
        self.errors.is_empty() && !self.changed_via_diff
    }

    /// Process exit status: 0 on success, 1 on any error or diff-mode change
    #[must_use]
    pub fn exit_code(&self) -> i32 {
        i32::from(!self.is_success())
    }
}
