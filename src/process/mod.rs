//! File processing and formatting pipeline.
//!
//! Each source goes through the same steps:
//!
//! **Formatting:**
//! - Parse the source with the configured language variant
//! - Simplify the tree when requested (always when minifying)
//! - Print the tree and compare the result with the input
//!
//! **Dispatch:**
//! - Print the formatted source when no output mode is set
//! - Otherwise list, rewrite or diff changed files
//!
//! Per-file results are folded into a [`ProcessOutcome`], which decides the
//! exit status of the run.

pub mod dispatch;
pub mod outcome;
pub mod pipeline;

pub use dispatch::dispatch;
pub use outcome::{Outcome, ProcessOutcome};
pub use pipeline::{process_source, FormatResult, Formatter, Origin, SourceFile, STDIN_LABEL};
