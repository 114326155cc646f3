//! Shell source formatting.
//!
//! This module contains the output side of the pipeline:
//! - [`printer`]: Renders a parsed [`File`](crate::parser::File) with the configured style options
//! - [`simplify`]: Idempotent rewrites that remove redundant syntax before printing

pub mod printer;
pub mod simplify;

pub use printer::{Printer, PrinterOptions};
pub use simplify::{simplify, simplify_word};
