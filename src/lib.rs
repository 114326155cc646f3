//! shfmt - Formatter for shell programs
//!
//! Parses bash, POSIX and mksh scripts and prints them in a canonical style,
//! with directory walking, script detection, in-place rewriting and diffs.

#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::too_many_lines)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::struct_excessive_bools)]

pub mod cli;
pub mod config;
pub mod diff;
pub mod error;
pub mod fileutil;
pub mod format;
pub mod parser;
pub mod process;
pub mod scope;
pub mod walker;

// Re-export commonly used types
pub use cli::{build_cli, parse_args, parse_args_from, try_parse_args_from, CliArgs};
pub use config::Config;
pub use error::{FileError, ParseError, Result, UsageError};
pub use parser::{LangVariant, Parser, ParserOptions};
pub use process::{Formatter, Outcome, ProcessOutcome, SourceFile};
pub use walker::Walker;
