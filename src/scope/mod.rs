//! Shell scope tracking and indentation control.
//!
//! This module tracks nested compound commands to determine line indentation:
//! - Conditionals: `if`/`then`/`elif`/`else`/`fi`
//! - Loops: `while`, `until`, `for`, `select` with `do`/`done`
//! - `case` clauses, with separate levels for patterns and arm bodies
//! - Brace groups and function bodies: `{ ... }`
//! - Subshells: `( ... )`
//!
//! Keywords are only recognized in command position, so `echo if fi` or a
//! `case` pattern named `done)` never open or close a scope.

pub mod tracker;
pub mod types;

pub use tracker::{ScopeError, ScopeTracker};
pub use types::{CasePhase, Scope, ScopeKind};
