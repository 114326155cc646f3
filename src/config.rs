//! Configuration management for shfmt.
//!
//! This module provides the [`Config`] struct which controls all formatting behavior.
//! Configuration can be loaded from:
//! - TOML files (`shfmt.toml` or `.shfmt.toml`)
//! - CLI arguments (which override file settings)
//!
//! Config files are auto-discovered in the user's home directory and in every
//! directory from the filesystem root down to the current directory. Files only
//! carry style options; run modes (list, write, diff, ...) come from the command
//! line alone.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::UsageError;
use crate::format::PrinterOptions;
use crate::parser::{LangVariant, ParserOptions};

/// Config file names to search for (in order of priority, later overrides earlier)
const CONFIG_FILE_NAMES: &[&str] = &["shfmt.toml", ".shfmt.toml"];

/// Get the user's home directory
fn dirs_home() -> Option<PathBuf> {
    if let Ok(home) = std::env::var("HOME") {
        return Some(PathBuf::from(home));
    }
    if let Ok(userprofile) = std::env::var("USERPROFILE") {
        return Some(PathBuf::from(userprofile));
    }
    None
}

/// Main configuration struct for shfmt
///
/// Built once at startup and passed by reference for the whole run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[allow(clippy::struct_excessive_bools)]
pub struct Config {
    /// Shell language to parse (default: bash)
    #[serde(default)]
    pub language_variant: LangVariant,

    /// Spaces per indent level; 0 indents with tabs (default: 0)
    #[serde(default)]
    pub indent: usize,

    /// Binary operators like `&&` and `|` may start a line
    #[serde(default)]
    pub binary_next_line: bool,

    /// Indent case patterns one level deeper than `case`
    #[serde(default)]
    pub switch_case_indent: bool,

    /// Redirect operators are followed by a space
    #[serde(default)]
    pub space_redirects: bool,

    /// Keep column alignment paddings
    #[serde(default)]
    pub keep_padding: bool,

    /// Minify the output; implies `simplify`
    #[serde(default)]
    pub minify: bool,

    /// Simplify the code
    #[serde(default)]
    pub simplify: bool,

    /// List files whose formatting differs
    #[serde(skip)]
    pub list: bool,

    /// Write the result to the file instead of standard output
    #[serde(skip)]
    pub write: bool,

    /// Print a diff of the formatting changes
    #[serde(skip)]
    pub diff: bool,

    /// Only print the paths of shell files found
    #[serde(skip)]
    pub find: bool,

    /// Print the syntax tree of standard input as JSON
    #[serde(skip)]
    pub to_json: bool,

    /// Color diff output
    #[serde(skip)]
    pub color: bool,
}

/// Partial configuration for TOML parsing
///
/// All fields are `Option<T>` so we can distinguish between
/// "explicitly set" and "not specified" when merging configs.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct PartialConfig {
    pub language_variant: Option<LangVariant>,
    pub indent: Option<usize>,
    pub binary_next_line: Option<bool>,
    pub switch_case_indent: Option<bool>,
    pub space_redirects: Option<bool>,
    pub keep_padding: Option<bool>,
    pub minify: Option<bool>,
    pub simplify: Option<bool>,
}

impl Config {
    /// Maximum reasonable indent size
    const MAX_INDENT: usize = 32;

    /// Validate configuration values are within reasonable bounds
    ///
    /// Returns an error message if validation fails, None if valid.
    #[must_use]
    pub fn validate(&self) -> Option<String> {
        if self.indent > Self::MAX_INDENT {
            return Some(format!(
                "indent {} exceeds maximum of {}",
                self.indent,
                Self::MAX_INDENT
            ));
        }
        None
    }

    /// Settle derived options once all overrides have been applied
    ///
    /// Minified output is always simplified.
    #[must_use]
    pub fn finalize(mut self) -> Self {
        if self.minify {
            self.simplify = true;
        }
        self
    }

    /// Whether the simplification pass runs
    #[must_use]
    pub fn simplify_enabled(&self) -> bool {
        self.simplify || self.minify
    }

    /// Whether any of list, write or diff is requested
    ///
    /// Without one of them the formatted source is printed.
    #[must_use]
    pub fn has_output_mode(&self) -> bool {
        self.list || self.write || self.diff
    }

    /// Reject flag combinations that cannot work for the given input
    ///
    /// # Errors
    ///
    /// Returns [`UsageError::WriteOnStdin`] for `-w` with standard input and
    /// [`UsageError::ToJsonWithPaths`] for `-tojson` with path arguments.
    pub fn check_invocation(&self, stdin: bool) -> Result<(), UsageError> {
        if stdin && self.write {
            return Err(UsageError::WriteOnStdin);
        }
        if !stdin && self.to_json {
            return Err(UsageError::ToJsonWithPaths);
        }
        Ok(())
    }

    #[must_use]
    pub fn parser_options(&self) -> ParserOptions {
        ParserOptions {
            variant: self.language_variant,
            keep_comments: true,
        }
    }

    #[must_use]
    pub fn printer_options(&self) -> PrinterOptions {
        PrinterOptions {
            indent: self.indent,
            binary_next_line: self.binary_next_line,
            switch_case_indent: self.switch_case_indent,
            space_redirects: self.space_redirects,
            keep_padding: self.keep_padding,
            minify: self.minify,
        }
    }

    /// Load configuration from a TOML file
    pub fn from_toml_file(path: &Path) -> anyhow::Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        let partial: PartialConfig = toml::from_str(&contents)?;
        let mut config = Self::default();
        config.apply_partial(&partial);
        Ok(config)
    }

    /// Apply a partial config, only overriding fields that are explicitly set
    fn apply_partial(&mut self, partial: &PartialConfig) {
        if let Some(v) = partial.language_variant {
            self.language_variant = v;
        }
        if let Some(v) = partial.indent {
            self.indent = v;
        }
        if let Some(v) = partial.binary_next_line {
            self.binary_next_line = v;
        }
        if let Some(v) = partial.switch_case_indent {
            self.switch_case_indent = v;
        }
        if let Some(v) = partial.space_redirects {
            self.space_redirects = v;
        }
        if let Some(v) = partial.keep_padding {
            self.keep_padding = v;
        }
        if let Some(v) = partial.minify {
            self.minify = v;
        }
        if let Some(v) = partial.simplify {
            self.simplify = v;
        }
    }

    /// Discover config files for a directory
    ///
    /// Returns the home directory config first, then configs from the
    /// filesystem root down to `start_dir` (least specific first).
    #[must_use]
    pub fn discover_config_files(start_dir: &Path) -> Vec<PathBuf> {
        let mut config_files = Vec::new();

        if let Some(home) = dirs_home() {
            for config_name in CONFIG_FILE_NAMES {
                let home_config = home.join(config_name);
                if home_config.is_file() {
                    config_files.push(home_config);
                }
            }
        }

        let mut ancestors: Vec<&Path> = start_dir.ancestors().collect();
        ancestors.reverse();
        for ancestor in ancestors {
            for config_name in CONFIG_FILE_NAMES {
                let config_path = ancestor.join(config_name);
                if config_path.is_file() && !config_files.contains(&config_path) {
                    config_files.push(config_path);
                }
            }
        }

        config_files
    }

    /// Load and merge configuration from discovered config files
    ///
    /// Later files override earlier ones (only explicitly set values).
    /// Unreadable or malformed files are skipped with a warning.
    #[must_use]
    pub fn from_discovered_files(start_dir: &Path) -> Self {
        let mut config = Self::default();
        for path in Self::discover_config_files(start_dir) {
            match std::fs::read_to_string(&path) {
                Ok(contents) => match toml::from_str::<PartialConfig>(&contents) {
                    Ok(partial) => {
                        log::debug!("using config file {}", path.display());
                        config.apply_partial(&partial);
                    }
                    Err(e) => log::warn!("failed to parse {}: {e}", path.display()),
                },
                Err(e) => log::warn!("failed to read {}: {e}", path.display()),
            }
        }
        config
    }
}
