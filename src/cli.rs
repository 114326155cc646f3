//! Command-line interface for shfmt.
//!
//! Defines CLI arguments using clap builder API

use std::path::PathBuf;

use clap::{Arg, ArgAction, Command};

use crate::parser::LangVariant;

/// CLI arguments parsed from command line
#[derive(Debug, Clone)]
pub struct CliArgs {
    /// Files or directories to format; empty means standard input
    pub paths: Vec<PathBuf>,

    /// List files whose formatting differs
    pub list: bool,

    /// Write result to file instead of stdout
    pub write: bool,

    /// Show diffs of formatting changes
    pub diff: bool,

    /// Simplify the code
    pub simplify: bool,

    /// Recursively find shell files and print their paths
    pub find: bool,

    /// Language variant to parse
    pub language_variant: Option<LangVariant>,

    /// Shorthand for `--ln=posix`
    pub posix: bool,

    /// Indent width; 0 for tabs
    pub indent: Option<usize>,

    /// Binary ops like && and | may start a line
    pub binary_next_line: bool,

    /// Switch cases will be indented
    pub switch_case_indent: bool,

    /// Redirect operators will be followed by a space
    pub space_redirects: bool,

    /// Keep column alignment paddings
    pub keep_padding: bool,

    /// Minify program to reduce its size
    pub minify: bool,

    /// Print the syntax tree as JSON
    pub to_json: bool,

    /// Config file path
    pub config: Option<PathBuf>,

    /// Enable debug output
    pub debug: bool,
}

impl CliArgs {
    /// Language variant requested on the command line, if any
    #[must_use]
    pub fn variant(&self) -> Option<LangVariant> {
        if self.posix {
            Some(LangVariant::Posix)
        } else {
            self.language_variant
        }
    }
}

/// Build the clap Command for parsing CLI arguments
#[must_use]
pub fn build_cli() -> Command {
    Command::new("shfmt")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Format shell programs")
        .disable_version_flag(true)
        .arg(
            Arg::new("paths")
                .help("Files or directories to format; reads standard input if none")
                .value_name("PATH")
                .num_args(1..)
                .required(false)
                .value_parser(clap::value_parser!(PathBuf)),
        )
        .arg(
            Arg::new("version")
                .short('V')
                .long("version")
                .help("Show version and exit")
                .action(ArgAction::Version),
        )
        .arg(
            Arg::new("list")
                .short('l')
                .long("list")
                .help("List files whose formatting differs from shfmt's")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("write")
                .short('w')
                .long("write")
                .help("Write result to file instead of stdout")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("diff")
                .short('d')
                .long("diff")
                .help("Error with a diff when the formatting differs")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("simplify")
                .short('s')
                .long("simplify")
                .help("Simplify the code")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("find")
                .short('f')
                .long("find")
                .help("Recursively find all shell files and print the paths")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("language-variant")
                .long("language-variant")
                .visible_alias("ln")
                .help("Language variant to parse: bash, posix or mksh [default: bash]")
                .value_name("LANG")
                .value_parser(clap::value_parser!(LangVariant)),
        )
        .arg(
            Arg::new("posix")
                .short('p')
                .long("posix")
                .help("Shorthand for --ln=posix")
                .action(ArgAction::SetTrue)
                .conflicts_with("language-variant"),
        )
        .arg(
            Arg::new("indent")
                .short('i')
                .long("indent")
                .help("Indent width; 0 for tabs [default: 0]")
                .value_name("NUM")
                .value_parser(clap::value_parser!(usize)),
        )
        .arg(
            Arg::new("binary-next-line")
                .long("bn")
                .visible_alias("binary-next-line")
                .help("Binary ops like && and | may start a line")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("switch-case-indent")
                .long("ci")
                .visible_alias("case-indent")
                .help("Switch cases will be indented")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("space-redirects")
                .long("sr")
                .visible_alias("space-redirects")
                .help("Redirect operators will be followed by a space")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("keep-padding")
                .long("kp")
                .visible_alias("keep-padding")
                .help("Keep column alignment paddings")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("minify")
                .long("mn")
                .visible_alias("minify")
                .help("Minify program to reduce its size (implies -s)")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("to-json")
                .long("tojson")
                .visible_alias("to-json")
                .help("Print syntax tree to stdout as a typed JSON")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("config")
                .short('c')
                .long("config")
                .help("Path to config file")
                .value_name("FILE")
                .value_parser(clap::value_parser!(PathBuf)),
        )
        .arg(
            Arg::new("debug")
                .short('D')
                .long("debug")
                .help("Enable debug output")
                .action(ArgAction::SetTrue),
        )
}

/// Exit status for malformed command lines
pub const USAGE_EXIT_CODE: i32 = 1;

/// Parse CLI arguments from command line
///
/// Help and version requests exit with status 0 after printing; malformed
/// arguments print clap's message and exit with [`USAGE_EXIT_CODE`].
#[must_use]
pub fn parse_args() -> CliArgs {
    match try_parse_args_from(std::env::args_os()) {
        Ok(args) => args,
        Err(err) => {
            let _ = err.print();
            let code = if err.use_stderr() { USAGE_EXIT_CODE } else { 0 };
            std::process::exit(code)
        }
    }
}

/// Parse CLI arguments, returning clap's error instead of exiting
///
/// # Errors
///
/// Returns a [`clap::Error`] for unknown flags, invalid values, conflicting
/// flags, or a help or version request.
pub fn try_parse_args_from<I, T>(args: I) -> Result<CliArgs, clap::Error>
where
    I: IntoIterator<Item = T>,
    T: Into<std::ffi::OsString> + Clone,
{
    build_cli()
        .try_get_matches_from(args)
        .map(|matches| args_from_matches(&matches))
}

/// Parse CLI arguments from an iterator (for testing)
#[must_use]
pub fn parse_args_from<I, T>(args: I) -> CliArgs
where
    I: IntoIterator<Item = T>,
    T: Into<std::ffi::OsString> + Clone,
{
    args_from_matches(&build_cli().get_matches_from(args))
}

/// Convert clap `ArgMatches` to `CliArgs`
fn args_from_matches(matches: &clap::ArgMatches) -> CliArgs {
    CliArgs {
        paths: matches
            .get_many::<PathBuf>("paths")
            .map(|vals| vals.cloned().collect())
            .unwrap_or_default(),
        list: matches.get_flag("list"),
        write: matches.get_flag("write"),
        diff: matches.get_flag("diff"),
        simplify: matches.get_flag("simplify"),
        find: matches.get_flag("find"),
        language_variant: matches.get_one::<LangVariant>("language-variant").copied(),
        posix: matches.get_flag("posix"),
        indent: matches.get_one::<usize>("indent").copied(),
        binary_next_line: matches.get_flag("binary-next-line"),
        switch_case_indent: matches.get_flag("switch-case-indent"),
        space_redirects: matches.get_flag("space-redirects"),
        keep_padding: matches.get_flag("keep-padding"),
        minify: matches.get_flag("minify"),
        to_json: matches.get_flag("to-json"),
        config: matches.get_one::<PathBuf>("config").cloned(),
        debug: matches.get_flag("debug"),
    }
}
