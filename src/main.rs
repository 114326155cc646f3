//! shfmt - Formatter for shell programs

#![warn(clippy::all)]
#![warn(clippy::pedantic)]

use std::io::{self, IsTerminal, Read, Write};

use anyhow::Context;
use shfmt::error::FileError;
use shfmt::process::{process_source, Formatter, ProcessOutcome, SourceFile};
use shfmt::{parse_args, CliArgs, Config, Result, Walker};

fn main() {
    let args = parse_args();
    init_logging(args.debug);

    let code = match run(&args) {
        Ok(code) => code,
        Err(err) => {
            eprintln!("{err:#}");
            1
        }
    };
    std::process::exit(code);
}

fn init_logging(debug: bool) {
    let level = if debug {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Warn
    };
    env_logger::Builder::new()
        .filter_level(level)
        .format_timestamp(None)
        .format_target(false)
        .init();
}

/// Run the formatter and return the process exit status
fn run(args: &CliArgs) -> Result<i32> {
    let config = build_config(args)?;
    let formatter = Formatter::new(&config);

    let stdout = io::stdout();
    let mut out = stdout.lock();

    let outcome = if args.paths.is_empty() {
        config.check_invocation(true)?;
        process_stdin(&config, &formatter, &mut out)?
    } else {
        config.check_invocation(false)?;
        let walker = Walker::new(&config, &formatter);
        let mut outcome = ProcessOutcome::default();
        for root in &args.paths {
            match walker.walk(root, &mut out) {
                Ok(root_outcome) => {
                    report_errors(root_outcome.errors());
                    outcome.merge(root_outcome);
                }
                Err(err) => {
                    eprintln!("{err}");
                    outcome.record_error(err);
                    break;
                }
            }
        }
        outcome
    };
    out.flush()?;

    log::debug!(
        "formatted {} file(s), {} changed, {} error(s)",
        outcome.formatted(),
        outcome.changed(),
        outcome.errors().len()
    );
    Ok(outcome.exit_code())
}

/// Format standard input, or dump its syntax tree with `--tojson`
fn process_stdin<W: Write>(
    config: &Config,
    formatter: &Formatter,
    out: &mut W,
) -> Result<ProcessOutcome> {
    let mut content = Vec::new();
    io::stdin()
        .read_to_end(&mut content)
        .context("reading standard input")?;
    let source = SourceFile::from_stdin(content);

    let mut outcome = ProcessOutcome::default();
    if config.to_json {
        if let Err(err) = formatter.write_json(&source, out) {
            outcome.record_error(err);
        }
    } else {
        outcome.record(process_source(formatter, config, &source, out));
    }
    report_errors(outcome.errors());
    Ok(outcome)
}

fn report_errors(errors: &[FileError]) {
    for err in errors {
        eprintln!("{err}");
    }
}

/// Build configuration from config files and CLI arguments
fn build_config(args: &CliArgs) -> Result<Config> {
    let mut config = if let Some(config_path) = &args.config {
        log::debug!("using explicit config file: {}", config_path.display());
        Config::from_toml_file(config_path)
            .with_context(|| format!("loading config file {}", config_path.display()))?
    } else {
        let cwd = std::env::current_dir().unwrap_or_default();
        Config::from_discovered_files(&cwd)
    };

    // Override with CLI arguments
    if let Some(variant) = args.variant() {
        config.language_variant = variant;
    }
    if let Some(indent) = args.indent {
        config.indent = indent;
    }
    if args.binary_next_line {
        config.binary_next_line = true;
    }
    if args.switch_case_indent {
        config.switch_case_indent = true;
    }
    if args.space_redirects {
        config.space_redirects = true;
    }
    if args.keep_padding {
        config.keep_padding = true;
    }
    if args.minify {
        config.minify = true;
    }
    if args.simplify {
        config.simplify = true;
    }

    config.list = args.list;
    config.write = args.write;
    config.diff = args.diff;
    config.find = args.find;
    config.to_json = args.to_json;
    config.color = detect_color();

    if let Some(err) = config.validate() {
        anyhow::bail!("Invalid configuration: {err}");
    }

    let config = config.finalize();
    log::debug!("configuration: {config:?}");
    Ok(config)
}

/// Whether diffs are colored
///
/// `FORCE_COLOR=true` forces color on and `TERM=dumb` forces it off;
/// otherwise color follows whether stdout is a terminal.
fn detect_color() -> bool {
    if std::env::var("FORCE_COLOR").is_ok_and(|v| v == "true") {
        return true;
    }
    if std::env::var("TERM").is_ok_and(|v| v == "dumb") {
        return false;
    }
    io::stdout().is_terminal()
}
