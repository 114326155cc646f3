//! Output actions for a formatted file: list, write in place, diff or print

use std::fs::OpenOptions;
use std::io::Write;

use crate::config::Config;
use crate::diff::write_diff;
use crate::error::FileError;

use super::outcome::Outcome;
use super::pipeline::{FormatResult, Origin};

/// Carry out the configured actions for one formatted file
///
/// With none of list, write or diff the formatted bytes are printed whether
/// or not they changed. Otherwise unchanged files produce no output, and for
/// changed ones the actions run in the order list, write, diff.
///
/// # Errors
///
/// Returns a [`FileError`] if output, the in-place rewrite or the diff fails.
pub fn dispatch<W: Write>(
    config: &Config,
    result: &FormatResult<'_>,
    out: &mut W,
) -> Result<Outcome, FileError> {
    let path = result.path();

    if !config.has_output_mode() {
        out.write_all(&result.formatted)
            .map_err(|e| FileError::output(path, e))?;
        return Ok(if result.changed {
            Outcome::Changed
        } else {
            Outcome::Unchanged
        });
    }

    if !result.changed {
        return Ok(Outcome::Unchanged);
    }

    if config.list {
        writeln!(out, "{}", path.display()).map_err(|e| FileError::output(path, e))?;
    }

    if config.write {
        write_in_place(result)?;
    }

    if config.diff {
        let name = result.source.name();
        write_diff(
            out,
            result.original(),
            &result.formatted,
            &format!("{name}.orig"),
            &name,
            config.color,
        )
        .map_err(|source| FileError::Diff {
            path: path.to_path_buf(),
            source,
        })?;
        return Ok(Outcome::ChangedViaDiff);
    }

    Ok(Outcome::Changed)
}

/// Overwrite an existing file, keeping its permissions
fn write_in_place(result: &FormatResult<'_>) -> Result<(), FileError> {
    let path = result.path();
    let write_err = |source| FileError::Write {
        path: path.to_path_buf(),
        source,
    };
    if result.source.origin == Origin::Stdin {
        return Err(write_err(std::io::Error::new(
            std::io::ErrorKind::InvalidInput,
            "cannot write to standard input",
        )));
    }
    let mut file = OpenOptions::new()
        .write(true)
        .truncate(true)
        .open(path)
        .map_err(write_err)?;
    file.write_all(&result.formatted).map_err(write_err)?;
    file.flush().map_err(write_err)?;
    log::debug!("wrote {}", path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::process::pipeline::SourceFile;
    use std::fs;

    fn run(config: &Config, source: &SourceFile) -> (Result<Outcome, FileError>, String) {
        let result = FormatResult {
            source,
            formatted: b"echo hi\n".to_vec(),
            changed: source.content != b"echo hi\n",
        };
        let mut out = Vec::new();
        let outcome = dispatch(config, &result, &mut out);
        (outcome, String::from_utf8(out).unwrap())
    }

    #[test]
    fn test_print_by_default() {
        let source = SourceFile::from_stdin(b"echo hi\n".to_vec());
        let (outcome, out) = run(&Config::default(), &source);
        assert_eq!(outcome.unwrap(), Outcome::Unchanged);
        assert_eq!(out, "echo hi\n");
    }

    #[test]
    fn test_unchanged_is_silent_with_modes() {
        let config = Config {
            list: true,
            diff: true,
            ..Config::default()
        };
        let source = SourceFile::from_stdin(b"echo hi\n".to_vec());
        let (outcome, out) = run(&config, &source);
        assert_eq!(outcome.unwrap(), Outcome::Unchanged);
        assert_eq!(out, "");
    }

    #[test]
    fn test_list_then_diff() {
        let config = Config {
            list: true,
            diff: true,
            ..Config::default()
        };
        let source = SourceFile::from_path(std::path::Path::new("a.sh"), b"echo  hi\n".to_vec());
        let (outcome, out) = run(&config, &source);
        assert_eq!(outcome.unwrap(), Outcome::ChangedViaDiff);
        assert_eq!(
            out,
            "a.sh\n--- a.sh.orig\n+++ a.sh\n@@ -1 +1 @@\n-echo  hi\n+echo hi\n"
        );
    }

    #[test]
    fn test_write_in_place() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("a.sh");
        fs::write(&path, "echo   hi\n").unwrap();
        let config = Config {
            write: true,
            ..Config::default()
        };
        let source = SourceFile::from_path(&path, fs::read(&path).unwrap());
        let (outcome, out) = run(&config, &source);
        assert_eq!(outcome.unwrap(), Outcome::Changed);
        assert_eq!(out, "");
        assert_eq!(fs::read_to_string(&path).unwrap(), "echo hi\n");
    }

    #[test]
    fn test_write_refuses_stdin() {
        let config = Config {
            write: true,
            ..Config::default()
        };
        let source = SourceFile::from_stdin(b"echo   hi\n".to_vec());
        let (outcome, _) = run(&config, &source);
        assert!(matches!(outcome, Err(FileError::Write { .. })));
    }

    #[cfg(unix)]
    #[test]
    fn test_write_keeps_permissions() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("run.sh");
        fs::write(&path, "echo   hi\n").unwrap();
        fs::set_permissions(&path, fs::Permissions::from_mode(0o755)).unwrap();
        let config = Config {
            write: true,
            ..Config::default()
        };
        let source = SourceFile::from_path(&path, fs::read(&path).unwrap());
        let (outcome, _) = run(&config, &source);
        assert_eq!(outcome.unwrap(), Outcome::Changed);
        let mode = fs::metadata(&path).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o755);
        assert_eq!(fs::read_to_string(&path).unwrap(), "echo hi\n");
    }

    #[test]
    fn test_write_does_not_create_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("gone.sh");
        fs::write(&path, "echo   hi\n").unwrap();
        let source = SourceFile::from_path(&path, fs::read(&path).unwrap());
        fs::remove_file(&path).unwrap();

        let config = Config {
            write: true,
            ..Config::default()
        };
        let (outcome, _) = run(&config, &source);
        match outcome {
            Err(FileError::Write { path: failed, .. }) => assert_eq!(failed, path),
            other => panic!("expected a write error, got {other:?}"),
        }
        assert!(!path.exists());
    }
}
