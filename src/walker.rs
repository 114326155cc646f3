//! Directory walking and script discovery.
//!
//! A root that is not a directory is formatted unconditionally. Directories
//! are walked in file name order with version control metadata pruned; each
//! regular file is classified by name and, when ambiguous, confirmed by its
//! interpreter line before being formatted (or, in find mode, listed).

use std::fs;
use std::io::{self, Read, Write};
use std::path::Path;

use walkdir::WalkDir;

use crate::config::Config;
use crate::error::FileError;
use crate::fileutil::{classify, has_shebang, is_vcs_dir, Classification, SHEBANG_PREFIX_LEN};
use crate::process::{process_source, Formatter, Outcome, ProcessOutcome, SourceFile};

/// Walks roots and formats the scripts found under them
#[derive(Debug)]
pub struct Walker<'a> {
    config: &'a Config,
    formatter: &'a Formatter,
}

impl<'a> Walker<'a> {
    #[must_use]
    pub fn new(config: &'a Config, formatter: &'a Formatter) -> Self {
        Self { config, formatter }
    }

    /// Process everything under `root`
    ///
    /// Failures on individual files are recorded in the returned outcome and
    /// do not stop the walk.
    ///
    /// # Errors
    ///
    /// Returns a [`FileError`] only if `root` itself cannot be inspected.
    pub fn walk<W: Write>(&self, root: &Path, out: &mut W) -> Result<ProcessOutcome, FileError> {
        let meta = fs::metadata(root).map_err(|e| FileError::read(root, e))?;
        let mut outcome = ProcessOutcome::default();

        if !meta.is_dir() {
            outcome.record(self.format_path(root, false, out));
            return Ok(outcome);
        }

        let entries = WalkDir::new(root)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|entry| !is_pruned(entry));

        for entry in entries {
            let entry = match entry {
                Ok(entry) => entry,
                Err(err) => {
                    let path = err.path().unwrap_or(root).to_path_buf();
                    outcome.record_error(FileError::Read {
                        path,
                        source: io::Error::from(err),
                    });
                    continue;
                }
            };
            if entry.file_type().is_dir() {
                continue;
            }

            let path = entry.path();
            let name = entry.file_name().to_string_lossy();
            let size = match entry.metadata() {
                Ok(meta) => meta.len(),
                Err(err) => {
                    outcome.record_error(FileError::Read {
                        path: path.to_path_buf(),
                        source: io::Error::from(err),
                    });
                    continue;
                }
            };

            match classify(&name, entry.file_type(), size) {
                Classification::NotScript => {
                    log::debug!("skipping {}: not a shell script", path.display());
                }
                Classification::ScriptDefinite => {
                    outcome.record(self.format_path(path, false, out));
                }
                Classification::ScriptMaybe => {
                    outcome.record(self.format_path(path, true, out));
                }
            }
        }

        Ok(outcome)
    }

    /// Read and process a single file
    ///
    /// With `check_shebang`, files without a shell interpreter line are
    /// skipped after reading only their first bytes.
    fn format_path<W: Write>(
        &self,
        path: &Path,
        check_shebang: bool,
        out: &mut W,
    ) -> Result<Outcome, FileError> {
        let mut file = fs::File::open(path).map_err(|e| FileError::read(path, e))?;
        let mut content = Vec::new();

        if check_shebang {
            Read::by_ref(&mut file)
                .take(SHEBANG_PREFIX_LEN as u64)
                .read_to_end(&mut content)
                .map_err(|e| FileError::read(path, e))?;
            if !has_shebang(&content) {
                log::debug!("skipping {}: no shell interpreter line", path.display());
                return Ok(Outcome::Skipped);
            }
        }

        if self.config.find {
            writeln!(out, "{}", path.display()).map_err(|e| FileError::output(path, e))?;
            return Ok(Outcome::Found);
        }

        file.read_to_end(&mut content)
            .map_err(|e| FileError::read(path, e))?;
        let source = SourceFile::from_path(path, content);
        process_source(self.formatter, self.config, &source, out)
    }
}

/// Version control directories are never descended into
fn is_pruned(entry: &walkdir::DirEntry) -> bool {
    let pruned = entry.file_type().is_dir() && is_vcs_dir(&entry.file_name().to_string_lossy());
    if pruned {
        log::debug!("pruning {}", entry.path().display());
    }
    pruned
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run(config: &Config, root: &Path) -> (ProcessOutcome, String) {
        let config = config.clone().finalize();
        let formatter = Formatter::new(&config);
        let walker = Walker::new(&config, &formatter);
        let mut out = Vec::new();
        let outcome = walker.walk(root, &mut out).unwrap();
        (outcome, String::from_utf8(out).unwrap())
    }

    fn find_config() -> Config {
        Config {
            find: true,
            ..Config::default()
        }
    }

    #[test]
    fn test_find_lists_scripts_in_order() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("b"), "#!/bin/sh\necho b\n").unwrap();
        fs::write(dir.path().join("a.sh"), "echo a\n").unwrap();
        fs::write(dir.path().join("c.txt"), "#!/bin/sh\necho c\n").unwrap();
        fs::write(dir.path().join("d"), "#!/usr/bin/env python3\n").unwrap();

        let (outcome, out) = run(&find_config(), dir.path());
        let expected = format!(
            "{}\n{}\n",
            dir.path().join("a.sh").display(),
            dir.path().join("b").display()
        );
        assert_eq!(out, expected);
        assert_eq!(outcome.exit_code(), 0);
    }

    #[test]
    fn test_vcs_dirs_pruned() {
        let dir = tempfile::tempdir().unwrap();
        let git = dir.path().join(".git");
        fs::create_dir(&git).unwrap();
        fs::write(git.join("hook.sh"), "echo\n").unwrap();
        fs::write(dir.path().join("x.sh"), "echo\n").unwrap();

        let (_, out) = run(&find_config(), dir.path());
        assert_eq!(out, format!("{}\n", dir.path().join("x.sh").display()));
    }

    #[test]
    fn test_explicit_file_root_is_always_formatted() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("notes.txt");
        fs::write(&path, "echo   hi\n").unwrap();

        let (outcome, out) = run(&Config::default(), &path);
        assert_eq!(out, "echo hi\n");
        assert_eq!(outcome.changed(), 1);
    }

    #[test]
    fn test_missing_root_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::default();
        let formatter = Formatter::new(&config);
        let walker = Walker::new(&config, &formatter);
        let err = walker
            .walk(&dir.path().join("missing"), &mut Vec::new())
            .unwrap_err();
        assert!(matches!(err, FileError::Read { .. }));
    }

    #[test]
    fn test_parse_errors_do_not_stop_walk() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("a.sh"), "echo a\n").unwrap();
        fs::write(dir.path().join("b.sh"), "if true; then\n").unwrap();
        fs::write(dir.path().join("c.sh"), "echo c\n").unwrap();

        let (outcome, out) = run(&Config::default(), dir.path());
        assert_eq!(out, "echo a\necho c\n");
        assert_eq!(outcome.errors().len(), 1);
        assert_eq!(outcome.errors()[0].path(), dir.path().join("b.sh"));
        assert_eq!(outcome.exit_code(), 1);
    }

    #[test]
    fn test_shebang_file_formatted_whole() {
        let dir = tempfile::tempdir().unwrap();
        let body = "#!/bin/bash\n# a comment long enough to pass the prefix\necho   hi\n";
        fs::write(dir.path().join("run"), body).unwrap();

        let (_, out) = run(&Config::default(), dir.path());
        assert_eq!(
            out,
            "#!/bin/bash\n# a comment long enough to pass the prefix\necho hi\n"
        );
    }
}
