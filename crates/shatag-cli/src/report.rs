//! Verdict lines on stdout (stderr under `--json`), failures through
//! `tracing` on stderr.

use shatag_core::{Status, Verdict};
use std::io::{self, Write};
use std::path::Path;
use tracing::error;

/// `-q` hides everything that needs no attention; `--qq` additionally hides
/// expected changes and keeps only corruption and errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Verbosity {
    VeryQuiet,
    Quiet,
    Normal,
}

pub struct Reporter<W: Write> {
    out: W,
    verbosity: Verbosity,
}

impl<W: Write> Reporter<W> {
    pub fn new(out: W, verbosity: Verbosity) -> Self {
        Self { out, verbosity }
    }

    #[cfg(test)]
    pub fn into_inner(self) -> W {
        self.out
    }

    pub fn verdict(&mut self, verdict: &Verdict) -> io::Result<()> {
        let path = verdict.path.display();
        let normal = self.verbosity == Verbosity::Normal;
        let not_silent = self.verbosity > Verbosity::VeryQuiet;

        match verdict.status {
            Status::Removed | Status::FilenameOk | Status::Ok => {
                if normal {
                    writeln!(self.out, "{} {path}", verdict.status.tag())?;
                }
            }
            Status::FilenameMismatch => {
                if not_silent {
                    let stored = verdict
                        .stored
                        .as_ref()
                        .map(|s| s.digest.as_str())
                        .unwrap_or_default();
                    writeln!(
                        self.out,
                        "<filename {path} does not match {} {stored}> {path}",
                        verdict.algorithm
                    )?;
                }
            }
            Status::ConcurrentModification => {
                if not_silent {
                    writeln!(self.out, "{} {path}", verdict.status.tag())?;
                }
            }
            Status::OpenError | Status::ReadError | Status::RemoveFailed => {}
            Status::FilenameNotMatched => {
                if normal {
                    writeln!(self.out, "{} {path}", verdict.status.tag())?;
                    self.comparison(verdict)?;
                }
            }
            Status::Corrupt => {
                error!("corrupt file {:?}", verdict.path);
                writeln!(self.out, "{} {path}", verdict.status.tag())?;
                if not_silent {
                    self.comparison(verdict)?;
                }
            }
            Status::TimeChanged | Status::New | Status::Outdated => {
                if not_silent {
                    writeln!(self.out, "{} {path}", verdict.status.tag())?;
                    self.comparison(verdict)?;
                }
            }
        }

        if let Some(err) = &verdict.error {
            if !matches!(verdict.status, Status::ConcurrentModification) {
                error!("{err}");
            }
        }
        Ok(())
    }

    pub fn skipped(&mut self, path: &Path, reason: &str) {
        error!("{}: {reason}", path.display());
    }

    fn comparison(&mut self, verdict: &Verdict) -> io::Result<()> {
        if let (Some(stored), Some(actual)) = (&verdict.stored, &verdict.actual) {
            writeln!(self.out, " stored: {stored}\n actual: {actual}")?;
        }
        Ok(())
    }
}
