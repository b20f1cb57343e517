//! Per-file integrity classification.
//!
//! A check loads the stored attributes, hashes the content, and lands on
//! exactly one [`Status`]. The precedence is:
//!
//! 1. remove mode wipes the attributes and stops
//! 2. filename-only mode compares the name against the stored digest
//! 3. a torn read or I/O failure while hashing
//! 4. the stored/actual comparison ([`classify`])
//!
//! `Corrupt`, `TimeChanged`, `New` and `Outdated` end by storing the actual
//! attributes as the new baseline. A failed store is attached to the verdict
//! without changing its status.

use crate::algorithm::Algorithm;
use crate::attrs::{self, FileAttributes};
use crate::error::{Error, Result};
use crate::filename;
use crate::hasher::{compute_actual, Subject};
use serde::Serialize;
use std::fs::File;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Flags the driver passes for every file of a run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Mode {
    /// Strip all shatag attributes instead of checking.
    pub remove: bool,
    /// Skip hashing; trust the checksum embedded in the file name.
    pub filename_only: bool,
    /// After a clean content check, also require the name to carry the digest.
    pub verify_filename: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Status {
    Removed,
    RemoveFailed,
    FilenameOk,
    FilenameMismatch,
    ConcurrentModification,
    OpenError,
    ReadError,
    Ok,
    FilenameNotMatched,
    Corrupt,
    TimeChanged,
    New,
    Outdated,
}

impl Status {
    pub fn tag(self) -> &'static str {
        match self {
            Status::Removed => "<removed xattr>",
            Status::RemoveFailed => "<remove failed>",
            Status::FilenameOk | Status::Ok => "<ok>",
            Status::FilenameMismatch => "<filename mismatch>",
            Status::ConcurrentModification => "<concurrent modification>",
            Status::OpenError => "<open error>",
            Status::ReadError => "<read error>",
            Status::FilenameNotMatched => "<filename not matched>",
            Status::Corrupt => "<corrupt>",
            Status::TimeChanged => "<timechange>",
            Status::New => "<new>",
            Status::Outdated => "<outdated>",
        }
    }

    /// Statuses that record the actual attributes as the new baseline.
    pub fn persists(self) -> bool {
        matches!(
            self,
            Status::Corrupt | Status::TimeChanged | Status::New | Status::Outdated
        )
    }

    /// The file itself could not be processed.
    pub fn is_failure(self) -> bool {
        matches!(
            self,
            Status::OpenError | Status::ReadError | Status::RemoveFailed
        )
    }
}

/// Outcome of checking one file.
#[derive(Debug)]
pub struct Verdict {
    pub path: PathBuf,
    pub algorithm: Algorithm,
    pub status: Status,
    pub stored: Option<FileAttributes>,
    pub actual: Option<FileAttributes>,
    /// The failure behind a failure status, or the store error that followed
    /// an otherwise decided classification.
    pub error: Option<Error>,
}

impl Verdict {
    fn new(path: &Path, algorithm: Algorithm, status: Status) -> Self {
        Self {
            path: path.to_path_buf(),
            algorithm,
            status,
            stored: None,
            actual: None,
            error: None,
        }
    }

    fn failed(path: &Path, algorithm: Algorithm, status: Status, error: Error) -> Self {
        Self {
            error: Some(error),
            ..Self::new(path, algorithm, status)
        }
    }

    /// The classification stands but persisting the new baseline failed.
    pub fn store_failed(&self) -> bool {
        self.status.persists() && self.error.is_some()
    }
}

/// Compare stored against actual attributes of the same algorithm.
///
/// Only yields `Ok`, `Corrupt`, `TimeChanged`, `New` or `Outdated`; filename
/// verification is layered on top by [`check`].
pub fn classify(stored: &FileAttributes, actual: &FileAttributes) -> Status {
    debug_assert_eq!(stored.algorithm, actual.algorithm);
    let times = stored.timestamps_match(actual);
    let digests = stored.digests_match(actual);
    match (times, digests) {
        (true, true) => Status::Ok,
        (true, false) => Status::Corrupt,
        (false, true) => Status::TimeChanged,
        (false, false) if stored.is_zero() => Status::New,
        (false, false) => Status::Outdated,
    }
}

/// Open `path` read-only and check it.
pub fn check_file(algorithm: Algorithm, path: &Path, mode: Mode) -> Verdict {
    match File::open(path) {
        Ok(mut file) => check(algorithm, &mut file, path, mode),
        Err(source) => Verdict::failed(
            path,
            algorithm,
            Status::OpenError,
            Error::Open {
                path: path.to_path_buf(),
                source,
            },
        ),
    }
}

/// Remove all shatag attributes of both algorithms from `path`.
pub fn remove_attributes(path: &Path) -> Result<()> {
    let file = File::open(path).map_err(|source| Error::Open {
        path: path.to_path_buf(),
        source,
    })?;
    attrs::remove_all(&file, path)
}

/// Check an already opened file. `path` is used for the filename checksum and
/// for error context only.
pub fn check<S: Subject + ?Sized>(
    algorithm: Algorithm,
    file: &mut S,
    path: &Path,
    mode: Mode,
) -> Verdict {
    if mode.remove {
        return match attrs::remove_all(&*file, path) {
            Ok(()) => Verdict::new(path, algorithm, Status::Removed),
            Err(e) => Verdict::failed(path, algorithm, Status::RemoveFailed, e),
        };
    }

    let stored = attrs::load_stored(algorithm, &*file);

    if mode.filename_only {
        let status = if filename::matches(path, &stored) {
            Status::FilenameOk
        } else {
            Status::FilenameMismatch
        };
        return Verdict {
            stored: Some(stored),
            ..Verdict::new(path, algorithm, status)
        };
    }

    let actual = match compute_actual(algorithm, file, path) {
        Ok(actual) => actual,
        Err(e) => {
            let status = match e {
                Error::ConcurrentModification { .. } => Status::ConcurrentModification,
                _ => Status::ReadError,
            };
            return Verdict {
                stored: Some(stored),
                ..Verdict::failed(path, algorithm, status, e)
            };
        }
    };

    let mut status = classify(&stored, &actual);
    if status == Status::Ok && mode.verify_filename && !filename::matches(path, &actual) {
        status = Status::FilenameNotMatched;
    }
    debug!("{} {}", status.tag(), path.display());

    let error = if status.persists() {
        attrs::store(&*file, path, &actual).err()
    } else {
        None
    };

    Verdict {
        path: path.to_path_buf(),
        algorithm,
        status,
        stored: Some(stored),
        actual: Some(actual),
        error,
    }
}
