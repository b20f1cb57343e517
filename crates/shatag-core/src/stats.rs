//! Run totals folded from verdicts.

use crate::check::{Status, Verdict};
use serde::Serialize;
use std::fmt;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Stats {
    pub total: u64,
    pub ok: u64,
    pub new_files: u64,
    pub outdated: u64,
    pub time_changed: u64,
    pub in_progress: u64,
    pub corrupt: u64,
    pub filename_mismatch: u64,
    pub errors_opening: u64,
    pub errors_writing: u64,
    pub errors_other: u64,
}

impl Stats {
    pub fn record(&mut self, verdict: &Verdict) {
        self.total += 1;
        match verdict.status {
            Status::Removed | Status::FilenameOk | Status::Ok => self.ok += 1,
            Status::FilenameMismatch | Status::FilenameNotMatched => self.filename_mismatch += 1,
            Status::ConcurrentModification => self.in_progress += 1,
            Status::OpenError => self.errors_opening += 1,
            Status::ReadError | Status::RemoveFailed => self.errors_other += 1,
            Status::Corrupt => self.corrupt += 1,
            Status::TimeChanged => self.time_changed += 1,
            Status::New => self.new_files += 1,
            Status::Outdated => self.outdated += 1,
        }
        if verdict.store_failed() {
            self.errors_writing += 1;
        }
    }

    /// A path that never made it to the engine, e.g. a directory without
    /// recursion or an unreadable directory entry.
    pub fn record_skipped(&mut self) {
        self.total += 1;
        self.errors_other += 1;
    }

    pub fn merge(&mut self, other: &Stats) {
        self.total += other.total;
        self.ok += other.ok;
        self.new_files += other.new_files;
        self.outdated += other.outdated;
        self.time_changed += other.time_changed;
        self.in_progress += other.in_progress;
        self.corrupt += other.corrupt;
        self.filename_mismatch += other.filename_mismatch;
        self.errors_opening += other.errors_opening;
        self.errors_writing += other.errors_writing;
        self.errors_other += other.errors_other;
    }

    pub fn errors(&self) -> u64 {
        self.errors_opening + self.errors_writing + self.errors_other
    }

    pub fn has_corruption(&self) -> bool {
        self.corrupt > 0
    }

    pub fn has_errors(&self) -> bool {
        self.errors() > 0
    }
}

impl<'a> Extend<&'a Verdict> for Stats {
    fn extend<I: IntoIterator<Item = &'a Verdict>>(&mut self, iter: I) {
        for verdict in iter {
            self.record(verdict);
        }
    }
}

impl fmt::Display for Stats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} files: {} ok, {} new, {} outdated, {} timechange, {} in progress, \
             {} corrupt, {} filename mismatch, {} errors",
            self.total,
            self.ok,
            self.new_files,
            self.outdated,
            self.time_changed,
            self.in_progress,
            self.corrupt,
            self.filename_mismatch,
            self.errors(),
        )
    }
}
