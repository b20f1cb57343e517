//! Silent data corruption detection for files on disk.
//!
//! Each file carries its own checksum and the modification time the checksum
//! was taken at, stored as `user.shatag.*` extended attributes. A check
//! re-hashes the content and compares against what was stored to classify the
//! file as ok, new, outdated, touched, or corrupt.

pub mod algorithm;
pub mod attrs;
pub mod check;
pub mod error;
pub mod filename;
pub mod hasher;
pub mod stats;
pub mod timestamp;

#[cfg(test)]
pub(crate) mod testutil;

pub use algorithm::Algorithm;
pub use attrs::{AttrStore, FileAttributes};
pub use check::{check, check_file, classify, remove_attributes, Mode, Status, Verdict};
pub use error::{Error, Result};
pub use hasher::{compute_actual, Subject};
pub use stats::Stats;
pub use timestamp::Timestamp;
