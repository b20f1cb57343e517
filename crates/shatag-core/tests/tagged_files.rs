//! End-to-end checks against real files and real extended attributes.
//!
//! Each test bails out early when the scratch filesystem does not accept
//! `user.*` attributes (older tmpfs, some container overlays).

use shatag_core::{check_file, remove_attributes, Algorithm, Mode, Status, Timestamp};
use std::fs::{self, OpenOptions};
use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime};
use tempfile::TempDir;

fn scratch() -> Option<TempDir> {
    let dir = tempfile::Builder::new()
        .prefix("shatag-")
        .tempdir_in(env!("CARGO_TARGET_TMPDIR"))
        .unwrap();
    let marker = dir.path().join(".xattr-check");
    fs::write(&marker, b"").unwrap();
    if xattr::set(&marker, "user.shatag.xattr-check", b"1").is_err() {
        eprintln!("skipping: user xattrs unsupported in {}", dir.path().display());
        return None;
    }
    Some(dir)
}

fn set_mtime(path: &Path, time: SystemTime) {
    let file = OpenOptions::new().write(true).open(path).unwrap();
    file.set_modified(time).unwrap();
}

fn mtime(path: &Path) -> SystemTime {
    fs::metadata(path).unwrap().modified().unwrap()
}

fn write_file(dir: &Path, name: &str, content: &[u8]) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, content).unwrap();
    set_mtime(&path, SystemTime::UNIX_EPOCH + Duration::new(1_600_000_000, 123_456_789));
    path
}

fn sha256(path: &Path) -> Status {
    check_file(Algorithm::Sha256, path, Mode::default()).status
}

#[test]
fn new_file_then_ok() {
    let Some(dir) = scratch() else { return };
    let path = write_file(dir.path(), "a.txt", b"hello world");

    let first = check_file(Algorithm::Sha256, &path, Mode::default());
    assert_eq!(first.status, Status::New);
    assert!(first.error.is_none());
    assert_eq!(
        xattr::get(&path, "user.shatag.sha256").unwrap().unwrap(),
        b"b94d27b9934d3e08a52e52d7da7dabfac484efe37a5380ee9088f7ace2efcde9"
    );
    assert_eq!(
        xattr::get(&path, "user.shatag.ts").unwrap().unwrap(),
        b"1600000000.123456789"
    );

    assert_eq!(sha256(&path), Status::Ok);
    assert_eq!(sha256(&path), Status::Ok);
}

#[test]
fn content_change_with_same_mtime_is_corrupt() {
    let Some(dir) = scratch() else { return };
    let path = write_file(dir.path(), "data.bin", b"original bytes");
    assert_eq!(sha256(&path), Status::New);

    let before = mtime(&path);
    fs::write(&path, b"flipped bytes!").unwrap();
    set_mtime(&path, before);

    let verdict = check_file(Algorithm::Sha256, &path, Mode::default());
    assert_eq!(verdict.status, Status::Corrupt);
    let stored = verdict.stored.unwrap();
    let actual = verdict.actual.unwrap();
    assert_eq!(stored.timestamp, actual.timestamp);
    assert_ne!(stored.digest, actual.digest);

    // the new content is now the baseline
    assert_eq!(sha256(&path), Status::Ok);
}

#[test]
fn touch_is_timechange() {
    let Some(dir) = scratch() else { return };
    let path = write_file(dir.path(), "t.txt", b"stable");
    assert_eq!(sha256(&path), Status::New);

    set_mtime(&path, SystemTime::UNIX_EPOCH + Duration::from_secs(1_700_000_000));
    assert_eq!(sha256(&path), Status::TimeChanged);
    assert_eq!(
        xattr::get(&path, "user.shatag.ts").unwrap().unwrap(),
        b"1700000000.000000000"
    );
    assert_eq!(sha256(&path), Status::Ok);
}

#[test]
fn edit_is_outdated() {
    let Some(dir) = scratch() else { return };
    let path = write_file(dir.path(), "doc.txt", b"draft 1");
    assert_eq!(sha256(&path), Status::New);

    fs::write(&path, b"draft 2").unwrap();
    set_mtime(&path, SystemTime::UNIX_EPOCH + Duration::from_secs(1_700_000_001));
    assert_eq!(sha256(&path), Status::Outdated);
}

#[test]
fn algorithms_are_tracked_independently() {
    let Some(dir) = scratch() else { return };
    let path = write_file(dir.path(), "both.txt", b"hello world");

    assert_eq!(sha256(&path), Status::New);
    assert!(xattr::get(&path, "user.shatag.md5").unwrap().is_none());

    assert_eq!(check_file(Algorithm::Md5, &path, Mode::default()).status, Status::New);
    assert_eq!(
        xattr::get(&path, "user.shatag.md5").unwrap().unwrap(),
        b"5eb63bbbe01eeed093cb22bb8f5acdc3"
    );
    assert_eq!(check_file(Algorithm::Md5, &path, Mode::default()).status, Status::Ok);
    assert_eq!(sha256(&path), Status::Ok);
}

#[test]
fn remove_then_new_again() {
    let Some(dir) = scratch() else { return };
    let path = write_file(dir.path(), "r.txt", b"x");
    assert_eq!(sha256(&path), Status::New);
    assert_eq!(check_file(Algorithm::Md5, &path, Mode::default()).status, Status::New);

    remove_attributes(&path).unwrap();
    for name in ["user.shatag.sha256", "user.shatag.ts", "user.shatag.md5", "user.shatag.tsmd5"] {
        assert!(xattr::get(&path, name).unwrap().is_none(), "{name} survived");
    }
    // removing again is not an error
    remove_attributes(&path).unwrap();

    let verdict = check_file(
        Algorithm::Sha256,
        &path,
        Mode {
            remove: true,
            ..Mode::default()
        },
    );
    assert_eq!(verdict.status, Status::Removed);
    assert_eq!(sha256(&path), Status::New);
}

#[test]
fn filename_only_trusts_the_name() {
    let Some(dir) = scratch() else { return };
    let path = write_file(dir.path(), "IMG_5eb63bbbe01eeed093cb22bb8f5acdc3.jpg", b"hello world");
    let filename_only = Mode {
        filename_only: true,
        ..Mode::default()
    };

    // nothing stored yet
    assert_eq!(
        check_file(Algorithm::Md5, &path, filename_only).status,
        Status::FilenameMismatch
    );
    assert_eq!(check_file(Algorithm::Md5, &path, Mode::default()).status, Status::New);
    let verdict = check_file(Algorithm::Md5, &path, filename_only);
    assert_eq!(verdict.status, Status::FilenameOk);
    assert!(verdict.actual.is_none());
}

#[test]
fn stored_timestamp_reflects_mtime() {
    let Some(dir) = scratch() else { return };
    let path = write_file(dir.path(), "m.txt", b"m");
    let verdict = check_file(Algorithm::Sha256, &path, Mode::default());
    assert_eq!(
        verdict.actual.unwrap().timestamp,
        Timestamp::new(1_600_000_000, 123_456_789)
    );
}
