//! Reading and writing the `user.shatag.*` extended attributes.
//!
//! A file looks like this once it has been checked:
//!
//! ```text
//! $ getfattr -d foo.txt
//! user.shatag.sha256="dc9fe2260fd6748b29532be0ca2750a50f9eca82046b15497f127eba6dda90e8"
//! user.shatag.ts="1560177334.020775051"
//! ```

use crate::algorithm::Algorithm;
use crate::error::{Error, Result};
use crate::timestamp::Timestamp;
use serde::Serialize;
use std::fmt;
use std::fs::File;
use std::io;
use std::path::Path;
use tracing::debug;

/// Extended-attribute primitive on an open file handle.
pub trait AttrStore {
    /// `Ok(None)` when the attribute does not exist.
    fn get_attr(&self, name: &str) -> io::Result<Option<Vec<u8>>>;
    fn set_attr(&self, name: &str, value: &[u8]) -> io::Result<()>;
    fn remove_attr(&self, name: &str) -> io::Result<()>;
}

impl AttrStore for File {
    fn get_attr(&self, name: &str) -> io::Result<Option<Vec<u8>>> {
        xattr::FileExt::get_xattr(self, name)
    }

    fn set_attr(&self, name: &str, value: &[u8]) -> io::Result<()> {
        xattr::FileExt::set_xattr(self, name, value)
    }

    fn remove_attr(&self, name: &str) -> io::Result<()> {
        xattr::FileExt::remove_xattr(self, name)
    }
}

/// Digest and digest timestamp for one algorithm, either as stored on the file
/// or as freshly computed from its content.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileAttributes {
    pub algorithm: Algorithm,
    pub digest: String,
    pub timestamp: Timestamp,
}

impl FileAttributes {
    pub fn new(algorithm: Algorithm, digest: impl Into<String>, timestamp: Timestamp) -> Self {
        Self {
            algorithm,
            digest: digest.into(),
            timestamp,
        }
    }

    pub fn zero(algorithm: Algorithm) -> Self {
        Self::new(algorithm, algorithm.zero_digest(), Timestamp::ZERO)
    }

    pub fn has_zero_digest(&self) -> bool {
        self.digest == self.algorithm.zero_digest()
    }

    /// Neither a digest nor a timestamp was ever recorded.
    pub fn is_zero(&self) -> bool {
        self.has_zero_digest() && self.timestamp.is_zero()
    }

    pub fn timestamps_match(&self, other: &FileAttributes) -> bool {
        debug_assert_eq!(self.algorithm, other.algorithm);
        self.timestamp == other.timestamp
    }

    pub fn digests_match(&self, other: &FileAttributes) -> bool {
        debug_assert_eq!(self.algorithm, other.algorithm);
        self.digest.as_bytes() == other.digest.as_bytes()
    }
}

impl fmt::Display for FileAttributes {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.digest, self.timestamp)
    }
}

/// Decode a stored digest. The raw bytes overwrite a zero digest from the left,
/// so short values keep `'0'` padding and long ones are cut to width.
fn decode_digest(algorithm: Algorithm, raw: &[u8]) -> String {
    let mut buf = algorithm.zero_digest().into_bytes();
    let n = raw.len().min(buf.len());
    buf[..n].copy_from_slice(&raw[..n]);
    String::from_utf8_lossy(&buf).into_owned()
}

/// Read the stored attributes for `algorithm`.
///
/// Missing attributes and read failures both leave the field at its zero value,
/// so a file that was never tagged comes back as [`FileAttributes::zero`].
pub fn load_stored<F: AttrStore + ?Sized>(algorithm: Algorithm, file: &F) -> FileAttributes {
    let mut attrs = FileAttributes::zero(algorithm);

    match file.get_attr(algorithm.digest_attr()) {
        Ok(Some(raw)) => attrs.digest = decode_digest(algorithm, &raw),
        Ok(None) => {}
        Err(e) => debug!("ignoring unreadable {}: {e}", algorithm.digest_attr()),
    }

    match file.get_attr(algorithm.timestamp_attr()) {
        Ok(Some(raw)) => attrs.timestamp = Timestamp::parse(&String::from_utf8_lossy(&raw)),
        Ok(None) => {}
        Err(e) => debug!("ignoring unreadable {}: {e}", algorithm.timestamp_attr()),
    }

    attrs
}

/// Persist `attrs` as the new baseline.
///
/// Writes the digest first and the timestamp second. If the second write fails
/// the first one has already happened.
pub fn store<F: AttrStore + ?Sized>(file: &F, path: &Path, attrs: &FileAttributes) -> Result<()> {
    let algorithm = attrs.algorithm;
    let writes = [
        (algorithm.digest_attr(), attrs.digest.clone()),
        (algorithm.timestamp_attr(), attrs.timestamp.to_attr_string()),
    ];
    for (name, value) in writes {
        file.set_attr(name, value.as_bytes())
            .map_err(|source| Error::AttributeWrite {
                path: path.to_path_buf(),
                name,
                source,
            })?;
    }
    debug!("stored {} {} on {}", algorithm, attrs, path.display());
    Ok(())
}

/// Remove every shatag attribute of both algorithms. Attributes that are
/// already absent are skipped.
pub fn remove_all<F: AttrStore + ?Sized>(file: &F, path: &Path) -> Result<()> {
    for algorithm in Algorithm::ALL {
        for name in [algorithm.digest_attr(), algorithm.timestamp_attr()] {
            if let Ok(None) = file.get_attr(name) {
                continue;
            }
            file.remove_attr(name)
                .map_err(|source| Error::AttributeRemove {
                    path: path.to_path_buf(),
                    name,
                    source,
                })?;
            debug!("removed {name} from {}", path.display());
        }
    }
    Ok(())
}
