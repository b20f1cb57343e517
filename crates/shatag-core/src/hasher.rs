//! Content hashing with a torn-read guard.

use crate::algorithm::Algorithm;
use crate::attrs::{AttrStore, FileAttributes};
use crate::error::{Error, Result};
use crate::timestamp::Timestamp;
use std::fs::File;
use std::io::{self, Read};
use std::path::Path;
use tracing::{debug, warn};

const READ_BUFFER: usize = 64 * 1024;

/// An open file the engine can hash, stat and tag.
pub trait Subject: Read + AttrStore {
    fn mtime(&self) -> io::Result<Timestamp>;
}

impl Subject for File {
    fn mtime(&self) -> io::Result<Timestamp> {
        Timestamp::from_metadata(&self.metadata()?)
    }
}

/// Hash the content from the current position to EOF and pair the digest with
/// the modification time.
///
/// The mtime is sampled before and after streaming. If the two samples differ,
/// the file changed underneath the hasher and the digest is thrown away with
/// [`Error::ConcurrentModification`].
pub fn compute_actual<S: Subject + ?Sized>(
    algorithm: Algorithm,
    file: &mut S,
    path: &Path,
) -> Result<FileAttributes> {
    let read_err = |source| Error::Read {
        path: path.to_path_buf(),
        source,
    };

    let before = file.mtime().map_err(read_err)?;

    let mut hasher = algorithm.hasher();
    let mut buffer = vec![0u8; READ_BUFFER];
    let mut total = 0u64;
    loop {
        let n = match file.read(&mut buffer) {
            Ok(0) => break,
            Ok(n) => n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(read_err(e)),
        };
        hasher.update(&buffer[..n]);
        total += n as u64;
    }

    let after = file.mtime().map_err(read_err)?;
    if before != after {
        warn!(
            "mtime of {} moved from {before} to {after} while hashing",
            path.display()
        );
        return Err(Error::ConcurrentModification {
            path: path.to_path_buf(),
        });
    }

    let digest = hasher.finalize_hex();
    debug!("hashed {total} bytes of {} ({algorithm})", path.display());
    Ok(FileAttributes::new(algorithm, digest, before))
}
