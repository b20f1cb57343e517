//! Digest algorithms and the attribute namespace each one owns.

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fmt;

pub const XATTR_SHA256: &str = "user.shatag.sha256";
pub const XATTR_TS_SHA256: &str = "user.shatag.ts";
pub const XATTR_MD5: &str = "user.shatag.md5";
pub const XATTR_TS_MD5: &str = "user.shatag.tsmd5";

/// The checksum a run is verifying. SHA-256 and MD5 live side by side on the
/// same file under separate attribute names and never see each other.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Algorithm {
    #[default]
    Sha256,
    Md5,
}

impl Algorithm {
    pub const ALL: [Algorithm; 2] = [Algorithm::Sha256, Algorithm::Md5];

    pub fn name(self) -> &'static str {
        match self {
            Algorithm::Sha256 => "sha256",
            Algorithm::Md5 => "md5",
        }
    }

    /// Length of the lowercase hex digest.
    pub fn hex_len(self) -> usize {
        match self {
            Algorithm::Sha256 => 64,
            Algorithm::Md5 => 32,
        }
    }

    /// The "nothing recorded" digest: all `'0'` at the algorithm's width.
    pub fn zero_digest(self) -> String {
        "0".repeat(self.hex_len())
    }

    pub fn digest_attr(self) -> &'static str {
        match self {
            Algorithm::Sha256 => XATTR_SHA256,
            Algorithm::Md5 => XATTR_MD5,
        }
    }

    pub fn timestamp_attr(self) -> &'static str {
        match self {
            Algorithm::Sha256 => XATTR_TS_SHA256,
            Algorithm::Md5 => XATTR_TS_MD5,
        }
    }

    pub fn hasher(self) -> StreamHasher {
        match self {
            Algorithm::Sha256 => StreamHasher::Sha256(Sha256::new()),
            Algorithm::Md5 => StreamHasher::Md5(md5::Context::new()),
        }
    }
}

impl fmt::Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Incremental hasher for one [`Algorithm`].
pub enum StreamHasher {
    Sha256(Sha256),
    Md5(md5::Context),
}

impl StreamHasher {
    pub fn update(&mut self, data: &[u8]) {
        match self {
            StreamHasher::Sha256(h) => h.update(data),
            StreamHasher::Md5(ctx) => ctx.consume(data),
        }
    }

    /// Finish and return the lowercase hex digest.
    pub fn finalize_hex(self) -> String {
        match self {
            StreamHasher::Sha256(h) => hex::encode(h.finalize()),
            StreamHasher::Md5(ctx) => hex::encode(ctx.compute().0),
        }
    }
}
