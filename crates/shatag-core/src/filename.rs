//! Checksums embedded in file names, e.g. `IMG_d41d8cd98f00b204e9800998ecf8427e.jpg`.

use crate::algorithm::Algorithm;
use crate::attrs::FileAttributes;
use regex::Regex;
use std::path::Path;
use std::sync::OnceLock;

fn hex_run(algorithm: Algorithm) -> &'static Regex {
    static SHA256: OnceLock<Regex> = OnceLock::new();
    static MD5: OnceLock<Regex> = OnceLock::new();
    let (cell, width) = match algorithm {
        Algorithm::Sha256 => (&SHA256, 64),
        Algorithm::Md5 => (&MD5, 32),
    };
    cell.get_or_init(|| {
        Regex::new(&format!("[0-9a-fA-F]{{{width}}}")).expect("static hex pattern")
    })
}

/// Leftmost run of hex digits exactly as wide as the algorithm's digest, or
/// `""` if the name holds none.
pub fn extract(algorithm: Algorithm, filename: &str) -> &str {
    hex_run(algorithm)
        .find(filename)
        .map(|m| m.as_str())
        .unwrap_or("")
}

/// Whether the checksum in the base name of `path` equals `attrs.digest`.
pub fn matches(path: &Path, attrs: &FileAttributes) -> bool {
    let name = match path.file_name() {
        Some(name) => name.to_string_lossy(),
        None => return false,
    };
    let embedded = extract(attrs.algorithm, &name);
    !embedded.is_empty() && embedded.as_bytes() == attrs.digest.as_bytes()
}
