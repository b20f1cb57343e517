//! Modification times as stored in `user.shatag.ts`.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs::Metadata;
use std::io;
use std::time::{SystemTime, UNIX_EPOCH};

/// A file modification time with nanosecond resolution.
///
/// `Timestamp::ZERO` means "nothing recorded". Equality is exact; there is no
/// tolerance window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Timestamp {
    pub seconds: u64,
    pub nanoseconds: u32,
}

impl Timestamp {
    pub const ZERO: Timestamp = Timestamp {
        seconds: 0,
        nanoseconds: 0,
    };

    pub fn new(seconds: u64, nanoseconds: u32) -> Self {
        Self {
            seconds,
            nanoseconds,
        }
    }

    pub fn zero() -> Self {
        Self::ZERO
    }

    pub fn is_zero(&self) -> bool {
        *self == Self::ZERO
    }

    /// Times before the epoch collapse to zero.
    pub fn from_system_time(time: SystemTime) -> Self {
        match time.duration_since(UNIX_EPOCH) {
            Ok(d) => Self::new(d.as_secs(), d.subsec_nanos()),
            Err(_) => Self::ZERO,
        }
    }

    pub fn from_metadata(metadata: &Metadata) -> io::Result<Self> {
        Ok(Self::from_system_time(metadata.modified()?))
    }

    /// Parse the stored attribute text `"<seconds>.<nanoseconds>"`.
    ///
    /// Never fails: a field that is missing or does not parse becomes 0, which
    /// later compares as "not matching" instead of aborting the check.
    pub fn parse(text: &str) -> Self {
        let mut parts = text.splitn(2, '.');
        let seconds = parts
            .next()
            .and_then(|s| s.parse::<u64>().ok())
            .unwrap_or(0);
        let nanoseconds = parts
            .next()
            .and_then(|s| s.parse::<u32>().ok())
            .unwrap_or(0);
        Self::new(seconds, nanoseconds)
    }

    /// Text written to the timestamp attribute.
    pub fn to_attr_string(&self) -> String {
        format!("{}.{:09}", self.seconds, self.nanoseconds)
    }
}

/// Canonical padded form: seconds to 10 digits, nanoseconds to 9.
impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:010}.{:09}", self.seconds, self.nanoseconds)
    }
}
