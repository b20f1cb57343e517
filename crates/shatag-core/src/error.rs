use std::path::PathBuf;

pub type Result<T> = std::result::Result<T, Error>;

/// Per-file failures. None of these abort a run; the driver reports them and
/// moves on to the next file.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("cannot open `{}`: {source}", .path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("cannot read `{}`: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("`{}` was modified while it was being hashed", .path.display())]
    ConcurrentModification { path: PathBuf },

    #[error("cannot write attribute `{name}` on `{}`: {source}", .path.display())]
    AttributeWrite {
        path: PathBuf,
        name: &'static str,
        #[source]
        source: std::io::Error,
    },

    #[error("cannot remove attribute `{name}` from `{}`: {source}", .path.display())]
    AttributeRemove {
        path: PathBuf,
        name: &'static str,
        #[source]
        source: std::io::Error,
    },
}
