use std::path::{Path, PathBuf};
use tracing::debug;
use walkdir::WalkDir;

/// What the driver does with one path.
#[derive(Debug, PartialEq, Eq)]
pub enum Target {
    File(PathBuf),
    Skipped { path: PathBuf, reason: String },
}

/// Expand command-line paths into files to check, in argument order.
/// Directories are walked (sorted by name) only when `recursive` is set.
pub fn for_each_target(paths: &[PathBuf], recursive: bool, mut visit: impl FnMut(Target)) {
    for root in paths {
        let metadata = match std::fs::metadata(root) {
            Ok(m) => m,
            // let the engine report the open failure
            Err(_) => {
                visit(Target::File(root.clone()));
                continue;
            }
        };

        if metadata.is_file() {
            visit(Target::File(root.clone()));
        } else if metadata.is_dir() {
            if recursive {
                walk_dir(root, &mut visit);
            } else {
                visit(Target::Skipped {
                    path: root.clone(),
                    reason: "is a directory (use --recursive)".into(),
                });
            }
        } else {
            visit(Target::Skipped {
                path: root.clone(),
                reason: "not a regular file".into(),
            });
        }
    }
}

fn walk_dir(root: &Path, visit: &mut impl FnMut(Target)) {
    let walker = WalkDir::new(root)
        .follow_links(false)
        .sort_by_file_name();
    for entry in walker {
        let entry = match entry {
            Ok(e) => e,
            Err(e) => {
                let path = e.path().unwrap_or(root).to_path_buf();
                visit(Target::Skipped {
                    path,
                    reason: e.to_string(),
                });
                continue;
            }
        };
        if entry.file_type().is_file() {
            visit(Target::File(entry.into_path()));
        } else if !entry.file_type().is_dir() {
            debug!("skipping non-regular {}", entry.path().display());
        }
    }
}
