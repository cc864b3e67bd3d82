use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

/// A snapshot of a file's existence and modification time
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct FileTime {
    pub path: PathBuf,
    pub mtime: Option<SystemTime>,
    pub exists: bool,
}

impl FileTime {
    /// Read the current state of `path` from the filesystem.
    ///
    /// Missing files and unreadable metadata are reported as absent rather
    /// than as errors.
    pub fn probe(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        match fs::metadata(path) {
            Ok(metadata) => FileTime {
                path: path.to_path_buf(),
                mtime: metadata.modified().ok(),
                exists: true,
            },
            Err(_) => FileTime {
                path: path.to_path_buf(),
                mtime: None,
                exists: false,
            },
        }
    }

    /// Whether this file exists and was modified strictly after `other`.
    ///
    /// A missing or undated file is never newer. A present file is newer
    /// than a missing one.
    #[must_use]
    pub fn is_newer_than(&self, other: &FileTime) -> bool {
        if !self.exists {
            return false;
        }
        if !other.exists {
            return true;
        }
        match (self.mtime, other.mtime) {
            (Some(mine), Some(theirs)) => mine > theirs,
            _ => false,
        }
    }
}
