use pathgate_utils::FileTime;
use std::path::Path;

/// Modification times of the pathfinder source and executable.
///
/// Recomputed on every call; nothing is persisted between queries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildState {
    pub source: FileTime,
    pub executable: FileTime,
}

impl BuildState {
    pub fn probe(source_path: &Path, executable_path: &Path) -> Self {
        Self {
            source: FileTime::probe(source_path),
            executable: FileTime::probe(executable_path),
        }
    }

    /// A rebuild is needed when the executable is absent or not strictly
    /// newer than the source. A prebuilt executable without its source is
    /// used as-is.
    #[must_use]
    pub fn needs_rebuild(&self) -> bool {
        if !self.executable.exists {
            return true;
        }
        if !self.source.exists {
            return false;
        }
        !self.executable.is_newer_than(&self.source)
    }

    /// Neither file exists, so there is nothing to build from or run
    #[must_use]
    pub fn nothing_to_build(&self) -> bool {
        !self.source.exists && !self.executable.exists
    }
}
