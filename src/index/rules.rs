//! Which files qualify for synchronization.

use std::collections::HashSet;
use std::ffi::OsStr;
use std::path::Path;

/// Marker directory name plus the file names never synchronized.
#[derive(Debug, Clone)]
pub struct SelectionRules {
    marker_dir: String,
    excluded: HashSet<String>,
}

impl SelectionRules {
    pub fn new(marker_dir: impl Into<String>, excluded: impl IntoIterator<Item = String>) -> Self {
        Self {
            marker_dir: marker_dir.into(),
            excluded: excluded.into_iter().collect(),
        }
    }

    pub fn marker_dir(&self) -> &str {
        &self.marker_dir
    }

    pub fn is_excluded(&self, file_name: &str) -> bool {
        self.excluded.contains(file_name)
    }

    /// True when `path`'s immediate parent is a marker directory and its own
    /// name is not excluded. Does not look at the file system.
    pub fn selects(&self, path: &Path) -> bool {
        let in_marker = path
            .parent()
            .and_then(Path::file_name)
            .is_some_and(|parent| parent == OsStr::new(&self.marker_dir));

        in_marker && file_key(path).is_some_and(|name| !self.is_excluded(&name))
    }
}

impl Default for SelectionRules {
    fn default() -> Self {
        Self::new(".obsidian", ["workspace.json".to_string()])
    }
}

/// Base file name used as the index key.
pub(crate) fn file_key(path: &Path) -> Option<String> {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
}
