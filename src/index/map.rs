//! Name -> locations mapping built once at startup.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::Serialize;

use super::rules::file_key;

/// Base file name to every path sharing that name, in discovery order.
///
/// Read-only once built; the only way to refresh it is a restart.
#[derive(Debug, Default, Clone, Serialize)]
#[serde(transparent)]
pub struct ConfigFileMap {
    entries: BTreeMap<String, Vec<PathBuf>>,
}

impl ConfigFileMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append `path` under its base name. Paths without a name are ignored.
    pub(crate) fn insert(&mut self, path: PathBuf) {
        if let Some(name) = file_key(&path) {
            self.entries.entry(name).or_default().push(path);
        }
    }

    /// Peers by base name.
    pub fn get(&self, name: &str) -> Option<&[PathBuf]> {
        self.entries.get(name).map(Vec::as_slice)
    }

    /// Peers for the base name of `path`, including `path` itself.
    pub fn peers_of(&self, path: &Path) -> Option<&[PathBuf]> {
        file_key(path).and_then(|name| self.get(&name))
    }

    pub fn contains_name(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    /// Iterate over `(name, paths)` in name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[PathBuf])> {
        self.entries
            .iter()
            .map(|(name, paths)| (name.as_str(), paths.as_slice()))
    }

    /// Every indexed path, grouped by name.
    pub fn paths(&self) -> impl Iterator<Item = &Path> {
        self.entries.values().flatten().map(PathBuf::as_path)
    }

    /// Number of distinct names.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of indexed files across all names.
    pub fn file_count(&self) -> usize {
        self.entries.values().map(Vec::len).sum()
    }
}
