//! In-memory subscription set.
//!
//! Mirrors the notifier's bookkeeping without touching the OS: used for
//! dry runs (`vault-sync index`) where the tree is indexed but not watched.

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use super::error::WatchError;
use super::Subscriptions;

/// Subscriptions tracked in a sorted set.
#[derive(Debug, Default)]
pub struct MemoryRegistry {
    active: BTreeSet<PathBuf>,
}

impl MemoryRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Check if a path is currently subscribed.
    pub fn is_subscribed(&self, path: &Path) -> bool {
        self.active.contains(path)
    }

    /// All subscribed paths in sorted order.
    pub fn paths(&self) -> impl Iterator<Item = &Path> {
        self.active.iter().map(PathBuf::as_path)
    }

    pub fn len(&self) -> usize {
        self.active.len()
    }

    pub fn is_empty(&self) -> bool {
        self.active.is_empty()
    }
}

impl Subscriptions for MemoryRegistry {
    /// Re-subscribing an active path is accepted, like the notifier does.
    fn subscribe(&mut self, path: &Path) -> Result<(), WatchError> {
        self.active.insert(path.to_path_buf());
        Ok(())
    }

    fn unsubscribe(&mut self, path: &Path) -> Result<(), WatchError> {
        if self.active.remove(path) {
            Ok(())
        } else {
            Err(WatchError::UnsubscribeFailed {
                path: path.to_path_buf(),
                reason: "not subscribed".to_string(),
            })
        }
    }
}
