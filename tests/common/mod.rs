//! Shared helpers for integration tests.

#![allow(dead_code)]

use std::collections::{BTreeSet, HashMap, HashSet};
use std::fs;
use std::path::{Path, PathBuf};

use vault_sync::{Subscriptions, WatchError};

/// One call made against the registry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    Subscribe(PathBuf),
    Unsubscribe(PathBuf),
}

/// Registry double that records calls, can fail on demand and snapshots
/// file contents at every toggle.
#[derive(Debug, Default)]
pub struct RecordingRegistry {
    pub calls: Vec<Call>,
    pub active: BTreeSet<PathBuf>,
    pub fail_subscribe: HashSet<PathBuf>,
    /// Content of each path when it was last unsubscribed.
    pub content_at_pause: HashMap<PathBuf, Option<String>>,
    /// Content of each path when it was last subscribed.
    pub content_at_resume: HashMap<PathBuf, Option<String>>,
}

impl RecordingRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn seeded(paths: &[PathBuf]) -> Self {
        let mut registry = Self::new();
        registry.active.extend(paths.iter().cloned());
        registry
    }

    pub fn is_subscribed(&self, path: &Path) -> bool {
        self.active.contains(path)
    }

    pub fn clear_calls(&mut self) {
        self.calls.clear();
    }
}

impl Subscriptions for RecordingRegistry {
    fn subscribe(&mut self, path: &Path) -> Result<(), WatchError> {
        self.calls.push(Call::Subscribe(path.to_path_buf()));
        self.content_at_resume
            .insert(path.to_path_buf(), fs::read_to_string(path).ok());
        if self.fail_subscribe.contains(path) {
            return Err(WatchError::SubscribeFailed {
                path: path.to_path_buf(),
                reason: "injected failure".to_string(),
            });
        }
        self.active.insert(path.to_path_buf());
        Ok(())
    }

    fn unsubscribe(&mut self, path: &Path) -> Result<(), WatchError> {
        self.calls.push(Call::Unsubscribe(path.to_path_buf()));
        self.content_at_pause
            .insert(path.to_path_buf(), fs::read_to_string(path).ok());
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

/// Create `root/rel` with `content`, making parent directories.
pub fn write_file(root: &Path, rel: &str, content: &str) -> PathBuf {
    let path = root.join(rel);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(&path, content).unwrap();
    path
}

/// `app.json` peers in projects `a`, `b`, `c`, ... with the given contents.
pub fn app_json_peers(root: &Path, contents: &[&str]) -> Vec<PathBuf> {
    contents
        .iter()
        .enumerate()
        .map(|(i, content)| {
            let project = format!("proj{}", i + 1);
            write_file(root, &format!("{project}/.obsidian/app.json"), content)
        })
        .collect()
}

pub fn read(path: &Path) -> String {
    fs::read_to_string(path).unwrap()
}
