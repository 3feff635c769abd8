//! Indexer: discovers synchronized settings files and groups them by name.
//!
//! A file takes part in synchronization when it sits directly inside a
//! marker directory (`.obsidian` by default) and its name is not excluded
//! (`workspace.json` by default). All files sharing a base name are peers.

mod map;
mod rules;
mod walker;

pub use map::ConfigFileMap;
pub use rules::SelectionRules;
pub use walker::build_index;

use std::path::PathBuf;
use thiserror::Error;

use crate::watcher::WatchError;

/// Errors while building the index. All of them abort startup.
#[derive(Error, Debug)]
pub enum IndexError {
    #[error("Failed to walk {path}: {source}")]
    Walk {
        path: PathBuf,
        #[source]
        source: walkdir::Error,
    },

    #[error("Failed to resolve symlink {path}: {source}")]
    Stat {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to watch discovered file: {0}")]
    Subscribe(#[from] WatchError),
}
