//! # vault-sync
//!
//! Keeps settings files synchronized across directories that share the same
//! file name. Every file sitting directly inside a marker directory
//! (`.obsidian` by default) under a root is indexed by its base name; a write
//! to one copy is copied over all the others.
//!
//! ```text
//! build_index ──> NotifyRegistry seeded ──> EventLoop ──> Propagator
//!   (once)          (one watch per file)     (single       (pause, read,
//!                                             consumer)     write, resume)
//! ```

pub mod cli;
pub mod config;
pub mod index;
pub mod logging;
pub mod sync;
pub mod watcher;

pub use config::{ConfigError, Settings};
pub use index::{ConfigFileMap, IndexError, SelectionRules, build_index};
pub use sync::{EventLoop, FailurePolicy, PropagationReport, Propagator, SyncError};
pub use watcher::{ChangeEvent, ChangeKind, MemoryRegistry, NotifyRegistry, Subscriptions, WatchError};
