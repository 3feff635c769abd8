//! Watch registry: per-file change subscriptions over the OS notifier.
//!
//! # Architecture
//!
//! ```text
//! NotifyRegistry (owns notify::RecommendedWatcher)
//!   - subscribe / unsubscribe by exact file path
//!   - callback splits notify results into two streams
//!         |
//!    +----------+-----------+
//!    |                      |
//! ChangeEvent stream    WatchError stream
//!    (unbounded)          (unbounded)
//! ```
//!
//! Everything that toggles subscriptions goes through the [`Subscriptions`]
//! trait, so the indexer and the propagation engine work the same against
//! the real notifier and against [`MemoryRegistry`].

mod error;
mod event;
mod memory;
mod registry;

pub use error::WatchError;
pub use event::{ChangeEvent, ChangeKind};
pub use memory::MemoryRegistry;
pub use registry::{NotifyRegistry, WatchStreams};

use std::path::Path;

/// Add/remove operations keyed by path.
///
/// Callers treat failures as non-fatal once the daemon is running: a
/// re-subscribe of an active path or an unsubscribe of an inactive one is
/// logged, never escalated.
pub trait Subscriptions {
    /// Begin monitoring `path` for changes.
    fn subscribe(&mut self, path: &Path) -> Result<(), WatchError>;

    /// Stop monitoring `path`.
    fn unsubscribe(&mut self, path: &Path) -> Result<(), WatchError>;
}

impl<T: Subscriptions + ?Sized> Subscriptions for &mut T {
    fn subscribe(&mut self, path: &Path) -> Result<(), WatchError> {
        (**self).subscribe(path)
    }

    fn unsubscribe(&mut self, path: &Path) -> Result<(), WatchError> {
        (**self).unsubscribe(path)
    }
}
