//! Change notifications as seen by the event loop.

use std::path::PathBuf;

use notify::EventKind;
use notify::event::ModifyKind;

/// What happened to a watched path. Only writes trigger propagation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeKind {
    /// File content was modified.
    Write,
    /// Anything else: create, remove, rename, metadata, access.
    Other,
}

impl From<&EventKind> for ChangeKind {
    fn from(kind: &EventKind) -> Self {
        match kind {
            // Backends that cannot tell what changed report `Any`; treat as a write.
            EventKind::Modify(ModifyKind::Data(_)) | EventKind::Modify(ModifyKind::Any) => {
                ChangeKind::Write
            }
            _ => ChangeKind::Other,
        }
    }
}

/// A single change notification for one path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChangeEvent {
    pub path: PathBuf,
    pub kind: ChangeKind,
}

impl ChangeEvent {
    pub fn new(path: impl Into<PathBuf>, kind: ChangeKind) -> Self {
        Self {
            path: path.into(),
            kind,
        }
    }

    /// Shorthand for a content write.
    pub fn write(path: impl Into<PathBuf>) -> Self {
        Self::new(path, ChangeKind::Write)
    }

    pub fn is_write(&self) -> bool {
        self.kind == ChangeKind::Write
    }

    /// Split a notify event into one change per affected path.
    pub fn from_notify(event: notify::Event) -> Vec<ChangeEvent> {
        let kind = ChangeKind::from(&event.kind);
        event
            .paths
            .into_iter()
            .map(|path| ChangeEvent { path, kind })
            .collect()
    }
}
