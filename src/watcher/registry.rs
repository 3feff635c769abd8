//! Watch registry backed by `notify::RecommendedWatcher`.

use std::path::Path;

use crossbeam_channel::{Receiver, Sender, unbounded};
use notify::{Event, RecursiveMode, Watcher};

use super::error::WatchError;
use super::event::ChangeEvent;
use super::Subscriptions;

/// The two streams fed by the notifier callback.
///
/// Both close together when the [`NotifyRegistry`] that produced them is
/// dropped, because the callback owning the senders is dropped with it.
pub struct WatchStreams {
    pub events: Receiver<ChangeEvent>,
    pub errors: Receiver<WatchError>,
}

/// Per-file subscriptions on the OS change notifier.
///
/// Holds no subscription table of its own; the notifier tracks what is
/// watched.
pub struct NotifyRegistry {
    watcher: notify::RecommendedWatcher,
}

impl NotifyRegistry {
    /// Create the notifier and the streams it reports into.
    pub fn new() -> Result<(Self, WatchStreams), WatchError> {
        let (event_tx, event_rx) = unbounded();
        let (error_tx, error_rx) = unbounded();

        let watcher = notify::recommended_watcher(move |res: notify::Result<Event>| {
            forward(res, &event_tx, &error_tx);
        })?;

        Ok((
            Self { watcher },
            WatchStreams {
                events: event_rx,
                errors: error_rx,
            },
        ))
    }
}

/// Route one notifier result onto the matching stream.
///
/// Send failures mean the event loop is gone; nothing left to tell.
fn forward(res: notify::Result<Event>, events: &Sender<ChangeEvent>, errors: &Sender<WatchError>) {
    match res {
        Ok(event) => {
            for change in ChangeEvent::from_notify(event) {
                let _ = events.send(change);
            }
        }
        Err(e) => {
            let _ = errors.send(WatchError::EventError {
                details: e.to_string(),
            });
        }
    }
}

impl Subscriptions for NotifyRegistry {
    fn subscribe(&mut self, path: &Path) -> Result<(), WatchError> {
        self.watcher
            .watch(path, RecursiveMode::NonRecursive)
            .map_err(|e| WatchError::SubscribeFailed {
                path: path.to_path_buf(),
                reason: e.to_string(),
            })?;
        crate::debug_event!("watcher", "subscribed", "{}", path.display());
        Ok(())
    }

    fn unsubscribe(&mut self, path: &Path) -> Result<(), WatchError> {
        self.watcher
            .unwatch(path)
            .map_err(|e| WatchError::UnsubscribeFailed {
                path: path.to_path_buf(),
                reason: e.to_string(),
            })?;
        crate::debug_event!("watcher", "unsubscribed", "{}", path.display());
        Ok(())
    }
}
