//! The control loop that turns change events into propagation cycles.

use crossbeam_channel::{Receiver, Sender, bounded, select};

use super::{PropagationReport, Propagator, SyncError};
use crate::index::ConfigFileMap;
use crate::watcher::{ChangeEvent, Subscriptions, WatchError, WatchStreams};

/// Counters reported when the loop stops.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct LoopStats {
    /// Change events received, of any kind.
    pub events: u64,
    /// Write events that ran a propagation cycle.
    pub propagations: u64,
    /// Events that were not writes or named an untracked file.
    pub ignored: u64,
    /// Errors received from the watch mechanism.
    pub watch_errors: u64,
}

/// Stops a running [`EventLoop`]. Dropping the handle stops it too.
#[derive(Debug)]
pub struct ShutdownHandle {
    _tx: Sender<()>,
}

impl ShutdownHandle {
    /// Closing the sender disconnects the loop's shutdown receiver, which
    /// wakes `select!` and ends [`EventLoop::run`].
    pub fn shutdown(self) {
        drop(self._tx);
    }
}

/// What woke the loop up.
enum Wakeup {
    Event(ChangeEvent),
    Error(WatchError),
    Closed(&'static str),
    Shutdown,
}

/// Single consumer of change events.
///
/// Owns the watch registry and the index for the rest of the process; the
/// propagator runs inline, so one cycle finishes before the next event is read.
pub struct EventLoop<R> {
    registry: R,
    index: ConfigFileMap,
    propagator: Propagator,
    events: Receiver<ChangeEvent>,
    errors: Receiver<WatchError>,
    shutdown: Receiver<()>,
    stats: LoopStats,
}

impl<R: Subscriptions> EventLoop<R> {
    /// Take ownership of the seeded registry, the index and its streams.
    pub fn new(
        registry: R,
        index: ConfigFileMap,
        streams: WatchStreams,
        propagator: Propagator,
    ) -> (Self, ShutdownHandle) {
        let (tx, rx) = bounded(0);
        let event_loop = Self {
            registry,
            index,
            propagator,
            events: streams.events,
            errors: streams.errors,
            shutdown: rx,
            stats: LoopStats::default(),
        };
        (event_loop, ShutdownHandle { _tx: tx })
    }

    pub fn index(&self) -> &ConfigFileMap {
        &self.index
    }

    pub fn stats(&self) -> LoopStats {
        self.stats
    }

    /// Process events until a stream closes or shutdown is requested.
    ///
    /// Blocks the calling thread. Returns the first propagation error when
    /// the propagator runs with [`super::FailurePolicy::Abort`].
    pub fn run(mut self) -> Result<LoopStats, SyncError> {
        crate::log_event!("sync", "event loop started");

        loop {
            let wakeup = select! {
                recv(self.events) -> msg => msg.map_or(Wakeup::Closed("events"), Wakeup::Event),
                recv(self.errors) -> msg => msg.map_or(Wakeup::Closed("errors"), Wakeup::Error),
                recv(self.shutdown) -> _ => Wakeup::Shutdown,
            };

            match wakeup {
                Wakeup::Event(event) => {
                    self.dispatch(event)?;
                }
                Wakeup::Error(err) => {
                    self.stats.watch_errors += 1;
                    tracing::warn!("[watcher] {err}");
                }
                Wakeup::Closed(stream) => {
                    crate::debug_event!("sync", "stream closed", "{stream}");
                    break;
                }
                Wakeup::Shutdown => {
                    crate::debug_event!("sync", "shutdown requested");
                    break;
                }
            }
        }

        Ok(self.stats)
    }

    /// Handle one change event.
    ///
    /// Writes to a tracked file name run a propagation cycle with the full
    /// peer list; everything else is ignored.
    pub fn dispatch(&mut self, event: ChangeEvent) -> Result<Option<PropagationReport>, SyncError> {
        self.stats.events += 1;

        if !event.is_write() {
            self.stats.ignored += 1;
            crate::debug_event!("sync", "ignored", "{:?} {}", event.kind, event.path.display());
            return Ok(None);
        }

        let Some(peers) = self.index.peers_of(&event.path) else {
            self.stats.ignored += 1;
            crate::debug_event!("sync", "untracked", "{}", event.path.display());
            return Ok(None);
        };

        let report = self
            .propagator
            .propagate(&event.path, peers, &mut self.registry)?;
        self.stats.propagations += 1;

        crate::log_event!(
            "sync",
            "propagated",
            "{} -> {} peers",
            event.path.display(),
            report.written.len()
        );

        Ok(Some(report))
    }
}
