//! Propagation engine: copy one file over its peers without echo.
//!
//! Each cycle runs four phases in order:
//!
//! ```text
//! pause   unsubscribe every peer (source included)
//! read    load the source bytes
//! write   overwrite every other peer
//! resume  re-subscribe every peer, whatever happened above
//! ```
//!
//! Writes made while peers are paused produce no change events, so a cycle
//! cannot trigger another cycle.

use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::SyncError;
use crate::watcher::Subscriptions;

/// Permission bits for peers created by a write (owner rw, others r).
pub const PEER_FILE_MODE: u32 = 0o644;

/// How a cycle reacts to a failed read or write.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FailurePolicy {
    /// Stop writing at the first failure and return the error; the daemon exits.
    #[default]
    Abort,
    /// Log failures, keep writing the remaining peers, keep the daemon running.
    Skip,
}

/// What a single cycle did.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct PropagationReport {
    /// Peers overwritten with the source bytes.
    pub written: Vec<PathBuf>,
    /// Peers whose write failed (skip policy only).
    pub failed: Vec<PathBuf>,
    /// The source could not be read and nothing was written (skip policy only).
    pub source_unreadable: bool,
    /// Peers that could not be re-subscribed.
    pub resume_failures: Vec<PathBuf>,
}

/// Runs propagation cycles against a watch registry.
#[derive(Debug, Clone, Default)]
pub struct Propagator {
    policy: FailurePolicy,
    settle: Duration,
}

impl Propagator {
    pub fn new(policy: FailurePolicy) -> Self {
        Self {
            policy,
            settle: Duration::ZERO,
        }
    }

    /// Wait this long before pausing, so a writer can finish its write.
    pub fn with_settle(mut self, settle: Duration) -> Self {
        self.settle = settle;
        self
    }

    pub fn policy(&self) -> FailurePolicy {
        self.policy
    }

    /// Overwrite every peer except `source` with the bytes of `source`.
    ///
    /// `peers` is the full peer list for the source's file name and normally
    /// contains `source` itself. The resume phase always runs; under
    /// [`FailurePolicy::Abort`] the first failure is returned afterwards.
    pub fn propagate<R>(
        &self,
        source: &Path,
        peers: &[PathBuf],
        registry: &mut R,
    ) -> Result<PropagationReport, SyncError>
    where
        R: Subscriptions + ?Sized,
    {
        if !self.settle.is_zero() {
            std::thread::sleep(self.settle);
        }

        let mut report = PropagationReport::default();

        pause(peers, registry);
        let outcome = self.copy_to_peers(source, peers, &mut report);
        report.resume_failures = resume(peers, registry);

        outcome.map(|()| report)
    }

    fn copy_to_peers(
        &self,
        source: &Path,
        peers: &[PathBuf],
        report: &mut PropagationReport,
    ) -> Result<(), SyncError> {
        let bytes = match std::fs::read(source) {
            Ok(bytes) => bytes,
            Err(e) => {
                let err = SyncError::Read {
                    path: source.to_path_buf(),
                    source: e,
                };
                return match self.policy {
                    FailurePolicy::Abort => Err(err),
                    FailurePolicy::Skip => {
                        tracing::warn!("[sync] skipping cycle: {err}");
                        report.source_unreadable = true;
                        Ok(())
                    }
                };
            }
        };

        for peer in peers.iter().filter(|peer| peer.as_path() != source) {
            match write_peer(peer, &bytes) {
                Ok(()) => report.written.push(peer.clone()),
                Err(e) => {
                    let err = SyncError::Write {
                        path: peer.clone(),
                        source: e,
                    };
                    match self.policy {
                        FailurePolicy::Abort => return Err(err),
                        FailurePolicy::Skip => {
                            tracing::warn!("[sync] skipping peer: {err}");
                            report.failed.push(peer.clone());
                        }
                    }
                }
            }
        }

        Ok(())
    }
}

/// Unsubscribe every peer. Failures are logged and ignored.
fn pause<R: Subscriptions + ?Sized>(peers: &[PathBuf], registry: &mut R) {
    for path in peers {
        if let Err(e) = registry.unsubscribe(path) {
            tracing::warn!("[sync] couldn't pause watcher: {e}");
        }
    }
}

/// Re-subscribe every peer, returning the ones that failed.
fn resume<R: Subscriptions + ?Sized>(peers: &[PathBuf], registry: &mut R) -> Vec<PathBuf> {
    let mut failures = Vec::new();
    for path in peers {
        if let Err(e) = registry.subscribe(path) {
            tracing::warn!("[sync] couldn't resume watcher: {e}");
            failures.push(path.clone());
        }
    }
    failures
}

/// Truncate-and-write, creating the file with [`PEER_FILE_MODE`] if needed.
fn write_peer(path: &Path, bytes: &[u8]) -> std::io::Result<()> {
    let mut options = OpenOptions::new();
    options.write(true).create(true).truncate(true);

    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        options.mode(PEER_FILE_MODE);
    }

    let mut file = options.open(path)?;
    file.write_all(bytes)
}
