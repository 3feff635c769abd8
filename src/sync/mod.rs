//! Propagation of settings changes between peers.
//!
//! The [`EventLoop`] is the single consumer of change events and the only
//! caller of the [`Propagator`]; propagations therefore never interleave and
//! neither the index nor the watch registry needs a lock.

mod error;
mod event_loop;
mod propagate;

pub use error::SyncError;
pub use event_loop::{EventLoop, LoopStats, ShutdownHandle};
pub use propagate::{FailurePolicy, PEER_FILE_MODE, PropagationReport, Propagator};
