//! Watch command - the synchronization daemon.

use std::time::Duration;

use anyhow::{Context, bail};
use tokio::task::JoinError;

use crate::config::Settings;
use crate::index::build_index;
use crate::sync::{EventLoop, LoopStats, Propagator, SyncError};
use crate::watcher::NotifyRegistry;

/// Index the root, seed the watcher, then propagate until terminated.
///
/// Setup runs to completion before the event loop starts, so every indexed
/// file is watched before the first event is handled. Returns only on a
/// termination signal (Ok) or a fatal error.
pub async fn run(settings: &Settings) -> anyhow::Result<()> {
    let root = settings.vault_root()?;
    let rules = settings.selection_rules();

    let (mut registry, streams) =
        NotifyRegistry::new().context("failed to create file watcher")?;
    let index = build_index(&root, &rules, &mut registry)
        .with_context(|| format!("failed to index {}", root.display()))?;

    if index.is_empty() {
        tracing::warn!(
            "[watcher] no files found in '{}' directories under {}",
            rules.marker_dir(),
            root.display()
        );
    } else {
        crate::log_event!(
            "watcher",
            "monitoring",
            "{} files ({} names) under {}",
            index.file_count(),
            index.len(),
            root.display()
        );
    }

    let propagator = Propagator::new(settings.sync.on_error)
        .with_settle(Duration::from_millis(settings.sync.settle_ms));
    let (event_loop, shutdown) = EventLoop::new(registry, index, streams, propagator);

    let mut worker = tokio::task::spawn_blocking(move || event_loop.run());

    tokio::select! {
        joined = &mut worker => {
            let stats = finish(joined)?;
            bail!("event loop stopped unexpectedly after {} events", stats.events);
        }
        () = shutdown_signal() => {
            crate::log_event!("watcher", "stopping");
            shutdown.shutdown();
            let stats = finish(worker.await)?;
            crate::log_event!(
                "watcher",
                "stopped",
                "{} events, {} propagations",
                stats.events,
                stats.propagations
            );
            Ok(())
        }
    }
}

fn finish(joined: Result<Result<LoopStats, SyncError>, JoinError>) -> anyhow::Result<LoopStats> {
    let stats = joined
        .context("event loop panicked")?
        .context("propagation failed")?;
    Ok(stats)
}

/// Resolves on Ctrl+C, or SIGTERM on unix.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("[watcher] failed to listen for ctrl+c: {e}");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{SignalKind, signal};
        match signal(SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                tracing::error!("[watcher] failed to listen for SIGTERM: {e}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {}
        () = terminate => {}
    }
}
