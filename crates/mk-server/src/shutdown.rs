use std::{future::Future, io, sync::Arc};

use mk_exec::{CancellationToken, Executor};
use tracing::{info, warn};

/// Resolve on SIGINT, or SIGTERM on unix.
pub async fn shutdown_signal() -> io::Result<&'static str> {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{SignalKind, signal};

        let mut term = signal(SignalKind::terminate())?;
        tokio::select! {
            res = tokio::signal::ctrl_c() => res.map(|_| "SIGINT"),
            _ = term.recv() => Ok("SIGTERM"),
        }
    }

    #[cfg(not(unix))]
    {
        tokio::signal::ctrl_c().await.map(|_| "ctrl-c")
    }
}

/// Stop admitting work and cancel everything in flight.
pub fn drain(executor: &Executor, shutdown: &CancellationToken) {
    executor.gate().close();
    shutdown.cancel();
}

/// Wait for a signal (or an earlier shutdown) and drain.
///
/// Only a received signal drains; if the handlers cannot be installed the
/// server keeps running until shutdown is triggered elsewhere.
pub async fn watch(executor: Arc<Executor>, shutdown: CancellationToken) {
    watch_on(shutdown_signal(), &executor, &shutdown).await
}

async fn watch_on<F>(signal: F, executor: &Executor, shutdown: &CancellationToken)
where
    F: Future<Output = io::Result<&'static str>>,
{
    tokio::select! {
        res = signal => match res {
            Ok(sig) => {
                info!(signal = sig, in_flight = executor.gate().in_use(), "received signal, shutting down");
                drain(executor, shutdown);
            }
            Err(e) => warn!(error = %e, "failed to listen for shutdown signals"),
        },
        _ = shutdown.cancelled() => {}
    }
}
