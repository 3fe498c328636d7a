//! Graceful stop on OS signals.

use std::io;

/// Completes when the process is asked to stop. Pass it to
/// `axum::serve(..).with_graceful_shutdown(..)`.
///
/// If the handlers cannot be installed the error is logged and the future
/// never completes, so the server keeps running.
pub async fn shutdown_signal() {
    match next_stop_signal().await {
        Ok(name) => tracing::info!(signal = name, "shutdown requested, draining connections"),
        Err(e) => {
            tracing::error!(error = %e, "failed to install shutdown signal handlers");
            std::future::pending::<()>().await;
        }
    }
}

#[cfg(unix)]
async fn next_stop_signal() -> io::Result<&'static str> {
    use tokio::signal::unix::{signal, SignalKind};

    let mut term = signal(SignalKind::terminate())?;
    let mut int = signal(SignalKind::interrupt())?;
    Ok(tokio::select! {
        _ = term.recv() => "SIGTERM",
        _ = int.recv() => "SIGINT",
    })
}

#[cfg(windows)]
async fn next_stop_signal() -> io::Result<&'static str> {
    use tokio::signal::windows::{ctrl_break, ctrl_c, ctrl_close, ctrl_shutdown};

    let mut c = ctrl_c()?;
    let mut brk = ctrl_break()?;
    let mut close = ctrl_close()?;
    let mut shutdown = ctrl_shutdown()?;
    Ok(tokio::select! {
        _ = c.recv() => "CTRL_C",
        _ = brk.recv() => "CTRL_BREAK",
        _ = close.recv() => "CTRL_CLOSE",
        _ = shutdown.recv() => "CTRL_SHUTDOWN",
    })
}
