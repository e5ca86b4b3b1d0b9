//! Cancels the running invocation on Ctrl-C or SIGTERM.

use relicta_plugin::CancellationToken;
use tracing::{info, warn};

/// Spawns a task that cancels `cancel` when a termination signal arrives.
pub fn install_signal_handlers(cancel: CancellationToken) {
    tokio::spawn(async move {
        tokio::select! {
            () = wait_for_signal() => {
                info!("Received termination signal, cancelling invocation");
                cancel.cancel();
            }
            () = cancel.cancelled() => {}
        }
    });
}

#[cfg(unix)]
async fn wait_for_signal() {
    use tokio::signal::unix::{SignalKind, signal};

    let mut sigterm = match signal(SignalKind::terminate()) {
        Ok(sigterm) => sigterm,
        Err(e) => {
            warn!(error = %e, "Failed to install SIGTERM handler");
            return ctrl_c().await;
        }
    };

    tokio::select! {
        _ = sigterm.recv() => {}
        () = ctrl_c() => {}
    }
}

#[cfg(not(unix))]
async fn wait_for_signal() {
    ctrl_c().await;
}

async fn ctrl_c() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "Failed to install Ctrl-C handler");
        std::future::pending::<()>().await;
    }
}

