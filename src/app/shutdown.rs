//! Interrupt handling and graceful shutdown.

use log::{debug, warn};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

/// Cancels `cancel` when the process receives Ctrl-C (SIGINT).
///
/// The watcher ends on its own once `cancel` is cancelled by anyone else.
pub fn spawn_interrupt_watcher(cancel: CancellationToken) -> JoinHandle<()> {
    tokio::spawn(async move {
        tokio::select! {
            _ = cancel.cancelled() => {}
            signal = tokio::signal::ctrl_c() => {
                match signal {
                    Ok(()) => {
                        warn!("Interrupt received, stopping checks");
                        cancel.cancel();
                    }
                    Err(e) => {
                        warn!("Failed to listen for interrupt: {e}");
                        cancel.cancelled().await;
                    }
                }
            }
        }
    })
}

/// Stops background tasks and waits for them to finish.
///
/// Cancelling the token also ends any check still in flight, which drops its
/// connection.
pub async fn shutdown_gracefully(cancel: CancellationToken, watcher: Option<JoinHandle<()>>) {
    cancel.cancel();
    if let Some(watcher) = watcher {
        if let Err(e) = watcher.await {
            debug!("Interrupt watcher ended abnormally: {e}");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_shutdown_stops_watcher() {
        let cancel = CancellationToken::new();
        let watcher = spawn_interrupt_watcher(cancel.clone());

        shutdown_gracefully(cancel.clone(), Some(watcher)).await;
        assert!(cancel.is_cancelled());
    }
}
