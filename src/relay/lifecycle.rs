//! Shutdown coordination.

use crate::error::Result;
use crate::types::Event;

use super::LinkRelay;

impl LinkRelay {
    /// Gracefully shut down the relay
    ///
    /// This method performs a graceful shutdown sequence:
    /// 1. Stops accepting new links
    /// 2. Requests cancellation of any running drain pass
    /// 3. Waits for the pass to finish with a timeout (30 seconds)
    /// 4. Emits the shutdown event
    ///
    /// Each step logs and continues on failure; the queue itself is
    /// in-memory only, so nothing needs persisting.
    pub async fn shutdown(&self) -> Result<()> {
        tracing::info!("Initiating graceful shutdown");

        // 1. Stop accepting new links
        self.queue_state
            .accepting_new
            .store(false, std::sync::atomic::Ordering::SeqCst);
        tracing::info!("Stopped accepting new links");

        // 2. Request cancellation of a running pass, if any
        if self.cancel_drain().await.is_ok() {
            tracing::info!("Signaled cancellation to the running drain pass");
        }

        // 3. Wait for the pass to finish with timeout
        let shutdown_timeout = std::time::Duration::from_secs(30);
        match tokio::time::timeout(shutdown_timeout, self.wait_for_drain()).await {
            Ok(()) => {
                tracing::info!("No drain pass active");
            }
            Err(_) => {
                tracing::warn!(
                    "Timeout waiting for the drain pass to finish, proceeding with shutdown"
                );
            }
        }

        // 4. Emit shutdown event
        let _ = self.event_tx.send(Event::Shutdown);

        tracing::info!("Graceful shutdown complete");
        Ok(())
    }

    /// Wait for the drain slot to clear
    ///
    /// Polling helper used during shutdown; the slot empties when the pass
    /// finishes its in-flight item and exits.
    async fn wait_for_drain(&self) {
        loop {
            if !self.is_draining().await {
                return;
            }

            tokio::time::sleep(std::time::Duration::from_millis(100)).await;
        }
    }
}
