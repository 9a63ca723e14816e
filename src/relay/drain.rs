//! Drain pass execution - pop, fetch, upload, delete, pace, repeat.

use crate::error::{DrainError, Error, FetchError, Result, UploadError};
use crate::types::{ChatId, DrainReport, Event, FailedLink, FailureStage};
use std::path::PathBuf;
use tokio_util::sync::CancellationToken;

use super::{LinkRelay, QueuedLink};

impl LinkRelay {
    /// Run a drain pass inline, delivering queued links one at a time
    ///
    /// Pre-flight checks run in order: the drain slot must be free, a
    /// destination must be configured, and the queue must be non-empty.
    /// The pass then repeats until the queue runs dry or a cancel request
    /// arrives:
    /// 1. Pop the front link.
    /// 2. Fetch it to a uniquely named local file.
    /// 3. Upload the file to the destination (caption = reported title, or
    ///    the configured default).
    /// 4. Remove the local file whether or not the upload succeeded.
    /// 5. Sleep the configured inter-item delay (a cancel wakes it early).
    ///
    /// Failures are never fatal to the pass: the link is recorded and, after
    /// the pass ends, re-appended to the queue in failure order for a future
    /// pass (subject to `max_attempts`). Cancellation is cooperative and
    /// only observed between items - the in-flight item always completes.
    ///
    /// # Errors
    ///
    /// - [`DrainError::AlreadyRunning`] if a pass is already active
    /// - [`DrainError::NoTarget`] if no destination chat is configured
    /// - [`DrainError::EmptyQueue`] if there is nothing to deliver
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use link_relay::{Config, LinkRelay};
    ///
    /// # #[tokio::main]
    /// # async fn main() -> Result<(), Box<dyn std::error::Error>> {
    /// let relay = LinkRelay::new(Config::default()).await?;
    /// relay.enqueue(vec!["https://example.com/watch?v=abc".to_string()]).await?;
    ///
    /// let report = relay.start_drain().await?;
    /// println!("delivered {} of {}", report.processed, report.total);
    /// # Ok(())
    /// # }
    /// ```
    pub async fn start_drain(&self) -> Result<DrainReport> {
        let (chat, token) = self.begin_drain().await?;

        let report = self.run_drain_pass(chat, token).await;
        self.release_drain_slot().await;

        Ok(report)
    }

    /// Start a drain pass on a background task
    ///
    /// Same pre-flight as [`start_drain`](Self::start_drain), run
    /// synchronously so the caller still gets `AlreadyRunning` / `NoTarget` /
    /// `EmptyQueue` immediately. The pass itself runs on a spawned task whose
    /// handle resolves to the final [`DrainReport`]. The REST surface uses
    /// this to answer 202 while the pass keeps going.
    pub async fn spawn_drain(
        self: &std::sync::Arc<Self>,
    ) -> Result<tokio::task::JoinHandle<DrainReport>> {
        let (chat, token) = self.begin_drain().await?;

        let relay = self.clone();
        Ok(tokio::spawn(async move {
            let report = relay.run_drain_pass(chat, token).await;
            relay.release_drain_slot().await;
            report
        }))
    }

    /// Request cancellation of the running drain pass
    ///
    /// Cooperative: the in-flight item completes its fetch/upload/cleanup,
    /// then the pass stops. Remaining links stay queued.
    ///
    /// # Errors
    ///
    /// Returns [`DrainError::NotRunning`] if no pass is active.
    pub async fn cancel_drain(&self) -> Result<()> {
        let slot = self.drain_state.active.lock().await;
        match slot.as_ref() {
            Some(token) => {
                token.cancel();
                tracing::info!("Drain cancellation requested");
                Ok(())
            }
            None => Err(DrainError::NotRunning.into()),
        }
    }

    /// Whether a drain pass is currently active
    pub async fn is_draining(&self) -> bool {
        self.drain_state.active.lock().await.is_some()
    }

    /// Claim the slot and run the shared pre-flight checks
    ///
    /// On any pre-flight failure the slot is released again so the relay is
    /// not left wedged.
    async fn begin_drain(&self) -> Result<(ChatId, CancellationToken)> {
        let token = self.claim_drain_slot().await?;

        let Some(chat) = self.target().await else {
            self.release_drain_slot().await;
            return Err(DrainError::NoTarget.into());
        };

        if self.queue_state.queue.lock().await.is_empty() {
            self.release_drain_slot().await;
            return Err(DrainError::EmptyQueue.into());
        }

        Ok((chat, token))
    }

    /// Atomically claim the drain slot
    ///
    /// Test-and-set under the slot mutex: either this caller installs a
    /// fresh cancellation token, or someone already holds the slot.
    async fn claim_drain_slot(&self) -> Result<CancellationToken> {
        let mut slot = self.drain_state.active.lock().await;
        if slot.is_some() {
            return Err(DrainError::AlreadyRunning.into());
        }

        let token = CancellationToken::new();
        *slot = Some(token.clone());
        Ok(token)
    }

    /// Release the drain slot
    async fn release_drain_slot(&self) {
        let mut slot = self.drain_state.active.lock().await;
        *slot = None;
    }

    /// The pass body. The slot is already claimed; the caller releases it.
    async fn run_drain_pass(&self, chat: ChatId, token: CancellationToken) -> DrainReport {
        let started_at = chrono::Utc::now();
        let total = self.queue_state.queue.lock().await.len();

        tracing::info!(queue_length = total, chat_id = chat.get(), "Drain pass started");
        self.emit_event(Event::DrainStarted {
            queue_length: total,
        });

        let mut processed = 0usize;
        let mut failed: Vec<FailedLink> = Vec::new();
        let mut requeue: Vec<QueuedLink> = Vec::new();
        let mut cancelled = false;

        loop {
            // Cancellation is only observed here, between items
            if token.is_cancelled() {
                cancelled = true;
                break;
            }

            let Some(item) = self.pop_front_link().await else {
                break;
            };

            tracing::info!(url = %item.url, "Processing link");
            self.emit_event(Event::LinkStarted {
                url: item.url.clone(),
            });

            match self.process_one_link(&item.url, chat).await {
                Ok(()) => {
                    processed += 1;
                    tracing::info!(url = %item.url, "Link forwarded");
                    self.emit_event(Event::LinkForwarded { url: item.url });
                }
                Err((stage, reason)) => {
                    tracing::warn!(url = %item.url, stage = %stage, reason = %reason, "Link failed");
                    self.emit_event(Event::LinkFailed {
                        url: item.url.clone(),
                        stage,
                        reason: reason.clone(),
                    });
                    failed.push(FailedLink {
                        url: item.url.clone(),
                        stage,
                        reason,
                    });
                    requeue.push(QueuedLink {
                        url: item.url,
                        attempts: item.attempts + 1,
                    });
                }
            }

            // Fixed pacing delay after every item; a cancel wakes it early
            tokio::select! {
                () = token.cancelled() => {}
                () = tokio::time::sleep(self.config.inter_item_delay()) => {}
            }
        }

        // Failed links return to the queue in failure order for a later
        // pass. This happens before the slot is released, so a competing
        // start cannot observe the queue without them.
        let (kept, dropped): (Vec<QueuedLink>, Vec<QueuedLink>) =
            match self.config.queue.max_attempts {
                Some(max) => requeue.into_iter().partition(|link| link.attempts < max),
                None => (requeue, Vec::new()),
            };

        for link in dropped {
            tracing::warn!(
                url = %link.url,
                attempts = link.attempts,
                "Dropping link after repeated failures"
            );
            self.emit_event(Event::LinkDropped {
                url: link.url,
                attempts: link.attempts,
            });
        }

        if !kept.is_empty() {
            let mut queue = self.queue_state.queue.lock().await;
            for link in kept {
                self.emit_event(Event::LinkRequeued {
                    url: link.url.clone(),
                    attempts: link.attempts,
                });
                queue.push_back(link);
            }
        }

        let finished_at = chrono::Utc::now();
        let report = DrainReport {
            processed,
            total,
            failed,
            cancelled,
            started_at,
            finished_at,
        };

        if cancelled {
            let remaining = self.queue_state.queue.lock().await.len();
            tracing::info!(processed, remaining, "Drain pass cancelled");
            self.emit_event(Event::DrainCancelled {
                processed,
                remaining,
            });
        } else {
            tracing::info!(
                processed,
                total,
                failed = report.failed.len(),
                "Drain pass complete"
            );
            self.emit_event(Event::DrainCompleted {
                processed,
                total,
                failed: report.failed.len(),
            });
        }

        report
    }

    /// Fetch one link and deliver it to the destination
    ///
    /// The local file is removed before returning, whether or not the upload
    /// succeeded.
    async fn process_one_link(
        &self,
        url: &str,
        chat: ChatId,
    ) -> std::result::Result<(), (FailureStage, String)> {
        let output_prefix = self.next_output_prefix();

        let media = match self.pipeline.fetcher.fetch(url, &output_prefix).await {
            Ok(media) => media,
            Err(e) => return Err((FailureStage::Download, failure_reason(e))),
        };

        let caption = media
            .title
            .as_deref()
            .unwrap_or(&self.config.upload.default_caption);

        let upload_result = self
            .pipeline
            .uploader
            .upload(chat, &media.path, caption, url)
            .await;

        if let Err(e) = tokio::fs::remove_file(&media.path).await
            && e.kind() != std::io::ErrorKind::NotFound
        {
            tracing::warn!(
                path = %media.path.display(),
                error = %e,
                "Failed to remove local file after upload attempt"
            );
        }

        upload_result.map_err(|e| (FailureStage::Upload, failure_reason(e)))
    }

    async fn pop_front_link(&self) -> Option<QueuedLink> {
        self.queue_state.queue.lock().await.pop_front()
    }

    /// Build a unique output prefix from the monotonic counter
    ///
    /// e.g. `downloads/relay-000042`; the fetcher appends the extension.
    fn next_output_prefix(&self) -> PathBuf {
        let n = self
            .drain_state
            .output_counter
            .fetch_add(1, std::sync::atomic::Ordering::SeqCst);
        self.config.download_dir().join(format!("relay-{n:06}"))
    }
}

/// Pull the human-readable reason out of a pipeline error
///
/// [`FailedLink`] carries the url separately, so url-bearing variants unwrap
/// to their bare message.
fn failure_reason(error: Error) -> String {
    match error {
        Error::Fetch(FetchError::Failed { message, .. }) => message,
        Error::Upload(UploadError::Rejected { reason, .. }) => reason,
        Error::Upload(UploadError::Transport { message, .. }) => message,
        other => other.to_string(),
    }
}
