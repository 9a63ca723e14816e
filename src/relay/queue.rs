//! Link queue management.

use crate::error::{Error, Result};
use crate::types::{ChatId, EnqueueOutcome, Event, QueueEntry, QueueSnapshot, QueueStats};

use super::{LinkRelay, QueuedLink};

impl LinkRelay {
    /// Add links to the back of the queue
    ///
    /// Entries are filtered against the accepted URL prefixes (by default
    /// `http://` and `https://`); everything else is reported back as
    /// rejected rather than silently dropped. Accepted links keep their
    /// submission order. No deduplication and no further validation happen
    /// here.
    ///
    /// Safe to call while a drain pass is running; new links join the end of
    /// the queue and are picked up by the in-flight pass.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ShuttingDown`] once shutdown has begun and intake is
    /// closed.
    pub async fn enqueue(&self, urls: Vec<String>) -> Result<EnqueueOutcome> {
        if !self
            .queue_state
            .accepting_new
            .load(std::sync::atomic::Ordering::SeqCst)
        {
            return Err(Error::ShuttingDown);
        }

        let prefixes = &self.config.queue.accepted_prefixes;
        let mut accepted: Vec<QueuedLink> = Vec::new();
        let mut rejected: Vec<String> = Vec::new();

        for url in urls {
            if prefixes.iter().any(|prefix| url.starts_with(prefix)) {
                accepted.push(QueuedLink { url, attempts: 0 });
            } else {
                rejected.push(url);
            }
        }

        let accepted_count = accepted.len();
        let queue_length = {
            let mut queue = self.queue_state.queue.lock().await;
            queue.extend(accepted);
            queue.len()
        };

        if accepted_count > 0 || !rejected.is_empty() {
            tracing::info!(
                accepted = accepted_count,
                rejected = rejected.len(),
                queue_length,
                "Links enqueued"
            );
            self.emit_event(Event::LinksEnqueued {
                accepted: accepted_count,
                rejected: rejected.len(),
                queue_length,
            });
        }

        Ok(EnqueueOutcome {
            accepted: accepted_count,
            rejected,
            queue_length,
        })
    }

    /// Look at the front of the queue without removing anything
    ///
    /// Returns up to `limit` entries with 1-based positions plus the total
    /// queue length, so callers can render a "...and N more" style suffix.
    /// A `limit` of zero returns no entries but still reports the total.
    pub async fn peek_queue(&self, limit: usize) -> QueueSnapshot {
        let queue = self.queue_state.queue.lock().await;

        let entries = queue
            .iter()
            .take(limit)
            .enumerate()
            .map(|(i, link)| QueueEntry {
                position: i + 1,
                url: link.url.clone(),
                attempts: link.attempts,
            })
            .collect();

        QueueSnapshot {
            entries,
            total: queue.len(),
        }
    }

    /// Remove every queued link
    ///
    /// Unconditional, and safe mid-drain: the running pass simply finds an
    /// empty queue at its next iteration and ends normally. The in-flight
    /// item is not affected.
    ///
    /// # Returns
    ///
    /// The number of links removed.
    pub async fn clear_queue(&self) -> usize {
        let removed = {
            let mut queue = self.queue_state.queue.lock().await;
            let removed = queue.len();
            queue.clear();
            removed
        };

        tracing::info!(removed, "Queue cleared");
        self.emit_event(Event::QueueCleared { removed });

        removed
    }

    /// Get current queue statistics
    pub async fn queue_stats(&self) -> QueueStats {
        QueueStats {
            total: self.queue_state.queue.lock().await.len(),
            draining: self.is_draining().await,
            accepting_new: self
                .queue_state
                .accepting_new
                .load(std::sync::atomic::Ordering::SeqCst),
            target: self.target().await,
        }
    }

    /// Set the destination chat for uploads
    ///
    /// Takes effect for the next drain pass; a pass already in flight keeps
    /// delivering to the destination it started with.
    pub async fn set_target(&self, chat: ChatId) {
        {
            let mut target = self.target.write().await;
            *target = Some(chat);
        }

        tracing::info!(chat_id = chat.get(), "Destination changed");
        self.emit_event(Event::TargetChanged { chat_id: chat });
    }

    /// Get the currently configured destination chat, if any
    pub async fn target(&self) -> Option<ChatId> {
        *self.target.read().await
    }
}
