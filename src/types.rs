//! Core types for link-relay

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Identifier of a destination chat or channel
///
/// Channel identifiers in the upload API are negative numbers in the
/// `-100...` form, but any i64 a chat API hands back is accepted here.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, ToSchema,
)]
#[serde(transparent)]
pub struct ChatId(pub i64);

impl ChatId {
    /// Create a new ChatId
    pub fn new(id: i64) -> Self {
        Self(id)
    }

    /// Get the inner i64 value
    pub fn get(&self) -> i64 {
        self.0
    }
}

impl From<i64> for ChatId {
    fn from(id: i64) -> Self {
        Self(id)
    }
}

impl From<ChatId> for i64 {
    fn from(id: ChatId) -> Self {
        id.0
    }
}

impl PartialEq<i64> for ChatId {
    fn eq(&self, other: &i64) -> bool {
        self.0 == *other
    }
}

impl PartialEq<ChatId> for i64 {
    fn eq(&self, other: &ChatId) -> bool {
        *self == other.0
    }
}

impl std::fmt::Display for ChatId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for ChatId {
    type Err = std::num::ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(s.parse()?))
    }
}

/// Pipeline stage at which a link failed
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum FailureStage {
    /// The external downloader failed to produce a file
    Download,
    /// The file was fetched but could not be delivered
    Upload,
}

impl std::fmt::Display for FailureStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FailureStage::Download => write!(f, "download"),
            FailureStage::Upload => write!(f, "upload"),
        }
    }
}

/// Event emitted during queue and drain lifecycle
#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Event {
    /// Links were added to the queue
    LinksEnqueued {
        /// Number of links accepted
        accepted: usize,
        /// Number of candidates rejected by the scheme filter
        rejected: usize,
        /// Queue length after the enqueue
        queue_length: usize,
    },

    /// A drain pass started
    DrainStarted {
        /// Queue length at the start of the pass
        queue_length: usize,
    },

    /// A link was popped and handed to the downloader
    LinkStarted {
        /// The link being processed
        url: String,
    },

    /// A link was fetched and delivered to the destination
    LinkForwarded {
        /// The link that was delivered
        url: String,
    },

    /// A link failed at some pipeline stage
    LinkFailed {
        /// The link that failed
        url: String,
        /// Stage where the failure occurred
        stage: FailureStage,
        /// Error message
        reason: String,
    },

    /// A failed link was re-appended to the queue for a later pass
    LinkRequeued {
        /// The link that was re-appended
        url: String,
        /// Failed attempts so far, including this one
        attempts: u32,
    },

    /// A failed link exhausted its attempt budget and was dropped
    LinkDropped {
        /// The link that was dropped
        url: String,
        /// Failed attempts when the budget ran out
        attempts: u32,
    },

    /// A drain pass ran to completion
    DrainCompleted {
        /// Number of links delivered
        processed: usize,
        /// Queue length when the pass started
        total: usize,
        /// Number of links that failed during the pass
        failed: usize,
    },

    /// A drain pass stopped early on a cancel request
    DrainCancelled {
        /// Number of links delivered before the cancel
        processed: usize,
        /// Number of links still queued after the cancel
        remaining: usize,
    },

    /// The queue was cleared
    QueueCleared {
        /// Number of links removed
        removed: usize,
    },

    /// The destination channel changed
    TargetChanged {
        /// The new destination
        chat_id: ChatId,
    },

    /// Graceful shutdown initiated
    Shutdown,
}

/// Result of an enqueue call
#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
pub struct EnqueueOutcome {
    /// Number of links that passed the scheme filter and were appended
    pub accepted: usize,

    /// Candidates that were rejected, in input order
    pub rejected: Vec<String>,

    /// Queue length after the append
    pub queue_length: usize,
}

/// One entry in a queue listing
#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
pub struct QueueEntry {
    /// 1-based position in the queue
    pub position: usize,

    /// The queued link
    pub url: String,

    /// Failed attempts so far (0 for links that have never been tried)
    pub attempts: u32,
}

/// Bounded view of the queue front
#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
pub struct QueueSnapshot {
    /// Entries from the front of the queue, up to the requested limit
    pub entries: Vec<QueueEntry>,

    /// Total queue length, which may exceed the number of entries returned
    pub total: usize,
}

impl QueueSnapshot {
    /// Number of queued links beyond the returned entries
    pub fn truncated(&self) -> usize {
        self.total.saturating_sub(self.entries.len())
    }
}

/// Queue statistics
#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
pub struct QueueStats {
    /// Total number of links in the queue
    pub total: usize,

    /// Whether a drain pass is currently running
    pub draining: bool,

    /// Whether the queue is accepting new links
    pub accepting_new: bool,

    /// The configured destination, if any
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target: Option<ChatId>,
}

/// One pipeline collaborator and whether it can do its job
#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
pub struct ToolStatus {
    /// Implementation name (e.g. "cli-yt-dlp", "unavailable")
    pub name: String,

    /// Whether the collaborator is actually usable
    pub available: bool,
}

/// Pipeline capabilities based on configuration and available external tools
#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
pub struct Capabilities {
    /// Download side of the pipeline
    pub fetcher: ToolStatus,

    /// Upload side of the pipeline
    pub uploader: ToolStatus,
}

/// A link that failed during a drain pass
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct FailedLink {
    /// The link that failed
    pub url: String,

    /// Stage where the failure occurred
    pub stage: FailureStage,

    /// Error message
    pub reason: String,
}

/// Summary of a finished drain pass
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct DrainReport {
    /// Number of links delivered to the destination
    pub processed: usize,

    /// Queue length when the pass started
    pub total: usize,

    /// Links that failed, in failure order
    pub failed: Vec<FailedLink>,

    /// Whether the pass stopped early on a cancel request
    pub cancelled: bool,

    /// When the pass started
    pub started_at: DateTime<Utc>,

    /// When the pass finished
    pub finished_at: DateTime<Utc>,
}

impl DrainReport {
    /// Wall-clock duration of the pass
    pub fn elapsed(&self) -> chrono::Duration {
        self.finished_at - self.started_at
    }
}
