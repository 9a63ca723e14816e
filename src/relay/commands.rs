//! Text command parsing and execution.

use crate::error::Error;
use crate::types::{ChatId, DrainReport, QueueSnapshot, QueueStats};

use super::LinkRelay;

/// How many queue entries `/queue` shows before truncating
const QUEUE_PREVIEW_LIMIT: usize = 10;

/// A parsed relay command
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// `/add <url> [<url> ...]` - enqueue links
    Add(Vec<String>),
    /// `/drain` - run a drain pass and report the outcome
    Drain,
    /// `/cancel` - request cancellation of the running pass
    Cancel,
    /// `/queue` - show the front of the queue
    Queue,
    /// `/clear` - remove every queued link
    Clear,
    /// `/target <chat_id>` - set the destination chat (`None` for a missing
    /// or unparsable argument)
    Target(Option<ChatId>),
    /// `/status` - queue and pipeline status
    Status,
}

/// Parse a command out of a message text
///
/// Handles the `/command@botname` form groups use; the bot-name suffix is
/// ignored here, callers that share a group with other bots can match it
/// themselves. Returns `None` for anything that is not a recognized command.
pub fn parse_command(text: &str) -> Option<Command> {
    let mut parts = text.trim().split_whitespace();
    let head = parts.next()?.strip_prefix('/')?;

    // `/queue@relay_bot` carries the bot name after '@'
    let name = head.split('@').next().unwrap_or(head);

    match name {
        "add" => {
            let urls = parts
                .map(|raw| trim_punctuation(raw).to_string())
                .filter(|token| !token.is_empty())
                .collect();
            Some(Command::Add(urls))
        }
        "drain" => Some(Command::Drain),
        "cancel" => Some(Command::Cancel),
        "queue" => Some(Command::Queue),
        "clear" => Some(Command::Clear),
        "target" => {
            let chat = parts.next().and_then(|arg| arg.parse::<ChatId>().ok());
            Some(Command::Target(chat))
        }
        "status" => Some(Command::Status),
        _ => None,
    }
}

/// Extract http(s) links from free-form text
///
/// Splits by whitespace and keeps http(s) tokens, trimming common
/// surrounding punctuation. Useful for feeding whole messages (e.g. a
/// channel post full of links) straight into [`LinkRelay::enqueue`].
pub fn extract_urls(text: &str) -> Vec<String> {
    let mut out = Vec::new();
    for raw in text.split_whitespace() {
        let token = trim_punctuation(raw);
        if token.starts_with("http://") || token.starts_with("https://") {
            out.push(token.to_string());
        }
    }
    out
}

fn trim_punctuation(raw: &str) -> &str {
    raw.trim_matches(|c: char| {
        matches!(
            c,
            ',' | ';' | '.' | ')' | '(' | ']' | '[' | '>' | '<' | '"' | '\''
        )
    })
}

impl LinkRelay {
    /// Execute a parsed command and render a human-readable reply
    ///
    /// The command surface always has something to say: operation errors
    /// come back as `Error: {message}` strings rather than `Err`. `/drain`
    /// awaits the full pass, so the reply is the pass summary.
    pub async fn execute_command(&self, command: Command) -> String {
        match command {
            Command::Add(urls) => {
                if urls.is_empty() {
                    return "Error: usage: /add <url> [<url> ...]".to_string();
                }
                match self.enqueue(urls).await {
                    Ok(outcome) => {
                        let mut reply = format!(
                            "Added {} link(s) to the queue ({} total).",
                            outcome.accepted, outcome.queue_length
                        );
                        if !outcome.rejected.is_empty() {
                            reply.push_str(&format!(
                                " Ignored {} argument(s) that do not look like links.",
                                outcome.rejected.len()
                            ));
                        }
                        reply
                    }
                    Err(e) => render_error(e),
                }
            }
            Command::Drain => match self.start_drain().await {
                Ok(report) => render_report(&report),
                Err(e) => render_error(e),
            },
            Command::Cancel => match self.cancel_drain().await {
                Ok(()) => {
                    "Cancellation requested; the current link will finish first.".to_string()
                }
                Err(e) => render_error(e),
            },
            Command::Queue => render_snapshot(&self.peek_queue(QUEUE_PREVIEW_LIMIT).await),
            Command::Clear => {
                let removed = self.clear_queue().await;
                format!("Removed {removed} link(s) from the queue.")
            }
            Command::Target(Some(chat)) => {
                self.set_target(chat).await;
                format!("Destination set to {chat}.")
            }
            Command::Target(None) => "Error: usage: /target <chat_id>".to_string(),
            Command::Status => render_stats(&self.queue_stats().await),
        }
    }
}

/// Render an operation error as a command reply
///
/// Drain state errors read better without the "drain error:" wrapper the
/// library-level Display adds, so they are unwrapped here.
fn render_error(error: Error) -> String {
    match error {
        Error::Drain(e) => format!("Error: {e}"),
        other => format!("Error: {other}"),
    }
}

fn render_snapshot(snapshot: &QueueSnapshot) -> String {
    if snapshot.total == 0 {
        return "The queue is empty.".to_string();
    }

    let mut lines: Vec<String> = snapshot
        .entries
        .iter()
        .map(|entry| format!("{}. {}", entry.position, entry.url))
        .collect();

    let hidden = snapshot.truncated();
    if hidden > 0 {
        lines.push(format!("...and {hidden} more"));
    }

    format!("Queue ({} total):\n{}", snapshot.total, lines.join("\n"))
}

fn render_report(report: &DrainReport) -> String {
    let mut reply = if report.cancelled {
        format!(
            "Drain cancelled after {} of {} link(s).",
            report.processed, report.total
        )
    } else {
        format!("Processed {} of {} link(s).", report.processed, report.total)
    };

    if !report.failed.is_empty() {
        reply.push_str(&format!("\nFailed ({}):", report.failed.len()));
        for item in &report.failed {
            reply.push_str(&format!("\n- {} ({}: {})", item.url, item.stage, item.reason));
        }
    }

    reply
}

fn render_stats(stats: &QueueStats) -> String {
    let target = match stats.target {
        Some(chat) => chat.to_string(),
        None => "not set".to_string(),
    };

    format!(
        "Queue: {} link(s). Draining: {}. Accepting new links: {}. Destination: {}.",
        stats.total,
        if stats.draining { "yes" } else { "no" },
        if stats.accepting_new { "yes" } else { "no" },
        target
    )
}
