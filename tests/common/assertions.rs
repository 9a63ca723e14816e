//! Custom test assertions for integration tests

use link_relay::Event;
use std::path::Path;
use std::time::Duration;
use tokio::sync::broadcast;

/// Result of waiting for a link to finish its pipeline trip
#[derive(Debug)]
pub enum WaitResult {
    /// Link was fetched and delivered to the destination
    Forwarded,
    /// Link failed with an error message
    Failed(String),
    /// Timeout waiting for the link
    Timeout,
    /// Channel closed unexpectedly
    ChannelClosed,
}

/// Wait for a specific link to either be forwarded or fail
///
/// Subscribe before triggering the drain so no event is missed.
pub async fn wait_for_link_outcome(
    events: &mut broadcast::Receiver<Event>,
    url: &str,
    timeout: Duration,
) -> WaitResult {
    let result = tokio::time::timeout(timeout, async {
        loop {
            match events.recv().await {
                Ok(Event::LinkForwarded { url: event_url }) if event_url == url => {
                    return WaitResult::Forwarded;
                }
                Ok(Event::LinkFailed {
                    url: event_url,
                    reason,
                    ..
                }) if event_url == url => {
                    return WaitResult::Failed(reason);
                }
                Ok(_) => {
                    // Other events, continue waiting
                    continue;
                }
                Err(_) => {
                    return WaitResult::ChannelClosed;
                }
            }
        }
    })
    .await;

    match result {
        Ok(wait_result) => wait_result,
        Err(_) => WaitResult::Timeout,
    }
}

/// Wait for the end of a drain pass (completed or cancelled)
pub async fn wait_for_drain_end(
    events: &mut broadcast::Receiver<Event>,
    timeout: Duration,
) -> Option<Event> {
    wait_for_event(events, timeout, |event| {
        matches!(
            event,
            Event::DrainCompleted { .. } | Event::DrainCancelled { .. }
        )
    })
    .await
}

/// Wait for a specific event type
pub async fn wait_for_event<F>(
    events: &mut broadcast::Receiver<Event>,
    timeout: Duration,
    predicate: F,
) -> Option<Event>
where
    F: Fn(&Event) -> bool,
{
    let result = tokio::time::timeout(timeout, async {
        loop {
            match events.recv().await {
                Ok(event) if predicate(&event) => {
                    return Some(event);
                }
                Ok(_) => continue,
                Err(_) => return None,
            }
        }
    })
    .await;

    result.ok().flatten()
}

/// Collect all events until timeout or predicate is satisfied
pub async fn collect_events_until<F>(
    events: &mut broadcast::Receiver<Event>,
    timeout: Duration,
    stop_predicate: F,
) -> Vec<Event>
where
    F: Fn(&Event) -> bool,
{
    let mut collected = Vec::new();

    let _ = tokio::time::timeout(timeout, async {
        while let Ok(event) = events.recv().await {
            let should_stop = stop_predicate(&event);
            collected.push(event);
            if should_stop {
                break;
            }
        }
    })
    .await;

    collected
}

/// Assert that a link made it through the pipeline
pub async fn assert_link_forwarded(
    events: &mut broadcast::Receiver<Event>,
    url: &str,
    timeout: Duration,
) {
    match wait_for_link_outcome(events, url, timeout).await {
        WaitResult::Forwarded => {}
        WaitResult::Failed(reason) => {
            panic!("Link {} failed with error: {}", url, reason);
        }
        WaitResult::Timeout => {
            panic!("Timeout waiting for link {} to be forwarded", url);
        }
        WaitResult::ChannelClosed => {
            panic!("Event channel closed while waiting for link {}", url);
        }
    }
}

/// Assert that the download directory holds no leftover files
///
/// Delivered files are removed after upload, so a finished pass with no
/// failures must leave the directory empty. The scan is recursive in case
/// the external tool created subdirectories.
pub fn assert_download_dir_empty(dir: &Path) {
    assert!(dir.exists(), "Directory {:?} does not exist", dir);
    let leftovers: Vec<_> = walkdir::WalkDir::new(dir)
        .min_depth(1)
        .into_iter()
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path().to_path_buf())
        .collect();
    assert!(
        leftovers.is_empty(),
        "Expected directory {:?} to be empty, found {:?}",
        dir,
        leftovers
    );
}

/// Assert that files exist in a directory
pub fn assert_files_exist(dir: &Path, expected_files: &[&str]) {
    for filename in expected_files {
        let path = dir.join(filename);
        assert!(
            path.exists(),
            "Expected file '{}' to exist in {:?}",
            filename,
            dir
        );
    }
}
