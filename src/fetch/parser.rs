//! Parsing of yt-dlp output
//!
//! yt-dlp reports the output file through `[download] Destination:` lines
//! (plus a `[Merger]` line when separate streams are combined) and we ask it
//! to print the media title through a `--print` template. Failures land on
//! stderr in a handful of recognizable shapes that are translated into
//! messages fit for an operator-facing reply.

/// Parse a destination path from a yt-dlp output line
///
/// Recognizes both the plain download form and the merger form. When a run
/// produces several of these (separate video/audio streams followed by a
/// merge), the last one wins, so callers should keep overwriting.
pub(crate) fn parse_destination_line(line: &str) -> Option<String> {
    let line = line.trim();

    if let Some(path) = line.strip_prefix("[download] Destination: ") {
        return Some(path.trim().to_string());
    }

    if let Some(path) = line.strip_prefix("[Merger] Merging formats into \"") {
        return Some(path.trim_end_matches('"').to_string());
    }

    None
}

/// Marker emitted via `--print` so the title line is unambiguous in stdout
pub(crate) const TITLE_MARKER: &str = "[relay] title ";

/// Parse the media title from the `--print` marker line
pub(crate) fn parse_title_line(line: &str) -> Option<String> {
    let title = line.trim().strip_prefix(TITLE_MARKER)?.trim();
    if title.is_empty() {
        None
    } else {
        Some(title.to_string())
    }
}

/// Translate yt-dlp stderr into a human-readable failure message
///
/// yt-dlp error strings are verbose and full of extractor internals. The
/// common cases are mapped to short messages; anything else falls back to the
/// first `ERROR:` line, truncated to keep replies readable.
pub(crate) fn translate_tool_error(stderr: &str) -> String {
    let lower = stderr.to_lowercase();

    if lower.contains("http error 429") || lower.contains("too many requests") {
        return "rate limited by the source site, try again later".to_string();
    }

    if lower.contains("http error 403") || lower.contains("forbidden") {
        return "access denied by the source site".to_string();
    }

    if lower.contains("sign in to confirm") || lower.contains("login required") {
        return "the source requires a signed-in session".to_string();
    }

    if lower.contains("video unavailable") || lower.contains("content isn't available") {
        return "the media is unavailable or was removed".to_string();
    }

    if lower.contains("private video") || lower.contains("this video is private") {
        return "the media is private".to_string();
    }

    if lower.contains("copyright") {
        return "the media was taken down for copyright reasons".to_string();
    }

    if lower.contains("not available in your country") || lower.contains("geo restricted") {
        return "the media is geo-restricted".to_string();
    }

    if lower.contains("unsupported url") {
        return "the downloader does not support this site".to_string();
    }

    if lower.contains("unable to download") && lower.contains("timed out") {
        return "the connection to the source timed out".to_string();
    }

    if lower.contains("no space left") {
        return "no disk space left for the download".to_string();
    }

    // Fall back to the first ERROR: line yt-dlp printed
    let message = stderr
        .lines()
        .find_map(|line| line.trim().strip_prefix("ERROR: "))
        .unwrap_or_else(|| stderr.trim())
        .trim();

    if message.is_empty() {
        return "the downloader failed without an error message".to_string();
    }

    if message.len() > 300 {
        let mut cut = 300;
        while !message.is_char_boundary(cut) {
            cut -= 1;
        }
        format!("{}...", &message[..cut])
    } else {
        message.to_string()
    }
}
