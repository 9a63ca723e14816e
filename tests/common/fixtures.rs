//! Stub downloader scripts and canned bot API responses

use std::path::{Path, PathBuf};

/// Title the stub downloader reports for every successful fetch
pub const STUB_TITLE: &str = "Stub Clip";

/// Shell script that stands in for yt-dlp
///
/// Honors the `--output` template, writes a small file where the template
/// points and prints the same stdout lines the real tool would, so the
/// CLI fetcher exercises its full parsing path. URLs containing
/// `unavailable` fail the way a removed video does.
const STUB_DOWNLOADER: &str = r#"#!/bin/sh
output=""
prev=""
url=""
for arg in "$@"; do
    case "$prev" in
        --output) output="$arg" ;;
    esac
    prev="$arg"
    url="$arg"
done

case "$url" in
    *unavailable*)
        echo "ERROR: [generic] Video unavailable" >&2
        exit 1
        ;;
esac

dest=$(printf '%s\n' "$output" | sed 's/%(ext)s/mp4/')
printf 'stub media for %s' "$url" > "$dest"
echo "[relay] title Stub Clip"
echo "[download] Destination: $dest"
"#;

/// Write the stub downloader script into `dir` and make it executable
pub fn write_stub_downloader(dir: &Path) -> PathBuf {
    let script = dir.join("stub-yt-dlp");
    std::fs::write(&script, STUB_DOWNLOADER).expect("failed to write stub downloader");
    make_executable(&script);
    script
}

/// Script that exits non-zero for every URL, with a recognizable error
pub fn write_failing_downloader(dir: &Path) -> PathBuf {
    let script = dir.join("failing-yt-dlp");
    std::fs::write(
        &script,
        "#!/bin/sh\necho \"ERROR: HTTP Error 429: Too Many Requests\" >&2\nexit 1\n",
    )
    .expect("failed to write failing downloader");
    make_executable(&script);
    script
}

fn make_executable(path: &Path) {
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        let mut perms = std::fs::metadata(path)
            .expect("failed to stat stub downloader")
            .permissions();
        perms.set_mode(0o755);
        std::fs::set_permissions(path, perms).expect("failed to chmod stub downloader");
    }
}

/// Successful `sendVideo` response body
pub fn bot_api_ok() -> serde_json::Value {
    serde_json::json!({
        "ok": true,
        "result": {
            "message_id": 1001,
            "chat": { "id": -1001234567890_i64, "type": "channel" }
        }
    })
}

/// Failed bot API response with the given description
pub fn bot_api_error(description: &str) -> serde_json::Value {
    serde_json::json!({
        "ok": false,
        "error_code": 400,
        "description": description
    })
}
