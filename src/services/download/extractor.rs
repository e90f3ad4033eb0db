use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;
use tokio::process::Command;
use tokio::time::timeout;
use tracing::debug;

use crate::bot::error::Error;
use crate::services::download::Extractor;

/// Runs yt-dlp as a subprocess. The engine's error codes are not
/// interpreted beyond success/failure; stderr goes to the operator logs.
pub struct YtDlpExtractor {
    bin: String,
    format: String,
    timeout: Duration,
}

/// Subset of the `--print-json` info dict we care about
#[derive(Debug, Deserialize)]
struct ExtractInfo {
    id: String,
    ext: String,
    #[serde(default)]
    requested_downloads: Vec<RequestedDownload>,
}

#[derive(Debug, Deserialize)]
struct RequestedDownload {
    filepath: Option<PathBuf>,
}

impl YtDlpExtractor {
    pub fn new(bin: impl Into<String>, format: impl Into<String>, timeout: Duration) -> Self {
        Self {
            bin: bin.into(),
            format: format.into(),
            timeout,
        }
    }
}

#[async_trait]
impl Extractor for YtDlpExtractor {
    async fn fetch(&self, url: &str, dest: &Path) -> Result<PathBuf, Error> {
        let template = dest.join("%(id)s.%(ext)s");

        let mut cmd = Command::new(&self.bin);
        cmd.arg("--print-json")
            .arg("--no-playlist")
            .arg("--no-warnings")
            .arg("-f")
            .arg(&self.format)
            .arg("-o")
            .arg(&template)
            .arg("--")
            .arg(url)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            // Cancellation must not leave a download running
            .kill_on_drop(true);

        debug!(url, bin = %self.bin, "Invoking extraction engine");

        let output = timeout(self.timeout, cmd.output())
            .await
            .map_err(|_| {
                Error::extraction(format!(
                    "yt-dlp timed out after {}s",
                    self.timeout.as_secs()
                ))
            })?
            .map_err(|e| Error::extraction(format!("failed to run {}: {}", self.bin, e)))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(Error::extraction(format!(
                "yt-dlp exited with {}: {}",
                output.status,
                stderr.trim()
            )));
        }

        let stdout = String::from_utf8_lossy(&output.stdout);
        let info = parse_metadata(&stdout)?;
        let file = resolve_artifact(&info, dest);

        // A clean exit with nothing on disk is still a failure
        if !file.is_file() {
            return Err(Error::extraction(format!(
                "engine reported success but produced no file at {}",
                file.display()
            )));
        }

        Ok(file)
    }
}

/// `--print-json` emits one info dict per line; the download is the last one
fn parse_metadata(stdout: &str) -> Result<ExtractInfo, Error> {
    let line = stdout
        .lines()
        .rev()
        .map(str::trim)
        .find(|l| l.starts_with('{'))
        .ok_or_else(|| Error::extraction("yt-dlp produced no metadata"))?;

    serde_json::from_str(line)
        .map_err(|e| Error::extraction(format!("unreadable yt-dlp metadata: {}", e)))
}

fn resolve_artifact(info: &ExtractInfo, dest: &Path) -> PathBuf {
    info.requested_downloads
        .iter()
        .find_map(|d| d.filepath.clone())
        .unwrap_or_else(|| dest.join(format!("{}.{}", info.id, info.ext)))
}
