pub mod extractor;

use std::path::{Path, PathBuf};
use std::sync::Arc;

use async_trait::async_trait;
use tracing::{error, warn};
use uuid::Uuid;

use crate::bot::error::Error;

/// Resolves a URL to a downloaded media file inside `dest`.
/// Opaque, potentially slow, potentially failing; single attempt.
#[async_trait]
pub trait Extractor: Send + Sync {
    async fn fetch(&self, url: &str, dest: &Path) -> Result<PathBuf, Error>;
}

/// Destination for a fetched artifact (the chat transport's media send)
#[async_trait]
pub trait MediaSink: Send + Sync {
    async fn send_media(&self, file: &Path) -> Result<(), Error>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureStage {
    Extraction,
    Transfer,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DownloadOutcome {
    Delivered,
    Failed(FailureStage),
}

/// Per-request artifact directory, removed on drop.
///
/// Drop also runs when the request task is cancelled mid-extraction or
/// mid-transfer, so partial artifacts never outlive their request.
struct ArtifactDir {
    path: PathBuf,
}

impl ArtifactDir {
    fn create(root: &Path) -> std::io::Result<Self> {
        let path = root.join(Uuid::new_v4().simple().to_string());
        std::fs::create_dir_all(&path)?;
        Ok(Self { path })
    }

    fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for ArtifactDir {
    fn drop(&mut self) {
        if let Err(e) = std::fs::remove_dir_all(&self.path) {
            if e.kind() != std::io::ErrorKind::NotFound {
                warn!(path = %self.path.display(), error = %e, "Failed to remove artifact directory");
            }
        }
    }
}

/// Drives fetch → relay → cleanup for a single request. Requests are isolated
/// from each other by uuid-named artifact directories, so one user's slow or
/// failing download never interferes with another's.
pub struct DownloadOrchestrator {
    extractor: Arc<dyn Extractor>,
    download_dir: PathBuf,
}

impl DownloadOrchestrator {
    pub fn new(extractor: Arc<dyn Extractor>, download_dir: impl Into<PathBuf>) -> Self {
        Self {
            extractor,
            download_dir: download_dir.into(),
        }
    }

    /// Failures are logged in full here; callers translate the outcome into
    /// the fixed generic reply.
    pub async fn handle(&self, url: &str, sink: &dyn MediaSink) -> DownloadOutcome {
        if !is_probable_url(url) {
            warn!(url, "Rejected request that does not look like a URL");
            return DownloadOutcome::Failed(FailureStage::Extraction);
        }

        let artifact = match ArtifactDir::create(&self.download_dir) {
            Ok(dir) => dir,
            Err(e) => {
                error!(error = %e, "Failed to create artifact directory");
                return DownloadOutcome::Failed(FailureStage::Extraction);
            }
        };

        let file = match self.extractor.fetch(url, artifact.path()).await {
            Ok(file) => file,
            Err(e) => {
                error!(url, error = %e, "Extraction failed");
                return DownloadOutcome::Failed(FailureStage::Extraction);
            }
        };

        if let Err(e) = sink.send_media(&file).await {
            error!(url, error = %e, "Failed to deliver fetched media");
            return DownloadOutcome::Failed(FailureStage::Transfer);
        }

        DownloadOutcome::Delivered
    }
}

fn is_probable_url(text: &str) -> bool {
    let text = text.trim();
    text.starts_with("http://") || text.starts_with("https://")
}
