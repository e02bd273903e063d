//! PDF export artifacts and the sinks that save them.
//!
//! ARCHITECTURE
//! ============
//! An export is a one-shot side effect: the fetched bytes are staged as a
//! temporary artifact, saved under a derived filename, then released. The
//! [`ArtifactSink`] trait owns all three steps so the order service can run
//! without a filesystem in tests. [`DirectorySink`] stages each artifact as a
//! hidden `.<uuid>.part` file next to its destination and copies it to the
//! final name, so release leaves nothing behind in the download dir.

use std::path::{Path, PathBuf};

use time::{Date, OffsetDateTime};

use crate::types::{EntityId, ListParams};

pub const PDF_CONTENT_TYPE: &str = "application/pdf";

/// A binary export payload, alive only for one save.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportArtifact {
    pub bytes: Vec<u8>,
    pub content_type: &'static str,
}

impl ExportArtifact {
    #[must_use]
    pub fn pdf(bytes: Vec<u8>) -> Self {
        Self { bytes, content_type: PDF_CONTENT_TYPE }
    }
}

/// Handle to an artifact a sink has materialized but not yet released.
#[derive(Debug, PartialEq, Eq)]
pub struct StagedArtifact {
    pub handle: String,
    pub len: usize,
}

#[derive(Debug, thiserror::Error)]
pub enum SinkError {
    #[error("failed to stage artifact: {0}")]
    Stage(String),

    #[error("failed to save {file_name}: {reason}")]
    Save { file_name: String, reason: String },
}

/// Destination for exported files.
///
/// `release` is infallible and is always called once per successful `stage`,
/// whether or not `save` succeeded.
#[async_trait::async_trait]
pub trait ArtifactSink: Send + Sync {
    async fn stage(&self, artifact: ExportArtifact) -> Result<StagedArtifact, SinkError>;

    async fn save(&self, staged: &StagedArtifact, file_name: &str) -> Result<(), SinkError>;

    async fn release(&self, staged: StagedArtifact);
}

// =============================================================================
// FILENAMES
// =============================================================================

/// `orders_<status>_<date>.pdf`, or `orders_all_<date>.pdf` without a status filter.
#[must_use]
pub fn orders_export_file_name(params: &ListParams, date: Date) -> String {
    let qualifier = params.get("status").filter(|s| !s.is_empty()).unwrap_or("all");
    format!("orders_{qualifier}_{date}.pdf")
}

/// `order_<id>_<date>.pdf`.
#[must_use]
pub fn order_export_file_name(id: &EntityId, date: Date) -> String {
    format!("order_{id}_{date}.pdf")
}

/// Source of "today" for filename date stamps.
pub trait Clock: Send + Sync {
    fn today(&self) -> Date;
}

/// Calendar date in UTC.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn today(&self) -> Date {
        OffsetDateTime::now_utc().date()
    }
}

/// Always reports the same date.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub Date);

impl Clock for FixedClock {
    fn today(&self) -> Date {
        self.0
    }
}

// =============================================================================
// DIRECTORY SINK
// =============================================================================

const STAGED_SUFFIX: &str = ".part";

/// Saves artifacts as files in a download directory.
pub struct DirectorySink {
    dir: PathBuf,
}

impl DirectorySink {
    #[must_use]
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn staging_path(&self) -> PathBuf {
        self.dir.join(format!(".{}{STAGED_SUFFIX}", uuid::Uuid::new_v4()))
    }
}

/// Reject names that would escape the download directory.
fn plain_file_name(file_name: &str) -> Option<&str> {
    let valid = !file_name.is_empty()
        && file_name != "."
        && file_name != ".."
        && !file_name.contains(['/', '\\', '\0']);
    valid.then_some(file_name)
}

#[async_trait::async_trait]
impl ArtifactSink for DirectorySink {
    async fn stage(&self, artifact: ExportArtifact) -> Result<StagedArtifact, SinkError> {
        tokio::fs::create_dir_all(&self.dir)
            .await
            .map_err(|e| SinkError::Stage(e.to_string()))?;
        let path = self.staging_path();
        tokio::fs::write(&path, &artifact.bytes)
            .await
            .map_err(|e| SinkError::Stage(e.to_string()))?;
        Ok(StagedArtifact { handle: path.to_string_lossy().into_owned(), len: artifact.bytes.len() })
    }

    async fn save(&self, staged: &StagedArtifact, file_name: &str) -> Result<(), SinkError> {
        let save_err = |reason: String| SinkError::Save { file_name: file_name.to_owned(), reason };
        let name = plain_file_name(file_name).ok_or_else(|| save_err("not a plain file name".to_owned()))?;
        let target = self.dir.join(name);
        tokio::fs::copy(&staged.handle, &target)
            .await
            .map_err(|e| save_err(e.to_string()))?;
        tracing::info!(path = %target.display(), bytes = staged.len, "export saved");
        Ok(())
    }

    async fn release(&self, staged: StagedArtifact) {
        if let Err(e) = tokio::fs::remove_file(&staged.handle).await {
            tracing::warn!(error = %e, handle = %staged.handle, "failed to remove staged artifact");
        }
    }
}

#[cfg(test)]
#[path = "export_test.rs"]
mod tests;
