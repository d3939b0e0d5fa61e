//! Durable stage artifacts.
//!
//! Every stage output is written under the run's output directory before the
//! next stage begins, so a halted run still leaves the completed stages'
//! artifacts behind.

use researcher_core::Result;
use std::path::{Path, PathBuf};
use tokio::fs;

/// Default artifact directory, relative to the working directory.
pub const DEFAULT_OUTPUT_DIR: &str = "output-files";

#[derive(Debug, Clone)]
pub struct ArtifactStore {
    root: PathBuf,
}

impl ArtifactStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Write one artifact, creating the directory on first use. Returns the
    /// full path written.
    pub async fn save(&self, file_name: &str, content: &str) -> Result<PathBuf> {
        fs::create_dir_all(&self.root).await?;
        let path = self.root.join(file_name);
        fs::write(&path, content).await?;
        tracing::debug!(path = %path.display(), bytes = content.len(), "artifact written");
        Ok(path)
    }
}

impl Default for ArtifactStore {
    fn default() -> Self {
        Self::new(DEFAULT_OUTPUT_DIR)
    }
}
