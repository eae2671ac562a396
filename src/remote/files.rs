//! Disk-backed screenshot persistence.

// ============================================================================
// Imports
// ============================================================================

use std::path::Path;

use async_trait::async_trait;
use base64::Engine;
use base64::engine::general_purpose::STANDARD as Base64Standard;
use tracing::debug;

use crate::error::{Error, Result};

use super::FileSaver;

// ============================================================================
// DiskFileSaver
// ============================================================================

/// [`FileSaver`] that decodes base64 payloads and writes them to disk.
///
/// Parent directories are created as needed; the grid returns screenshots as
/// base64 PNG, so the decoded bytes are written verbatim.
#[derive(Debug, Default, Clone, Copy)]
pub struct DiskFileSaver;

impl DiskFileSaver {
    /// Creates a new disk file saver.
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl FileSaver for DiskFileSaver {
    async fn save(&self, path: &Path, base64_data: &str) -> Result<()> {
        let bytes = Base64Standard
            .decode(base64_data.trim())
            .map_err(|e| Error::remote(format!("invalid base64 screenshot payload: {e}")))?;

        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            tokio::fs::create_dir_all(parent).await?;
        }

        tokio::fs::write(path, &bytes).await?;
        debug!(path = %path.display(), bytes = bytes.len(), "Screenshot saved");
        Ok(())
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_save_decodes_and_writes() -> anyhow::Result<()> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("shots/page.png");

        // "grid" in base64.
        DiskFileSaver::new().save(&path, "Z3JpZA==").await?;

        let written = tokio::fs::read(&path).await?;
        assert_eq!(written, b"grid");
        Ok(())
    }

    #[tokio::test]
    async fn test_save_rejects_invalid_base64() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.png");

        let err = DiskFileSaver::new()
            .save(&path, "not base64 !!!")
            .await
            .unwrap_err();

        assert!(err.to_string().contains("base64"));
        assert!(!path.exists());
    }
}
