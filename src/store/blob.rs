use anyhow::{anyhow, Context, Result};
use std::path::{Component, Path, PathBuf};

use crate::store::traits::BlobStore;

/// Writes uploads below a local directory and hands back URLs under a public base.
///
/// The API serves the same directory, so the returned URL is retrievable as soon
/// as `put` completes.
#[derive(Debug, Clone)]
pub struct LocalBlobStore {
    root: PathBuf,
    public_base_url: String,
}

impl LocalBlobStore {
    pub fn new(root: impl Into<PathBuf>, public_base_url: &str) -> Self {
        Self {
            root: root.into(),
            public_base_url: public_base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn path_for(&self, key: &str) -> Result<PathBuf> {
        let relative = Path::new(key);
        let well_formed = relative
            .components()
            .all(|component| matches!(component, Component::Normal(_)));
        if key.is_empty() || !well_formed {
            return Err(anyhow!("Invalid object key '{}'", key));
        }
        Ok(self.root.join(relative))
    }
}

#[async_trait::async_trait]
impl BlobStore for LocalBlobStore {
    async fn put(&self, key: &str, bytes: Vec<u8>, content_type: Option<&str>) -> Result<String> {
        let path = self.path_for(key)?;
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .with_context(|| format!("Failed to create upload directory {}", parent.display()))?;
        }

        let size = bytes.len();
        tokio::fs::write(&path, bytes)
            .await
            .with_context(|| format!("Failed to write upload {}", path.display()))?;

        log::debug!(
            "Stored {} bytes at {} ({})",
            size,
            key,
            content_type.unwrap_or("unknown type")
        );

        Ok(format!("{}/{}", self.public_base_url, key))
    }
}
