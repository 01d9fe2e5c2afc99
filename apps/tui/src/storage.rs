use std::path::{Path, PathBuf};

use chrono::Utc;
use thiserror::Error;
use tracing::{debug, info};

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("image not found: {0}")]
    NotFound(PathBuf),
    #[error("not a file name: {0}")]
    InvalidName(PathBuf),
    #[error("image store io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Directory-backed object store for timeline images.
///
/// Uploaded files are copied to `{unix_millis}_{file_name}` and addressed by
/// a `file://` URL.
#[derive(Debug, Clone)]
pub struct ImageStore {
    root: PathBuf,
}

impl ImageStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Copy `source` into the store and return the URL it can be retrieved from.
    pub async fn upload(&self, source: &Path) -> Result<String, StoreError> {
        if !tokio::fs::try_exists(source).await.unwrap_or(false) {
            return Err(StoreError::NotFound(source.to_path_buf()));
        }
        let file_name = source
            .file_name()
            .and_then(|name| name.to_str())
            .ok_or_else(|| StoreError::InvalidName(source.to_path_buf()))?;

        tokio::fs::create_dir_all(&self.root).await?;
        let target = self
            .root
            .join(format!("{}_{file_name}", Utc::now().timestamp_millis()));
        tokio::fs::copy(source, &target).await?;

        let absolute = tokio::fs::canonicalize(&target).await?;
        info!(target = %absolute.display(), "stored timeline image");
        Ok(file_url(&absolute))
    }

    /// Remove a stored image by its URL; URLs outside the store are ignored.
    pub async fn remove(&self, url: &str) -> Result<(), StoreError> {
        let Some(path) = url.strip_prefix("file://").map(PathBuf::from) else {
            return Ok(());
        };
        let root = tokio::fs::canonicalize(&self.root).await?;
        if !path.starts_with(&root) {
            debug!(url, "image is not in the store, leaving it");
            return Ok(());
        }
        match tokio::fs::remove_file(&path).await {
            Err(error) if error.kind() != std::io::ErrorKind::NotFound => Err(error.into()),
            _ => Ok(()),
        }
    }
}

fn file_url(path: &Path) -> String {
    let text = path.to_string_lossy().replace('\\', "/");
    if text.starts_with('/') {
        format!("file://{text}")
    } else {
        format!("file:///{text}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn upload_copies_with_timestamp_prefix() -> Result<(), Box<dyn std::error::Error>> {
        let source_dir = tempfile::tempdir()?;
        let store_dir = tempfile::tempdir()?;
        let source = source_dir.path().join("sakura.png");
        std::fs::write(&source, b"png bytes")?;

        let store = ImageStore::new(store_dir.path().join("images"));
        let url = store.upload(&source).await?;

        assert!(url.starts_with("file://"));
        assert!(url.ends_with("_sakura.png"));
        let stored = PathBuf::from(url.trim_start_matches("file://"));
        assert_eq!(std::fs::read(&stored)?, b"png bytes");

        let prefix = stored
            .file_name()
            .and_then(|name| name.to_str())
            .and_then(|name| name.split('_').next())
            .unwrap_or_default();
        let millis = prefix.parse::<i64>()?;
        assert!((Utc::now().timestamp_millis() - millis).abs() < 60_000);

        store.remove(&url).await?;
        assert!(!stored.exists());
        Ok(())
    }

    #[tokio::test]
    async fn missing_source_is_reported() -> Result<(), Box<dyn std::error::Error>> {
        let store_dir = tempfile::tempdir()?;
        let store = ImageStore::new(store_dir.path());
        let result = store.upload(Path::new("/definitely/not/here.png")).await;
        assert!(matches!(result, Err(StoreError::NotFound(_))));
        Ok(())
    }

    #[tokio::test]
    async fn remove_ignores_foreign_urls() -> Result<(), Box<dyn std::error::Error>> {
        let store_dir = tempfile::tempdir()?;
        let store = ImageStore::new(store_dir.path());
        store.remove("https://picsum.photos/800?random=1").await?;
        store.remove("file:///etc/hosts").await?;
        Ok(())
    }
}
