use async_trait::async_trait;
use std::path::PathBuf;
use tracing::{info, instrument, warn};

use crate::config::UploadConfig;

#[derive(Debug, thiserror::Error)]
pub enum PhotoStoreError {
    #[error("Invalid photo name: {0}")]
    InvalidName(String),
    #[error("Photo storage I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Storage for bootcamp photos
#[async_trait]
pub trait PhotoStore: Send + Sync {
    /// Writes `bytes` under `name`, replacing any previous photo of that name
    async fn save(&self, name: &str, bytes: &[u8]) -> Result<(), PhotoStoreError>;
    /// Removes `name`; a missing photo is not an error
    async fn delete(&self, name: &str) -> Result<(), PhotoStoreError>;
}

/// Photos kept in a local directory that the router serves under `/uploads`
pub struct LocalPhotoStore {
    root: PathBuf,
}

impl LocalPhotoStore {
    pub async fn new(config: &UploadConfig) -> Result<Self, PhotoStoreError> {
        tokio::fs::create_dir_all(&config.upload_dir).await?;
        info!("Photo uploads stored in {}", config.upload_dir.display());
        Ok(LocalPhotoStore { root: config.upload_dir.clone() })
    }

    fn path_for(&self, name: &str) -> Result<PathBuf, PhotoStoreError> {
        if name.is_empty() || name.contains(['/', '\\']) || name.starts_with('.') {
            return Err(PhotoStoreError::InvalidName(name.to_string()));
        }
        Ok(self.root.join(name))
    }
}

#[async_trait]
impl PhotoStore for LocalPhotoStore {
    #[instrument(skip(self, bytes), fields(size = bytes.len()))]
    async fn save(&self, name: &str, bytes: &[u8]) -> Result<(), PhotoStoreError> {
        let path = self.path_for(name)?;
        tokio::fs::write(&path, bytes).await?;
        info!("Stored photo {}", name);
        Ok(())
    }

    #[instrument(skip(self))]
    async fn delete(&self, name: &str) -> Result<(), PhotoStoreError> {
        let path = self.path_for(name)?;
        match tokio::fs::remove_file(&path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                warn!("Photo {} already absent", name);
                Ok(())
            }
            Err(e) => Err(e.into()),
        }
    }
}
