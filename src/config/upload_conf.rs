use serde::{Deserialize, Serialize};
use std::env;
use std::path::PathBuf;
use tracing::warn;

use crate::config::ConfigError;

/// Where uploaded bootcamp photos live and how large they may be
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UploadConfig {
    /// Directory photos are written to and served from under `/uploads`
    pub upload_dir: PathBuf,
    /// Maximum accepted photo size in bytes
    pub max_file_bytes: usize,
}

impl UploadConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        let upload_dir = env::var("FILE_UPLOAD_PATH")
            .map(PathBuf::from)
            .unwrap_or_else(|_| {
                warn!("FILE_UPLOAD_PATH not set, defaulting to ./public/uploads");
                PathBuf::from("./public/uploads")
            });

        let max_file_bytes = match env::var("MAX_FILE_UPLOAD") {
            Ok(raw) => raw
                .parse::<usize>()
                .map_err(|_| ConfigError::InvalidValue("Invalid MAX_FILE_UPLOAD value".to_string()))?,
            Err(_) => 1_000_000,
        };

        let config = UploadConfig { upload_dir, max_file_bytes };
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_file_bytes == 0 {
            return Err(ConfigError::ValidationError("MAX_FILE_UPLOAD must be greater than 0".to_string()));
        }
        Ok(())
    }
}

impl Default for UploadConfig {
    fn default() -> Self {
        UploadConfig {
            upload_dir: PathBuf::from("./public/uploads"),
            max_file_bytes: 1_000_000,
        }
    }
}
