use serde::{Deserialize, Serialize};
use std::env;
use tracing::{debug, error, info, warn};

use crate::config::ConfigError;

/// Configuration for password reset functionality
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PasswordResetConfig {
    /// Base URL the reset link points at (scheme + host)
    pub reset_url_base: String,
    /// Path of the reset endpoint; the raw token is appended as the last segment
    pub reset_path: String,
    /// Token expiration time in seconds
    pub token_expiration_secs: u64,
    /// Number of random bytes in a raw token (hex encoded, so twice as many characters)
    pub token_bytes: usize,
}

impl PasswordResetConfig {
    /// Create PasswordResetConfig from environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        info!("Loading password reset configuration from environment variables");

        let reset_url_base = env::var("RESET_URL_BASE")
            .unwrap_or_else(|_| {
                warn!("RESET_URL_BASE not set, defaulting to http://localhost:5000");
                "http://localhost:5000".to_string()
            });
        debug!("Reset URL base: {}", reset_url_base);

        let reset_path = env::var("RESET_PASSWORD_PATH")
            .unwrap_or_else(|_| {
                warn!("RESET_PASSWORD_PATH not set, defaulting to /api/v1/auth/resetpassword");
                "/api/v1/auth/resetpassword".to_string()
            });

        let token_expiration_secs = env::var("RESET_TOKEN_EXPIRATION")
            .unwrap_or_else(|_| {
                warn!("RESET_TOKEN_EXPIRATION not set, defaulting to 600 seconds (10 minutes)");
                "600".to_string()
            })
            .parse::<u64>()
            .map_err(|_| {
                error!("Invalid RESET_TOKEN_EXPIRATION value");
                ConfigError::InvalidValue("Invalid RESET_TOKEN_EXPIRATION value".to_string())
            })?;

        let token_bytes = env::var("RESET_TOKEN_BYTES")
            .unwrap_or_else(|_| "20".to_string())
            .parse::<usize>()
            .map_err(|_| {
                error!("Invalid RESET_TOKEN_BYTES value");
                ConfigError::InvalidValue("Invalid RESET_TOKEN_BYTES value".to_string())
            })?;

        let config = PasswordResetConfig {
            reset_url_base,
            reset_path,
            token_expiration_secs,
            token_bytes,
        };

        config.validate()?;
        info!("Password reset configuration loaded successfully");
        Ok(config)
    }

    /// Create PasswordResetConfig for testing
    pub fn from_test_env() -> Self {
        PasswordResetConfig {
            reset_url_base: "http://localhost:5000".to_string(),
            reset_path: "/api/v1/auth/resetpassword".to_string(),
            token_expiration_secs: 600,
            token_bytes: 20,
        }
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.reset_url_base.starts_with("http://") && !self.reset_url_base.starts_with("https://") {
            error!("Reset URL base must start with http:// or https://");
            return Err(ConfigError::ValidationError("Reset URL base must start with http:// or https://".to_string()));
        }

        if !self.reset_path.starts_with('/') {
            error!("Reset path must start with /");
            return Err(ConfigError::ValidationError("Reset path must start with /".to_string()));
        }

        if self.token_expiration_secs == 0 {
            error!("Token expiration is 0");
            return Err(ConfigError::ValidationError("Token expiration cannot be 0".to_string()));
        }

        if self.token_bytes < 16 {
            error!("Token byte length is too short");
            return Err(ConfigError::ValidationError("Reset tokens need at least 16 random bytes".to_string()));
        }

        Ok(())
    }

    /// Generate the complete reset URL with token
    pub fn generate_reset_url(&self, token: &str) -> String {
        let base_url = self.reset_url_base.trim_end_matches('/');
        let path = self.reset_path.trim_matches('/');
        format!("{}/{}/{}", base_url, path, token)
    }
}

impl Default for PasswordResetConfig {
    fn default() -> Self {
        PasswordResetConfig::from_test_env()
    }
}
