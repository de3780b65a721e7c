use serde::{Deserialize, Serialize};
use std::env;
use tracing::{error, info, warn};

use crate::config::ConfigError;

/// Settings for the MapQuest geocoding API
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeocoderConfig {
    /// API root, e.g. `https://www.mapquestapi.com`
    pub base_url: String,
    pub api_key: String,
    pub timeout_secs: u64,
}

impl GeocoderConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        info!("Loading geocoder configuration from environment variables");

        let base_url = env::var("GEOCODER_BASE_URL").unwrap_or_else(|_| {
            warn!("GEOCODER_BASE_URL not set, defaulting to https://www.mapquestapi.com");
            "https://www.mapquestapi.com".to_string()
        });

        let api_key = env::var("GEOCODER_API_KEY").map_err(|_| {
            error!("GEOCODER_API_KEY environment variable not found");
            ConfigError::EnvVarNotFound("GEOCODER_API_KEY".to_string())
        })?;

        let timeout_secs = env::var("GEOCODER_TIMEOUT")
            .ok()
            .and_then(|v| v.parse::<u64>().ok())
            .unwrap_or(10);

        let config = GeocoderConfig { base_url, api_key, timeout_secs };
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.base_url.starts_with("http://") && !self.base_url.starts_with("https://") {
            return Err(ConfigError::ValidationError("GEOCODER_BASE_URL must start with http:// or https://".to_string()));
        }
        if self.api_key.is_empty() {
            return Err(ConfigError::ValidationError("GEOCODER_API_KEY cannot be empty".to_string()));
        }
        if self.timeout_secs == 0 {
            return Err(ConfigError::ValidationError("GEOCODER_TIMEOUT must be greater than 0".to_string()));
        }
        Ok(())
    }

    /// Full URL of the forward-geocoding endpoint
    pub fn address_endpoint(&self) -> String {
        format!("{}/geocoding/v1/address", self.base_url.trim_end_matches('/'))
    }
}
