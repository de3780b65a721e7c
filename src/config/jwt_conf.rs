use std::env;
use tracing::{debug, error, info, warn};

use crate::config::ConfigError;

/// JWT configuration structure
#[derive(Debug, Clone)]
pub struct JwtConfig {
    /// JWT secret key for signing tokens
    pub jwt_secret: String,
    /// Session token lifetime in minutes
    pub token_expiration_minutes: i64,
    /// Lifetime of the `token` cookie in days
    pub cookie_expiration_days: i64,
    /// JWT issuer (optional)
    pub jwt_issuer: Option<String>,
}

impl JwtConfig {
    /// Load JWT configuration from environment variables
    ///
    /// Expected environment variables:
    /// - JWT_SECRET: Secret key for signing JWT tokens (required, >= 32 chars)
    /// - JWT_EXPIRE_MINUTES: Token lifetime in minutes (defaults to 43200 = 30 days)
    /// - JWT_COOKIE_EXPIRE_DAYS: Cookie lifetime in days (defaults to 30)
    /// - JWT_ISSUER: JWT issuer (optional)
    pub fn from_env() -> Result<Self, ConfigError> {
        info!("Loading JWT configuration from environment variables");

        let jwt_secret = env::var("JWT_SECRET")
            .map_err(|_| {
                error!("JWT_SECRET environment variable not found");
                ConfigError::EnvVarNotFound("JWT_SECRET".to_string())
            })?;
        debug!("JWT secret loaded (length: {} chars)", jwt_secret.len());

        let token_expiration_minutes = env::var("JWT_EXPIRE_MINUTES")
            .unwrap_or_else(|_| {
                warn!("JWT_EXPIRE_MINUTES not set, using default: 43200 minutes (30 days)");
                "43200".to_string()
            })
            .parse::<i64>()
            .map_err(|e| {
                error!("Invalid JWT_EXPIRE_MINUTES value: {}", e);
                ConfigError::InvalidValue(format!("JWT_EXPIRE_MINUTES: {}", e))
            })?;

        let cookie_expiration_days = env::var("JWT_COOKIE_EXPIRE_DAYS")
            .unwrap_or_else(|_| {
                warn!("JWT_COOKIE_EXPIRE_DAYS not set, using default: 30 days");
                "30".to_string()
            })
            .parse::<i64>()
            .map_err(|e| {
                error!("Invalid JWT_COOKIE_EXPIRE_DAYS value: {}", e);
                ConfigError::InvalidValue(format!("JWT_COOKIE_EXPIRE_DAYS: {}", e))
            })?;

        let jwt_issuer = env::var("JWT_ISSUER").ok();
        if let Some(ref issuer) = jwt_issuer {
            debug!("JWT issuer: {}", issuer);
        }

        let config = JwtConfig {
            jwt_secret,
            token_expiration_minutes,
            cookie_expiration_days,
            jwt_issuer,
        };

        config.validate()?;
        info!("JWT configuration loaded successfully");
        Ok(config)
    }

    /// Validate the JWT configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.jwt_secret.len() < 32 {
            error!("JWT secret is too short (minimum 32 characters required)");
            return Err(ConfigError::ValidationError("JWT secret must be at least 32 characters long".to_string()));
        }

        if self.token_expiration_minutes <= 0 {
            error!("Token expiration must be greater than 0");
            return Err(ConfigError::ValidationError("JWT_EXPIRE_MINUTES must be greater than 0".to_string()));
        }

        if self.cookie_expiration_days <= 0 {
            error!("Cookie expiration must be greater than 0");
            return Err(ConfigError::ValidationError("JWT_COOKIE_EXPIRE_DAYS must be greater than 0".to_string()));
        }

        Ok(())
    }
}

impl Default for JwtConfig {
    fn default() -> Self {
        JwtConfig {
            jwt_secret: "test_secret_key_for_jwt_testing_should_be_long_enough_for_security_purposes".to_string(),
            token_expiration_minutes: 60,
            cookie_expiration_days: 30,
            jwt_issuer: Some("devcamper-backend-test".to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert!(JwtConfig::default().validate().is_ok());
    }

    #[test]
    fn test_short_secret_rejected() {
        let config = JwtConfig { jwt_secret: "short".to_string(), ..JwtConfig::default() };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_non_positive_expiry_rejected() {
        let config = JwtConfig { token_expiration_minutes: 0, ..JwtConfig::default() };
        assert!(config.validate().is_err());
        let config = JwtConfig { cookie_expiration_days: -1, ..JwtConfig::default() };
        assert!(config.validate().is_err());
    }
}
