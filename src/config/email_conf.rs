use serde::{Deserialize, Serialize};
use std::env;
use tracing::{debug, error, info, warn};

use crate::config::ConfigError;

/// How the SMTP connection is secured
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SmtpSecurity {
    /// Plain connection (local catchers such as MailHog/Mailtrap)
    None,
    /// Upgrade with STARTTLS
    StartTls,
    /// Implicit TLS from the first byte
    Tls,
}

impl std::str::FromStr for SmtpSecurity {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "none" | "plain" => Ok(SmtpSecurity::None),
            "starttls" => Ok(SmtpSecurity::StartTls),
            "tls" | "ssl" => Ok(SmtpSecurity::Tls),
            other => Err(ConfigError::InvalidValue(format!("Unknown SMTP_SECURITY value: {}", other))),
        }
    }
}

/// Email configuration for SMTP settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmailConfig {
    pub smtp_host: String,
    pub smtp_port: u16,
    /// Empty username disables SMTP authentication
    pub smtp_username: String,
    pub smtp_password: String,
    pub security: SmtpSecurity,
    pub from_email: String,
    pub from_name: String,
    pub connection_timeout_secs: u64,
}

impl EmailConfig {
    /// Create EmailConfig from environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        info!("Loading email configuration from environment variables");

        let smtp_host = env::var("SMTP_HOST")
            .map_err(|_| {
                error!("SMTP_HOST environment variable not found");
                ConfigError::EnvVarNotFound("SMTP_HOST".to_string())
            })?;

        let smtp_port = env::var("SMTP_PORT")
            .unwrap_or_else(|_| {
                warn!("SMTP_PORT not set, defaulting to 587");
                "587".to_string()
            })
            .parse::<u16>()
            .map_err(|_| ConfigError::InvalidValue("Invalid SMTP_PORT value".to_string()))?;

        let smtp_username = env::var("SMTP_USERNAME").unwrap_or_default();
        let smtp_password = env::var("SMTP_PASSWORD").unwrap_or_default();
        debug!("SMTP username: {}, password: [REDACTED]", smtp_username);

        let security = env::var("SMTP_SECURITY")
            .unwrap_or_else(|_| {
                warn!("SMTP_SECURITY not set, defaulting to starttls");
                "starttls".to_string()
            })
            .parse::<SmtpSecurity>()?;

        let from_email = env::var("FROM_EMAIL")
            .map_err(|_| {
                error!("FROM_EMAIL environment variable not found");
                ConfigError::EnvVarNotFound("FROM_EMAIL".to_string())
            })?;

        let from_name = env::var("FROM_NAME").unwrap_or_else(|_| "DevCamper".to_string());

        let connection_timeout_secs = env::var("SMTP_CONNECTION_TIMEOUT")
            .ok()
            .and_then(|v| v.parse::<u64>().ok())
            .unwrap_or(30);

        let config = EmailConfig {
            smtp_host,
            smtp_port,
            smtp_username,
            smtp_password,
            security,
            from_email,
            from_name,
            connection_timeout_secs,
        };

        config.validate()?;
        info!("Email configuration loaded successfully");
        Ok(config)
    }

    /// Create EmailConfig for testing
    pub fn from_test_env() -> Self {
        EmailConfig {
            smtp_host: "localhost".to_string(),
            smtp_port: 1025,
            smtp_username: String::new(),
            smtp_password: String::new(),
            security: SmtpSecurity::None,
            from_email: "noreply@devcamper.io".to_string(),
            from_name: "DevCamper".to_string(),
            connection_timeout_secs: 10,
        }
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.smtp_host.is_empty() {
            error!("SMTP host is empty");
            return Err(ConfigError::ValidationError("SMTP host cannot be empty".to_string()));
        }

        if self.smtp_port == 0 {
            return Err(ConfigError::ValidationError("SMTP port cannot be 0".to_string()));
        }

        if self.smtp_username.is_empty() != self.smtp_password.is_empty() {
            return Err(ConfigError::ValidationError("SMTP_USERNAME and SMTP_PASSWORD must be set together".to_string()));
        }

        if !self.from_email.contains('@') {
            error!("Invalid from email format");
            return Err(ConfigError::ValidationError("Invalid from email format".to_string()));
        }

        if self.connection_timeout_secs == 0 {
            return Err(ConfigError::ValidationError("Connection timeout cannot be 0".to_string()));
        }

        Ok(())
    }

    pub fn has_credentials(&self) -> bool {
        !self.smtp_username.is_empty()
    }
}
