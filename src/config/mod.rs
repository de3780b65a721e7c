pub mod app_conf;
pub mod mongo_conf;
pub mod jwt_conf;
pub mod password_conf;
pub mod password_reset_conf;
pub mod email_conf;
pub mod geocoder_conf;
pub mod upload_conf;
pub mod admin_user_conf;

pub use app_conf::AppConfig;
pub use mongo_conf::MongoConfig;
pub use jwt_conf::JwtConfig;
pub use password_conf::PasswordConfig;
pub use password_reset_conf::PasswordResetConfig;
pub use email_conf::EmailConfig;
pub use geocoder_conf::GeocoderConfig;
pub use upload_conf::UploadConfig;
pub use admin_user_conf::AdminUserConfig;

/// Common configuration error type
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Environment variable not found: {0}")]
    EnvVarNotFound(String),
    
    #[error("Invalid configuration value: {0}")]
    InvalidValue(String),
    
    #[error("Validation error: {0}")]
    ValidationError(String),
}
