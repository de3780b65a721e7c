use std::env;
use serde::{Serialize, Deserialize};
use crate::config::ConfigError;

/// Credentials of the admin account seeded at startup
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdminUserConfig {
    pub name: String,
    pub email: String,
    pub password: String,
}

impl AdminUserConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        let var = |key: &str| env::var(key).map_err(|_| ConfigError::EnvVarNotFound(key.to_string()));
        Ok(AdminUserConfig {
            name: var("ADMIN_NAME")?,
            email: var("ADMIN_EMAIL")?,
            password: var("ADMIN_PASSWORD")?,
        })
    }
}
