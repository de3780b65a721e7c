use std::env;
use tracing::{debug, warn};

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    /// `development` or `production`; production marks the session cookie `Secure`
    pub environment: String,
}

impl AppConfig {
    pub fn from_env() -> Self {
        let host = env::var("APP_HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let port = env::var("APP_PORT")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or_else(|| {
                warn!("APP_PORT not set or invalid, using default: 5000");
                5000
            });
        let environment = env::var("APP_ENV").unwrap_or_else(|_| "development".to_string());
        debug!("App config: {}:{} ({})", host, port, environment);
        AppConfig { host, port, environment }
    }

    pub fn is_production(&self) -> bool {
        self.environment.eq_ignore_ascii_case("production")
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        AppConfig {
            host: "127.0.0.1".to_string(),
            port: 5000,
            environment: "development".to_string(),
        }
    }
}
