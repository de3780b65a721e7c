use serde::{Deserialize, Serialize};
use std::env;
use tracing::{debug, error, warn};

use crate::config::ConfigError;

/// Argon2 cost parameters used when hashing new passwords.
///
/// Verification reads the parameters embedded in each stored hash, so raising
/// the cost does not invalidate existing accounts.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PasswordConfig {
    /// Memory cost in KiB
    pub memory_kib: u32,
    /// Number of passes
    pub iterations: u32,
    /// Degree of parallelism
    pub parallelism: u32,
}

impl PasswordConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        let memory_kib = parse_var("PASSWORD_HASH_MEMORY_KIB", 19456)?;
        let iterations = parse_var("PASSWORD_HASH_ITERATIONS", 2)?;
        let parallelism = parse_var("PASSWORD_HASH_PARALLELISM", 1)?;
        let config = PasswordConfig { memory_kib, iterations, parallelism };
        config.validate()?;
        debug!("Password hashing config: {:?}", config);
        Ok(config)
    }

    /// Cheap parameters so test suites do not spend seconds hashing
    pub fn from_test_env() -> Self {
        PasswordConfig { memory_kib: 1024, iterations: 1, parallelism: 1 }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        // argon2 minimum memory is 8 KiB per lane
        if self.memory_kib < 8 * self.parallelism.max(1) {
            error!("Password hash memory cost too low");
            return Err(ConfigError::ValidationError("PASSWORD_HASH_MEMORY_KIB must be at least 8 * parallelism".to_string()));
        }
        if self.iterations == 0 {
            return Err(ConfigError::ValidationError("PASSWORD_HASH_ITERATIONS must be greater than 0".to_string()));
        }
        if self.parallelism == 0 {
            return Err(ConfigError::ValidationError("PASSWORD_HASH_PARALLELISM must be greater than 0".to_string()));
        }
        Ok(())
    }
}

fn parse_var(name: &str, default: u32) -> Result<u32, ConfigError> {
    match env::var(name) {
        Ok(raw) => raw.parse::<u32>().map_err(|_| {
            error!("Invalid {} value", name);
            ConfigError::InvalidValue(format!("Invalid {} value", name))
        }),
        Err(_) => {
            warn!("{} not set, using default: {}", name, default);
            Ok(default)
        }
    }
}

impl Default for PasswordConfig {
    fn default() -> Self {
        // argon2 crate defaults (OWASP recommendation)
        PasswordConfig { memory_kib: 19456, iterations: 2, parallelism: 1 }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_and_test_configs_are_valid() {
        assert!(PasswordConfig::default().validate().is_ok());
        assert!(PasswordConfig::from_test_env().validate().is_ok());
    }

    #[test]
    fn test_zero_iterations_rejected() {
        let config = PasswordConfig { iterations: 0, ..PasswordConfig::default() };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_memory_below_lane_minimum_rejected() {
        let config = PasswordConfig { memory_kib: 8, iterations: 1, parallelism: 2 };
        assert!(config.validate().is_err());
    }
}
