//! Password hashing and verification
//!
//! Argon2id with cost parameters from [`PasswordConfig`]. Verification reads
//! the parameters embedded in the stored PHC string.

use argon2::{
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Algorithm, Argon2, Params, Version,
};
use rand::rngs::OsRng;
use tracing::{debug, error};

use crate::config::PasswordConfig;

/// Error types for password operations
#[derive(Debug, thiserror::Error)]
pub enum PasswordError {
    #[error("Failed to hash password: {0}")]
    HashingFailed(String),
    #[error("Failed to verify password: {0}")]
    VerificationFailed(String),
    #[error("Invalid password hash format")]
    InvalidHashFormat,
    #[error("Invalid hashing parameters: {0}")]
    InvalidParams(String),
}

pub trait PasswordUtils: Send + Sync {
    /// Hashes the given password using Argon2id
    fn hash_password(&self, password: &str) -> Result<String, PasswordError>;

    /// Verifies the given password against the stored hash
    fn verify_password(&self, password: &str, hash: &str) -> Result<bool, PasswordError>;

    /// Runs a verification against a throwaway hash so that a lookup miss
    /// costs the same as a wrong password
    fn verify_dummy(&self, password: &str);
}

pub struct PasswordUtilsImpl {
    argon2: Argon2<'static>,
    dummy_hash: String,
}

impl PasswordUtilsImpl {
    pub fn new(config: &PasswordConfig) -> Result<Self, PasswordError> {
        let params = Params::new(config.memory_kib, config.iterations, config.parallelism, None)
            .map_err(|e| PasswordError::InvalidParams(e.to_string()))?;
        let argon2 = Argon2::new(Algorithm::Argon2id, Version::V0x13, params);

        let salt = SaltString::generate(&mut OsRng);
        let dummy_hash = argon2
            .hash_password(b"dummy-password-for-timing", &salt)
            .map_err(|e| PasswordError::HashingFailed(e.to_string()))?
            .to_string();

        Ok(PasswordUtilsImpl { argon2, dummy_hash })
    }
}

impl PasswordUtils for PasswordUtilsImpl {
    fn hash_password(&self, password: &str) -> Result<String, PasswordError> {
        debug!("Hashing password");
        let salt = SaltString::generate(&mut OsRng);

        self.argon2
            .hash_password(password.as_bytes(), &salt)
            .map(|hash| hash.to_string())
            .map_err(|err| {
                error!("Failed to hash password: {}", err);
                PasswordError::HashingFailed(err.to_string())
            })
    }

    fn verify_password(&self, password: &str, hash: &str) -> Result<bool, PasswordError> {
        let parsed_hash = PasswordHash::new(hash).map_err(|err| {
            error!("Invalid password hash format: {}", err);
            PasswordError::InvalidHashFormat
        })?;

        match self.argon2.verify_password(password.as_bytes(), &parsed_hash) {
            Ok(()) => Ok(true),
            Err(argon2::password_hash::Error::Password) => {
                debug!("Password verification failed - invalid password");
                Ok(false)
            }
            Err(err) => {
                error!("Password verification error: {}", err);
                Err(PasswordError::VerificationFailed(err.to_string()))
            }
        }
    }

    fn verify_dummy(&self, password: &str) {
        let _ = self.verify_password(password, &self.dummy_hash);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn utils() -> PasswordUtilsImpl {
        PasswordUtilsImpl::new(&PasswordConfig::from_test_env()).unwrap()
    }

    #[test]
    fn test_hash_is_not_plaintext_and_verifies() {
        let utils = utils();
        let hash = utils.hash_password("123456").unwrap();
        assert_ne!(hash, "123456");
        assert!(hash.starts_with("$argon2id$"));
        assert!(utils.verify_password("123456", &hash).unwrap());
        assert!(!utils.verify_password("654321", &hash).unwrap());
    }

    #[test]
    fn test_same_password_different_salts() {
        let utils = utils();
        let a = utils.hash_password("secret1").unwrap();
        let b = utils.hash_password("secret1").unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn test_garbage_hash_is_an_error() {
        assert!(matches!(
            utils().verify_password("pw", "not-a-phc-string"),
            Err(PasswordError::InvalidHashFormat)
        ));
    }
}
