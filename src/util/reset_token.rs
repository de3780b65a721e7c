use chrono::{DateTime, Duration, Utc};
use rand::RngCore;
use sha2::{Digest, Sha256};
use tracing::debug;

use crate::config::PasswordResetConfig;

/// A freshly minted password reset token.
///
/// Only `hashed` and `expires_at` are persisted; `raw` travels to the user by
/// email and is never stored.
#[derive(Debug, Clone)]
pub struct ResetToken {
    pub raw: String,
    pub hashed: String,
    pub expires_at: DateTime<Utc>,
}

pub struct ResetTokenGenerator {
    config: PasswordResetConfig,
}

impl ResetTokenGenerator {
    pub fn new(config: PasswordResetConfig) -> Self {
        ResetTokenGenerator { config }
    }

    pub fn generate(&self) -> ResetToken {
        let mut bytes = vec![0u8; self.config.token_bytes];
        rand::thread_rng().fill_bytes(&mut bytes);
        let raw = hex::encode(bytes);
        debug!("Generated reset token of {} hex chars", raw.len());

        ResetToken {
            hashed: hash_token(&raw),
            raw,
            expires_at: Utc::now() + Duration::seconds(self.config.token_expiration_secs as i64),
        }
    }

    pub fn reset_url(&self, raw_token: &str) -> String {
        self.config.generate_reset_url(raw_token)
    }

    pub fn expiration_minutes(&self) -> u64 {
        self.config.token_expiration_secs / 60
    }
}

/// SHA-256 of the raw token, lowercase hex
pub fn hash_token(raw: &str) -> String {
    hex::encode(Sha256::digest(raw.as_bytes()))
}
