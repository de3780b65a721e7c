use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, errors::ErrorKind, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use tracing::{debug, error, info, warn};
use uuid::Uuid;

use crate::config::JwtConfig;

/// Session token claims
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    /// Subject (user id, hex ObjectId)
    pub sub: String,
    pub iat: i64,
    pub exp: i64,
    /// Token id
    pub jti: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub iss: Option<String>,
}

/// Error types for JWT operations
#[derive(Debug, thiserror::Error)]
pub enum JwtError {
    #[error("Failed to encode JWT token: {0}")]
    EncodingFailed(String),
    #[error("Failed to decode JWT token: {0}")]
    DecodingFailed(String),
    #[error("Token has expired")]
    TokenExpired,
    #[error("Invalid token format")]
    InvalidToken,
}

pub trait JwtTokenUtils {
    fn generate_token(&self, user_id: &str) -> Result<String, JwtError>;
    fn validate_token(&self, token: &str) -> Result<Claims, JwtError>;
    fn extract_token_from_header(&self, auth_header: &str) -> Result<String, JwtError>;
}

#[derive(Debug, Clone)]
pub struct JwtTokenUtilsImpl {
    pub jwt_config: JwtConfig,
}

impl JwtTokenUtilsImpl {
    pub fn new(jwt_config: JwtConfig) -> Self {
        JwtTokenUtilsImpl { jwt_config }
    }
}

impl JwtTokenUtils for JwtTokenUtilsImpl {
    fn generate_token(&self, user_id: &str) -> Result<String, JwtError> {
        debug!("Generating session token for user: {}", user_id);

        let now = Utc::now();
        let expiration = now + Duration::minutes(self.jwt_config.token_expiration_minutes);

        let claims = Claims {
            sub: user_id.to_string(),
            iat: now.timestamp(),
            exp: expiration.timestamp(),
            jti: Uuid::new_v4().to_string(),
            iss: self.jwt_config.jwt_issuer.clone(),
        };

        let header = Header::new(Algorithm::HS256);
        let encoding_key = EncodingKey::from_secret(self.jwt_config.jwt_secret.as_bytes());

        match encode(&header, &claims, &encoding_key) {
            Ok(token) => {
                info!("Successfully generated session token for user: {}", user_id);
                Ok(token)
            }
            Err(err) => {
                error!("Failed to encode JWT token: {}", err);
                Err(JwtError::EncodingFailed(err.to_string()))
            }
        }
    }

    fn validate_token(&self, token: &str) -> Result<Claims, JwtError> {
        debug!("Validating JWT token");

        let decoding_key = DecodingKey::from_secret(self.jwt_config.jwt_secret.as_bytes());
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;
        if let Some(issuer) = &self.jwt_config.jwt_issuer {
            validation.set_issuer(&[issuer]);
        }

        match decode::<Claims>(token, &decoding_key, &validation) {
            Ok(token_data) => {
                debug!("Token validation successful for user: {}", token_data.claims.sub);
                Ok(token_data.claims)
            }
            Err(err) if matches!(err.kind(), ErrorKind::ExpiredSignature) => {
                warn!("Token has expired");
                Err(JwtError::TokenExpired)
            }
            Err(err) => {
                warn!("Failed to decode JWT token: {}", err);
                Err(JwtError::DecodingFailed(err.to_string()))
            }
        }
    }

    fn extract_token_from_header(&self, auth_header: &str) -> Result<String, JwtError> {
        let token = auth_header
            .strip_prefix("Bearer ")
            .map(str::trim)
            .ok_or(JwtError::InvalidToken)?;

        if token.is_empty() {
            debug!("Empty token in authorization header");
            return Err(JwtError::InvalidToken);
        }

        Ok(token.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn utils() -> JwtTokenUtilsImpl {
        JwtTokenUtilsImpl::new(JwtConfig::default())
    }

    #[test]
    fn test_token_round_trips_user_id() {
        let utils = utils();
        let token = utils.generate_token("5d713995b721c3bb38c1f5d0").unwrap();
        let claims = utils.validate_token(&token).unwrap();
        assert_eq!(claims.sub, "5d713995b721c3bb38c1f5d0");
        assert!(claims.exp > claims.iat);
    }

    #[test]
    fn test_token_signed_with_other_secret_rejected() {
        let token = utils().generate_token("abc").unwrap();
        let other = JwtTokenUtilsImpl::new(JwtConfig {
            jwt_secret: "another_secret_key_that_is_definitely_long_enough".to_string(),
            ..JwtConfig::default()
        });
        assert!(matches!(other.validate_token(&token), Err(JwtError::DecodingFailed(_))));
    }

    #[test]
    fn test_expired_token_rejected() {
        let utils = JwtTokenUtilsImpl::new(JwtConfig {
            token_expiration_minutes: -5,
            ..JwtConfig::default()
        });
        let token = utils.generate_token("abc").unwrap();
        assert!(matches!(utils.validate_token(&token), Err(JwtError::TokenExpired)));
    }

    #[test]
    fn test_extract_token_from_header() {
        let utils = utils();
        assert_eq!(utils.extract_token_from_header("Bearer abc.def").unwrap(), "abc.def");
        assert!(utils.extract_token_from_header("Basic abc").is_err());
        assert!(utils.extract_token_from_header("Bearer   ").is_err());
    }
}
