pub mod guard;
pub mod password;

use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// JWT payload as issued at login/registration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub username: String,
    #[serde(default)]
    pub is_admin: bool,
    pub iat: i64,
    pub exp: i64,
}

/// Verified caller identity for the lifetime of one request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IdentityClaim {
    pub subject: String,
    pub is_admin: bool,
}

impl From<Claims> for IdentityClaim {
    fn from(claims: Claims) -> Self {
        Self {
            subject: claims.username,
            is_admin: claims.is_admin,
        }
    }
}

/// Why a credential or an authorization check failed. Every variant is
/// reported to clients as the same 401; the detail is for logs only.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum AuthError {
    #[error("missing bearer token")]
    MissingToken,

    #[error("invalid token: {0}")]
    InvalidToken(String),

    #[error("token subject '{subject}' does not own '{target}'")]
    NotOwner { subject: String, target: String },

    #[error("'{0}' is not an administrator")]
    NotAdministrator(String),
}

#[derive(Debug, Error)]
pub enum JwtError {
    #[error("JWT generation error: {0}")]
    TokenGeneration(String),

    #[error("Invalid JWT secret")]
    InvalidSecret,

    #[error("JWT expiry of {0} hours is out of range")]
    InvalidExpiry(u64),
}

/// Signing and verification keys derived from the server secret.
#[derive(Clone)]
pub struct JwtKeys {
    encoding: EncodingKey,
    decoding: DecodingKey,
    validation: Validation,
    expiry: Duration,
}

impl JwtKeys {
    pub fn new(secret: &str, expiry_hours: u64) -> Result<Self, JwtError> {
        if secret.is_empty() {
            return Err(JwtError::InvalidSecret);
        }
        let expiry = i64::try_from(expiry_hours)
            .ok()
            .and_then(Duration::try_hours)
            .ok_or(JwtError::InvalidExpiry(expiry_hours))?;
        Ok(Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            validation: Validation::new(Algorithm::HS256),
            expiry,
        })
    }

    pub fn issue(&self, username: &str, is_admin: bool) -> Result<String, JwtError> {
        let now = Utc::now();
        let claims = Claims {
            username: username.to_string(),
            is_admin,
            iat: now.timestamp(),
            exp: (now + self.expiry).timestamp(),
        };
        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding)
            .map_err(|e| JwtError::TokenGeneration(e.to_string()))
    }

    /// Checks signature, structure and expiry. Privileges come from the token
    /// as issued; storage is not consulted.
    pub fn verify(&self, token: &str) -> Result<IdentityClaim, AuthError> {
        if token.trim().is_empty() {
            return Err(AuthError::MissingToken);
        }
        decode::<Claims>(token, &self.decoding, &self.validation)
            .map(|data| IdentityClaim::from(data.claims))
            .map_err(|e| AuthError::InvalidToken(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn keys() -> JwtKeys {
        JwtKeys::new("test-secret", 1).unwrap()
    }

    fn sign(secret: &str, payload: serde_json::Value) -> String {
        encode(&Header::default(), &payload, &EncodingKey::from_secret(secret.as_bytes())).unwrap()
    }

    #[test]
    fn issued_token_verifies() {
        let keys = keys();
        let token = keys.issue("kenny1", true).unwrap();
        let claim = keys.verify(&token).unwrap();
        assert_eq!(claim, IdentityClaim { subject: "kenny1".into(), is_admin: true });
    }

    #[test]
    fn rejects_empty_secret() {
        assert!(matches!(JwtKeys::new("", 1), Err(JwtError::InvalidSecret)));
    }

    #[test]
    fn rejects_unrepresentable_expiry() {
        assert!(matches!(
            JwtKeys::new("test-secret", 10_000_000_000_000),
            Err(JwtError::InvalidExpiry(10_000_000_000_000))
        ));
        assert!(matches!(JwtKeys::new("test-secret", u64::MAX), Err(JwtError::InvalidExpiry(_))));
    }

    #[test]
    fn rejects_foreign_signature() {
        let exp = Utc::now().timestamp() + 3600;
        let token = sign("other-secret", json!({"username": "glenn", "is_admin": true, "iat": 0, "exp": exp}));
        assert!(matches!(keys().verify(&token), Err(AuthError::InvalidToken(_))));
    }

    #[test]
    fn rejects_garbage_and_blank() {
        assert!(matches!(keys().verify("not.a.jwt"), Err(AuthError::InvalidToken(_))));
        assert_eq!(keys().verify("  "), Err(AuthError::MissingToken));
    }

    #[test]
    fn rejects_expired_token() {
        let exp = Utc::now().timestamp() - 3600;
        let token = sign("test-secret", json!({"username": "glenn", "iat": exp - 10, "exp": exp}));
        assert!(matches!(keys().verify(&token), Err(AuthError::InvalidToken(_))));
    }

    #[test]
    fn rejects_token_without_subject() {
        let exp = Utc::now().timestamp() + 3600;
        let token = sign("test-secret", json!({"iat": 0, "exp": exp}));
        assert!(matches!(keys().verify(&token), Err(AuthError::InvalidToken(_))));
    }

    #[test]
    fn missing_admin_flag_means_not_admin() {
        let exp = Utc::now().timestamp() + 3600;
        let token = sign("test-secret", json!({"username": "glenn", "iat": 0, "exp": exp}));
        assert!(!keys().verify(&token).unwrap().is_admin);
    }
}
