//! HS256 bearer tokens
//!
//! The `sub` claim carries the user id that favorites and shares are
//! scoped to.

use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    pub exp: usize,
}

#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("missing bearer token")]
    Missing,

    #[error("invalid token: {0}")]
    Invalid(#[from] jsonwebtoken::errors::Error),

    #[error("token has no subject")]
    NoSubject,

    #[error("token lifetime out of range")]
    Lifetime,
}

/// Verifies tokens against one shared secret
#[derive(Clone)]
pub struct TokenVerifier {
    key: DecodingKey,
    validation: Validation,
}

impl TokenVerifier {
    pub fn new(secret: &str) -> Self {
        Self {
            key: DecodingKey::from_secret(secret.as_bytes()),
            validation: Validation::default(),
        }
    }

    /// Decode and check signature and expiry; returns the claims.
    pub fn verify(&self, token: &str) -> Result<Claims, AuthError> {
        let claims = decode::<Claims>(token, &self.key, &self.validation)?.claims;
        if claims.sub.trim().is_empty() {
            return Err(AuthError::NoSubject);
        }
        Ok(claims)
    }
}

/// Mint a token for `user_id` valid for `ttl`.
pub fn issue_token(secret: &str, user_id: &str, ttl: Duration) -> Result<String, AuthError> {
    if user_id.trim().is_empty() {
        return Err(AuthError::NoSubject);
    }
    let exp = Utc::now()
        .checked_add_signed(ttl)
        .ok_or(AuthError::Lifetime)?
        .timestamp();

    let claims = Claims {
        sub: user_id.to_owned(),
        exp: usize::try_from(exp).map_err(|_| AuthError::Lifetime)?,
    };
    Ok(encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )?)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "test-secret-0123456789";

    #[test]
    fn issued_token_verifies() {
        let token = issue_token(SECRET, "user-1", Duration::hours(1)).unwrap();
        let claims = TokenVerifier::new(SECRET).verify(&token).unwrap();
        assert_eq!(claims.sub, "user-1");
    }

    #[test]
    fn wrong_secret_rejected() {
        let token = issue_token(SECRET, "user-1", Duration::hours(1)).unwrap();
        let err = TokenVerifier::new("other-secret").verify(&token).unwrap_err();
        assert!(matches!(err, AuthError::Invalid(_)));
    }

    #[test]
    fn expired_token_rejected() {
        let token = issue_token(SECRET, "user-1", Duration::hours(-2)).unwrap();
        assert!(TokenVerifier::new(SECRET).verify(&token).is_err());
    }

    #[test]
    fn empty_subject_rejected() {
        assert!(matches!(
            issue_token(SECRET, "  ", Duration::hours(1)),
            Err(AuthError::NoSubject)
        ));
    }
}
