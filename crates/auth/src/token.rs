//! Bearer Tokens

use crate::AuthError;
use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Token claims
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// User id
    pub sub: i64,
    pub email: String,
    /// Issued-at (unix seconds)
    pub iat: i64,
    /// Expiry (unix seconds)
    pub exp: i64,
}

/// Issues and validates HS256 tokens with a shared secret
#[derive(Clone)]
pub struct TokenIssuer {
    encoding: EncodingKey,
    decoding: DecodingKey,
    ttl: Duration,
}

impl TokenIssuer {
    /// Create an issuer. A lifetime that `chrono` cannot represent is a
    /// configuration error.
    pub fn new(secret: &[u8], ttl_secs: u64) -> Result<Self, AuthError> {
        let ttl = i64::try_from(ttl_secs)
            .ok()
            .and_then(Duration::try_seconds)
            .ok_or_else(|| {
                AuthError::InvalidConfig(format!("token lifetime {}s is too large", ttl_secs))
            })?;

        Ok(Self {
            encoding: EncodingKey::from_secret(secret),
            decoding: DecodingKey::from_secret(secret),
            ttl,
        })
    }

    /// Issue a token for a user, valid from now
    pub fn issue(&self, user_id: i64, email: &str) -> Result<String, AuthError> {
        self.issue_at(user_id, email, Utc::now())
    }

    /// Issue a token as if the current time were `now`
    pub fn issue_at(
        &self,
        user_id: i64,
        email: &str,
        now: DateTime<Utc>,
    ) -> Result<String, AuthError> {
        let expires = now.checked_add_signed(self.ttl).ok_or_else(|| {
            AuthError::InvalidConfig("token expiry is past the supported date range".to_string())
        })?;
        let claims = Claims {
            sub: user_id,
            email: email.to_string(),
            iat: now.timestamp(),
            exp: expires.timestamp(),
        };
        jsonwebtoken::encode(&Header::new(Algorithm::HS256), &claims, &self.encoding)
            .map_err(|e| AuthError::InvalidToken(e.to_string()))
    }

    /// Verify signature and expiry, returning the claims
    pub fn validate(&self, token: &str) -> Result<Claims, AuthError> {
        let validation = Validation::new(Algorithm::HS256);
        jsonwebtoken::decode::<Claims>(token, &self.decoding, &validation)
            .map(|data| data.claims)
            .map_err(|e| {
                debug!("Token rejected: {}", e);
                match e.kind() {
                    ErrorKind::ExpiredSignature => AuthError::Expired,
                    _ => AuthError::InvalidToken(e.to_string()),
                }
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn issuer() -> TokenIssuer {
        TokenIssuer::new(b"test-secret", 3600).unwrap()
    }

    #[test]
    fn test_issue_and_validate() {
        let issuer = issuer();
        let token = issuer.issue(42, "a@example.com").unwrap();
        let claims = issuer.validate(&token).unwrap();
        assert_eq!(claims.sub, 42);
        assert_eq!(claims.email, "a@example.com");
        assert_eq!(claims.exp - claims.iat, 3600);
    }

    #[test]
    fn test_expired_token() {
        let issuer = issuer();
        let token = issuer
            .issue_at(1, "a@example.com", Utc::now() - Duration::days(1))
            .unwrap();
        assert_eq!(issuer.validate(&token), Err(AuthError::Expired));
    }

    #[test]
    fn test_wrong_secret() {
        let token = issuer().issue(1, "a@example.com").unwrap();
        let other = TokenIssuer::new(b"other-secret", 3600).unwrap();
        assert!(matches!(other.validate(&token), Err(AuthError::InvalidToken(_))));
    }

    #[test]
    fn test_garbage_token() {
        assert!(matches!(
            issuer().validate("not.a.jwt"),
            Err(AuthError::InvalidToken(_))
        ));
    }

    #[test]
    fn test_unrepresentable_lifetime_is_rejected() {
        for ttl in [u64::MAX, i64::MAX as u64, i64::MAX as u64 / 1000 + 1] {
            assert!(
                matches!(TokenIssuer::new(b"s", ttl), Err(AuthError::InvalidConfig(_))),
                "{}",
                ttl
            );
        }
    }

    #[test]
    fn test_expiry_overflow_is_an_error() {
        // Representable lifetime, but now + ttl runs past chrono's range
        let issuer = TokenIssuer::new(b"s", 300_000 * 365 * 24 * 3600).unwrap();
        assert!(matches!(
            issuer.issue(1, "a@example.com"),
            Err(AuthError::InvalidConfig(_))
        ));
    }
}
