use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use thiserror::Error;

use tasklist_types::api::Claims;

#[derive(Debug, Error)]
pub enum TokenError {
    #[error("token has expired")]
    Expired,

    #[error("invalid token: {0}")]
    Invalid(jsonwebtoken::errors::Error),

    #[error("failed to sign token: {0}")]
    Sign(jsonwebtoken::errors::Error),
}

/// Issues and checks HS256 bearer tokens whose subject is a user id.
/// Holds no state besides the signing keys, so it is shared read-only
/// across requests.
pub struct TokenService {
    encoding: EncodingKey,
    decoding: DecodingKey,
    validation: Validation,
    ttl: Duration,
}

impl TokenService {
    pub fn new(secret: &str, ttl: Duration) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;

        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            validation,
            ttl,
        }
    }

    pub fn issue(&self, user_id: i64) -> Result<String, TokenError> {
        self.issue_at(user_id, Utc::now())
    }

    /// Signs a token as if it were issued at `now`.
    pub fn issue_at(&self, user_id: i64, now: DateTime<Utc>) -> Result<String, TokenError> {
        let claims = Claims {
            sub: user_id,
            iat: now.timestamp() as usize,
            exp: (now + self.ttl).timestamp() as usize,
        };

        encode(&Header::default(), &claims, &self.encoding).map_err(TokenError::Sign)
    }

    /// Verifies signature and expiry and returns the user id.
    pub fn parse(&self, token: &str) -> Result<i64, TokenError> {
        let data = decode::<Claims>(token, &self.decoding, &self.validation).map_err(|e| {
            match e.kind() {
                ErrorKind::ExpiredSignature => TokenError::Expired,
                _ => TokenError::Invalid(e),
            }
        })?;

        Ok(data.claims.sub)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn service() -> TokenService {
        TokenService::new("test-secret", Duration::hours(12))
    }

    #[test]
    fn issue_then_parse() {
        let tokens = service();
        let token = tokens.issue(42).unwrap();
        assert_eq!(tokens.parse(&token).unwrap(), 42);
    }

    #[test]
    fn expired_token_is_rejected() {
        let tokens = service();
        let token = tokens.issue_at(1, Utc::now() - Duration::hours(13)).unwrap();

        let err = tokens.parse(&token).unwrap_err();
        assert!(matches!(err, TokenError::Expired), "got {err:?}");
        assert_eq!(err.to_string(), "token has expired");
    }

    #[test]
    fn token_near_expiry_still_valid() {
        let tokens = service();
        let token = tokens.issue_at(7, Utc::now() - Duration::hours(11)).unwrap();
        assert_eq!(tokens.parse(&token).unwrap(), 7);
    }

    #[test]
    fn foreign_signature_is_rejected() {
        let other = TokenService::new("other-secret", Duration::hours(12));
        let token = other.issue(1).unwrap();

        assert!(matches!(service().parse(&token), Err(TokenError::Invalid(_))));
    }

    #[test]
    fn garbage_is_rejected() {
        let err = service().parse("not-a-jwt").unwrap_err();
        assert!(matches!(err, TokenError::Invalid(_)));
        assert!(err.to_string().starts_with("invalid token"));
    }
}
