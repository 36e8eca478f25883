//! Remember-token codec: the signed cookie payload that recognizes a
//! returning browser without re-entering credentials.
//!
//! The token is an HS256 JWT carrying the user id and the salt the user
//! had when it was issued. It stays valid only while that salt matches
//! the stored one, so rotating the salt invalidates every outstanding
//! token for the account.

use chrono::{DateTime, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RememberClaims {
    /// Subject: the user id.
    pub sub: Uuid,
    /// The user's salt at issue time.
    pub salt: String,
    /// Issued at (unix timestamp).
    pub iat: i64,
    /// Expiration (unix timestamp).
    pub exp: i64,
}

pub struct TokenCodec {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    ttl_days: i64,
}

impl TokenCodec {
    pub fn new(secret: &str, ttl_days: i64) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            validation: Validation::new(Algorithm::HS256),
            ttl_days,
        }
    }

    pub fn ttl_seconds(&self) -> i64 {
        self.ttl_days * 24 * 60 * 60
    }

    /// Sign a remember token for the user.
    pub fn issue(
        &self,
        user_id: Uuid,
        salt: &str,
        now: DateTime<Utc>,
    ) -> Result<String, jsonwebtoken::errors::Error> {
        let claims = RememberClaims {
            sub: user_id,
            salt: salt.to_string(),
            iat: now.timestamp(),
            exp: now.timestamp() + self.ttl_seconds(),
        };
        encode(&Header::default(), &claims, &self.encoding_key)
    }

    /// Decode and verify a remember token. Forged, malformed or expired
    /// tokens yield None; recognition degrades silently to anonymous.
    pub fn decode(&self, token: &str) -> Option<RememberClaims> {
        decode::<RememberClaims>(token, &self.decoding_key, &self.validation)
            .map(|data| data.claims)
            .ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn codec() -> TokenCodec {
        TokenCodec::new("test-secret", 20 * 365)
    }

    #[test]
    fn issue_then_decode_round_trips() {
        let codec = codec();
        let id = Uuid::new_v4();
        let token = codec.issue(id, "somesalt", Utc::now()).unwrap();

        let claims = codec.decode(&token).unwrap();
        assert_eq!(claims.sub, id);
        assert_eq!(claims.salt, "somesalt");
    }

    #[test]
    fn wrong_secret_is_rejected() {
        let token = codec().issue(Uuid::new_v4(), "s", Utc::now()).unwrap();
        let other = TokenCodec::new("other-secret", 20 * 365);
        assert!(other.decode(&token).is_none());
    }

    #[test]
    fn garbage_is_rejected() {
        assert!(codec().decode("not-a-token").is_none());
        assert!(codec().decode("").is_none());
    }

    #[test]
    fn expired_token_is_rejected() {
        let codec = codec();
        let issued = Utc::now() - chrono::Duration::days(2 * 20 * 365);
        let token = codec.issue(Uuid::new_v4(), "s", issued).unwrap();
        assert!(codec.decode(&token).is_none());
    }

    #[test]
    fn ttl_covers_twenty_years() {
        assert_eq!(codec().ttl_seconds(), 20 * 365 * 24 * 60 * 60);
    }
}
