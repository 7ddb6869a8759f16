//! HS256 access tokens with a typed payload.
//!
//! The token carries only the user id and an absolute expiry. Expiry is checked here against
//! a caller-supplied `now` (not by jsonwebtoken) so the boundary is exact: a token is dead
//! at `now >= exp`.
use chrono::{DateTime, TimeDelta, TimeZone, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, errors::ErrorKind};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Wire payload of an access token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessClaims {
    #[serde(rename = "userID")]
    pub user_id: i64,
    // unix seconds
    pub exp: i64,
}

#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum TokenError {
    #[error("malformed token")]
    Malformed,
    #[error("token signature mismatch")]
    BadSignature,
    #[error("token expired")]
    Expired,
    #[error("failed to sign token")]
    Signing,
}

#[derive(Debug, Clone)]
pub struct IssuedToken {
    pub token: String,
    pub expires_at: DateTime<Utc>,
}

/// Result of a successful verification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VerifiedToken {
    pub user_id: i64,
    pub expires_at: DateTime<Utc>,
}

#[derive(Clone)]
pub struct JwtCodec {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    ttl_seconds: u64,
}

impl std::fmt::Debug for JwtCodec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Do not print key material
        f.debug_struct("JwtCodec")
            .field("ttl_seconds", &self.ttl_seconds)
            .finish()
    }
}

impl JwtCodec {
    pub fn new(secret: &str, ttl_seconds: u64) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = false;
        validation.validate_aud = false;
        validation.leeway = 0;
        validation.set_required_spec_claims(&["exp"]);

        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            validation,
            ttl_seconds,
        }
    }

    pub fn ttl_seconds(&self) -> u64 {
        self.ttl_seconds
    }

    pub fn issue(&self, user_id: i64, now: DateTime<Utc>) -> Result<IssuedToken, TokenError> {
        let expires_at = i64::try_from(self.ttl_seconds)
            .ok()
            .and_then(TimeDelta::try_seconds)
            .and_then(|ttl| now.checked_add_signed(ttl))
            .ok_or_else(|| {
                tracing::error!(ttl_seconds = self.ttl_seconds, "token ttl out of range");
                TokenError::Signing
            })?;
        let claims = AccessClaims {
            user_id,
            exp: expires_at.timestamp(),
        };

        let token = self.encode(&claims)?;
        Ok(IssuedToken { token, expires_at })
    }

    pub fn encode(&self, claims: &AccessClaims) -> Result<String, TokenError> {
        let mut header = Header::new(Algorithm::HS256);
        header.typ = Some("JWT".to_string());
        jsonwebtoken::encode(&header, claims, &self.encoding_key).map_err(|e| {
            tracing::error!(error = %e, "failed to sign JWT");
            TokenError::Signing
        })
    }

    /// Signature first, then payload shape, then expiry.
    pub fn verify(&self, token: &str, now: DateTime<Utc>) -> Result<VerifiedToken, TokenError> {
        let claims = self.decode(token)?;

        if now.timestamp() >= claims.exp {
            return Err(TokenError::Expired);
        }

        let expires_at = Utc
            .timestamp_opt(claims.exp, 0)
            .single()
            .ok_or(TokenError::Malformed)?;

        Ok(VerifiedToken {
            user_id: claims.user_id,
            expires_at,
        })
    }

    pub fn decode(&self, token: &str) -> Result<AccessClaims, TokenError> {
        jsonwebtoken::decode::<AccessClaims>(token, &self.decoding_key, &self.validation)
            .map(|data| data.claims)
            .map_err(|e| match e.kind() {
                ErrorKind::InvalidSignature => TokenError::BadSignature,
                _ => TokenError::Malformed,
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(secs: i64) -> DateTime<Utc> {
        Utc.timestamp_opt(secs, 0).single().unwrap()
    }

    const T0: i64 = 1_700_000_000;

    #[test]
    fn issued_token_expires_after_ttl() {
        let codec = JwtCodec::new("test-secret", 900);
        let issued = codec.issue(42, at(T0)).unwrap();

        assert_eq!(issued.expires_at, at(T0 + 900));
        let claims = codec.decode(&issued.token).unwrap();
        assert_eq!(claims, AccessClaims { user_id: 42, exp: T0 + 900 });
    }

    #[test]
    fn oversized_ttl_fails_instead_of_panicking() {
        for ttl in [10_000_000_000_000, u64::MAX] {
            let codec = JwtCodec::new("test-secret", ttl);
            assert_eq!(codec.issue(42, at(T0)).err(), Some(TokenError::Signing), "{ttl}");
        }
    }

    #[test]
    fn valid_until_the_expiry_instant() {
        let codec = JwtCodec::new("test-secret", 900);
        let issued = codec.issue(42, at(T0)).unwrap();

        let verified = codec.verify(&issued.token, at(T0 + 899)).unwrap();
        assert_eq!(verified.user_id, 42);
        assert_eq!(verified.expires_at, at(T0 + 900));

        assert_eq!(codec.verify(&issued.token, at(T0 + 900)), Err(TokenError::Expired));
        assert_eq!(codec.verify(&issued.token, at(T0 + 3600)), Err(TokenError::Expired));
    }

    #[test]
    fn other_secret_is_rejected_even_when_fresh_or_expired() {
        let issuer = JwtCodec::new("secret-a", 900);
        let verifier = JwtCodec::new("secret-b", 900);
        let issued = issuer.issue(42, at(T0)).unwrap();

        assert_eq!(verifier.verify(&issued.token, at(T0)), Err(TokenError::BadSignature));
        assert_eq!(
            verifier.verify(&issued.token, at(T0 + 10_000)),
            Err(TokenError::BadSignature)
        );
    }

    #[test]
    fn garbage_is_malformed() {
        let codec = JwtCodec::new("test-secret", 900);

        assert_eq!(codec.verify("", at(T0)), Err(TokenError::Malformed));
        assert_eq!(codec.verify("not.a.jwt", at(T0)), Err(TokenError::Malformed));
        assert_eq!(codec.verify("abc", at(T0)), Err(TokenError::Malformed));
    }

    #[test]
    fn payload_without_user_id_is_malformed() {
        let codec = JwtCodec::new("test-secret", 900);
        let token = jsonwebtoken::encode(
            &Header::new(Algorithm::HS256),
            &serde_json::json!({ "exp": T0 + 900 }),
            &EncodingKey::from_secret(b"test-secret"),
        )
        .unwrap();

        assert_eq!(codec.verify(&token, at(T0)), Err(TokenError::Malformed));
    }

    #[test]
    fn other_algorithms_are_rejected() {
        let codec = JwtCodec::new("test-secret", 900);
        let token = jsonwebtoken::encode(
            &Header::new(Algorithm::HS512),
            &AccessClaims { user_id: 42, exp: T0 + 900 },
            &EncodingKey::from_secret(b"test-secret"),
        )
        .unwrap();

        assert!(codec.verify(&token, at(T0)).is_err());
    }
}
