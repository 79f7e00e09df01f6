//! HS256 token minting and verification.
//!
//! Signature handling lives here at the HTTP edge; the claims model and its
//! deterministic time-window checks live in `coffeedocket-auth`.

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use thiserror::Error;

use coffeedocket_auth::{validate_claims, JwtClaims, Role, TokenValidationError};
use coffeedocket_core::StaffId;

#[derive(Debug, Error)]
pub enum JwtError {
    #[error("malformed or badly signed token")]
    Decode(#[from] jsonwebtoken::errors::Error),

    #[error(transparent)]
    Claims(#[from] TokenValidationError),
}

pub struct Hs256Jwt {
    encoding: EncodingKey,
    decoding: DecodingKey,
}

impl Hs256Jwt {
    pub fn new(secret: &[u8]) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret),
            decoding: DecodingKey::from_secret(secret),
        }
    }

    pub fn mint(&self, staff_id: StaffId, role: Role, ttl: Duration) -> Result<String, JwtError> {
        let now = Utc::now();
        let claims = JwtClaims {
            sub: staff_id,
            role,
            issued_at: now,
            expires_at: now + ttl,
        };
        Ok(encode(&Header::new(Algorithm::HS256), &claims, &self.encoding)?)
    }

    /// Verify the signature, then the claim time window.
    pub fn verify(&self, token: &str, now: DateTime<Utc>) -> Result<JwtClaims, JwtError> {
        // The claims carry RFC 3339 timestamps rather than numeric exp/iat,
        // so the library's registered-claim checks are disabled and
        // `validate_claims` is the authority on the time window.
        let mut validation = Validation::new(Algorithm::HS256);
        validation.required_spec_claims.clear();
        validation.validate_exp = false;

        let data = decode::<JwtClaims>(token, &self.decoding, &validation)?;
        validate_claims(&data.claims, now)?;
        Ok(data.claims)
    }
}
