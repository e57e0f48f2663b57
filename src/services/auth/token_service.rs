//! Bearer token issuance and validation (HS256 JWT).
//!
//! `TokenService` is the only holder of the signing key. The key is 32 bytes
//! from the OS RNG, generated once at startup and never persisted, so every
//! restart invalidates all outstanding tokens.
//!
//! Validation is a pure function of the token and `now`:
//! 1. structural parse (three segments, JSON header, JSON claims) → `Malformed`
//! 2. HMAC-SHA256 signature check → `SignatureInvalid`
//! 3. `now < exp` → `Expired`
use base64::{Engine, engine::general_purpose::URL_SAFE_NO_PAD};
use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, errors::ErrorKind};
use serde::{Deserialize, Serialize, de::DeserializeOwned};
use thiserror::Error;
use tracing::error;

use crate::services::auth::Principal;

/// Fixed token lifetime; callers cannot choose their own.
pub const TOKEN_TTL_HOURS: i64 = 24;

/// Tokens above this size are rejected before any decoding.
pub const MAX_TOKEN_BYTES: usize = 8 * 1024;

const SIGNING_KEY_BYTES: usize = 32;

/// Signed payload of a bearer token.
///
/// `iat`/`exp` are absolute NumericDate values (seconds since the epoch).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// Email of the authenticated user.
    pub sub: String,
    #[serde(rename = "userId")]
    pub user_id: i64,
    pub name: String,
    pub iat: i64,
    pub exp: i64,
}

impl Claims {
    pub fn issued_at(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp(self.iat, 0)
    }

    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp(self.exp, 0)
    }

    pub fn principal(&self) -> Principal {
        Principal::new(self.user_id, self.sub.clone(), self.name.clone())
    }
}

/// Why a presented token was not accepted.
///
/// Only logged; at the HTTP boundary all three become `INVALID_JWT`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("token is malformed")]
    Malformed,
    #[error("token has expired")]
    Expired,
    #[error("token signature is invalid")]
    SignatureInvalid,
}

#[derive(Debug, Error)]
pub enum TokenError {
    #[error("signing key generation failed: {0}")]
    KeyGeneration(String),
    #[error("failed to sign token: {0}")]
    Signing(#[from] jsonwebtoken::errors::Error),
}

#[derive(Clone)]
pub struct TokenService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
}

impl std::fmt::Debug for TokenService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Do not print key material
        f.debug_struct("TokenService")
            .field("algorithm", &Algorithm::HS256)
            .field("ttl_hours", &TOKEN_TTL_HOURS)
            .finish()
    }
}

impl TokenService {
    /// Build a service with a fresh random signing key.
    pub fn generate() -> Result<Self, TokenError> {
        let mut secret = [0u8; SIGNING_KEY_BYTES];
        getrandom::fill(&mut secret).map_err(|e| {
            error!(error = %e, "failed to read signing key from OS RNG");
            TokenError::KeyGeneration(e.to_string())
        })?;

        Ok(Self::from_secret(&secret))
    }

    pub fn from_secret(secret: &[u8]) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        // Expiry is checked against the injected `now`, not the system clock.
        validation.validate_exp = false;
        validation.validate_nbf = false;
        validation.validate_aud = false;
        validation.leeway = 0;
        validation.set_required_spec_claims(&["exp", "iat", "sub"]);

        Self {
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
            validation,
        }
    }

    /// Issue a token for `principal`, valid from `now` for 24 hours.
    pub fn issue(&self, principal: &Principal, now: DateTime<Utc>) -> Result<String, TokenError> {
        let claims = Claims {
            sub: principal.email().to_string(),
            user_id: principal.user_id(),
            name: principal.display_name().to_string(),
            iat: now.timestamp(),
            exp: (now + Duration::hours(TOKEN_TTL_HOURS)).timestamp(),
        };

        let token = jsonwebtoken::encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)?;
        Ok(token)
    }

    /// Validate `token` at instant `now`. Consults no store.
    pub fn validate(&self, token: &str, now: DateTime<Utc>) -> Result<Claims, ValidationError> {
        let header = parse_structure(token)?;

        if header.alg != Algorithm::HS256 {
            return Err(ValidationError::SignatureInvalid);
        }

        let data = jsonwebtoken::decode::<Claims>(token, &self.decoding_key, &self.validation)
            .map_err(|e| classify(&e))?;

        if now.timestamp() >= data.claims.exp {
            return Err(ValidationError::Expired);
        }

        Ok(data.claims)
    }
}

/// Check the token decodes into `header.claims.signature` with the expected
/// header and claims shapes, without trusting anything yet.
fn parse_structure(token: &str) -> Result<Header, ValidationError> {
    if token.is_empty() || token.len() > MAX_TOKEN_BYTES {
        return Err(ValidationError::Malformed);
    }

    let mut parts = token.split('.');
    let (Some(header), Some(payload), Some(_signature), None) =
        (parts.next(), parts.next(), parts.next(), parts.next())
    else {
        return Err(ValidationError::Malformed);
    };

    let header: Header = decode_segment(header)?;
    let _claims: Claims = decode_segment(payload)?;

    Ok(header)
}

fn decode_segment<T: DeserializeOwned>(segment: &str) -> Result<T, ValidationError> {
    let bytes = URL_SAFE_NO_PAD
        .decode(segment)
        .map_err(|_| ValidationError::Malformed)?;
    serde_json::from_slice(&bytes).map_err(|_| ValidationError::Malformed)
}

// Structure was already checked, so anything else jsonwebtoken reports is
// about the signature segment or key.
fn classify(err: &jsonwebtoken::errors::Error) -> ValidationError {
    match err.kind() {
        ErrorKind::InvalidToken
        | ErrorKind::Json(_)
        | ErrorKind::Utf8(_)
        | ErrorKind::MissingRequiredClaim(_) => ValidationError::Malformed,
        ErrorKind::ExpiredSignature => ValidationError::Expired,
        _ => ValidationError::SignatureInvalid,
    }
}
