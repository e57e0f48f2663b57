//! Bearer token → identity.
//!
//! - no `Authorization` header, or not `Bearer <token>` → anonymous (not an error)
//! - token present but invalid (including non-UTF-8 bytes) → terminal 401 `INVALID_JWT`
//! - token valid → principal written into the request's IdentityContext,
//!   unless one is already there (re-entry never overwrites)
use axum::http::{HeaderMap, header};
use chrono::{DateTime, Utc};
use tracing::{debug, warn};

use crate::error::AppError;
use crate::middleware::auth::identity::IdentityContext;
use crate::services::auth::{Principal, TokenService, ValidationError};

const BEARER_PREFIX: &str = "Bearer ";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthenticationOutcome {
    Anonymous,
    Authenticated(Principal),
    Rejected(ValidationError),
}

/// Raw bytes after `Bearer `. The prefix is matched on bytes so a token with
/// non-ASCII bytes still counts as a presented bearer token.
pub fn bearer_token(headers: &HeaderMap) -> Option<&[u8]> {
    headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.as_bytes().strip_prefix(BEARER_PREFIX.as_bytes()))
}

pub fn authenticate(
    headers: &HeaderMap,
    tokens: &TokenService,
    now: DateTime<Utc>,
) -> AuthenticationOutcome {
    let Some(raw) = bearer_token(headers) else {
        return AuthenticationOutcome::Anonymous;
    };
    let Ok(token) = std::str::from_utf8(raw) else {
        return AuthenticationOutcome::Rejected(ValidationError::Malformed);
    };

    match tokens.validate(token, now) {
        Ok(claims) => AuthenticationOutcome::Authenticated(claims.principal()),
        Err(reason) => AuthenticationOutcome::Rejected(reason),
    }
}

/// Apply an outcome to the request's identity slot.
///
/// `Err` is a terminal response: the caller must stop the request there.
pub fn resolve_identity(
    outcome: AuthenticationOutcome,
    identity: &IdentityContext,
) -> Result<(), AppError> {
    match outcome {
        AuthenticationOutcome::Anonymous => Ok(()),
        AuthenticationOutcome::Authenticated(principal) => {
            let user_id = principal.user_id();
            if !identity.establish(principal) {
                debug!(user_id, "identity already resolved for this request; keeping it");
            }
            Ok(())
        }
        AuthenticationOutcome::Rejected(reason) => {
            warn!(reason = %reason, "bearer token rejected");
            Err(AppError::InvalidJwt)
        }
    }
}
