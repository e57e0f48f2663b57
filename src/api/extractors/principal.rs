use axum::extract::FromRequestParts;
use axum::http::request::Parts;

use crate::error::AppError;
use crate::middleware::auth::IdentityContext;
use crate::services::auth::Principal;

/// The authenticated caller.
/// Rejects with 401 `UNAUTHENTICATED` when the request carries no principal,
/// e.g. a handler mounted outside the auth pipeline.
#[derive(Debug, Clone)]
pub struct CurrentPrincipal(pub Principal);

impl<S> FromRequestParts<S> for CurrentPrincipal
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        principal_of(parts)
            .map(CurrentPrincipal)
            .ok_or(AppError::Unauthenticated)
    }
}

fn principal_of(parts: &Parts) -> Option<Principal> {
    parts
        .extensions
        .get::<IdentityContext>()
        .and_then(|ctx| ctx.current_principal().cloned())
}
