//! Auth pipeline for every route.
//!
//! Stages, strictly in this order for one request:
//! 1. route access from the AuthorizationPolicy allow-list
//! 2. bearer authentication (invalid token → 401 `INVALID_JWT`, chain abandoned)
//! 3. enforcement (protected route, no principal → 401 `UNAUTHENTICATED`)
//! 4. diagnostic context around the handler
//!
//! Each stage is a plain function over the request parts and the request's
//! IdentityContext; this middleware only wires them together.

use axum::{
    Router,
    body::Body,
    extract::State,
    http::Request,
    middleware::{self, Next},
    response::Response,
};
use tracing::instrument;

use crate::error::AppError;
use crate::middleware::auth::{
    authentication::{authenticate, resolve_identity},
    diagnostic::{self, DiagnosticContext},
    identity::IdentityContext,
};
use crate::state::AppState;

/// Put the auth pipeline in front of every route of `router`.
///
/// ```ignore
/// let api = api::routes();
/// let api = middleware::auth::access::apply(api, state.clone());
/// ```
pub fn apply(router: Router<AppState>, state: AppState) -> Router<AppState> {
    // from_fn cannot take a State extractor; state is passed explicitly
    router.layer(middleware::from_fn_with_state(state, access_middleware))
}

#[instrument(skip_all, name = "auth.pipeline")]
async fn access_middleware(
    State(state): State<AppState>,
    mut req: Request<Body>,
    next: Next,
) -> Result<Response, AppError> {
    let method = req.method().clone();
    let path = req.uri().path().to_owned();

    let access = state.policy.access_for(&method, &path);

    let identity = IdentityContext::attach(req.extensions_mut());
    let outcome = authenticate(req.headers(), &state.tokens, state.clock.now());
    resolve_identity(outcome, &identity)?;

    state.policy.enforce(access, &identity).inspect_err(|_| {
        tracing::debug!(%method, %path, "protected route reached without credentials");
    })?;

    let ctx = DiagnosticContext::capture(&method, &path, &identity);
    Ok(diagnostic::scope(ctx, next.run(req)).await)
}
