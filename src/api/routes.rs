/*
 * Responsibility
 * - URL layout of /api
 * - which routes are public is decided by AuthorizationPolicy, not here
 */
use axum::{
    Router,
    routing::{get, post},
};

use crate::api::handlers::{
    auth::login,
    users::{create_user, me},
};
use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/api/users", post(create_user))
        .route("/api/users/me", get(me))
        .route("/api/auth/login", post(login))
}
