use axum::{Json, extract::State};

use crate::{
    api::{
        dto::auth::{AuthResponse, LoginRequest},
        extractors::ValidJson,
    },
    error::AppError,
    state::AppState,
};

pub async fn login(
    State(state): State<AppState>,
    ValidJson(req): ValidJson<LoginRequest>,
) -> Result<Json<AuthResponse>, AppError> {
    let outcome = state
        .login
        .login(&req.login, &req.password, state.clock.now())
        .await?;

    Ok(Json(AuthResponse {
        token: outcome.token,
        user: outcome.user.into(),
    }))
}
