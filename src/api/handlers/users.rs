/*
 * Responsibility
 * - /api/users handlers: registration (public) and the caller's own record
 */
use axum::{
    Json,
    extract::State,
    http::{StatusCode, header},
    response::{IntoResponse, Response},
};
use tracing::info;

use crate::{
    api::{
        dto::users::{CreateUserRequest, UserResponse},
        extractors::{CurrentPrincipal, ValidJson},
    },
    error::AppError,
    repos::NewUser,
    state::AppState,
};

pub async fn create_user(
    State(state): State<AppState>,
    ValidJson(req): ValidJson<CreateUserRequest>,
) -> Result<Response, AppError> {
    let password_hash = state.hasher.hash(&req.password).await?;

    let row = state
        .users
        .create(NewUser {
            name: req.name.trim().to_string(),
            age: req.age,
            email: req.email.trim().to_string(),
            password_hash,
        })
        .await?;

    info!(user_id = row.id, "user registered");

    let location = format!("/api/users/{}", row.id);
    Ok((
        StatusCode::CREATED,
        [(header::LOCATION, location)],
        Json(UserResponse::from(row)),
    )
        .into_response())
}

pub async fn me(
    State(state): State<AppState>,
    CurrentPrincipal(principal): CurrentPrincipal,
) -> Result<Json<UserResponse>, AppError> {
    let row = state
        .users
        .find_by_id(principal.user_id())
        .await?
        .ok_or(AppError::UserNotFound)?;

    Ok(Json(row.into()))
}
