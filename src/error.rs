/*
 * Responsibility
 * - the app-wide AppError
 * - IntoResponse (HTTP status + JSON error body)
 * - single conversion point for repo / token / password errors
 */
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;

use crate::repos::error::RepoError;
use crate::services::auth::password::PasswordError;
use crate::services::auth::token_service::TokenError;

/// Wire shape of every error response.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub message: String,
    pub status: u16,
    pub error: &'static str,
}

#[derive(Debug, Error)]
pub enum AppError {
    /// Bearer token present but malformed, expired or badly signed.
    /// The three cases are deliberately indistinguishable to the caller.
    #[error("Invalid or malformed JWT token")]
    InvalidJwt,
    #[error("Authentication is required to access this resource")]
    Unauthenticated,
    #[error("Invalid login or password")]
    InvalidCredentials,
    #[error("{0}")]
    Validation(String),
    #[error("User with email {0} already exists")]
    UserAlreadyExists(String),
    #[error("User not found")]
    UserNotFound,
    #[error("Internal server error")]
    Internal,
}

impl AppError {
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    pub fn status(&self) -> StatusCode {
        match self {
            AppError::InvalidJwt | AppError::Unauthenticated | AppError::InvalidCredentials => {
                StatusCode::UNAUTHORIZED
            }
            AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::UserAlreadyExists(_) => StatusCode::CONFLICT,
            AppError::UserNotFound => StatusCode::NOT_FOUND,
            AppError::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            AppError::InvalidJwt => "INVALID_JWT",
            AppError::Unauthenticated => "UNAUTHENTICATED",
            AppError::InvalidCredentials => "INVALID_CREDENTIALS",
            AppError::Validation(_) => "VALIDATION_ERROR",
            AppError::UserAlreadyExists(_) => "USER_ALREADY_EXISTS",
            AppError::UserNotFound => "USER_NOT_FOUND",
            AppError::Internal => "INTERNAL_ERROR",
        }
    }

    pub fn to_body(&self) -> ErrorResponse {
        ErrorResponse {
            message: self.to_string(),
            status: self.status().as_u16(),
            error: self.code(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        (self.status(), Json(self.to_body())).into_response()
    }
}

impl From<RepoError> for AppError {
    fn from(e: RepoError) -> Self {
        match e {
            RepoError::Conflict { email } => AppError::UserAlreadyExists(email),
            RepoError::Db(e) => {
                tracing::error!(error = %e, "user repository failure");
                AppError::Internal
            }
        }
    }
}

impl From<TokenError> for AppError {
    fn from(e: TokenError) -> Self {
        tracing::error!(error = %e, "token service failure");
        AppError::Internal
    }
}

impl From<PasswordError> for AppError {
    fn from(e: PasswordError) -> Self {
        tracing::error!(error = %e, "password hashing failure");
        AppError::Internal
    }
}
