use serde::{Deserialize, Serialize};

use crate::api::dto::users::UserResponse;
use crate::api::extractors::Validate;

/// `login` is an email when it contains `@`, otherwise a user name.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub login: String,
    pub password: String,
}

impl Validate for LoginRequest {
    fn validate(&self) -> Result<(), &'static str> {
        if self.login.trim().is_empty() {
            return Err("login is required");
        }
        if self.password.is_empty() {
            return Err("password is required");
        }
        Ok(())
    }
}

#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub token: String,
    pub user: UserResponse,
}
