use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::{debug, info};

use crate::error::AppError;
use crate::repos::{UserRecord, UserRepo};
use crate::services::auth::{Principal, TokenService, password::PasswordHasher};

/// Result of a successful login.
#[derive(Debug, Clone)]
pub struct LoginOutcome {
    pub token: String,
    pub user: UserRecord,
}

/// Credential check + token issuance.
///
/// - `login` containing `@` is looked up as an email, anything else as a name.
///   Names are not unique; the first account whose password matches wins.
/// - unknown login and wrong password fail identically (`InvalidCredentials`).
/// - a token is issued only after the credential check succeeds.
#[derive(Clone)]
pub struct LoginService {
    users: Arc<dyn UserRepo>,
    tokens: Arc<TokenService>,
    hasher: PasswordHasher,
}

impl LoginService {
    pub fn new(users: Arc<dyn UserRepo>, tokens: Arc<TokenService>, hasher: PasswordHasher) -> Self {
        Self {
            users,
            tokens,
            hasher,
        }
    }

    pub async fn login(
        &self,
        login: &str,
        password: &str,
        now: DateTime<Utc>,
    ) -> Result<LoginOutcome, AppError> {
        let login = login.trim();

        let candidates: Vec<UserRecord> = if login.contains('@') {
            self.users.find_by_email(login).await?.into_iter().collect()
        } else {
            self.users.find_all_by_name(login).await?
        };

        let user = self.first_match(password, candidates).await?.ok_or_else(|| {
            debug!("login rejected");
            AppError::InvalidCredentials
        })?;

        let principal = Principal::new(user.id, user.email.clone(), user.name.clone());
        let token = self.tokens.issue(&principal, now)?;

        info!(user_id = user.id, "login succeeded");

        Ok(LoginOutcome { token, user })
    }

    async fn first_match(
        &self,
        password: &str,
        candidates: Vec<UserRecord>,
    ) -> Result<Option<UserRecord>, AppError> {
        if candidates.is_empty() {
            // unknown login: pay for one hash anyway
            self.hasher.verify(password, None).await?;
            return Ok(None);
        }

        for user in candidates {
            if self.hasher.verify(password, Some(&user.password_hash)).await? {
                return Ok(Some(user));
            }
        }
        Ok(None)
    }
}
