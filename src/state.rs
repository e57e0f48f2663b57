/*
 * Responsibility
 * - shared context bound to the Router (AppState)
 * - Clone is cheap (Arc inside)
 *
 * Nothing request-scoped lives here: identity and diagnostic context are
 * created per request by the auth pipeline.
 */
use std::sync::Arc;

use crate::middleware::auth::AuthorizationPolicy;
use crate::repos::UserRepo;
use crate::services::auth::{LoginService, PasswordHasher, TokenService};
use crate::services::clock::Clock;

#[derive(Clone)]
pub struct AppState {
    pub users: Arc<dyn UserRepo>,
    pub tokens: Arc<TokenService>,
    pub login: LoginService,
    pub hasher: PasswordHasher,
    pub policy: Arc<AuthorizationPolicy>,
    pub clock: Arc<dyn Clock>,
}

impl AppState {
    pub fn new(
        users: Arc<dyn UserRepo>,
        tokens: Arc<TokenService>,
        hasher: PasswordHasher,
        clock: Arc<dyn Clock>,
    ) -> Self {
        let login = LoginService::new(users.clone(), tokens.clone(), hasher);
        Self {
            users,
            tokens,
            login,
            hasher,
            policy: Arc::new(AuthorizationPolicy::default()),
            clock,
        }
    }
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("users", &self.users.backend_name())
            .field("tokens", &self.tokens)
            .field("policy", &self.policy)
            .finish()
    }
}
