//! Static route allow-list.
//!
//! Rules are evaluated in order and the first match wins. A path that matches
//! no rule requires a resolved principal.
use axum::http::Method;

use crate::error::AppError;
use crate::middleware::auth::identity::IdentityContext;

/// Access requirement for one request, decided before authentication runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteAccess {
    Anonymous,
    Authenticated,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteRule {
    /// `None` matches any method.
    pub method: Option<Method>,
    /// Exact path, or a prefix ending in `/**`.
    pub path_pattern: &'static str,
    pub requires_auth: bool,
}

impl RouteRule {
    pub const fn permit(method: Method, path_pattern: &'static str) -> Self {
        Self {
            method: Some(method),
            path_pattern,
            requires_auth: false,
        }
    }

    pub fn matches(&self, method: &Method, path: &str) -> bool {
        if self.method.as_ref().is_some_and(|m| m != method) {
            return false;
        }

        let path = normalize(path);
        match self.path_pattern.strip_suffix("/**") {
            Some(prefix) => {
                path == prefix
                    || path
                        .strip_prefix(prefix)
                        .is_some_and(|rest| rest.starts_with('/'))
            }
            None => path == self.path_pattern,
        }
    }
}

// "/api/users/" and "/api/users" name the same resource
fn normalize(path: &str) -> &str {
    match path.strip_suffix('/') {
        Some(trimmed) if !trimmed.is_empty() => trimmed,
        _ => path,
    }
}

#[derive(Debug, Clone)]
pub struct AuthorizationPolicy {
    rules: Vec<RouteRule>,
}

impl Default for AuthorizationPolicy {
    fn default() -> Self {
        Self::new(vec![
            // registration
            RouteRule::permit(Method::POST, "/api/users"),
            RouteRule::permit(Method::POST, "/api/auth/login"),
        ])
    }
}

impl AuthorizationPolicy {
    pub fn new(rules: Vec<RouteRule>) -> Self {
        Self { rules }
    }

    pub fn rules(&self) -> &[RouteRule] {
        &self.rules
    }

    pub fn access_for(&self, method: &Method, path: &str) -> RouteAccess {
        let requires_auth = self
            .rules
            .iter()
            .find(|rule| rule.matches(method, path))
            .is_none_or(|rule| rule.requires_auth);

        if requires_auth {
            RouteAccess::Authenticated
        } else {
            RouteAccess::Anonymous
        }
    }

    /// Reject a protected request that reached this point without a principal.
    pub fn enforce(&self, access: RouteAccess, identity: &IdentityContext) -> Result<(), AppError> {
        match access {
            RouteAccess::Anonymous => Ok(()),
            RouteAccess::Authenticated if identity.current_principal().is_some() => Ok(()),
            RouteAccess::Authenticated => Err(AppError::Unauthenticated),
        }
    }
}
