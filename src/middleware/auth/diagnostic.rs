//! Request-scoped logging context.
//!
//! Once identity is resolved, the request runs inside:
//! - a `request` tracing span carrying `user_id`, `email`, `http.method` and
//!   `http.path`, so every event logged by the handler gets these fields;
//! - a task-local `DiagnosticContext`, readable through [`current`].
//!
//! Both are bound to the request future. They are gone once the future
//! completes, returns early, or unwinds, and are never visible to another
//! request.
use std::future::Future;

use axum::http::Method;
use tracing::{Instrument, Span, field};

use crate::middleware::auth::identity::IdentityContext;

tokio::task_local! {
    static DIAGNOSTIC_CONTEXT: DiagnosticContext;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiagnosticContext {
    pub user_id: Option<i64>,
    pub email: Option<String>,
    pub http_method: String,
    pub http_path: String,
}

impl DiagnosticContext {
    pub fn capture(method: &Method, path: &str, identity: &IdentityContext) -> Self {
        let principal = identity.current_principal();
        Self {
            user_id: principal.map(|p| p.user_id()),
            email: principal.map(|p| p.email().to_string()),
            http_method: method.to_string(),
            http_path: path.to_string(),
        }
    }

    fn span(&self) -> Span {
        let span = tracing::info_span!(
            "request",
            user_id = field::Empty,
            email = field::Empty,
            http.method = %self.http_method,
            http.path = %self.http_path,
        );
        if let Some(user_id) = self.user_id {
            span.record("user_id", user_id);
        }
        if let Some(email) = &self.email {
            span.record("email", email.as_str());
        }
        span
    }
}

/// The diagnostic context of the request currently being served, if any.
pub fn current() -> Option<DiagnosticContext> {
    DIAGNOSTIC_CONTEXT.try_with(|ctx| ctx.clone()).ok()
}

/// Run `fut` with `ctx` attached to logging; detached on every exit path.
pub async fn scope<F>(ctx: DiagnosticContext, fut: F) -> F::Output
where
    F: Future,
{
    let span = ctx.span();
    DIAGNOSTIC_CONTEXT.scope(ctx, fut.instrument(span)).await
}
