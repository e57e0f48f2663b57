/*
 * Responsibility
 * - per-request slot for the resolved Principal (or none)
 * - write-once: only the authentication stage sets it, at most once
 * - readers (handlers, diagnostic context) only see current_principal()
 *
 * Notes
 * - one IdentityContext is created per request and stored in the request
 *   extensions; clones share the same slot, other requests never do
 */
use std::sync::{Arc, OnceLock};

use axum::http::Extensions;

use crate::services::auth::Principal;

#[derive(Debug, Clone, Default)]
pub struct IdentityContext {
    slot: Arc<OnceLock<Principal>>,
}

impl IdentityContext {
    pub fn current_principal(&self) -> Option<&Principal> {
        self.slot.get()
    }

    pub fn is_authenticated(&self) -> bool {
        self.slot.get().is_some()
    }

    /// Returns `false` (and leaves the slot untouched) if a principal was
    /// already set for this request.
    pub(crate) fn establish(&self, principal: Principal) -> bool {
        self.slot.set(principal).is_ok()
    }

    /// The context already attached to this request, or a fresh one.
    pub(crate) fn attach(extensions: &mut Extensions) -> Self {
        if let Some(existing) = extensions.get::<IdentityContext>() {
            return existing.clone();
        }
        let ctx = IdentityContext::default();
        extensions.insert(ctx.clone());
        ctx
    }
}
