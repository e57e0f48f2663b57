/*
 * Responsibility
 * - request authentication / authorization pipeline
 *   policy → authentication → enforcement → diagnostic context → handler
 */
pub mod access;
pub mod authentication;
pub mod diagnostic;
pub mod identity;
pub mod policy;

pub use authentication::AuthenticationOutcome;
pub use diagnostic::DiagnosticContext;
pub use identity::IdentityContext;
pub use policy::{AuthorizationPolicy, RouteAccess, RouteRule};
