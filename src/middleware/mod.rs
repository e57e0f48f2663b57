/*
 * Responsibility
 * - middleware public interface
 * - auth pipeline, cors, http-level layers, security headers
 */
pub mod auth;
pub mod cors;
pub mod http;
pub mod security_headers;
