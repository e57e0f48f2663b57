//! CORS policy for the browser front-end.
//!
//! - Development: any origin, no credentials.
//! - Production: exact-match allow-list from `CORS_ALLOWED_ORIGINS`. An empty
//!   list allows no cross-origin caller at all.
//!
//! Credentials are never allowed: the API authenticates with a bearer header,
//! not cookies.

use std::time::Duration;

use axum::Router;
use axum::http::{HeaderName, HeaderValue, Method, header};
use tower_http::cors::{AllowOrigin, Any, CorsLayer};

use crate::config::Config;
use crate::middleware::http::REQUEST_ID_HEADER;

pub fn apply(router: Router, config: &Config) -> Router {
    router.layer(layer(config))
}

fn layer(config: &Config) -> CorsLayer {
    let base = if config.app_env.is_production() {
        let allowed: Vec<HeaderValue> = config
            .cors_allowed_origins
            .iter()
            .filter_map(|s| HeaderValue::from_str(s).ok())
            .collect();

        CorsLayer::new().allow_origin(AllowOrigin::predicate(
            move |origin: &HeaderValue, _req| allowed.iter().any(|v| v == origin),
        ))
    } else {
        CorsLayer::new().allow_origin(Any)
    };

    base.allow_methods([
        Method::GET,
        Method::POST,
        Method::PUT,
        Method::DELETE,
        Method::OPTIONS,
    ])
    .allow_headers([
        header::AUTHORIZATION,
        header::CONTENT_TYPE,
        header::ACCEPT,
        HeaderName::from_static(REQUEST_ID_HEADER),
    ])
    .expose_headers([header::LOCATION, HeaderName::from_static(REQUEST_ID_HEADER)])
    .max_age(Duration::from_secs(10 * 60))
}
