//! Authentication and authorization through the full middleware stack.

use axum::body::Body;
use axum::http::{HeaderValue, Request, StatusCode, header};
use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use chrono::Duration;
use serde_json::json;

use crate::harness::{TestApp, bearer, t0};

// ============================================================================
// Protected routes
// ============================================================================

#[tokio::test]
async fn test_protected_route_without_credentials_is_unauthenticated() {
    let app = TestApp::new();

    let res = app.get("/api/users/me", None).await;

    assert_eq!(res.status, StatusCode::UNAUTHORIZED);
    assert_eq!(res.body["error"], "UNAUTHENTICATED");
    assert_eq!(res.body["status"], 401);
    assert_eq!(
        res.body["message"],
        "Authentication is required to access this resource"
    );
}

#[tokio::test]
async fn test_token_is_accepted_within_its_lifetime() {
    let app = TestApp::new();
    let token = app.token_for("ann").await;

    let res = app
        .at(t0() + Duration::hours(1))
        .get("/api/users/me", Some(&bearer(&token)))
        .await;

    assert_eq!(res.status, StatusCode::OK, "{:?}", res.body);
    assert_eq!(res.body["name"], "ann");
    assert_eq!(res.body["email"], "ann@example.com");
    assert_eq!(res.body["age"], 30);
    assert!(res.body.get("password_hash").is_none());
}

#[tokio::test]
async fn test_expired_token_is_rejected_as_invalid_jwt() {
    let app = TestApp::new();
    let token = app.token_for("ann").await;

    let res = app
        .at(t0() + Duration::hours(25))
        .get("/api/users/me", Some(&bearer(&token)))
        .await;

    assert_eq!(res.status, StatusCode::UNAUTHORIZED);
    assert_eq!(
        res.body,
        json!({
            "message": "Invalid or malformed JWT token",
            "status": 401,
            "error": "INVALID_JWT",
        })
    );
}

#[tokio::test]
async fn test_token_expires_exactly_after_24_hours() {
    let app = TestApp::new();
    let token = app.token_for("ann").await;

    let just_before = app
        .at(t0() + Duration::hours(24) - Duration::seconds(1))
        .get("/api/users/me", Some(&bearer(&token)))
        .await;
    assert_eq!(just_before.status, StatusCode::OK);

    let at_expiry = app
        .at(t0() + Duration::hours(24))
        .get("/api/users/me", Some(&bearer(&token)))
        .await;
    assert_eq!(at_expiry.status, StatusCode::UNAUTHORIZED);
    assert_eq!(at_expiry.body["error"], "INVALID_JWT");
}

#[tokio::test]
async fn test_tampered_signature_is_rejected() {
    let app = TestApp::new();
    let token = app.token_for("ann").await;

    // swap one character in the middle of the signature segment
    let sig_start = token.rfind('.').unwrap() + 1;
    let idx = sig_start + (token.len() - sig_start) / 2;
    let original = token.as_bytes()[idx];
    let replacement = if original == b'A' { "B" } else { "A" };
    let mut tampered = token.clone();
    tampered.replace_range(idx..idx + 1, replacement);

    let res = app.get("/api/users/me", Some(&bearer(&tampered))).await;

    assert_eq!(res.status, StatusCode::UNAUTHORIZED);
    assert_eq!(res.body["error"], "INVALID_JWT");
}

#[tokio::test]
async fn test_forged_claims_are_rejected() {
    let app = TestApp::new();
    let token = app.token_for("ann").await;
    let mut parts: Vec<&str> = token.split('.').collect();

    let forged = URL_SAFE_NO_PAD.encode(
        json!({
            "sub": "root@example.com",
            "userId": 1,
            "name": "root",
            "iat": t0().timestamp(),
            "exp": (t0() + Duration::days(365)).timestamp(),
        })
        .to_string(),
    );
    parts[1] = &forged;
    let forged_token = parts.join(".");

    let res = app.get("/api/users/me", Some(&bearer(&forged_token))).await;

    assert_eq!(res.status, StatusCode::UNAUTHORIZED);
    assert_eq!(res.body["error"], "INVALID_JWT");
}

#[tokio::test]
async fn test_token_from_another_instance_is_rejected() {
    let first = TestApp::new();
    let second = TestApp::new();
    let token = first.token_for("ann").await;

    let res = second.get("/api/users/me", Some(&bearer(&token))).await;

    assert_eq!(res.status, StatusCode::UNAUTHORIZED);
    assert_eq!(res.body["error"], "INVALID_JWT");
}

#[tokio::test]
async fn test_garbage_bearer_is_rejected() {
    let app = TestApp::new();

    for value in ["Bearer not-a-jwt", "Bearer a.b.c", "Bearer "] {
        let res = app.get("/api/users/me", Some(value)).await;
        assert_eq!(res.status, StatusCode::UNAUTHORIZED, "{value}");
    }

    let res = app.get("/api/users/me", Some("Bearer a.b.c")).await;
    assert_eq!(res.body["error"], "INVALID_JWT");
}

#[tokio::test]
async fn test_bearer_with_non_ascii_bytes_is_invalid_jwt() {
    let app = TestApp::new();

    let req = Request::builder()
        .method("GET")
        .uri("/api/users/me")
        .header(
            header::AUTHORIZATION,
            HeaderValue::from_bytes(b"Bearer abc\xe9def").unwrap(),
        )
        .body(Body::empty())
        .unwrap();
    let res = app.send(req).await;

    assert_eq!(res.status, StatusCode::UNAUTHORIZED);
    assert_eq!(res.body["error"], "INVALID_JWT");
}

// ============================================================================
// Public routes
// ============================================================================

#[tokio::test]
async fn test_non_bearer_header_on_public_route_passes_anonymously() {
    let app = TestApp::new();

    let res = app
        .post_json(
            "/api/users",
            &json!({ "name": "ann", "age": 30, "email": "ann@example.com", "password": "pw" }),
            Some("Basic YW5uOnB3"),
        )
        .await;

    assert_eq!(res.status, StatusCode::CREATED, "{:?}", res.body);
}

#[tokio::test]
async fn test_non_bearer_header_on_protected_route_is_unauthenticated() {
    let app = TestApp::new();

    let res = app.get("/api/users/me", Some("Basic YW5uOnB3")).await;

    assert_eq!(res.status, StatusCode::UNAUTHORIZED);
    assert_eq!(res.body["error"], "UNAUTHENTICATED");
}

#[tokio::test]
async fn test_invalid_bearer_on_public_route_is_still_rejected() {
    let app = TestApp::new();

    let res = app
        .post_json(
            "/api/auth/login",
            &json!({ "login": "ann", "password": "pw" }),
            Some("Bearer a.b.c"),
        )
        .await;

    assert_eq!(res.status, StatusCode::UNAUTHORIZED);
    assert_eq!(res.body["error"], "INVALID_JWT");
}

// ============================================================================
// Unrouted paths
// ============================================================================

#[tokio::test]
async fn test_unrouted_path_requires_authentication() {
    let app = TestApp::new();
    let token = app.token_for("ann").await;

    let anonymous = app.get("/api/nowhere", None).await;
    assert_eq!(anonymous.status, StatusCode::UNAUTHORIZED);
    assert_eq!(anonymous.body["error"], "UNAUTHENTICATED");

    let authenticated = app.get("/api/nowhere", Some(&bearer(&token))).await;
    assert_eq!(authenticated.status, StatusCode::NOT_FOUND);
}

// ============================================================================
// Response layers
// ============================================================================

#[tokio::test]
async fn test_every_response_carries_request_id_and_security_headers() {
    let app = TestApp::new();

    let res = app.get("/api/users/me", None).await;

    assert!(res.headers.contains_key("x-request-id"));
    assert_eq!(res.headers["x-content-type-options"], "nosniff");
    assert_eq!(res.headers["x-frame-options"], "DENY");
}
