/*
 * Responsibility
 * - tracing / panic hook setup
 * - Config → dependencies (user store, token key, hasher, clock) → AppState
 * - Router assembly: routes → auth pipeline → response layers
 * - axum::serve()
 */
use std::{panic, sync::Arc};

use anyhow::{Context, Result};
use axum::Router;
use sqlx::postgres::PgPoolOptions;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::api;
use crate::config::Config;
use crate::middleware::{auth::access, cors, http, security_headers};
use crate::repos::{InMemoryUserRepo, PgUserRepo, UserRepo};
use crate::services::auth::{PasswordHasher, TokenService};
use crate::services::clock::SystemClock;
use crate::state::AppState;

fn init_tracing() {
    // RUST_LOG wins when set, e.g.
    // RUST_LOG=info,catalog_api=debug,tower_http=debug cargo run
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info,tower_http=info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();
}

// Never aborts: handler panics become 500 responses (CatchPanicLayer).
fn init_panic_hook() {
    let default_hook = panic::take_hook();

    panic::set_hook(Box::new(move |info| {
        // stderr may be hidden depending on how the process is launched
        tracing::error!(?info, "panic");
        default_hook(info);
    }))
}

pub async fn run() -> Result<()> {
    init_tracing();
    let config = Config::from_env()?;

    init_panic_hook();

    tracing::info!(
        "starting API in {:?} mode on {}",
        config.app_env,
        config.addr
    );

    let state = build_state(&config).await?;
    let app = build_router(state, &config);

    let listener = tokio::net::TcpListener::bind(config.addr)
        .await
        .with_context(|| format!("bind {}", config.addr))?;
    axum::serve(listener, app).await.context("server error")?;

    Ok(())
}

async fn build_state(config: &Config) -> Result<AppState> {
    let users: Arc<dyn UserRepo> = match &config.database_url {
        Some(url) => {
            let pool = PgPoolOptions::new()
                .max_connections(10)
                .connect(url)
                .await
                .context("connect to DATABASE_URL")?;
            let repo = PgUserRepo::new(pool);
            repo.ensure_schema().await.context("create users table")?;
            Arc::new(repo)
        }
        None => {
            tracing::warn!("DATABASE_URL not set; users are kept in memory and lost on restart");
            Arc::new(InMemoryUserRepo::default())
        }
    };

    // Fresh key per process: tokens do not survive a restart.
    let tokens = Arc::new(TokenService::generate()?);
    let hasher = PasswordHasher::new(config.bcrypt_cost);

    tracing::info!(users = users.backend_name(), "state ready");

    Ok(AppState::new(users, tokens, hasher, Arc::new(SystemClock)))
}

/// The full application router.
pub fn build_router(state: AppState, config: &Config) -> Router {
    compose(api::routes(), state, config)
}

/// Wrap `routes` in the auth pipeline and the response layers.
///
/// Outermost first: security headers → CORS → http (request id, trace,
/// limits, timeout, panic) → auth pipeline → handler. Responses produced by
/// the http layers (408, 500) still pass through CORS and security headers.
pub fn compose(routes: Router<AppState>, state: AppState, config: &Config) -> Router {
    let router = access::apply(routes, state.clone()).with_state(state);
    let router = http::apply(router);
    let router = cors::apply(router, config);
    security_headers::apply(router)
}
