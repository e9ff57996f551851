//! HTTP API route definitions.

use axum::{routing::get, Router};

use super::handlers::{create_user, get_user, health, list_users, metrics_text, AppState};
use super::middleware::with_middleware;
use crate::config::Config;
use crate::error::Result;

/// Routes mounted under the `/api` prefix.
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health))
        .route("/users", get(list_users).post(create_user))
        .route("/users/", get(list_users).post(create_user))
        .route("/users/:id", get(get_user))
}

/// Create the application router with all middleware applied.
///
/// `/metrics` is only mounted when the state carries a Prometheus handle.
pub fn create_router(state: AppState, config: &Config) -> Result<Router> {
    let origin = config.cors_origin()?;

    let mut router = Router::new().nest("/api", api_routes());
    if state.metrics.is_some() {
        router = router.route("/metrics", get(metrics_text));
    }

    Ok(with_middleware(router.with_state(state), origin))
}
