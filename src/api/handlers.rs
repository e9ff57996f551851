//! HTTP API handlers.

use axum::{
    body::Bytes,
    extract::{rejection::PathRejection, Path, State},
    http::{header, StatusCode},
    response::IntoResponse,
    Json,
};
use metrics_exporter_prometheus::PrometheusHandle;
use tracing::{info, warn};

use crate::error::ApiError;
use crate::metrics;
use crate::models::{ApiResponse, CreateUserRequest, HealthInfo, NewUser, User, UserId};
use crate::store::UserStore;

/// Application state shared with handlers.
#[derive(Clone)]
pub struct AppState {
    /// User collection.
    pub users: UserStore,
    /// Prometheus handle, present when a recorder is installed.
    pub metrics: Option<PrometheusHandle>,
}

impl AppState {
    /// Create new app state around a user store.
    pub fn new(users: UserStore) -> Self {
        Self {
            users,
            metrics: None,
        }
    }

    /// Attach a Prometheus handle, enabling `/metrics`.
    pub fn with_metrics(mut self, handle: PrometheusHandle) -> Self {
        self.metrics = Some(handle);
        self
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new(UserStore::seeded())
    }
}

/// Health check handler - always returns 200.
pub async fn health() -> Json<ApiResponse<HealthInfo>> {
    Json(ApiResponse::ok("Server is healthy", HealthInfo::now()))
}

/// List all users in insertion order.
pub async fn list_users(State(state): State<AppState>) -> Json<ApiResponse<Vec<User>>> {
    let users = state.users.list().await;
    Json(ApiResponse::ok("Users retrieved successfully", users))
}

/// Create a user from a `{name, email}` JSON body.
///
/// The body is decoded regardless of the request's content type. A `null`
/// body is treated like an empty object.
pub async fn create_user(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<(StatusCode, Json<ApiResponse<User>>), ApiError> {
    let request = serde_json::from_slice::<Option<CreateUserRequest>>(&body)
        .map_err(|e| {
            warn!(error = %e, "Rejected create-user request body");
            metrics::inc_user_create_rejected(&ApiError::InvalidBody);
            ApiError::InvalidBody
        })?
        .unwrap_or_default();

    let new_user = NewUser::parse(request).map_err(|e| {
        warn!("Rejected create-user request: {}", e);
        metrics::inc_user_create_rejected(&e);
        e
    })?;

    let user = state.users.create(new_user).await;
    metrics::inc_users_created();
    info!(user_id = user.id, "User created");

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::ok("User created successfully", user)),
    ))
}

/// Fetch one user by ID.
///
/// A segment the path extractor cannot decode counts as an invalid ID.
pub async fn get_user(
    State(state): State<AppState>,
    raw_id: Result<Path<String>, PathRejection>,
) -> Result<Json<ApiResponse<User>>, ApiError> {
    let Path(raw_id) = raw_id.map_err(|e| {
        warn!(error = %e, "Rejected user ID path segment");
        ApiError::InvalidUserId
    })?;
    let id: i64 = raw_id.parse().map_err(|_| ApiError::InvalidUserId)?;

    // Negative IDs parse but can never match.
    let user = match UserId::try_from(id) {
        Ok(id) => state.users.get(id).await,
        Err(_) => None,
    };

    user.map(|user| Json(ApiResponse::ok("User found", user)))
        .ok_or(ApiError::UserNotFound)
}

/// Prometheus text exposition.
pub async fn metrics_text(State(state): State<AppState>) -> impl IntoResponse {
    match state.metrics {
        Some(handle) => (
            [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
            handle.render(),
        )
            .into_response(),
        None => StatusCode::NOT_FOUND.into_response(),
    }
}
