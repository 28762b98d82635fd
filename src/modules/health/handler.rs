use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use tracing::error;

use super::dto::HealthResponse;
use crate::state::AppState;

/// Report whether the object store is reachable
#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "Store reachable", body = HealthResponse),
        (status = 503, description = "Store unreachable", body = HealthResponse)
    ),
    tag = "Health"
)]
pub async fn health(State(state): State<AppState>) -> impl IntoResponse {
    match state.storage.list_buckets().await {
        Ok(_) => (StatusCode::OK, Json(HealthResponse::connected())),
        Err(e) => {
            error!("❌ Health check failed: {}", e);
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(HealthResponse::disconnected(e.to_string())),
            )
        }
    }
}
