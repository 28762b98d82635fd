use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
    http::StatusCode,
    response::IntoResponse,
};
use tracing::warn;

use super::dto::{CompressRequest, CompressResponse};
use super::service::CompressService;
use crate::common::response::{ApiError, ApiResponse, ApiSuccess, ErrorResponse};
use crate::state::AppState;

/// Compress a video object and store the result next to it
#[utoipa::path(
    post,
    path = "/compress",
    request_body = CompressRequest,
    responses(
        (status = 200, description = "Object compressed and uploaded", body = ApiResponse<CompressResponse>),
        (status = 400, description = "Missing or malformed parameters", body = ErrorResponse),
        (status = 500, description = "Download, transcode or upload failed", body = ErrorResponse)
    ),
    tag = "Compression"
)]
pub async fn compress(
    State(state): State<AppState>,
    payload: Result<Json<CompressRequest>, JsonRejection>,
) -> impl IntoResponse {
    let Json(payload) = match payload {
        Ok(payload) => payload,
        Err(rejection) => {
            warn!("❌ Rejected compress request: {}", rejection.body_text());
            return ApiError::bad_request(rejection.body_text()).into_response();
        }
    };

    let request = match payload.into_job_request() {
        Ok(request) => request,
        Err(message) => {
            warn!("❌ {}", message);
            return ApiError::bad_request(message).into_response();
        }
    };

    match CompressService::compress(state, request).await {
        Ok(result) => ApiSuccess(
            ApiResponse::success(CompressResponse::from(result), "File compressed successfully"),
            StatusCode::OK,
        )
        .into_response(),
        Err(e) => ApiError::internal(e.summary(), e.to_string()).into_response(),
    }
}
