use axum::Router;
use axum::extract::DefaultBodyLimit;
use axum::routing::post;

use crate::state::AppState;

pub mod dto;
pub mod error;
pub mod handler;
pub mod job;
pub mod model;
pub mod service;
pub mod workspace;

/// Oversized bodies surface as a `JsonRejection`, so they get the 400 envelope.
pub const MAX_REQUEST_BODY_BYTES: usize = 64 * 1024;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/compress", post(handler::compress))
        .layer(DefaultBodyLimit::max(MAX_REQUEST_BODY_BYTES))
}
