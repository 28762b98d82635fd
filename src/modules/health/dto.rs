use serde::Serialize;
use utoipa::ToSchema;

use crate::common::response::timestamp;

#[derive(Debug, Serialize, ToSchema)]
pub struct HealthResponse {
    pub status: String,
    pub message: String,
    pub minio: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub timestamp: String,
}

impl HealthResponse {
    pub fn connected() -> Self {
        Self {
            status: "ok".to_string(),
            message: "Server is running and healthy.".to_string(),
            minio: "connected".to_string(),
            error: None,
            timestamp: timestamp(),
        }
    }

    pub fn disconnected(error: String) -> Self {
        Self {
            status: "error".to_string(),
            message: "Service unavailable".to_string(),
            minio: "disconnected".to_string(),
            error: Some(error),
            timestamp: timestamp(),
        }
    }
}
