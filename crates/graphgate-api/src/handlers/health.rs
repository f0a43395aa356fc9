//! Liveness probe

use axum::{http::StatusCode, Json};

use crate::dto::HealthResponse;

/// Returns 200 while the process is serving requests.
pub async fn liveness() -> (StatusCode, Json<HealthResponse>) {
    (
        StatusCode::OK,
        Json(HealthResponse {
            status: "alive".to_string(),
        }),
    )
}
