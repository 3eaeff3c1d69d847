use axum::Json;

use crate::dto::HealthResponse;

/// GET /health - Liveness probe. Reports the running build version.
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}
