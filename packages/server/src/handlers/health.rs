use axum::Json;
use chrono::{DateTime, Utc};
use serde::Serialize;

#[derive(Serialize, utoipa::ToSchema)]
pub struct HealthResponse {
    pub success: bool,
    pub message: String,
    pub timestamp: DateTime<Utc>,
}

#[utoipa::path(
    get,
    path = "/health",
    tag = "Health",
    operation_id = "healthCheck",
    summary = "Liveness probe",
    responses((status = 200, description = "Server is healthy", body = HealthResponse)),
)]
pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        success: true,
        message: "Server is healthy".into(),
        timestamp: Utc::now(),
    })
}
