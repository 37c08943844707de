use axum::{
    http::StatusCode,
    response::{IntoResponse, Json},
};
use serde_json::json;

/// Health check endpoint
/// Reports the exporter process only; upstream health is in the metrics
pub async fn health_check() -> impl IntoResponse {
    (
        StatusCode::OK,
        Json(json!({
            "status": "healthy",
            "service": "content-exporter",
            "version": env!("CARGO_PKG_VERSION"),
        })),
    )
}
