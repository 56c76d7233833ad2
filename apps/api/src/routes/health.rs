use axum::Json;
use serde_json::{json, Value};

/// GET /health, GET /api/health
/// Hosting health checks expect a 200 as soon as the process is serving.
pub async fn health_handler() -> Json<Value> {
    Json(json!({
        "status": "healthy",
        "version": env!("CARGO_PKG_VERSION"),
        "service": "unicompass-api"
    }))
}

/// GET /
pub async fn root_handler() -> Json<Value> {
    Json(json!({
        "message": "UniCompass API",
        "version": env!("CARGO_PKG_VERSION")
    }))
}
