// handlers/public/health.rs - GET / and GET /health

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Json},
};
use serde_json::{json, Value};

use crate::state::AppState;

pub async fn root_get() -> Json<Value> {
    Json(json!({
        "status": "success",
        "data": {
            "name": "College Admin API",
            "version": env!("CARGO_PKG_VERSION"),
            "endpoints": {
                "health": "/health (public)",
                "login": "/auth/login (public)",
                "whoami": "/api/whoami (any role)",
                "uploads": "/api/uploads/validate (any role)",
                "admin": "/api/admin/{courses,sessions,staff,students,subjects} (admin)",
            }
        }
    }))
}

pub async fn health_get(State(state): State<AppState>) -> impl IntoResponse {
    let now = chrono::Utc::now();

    match state.store.health_check().await {
        Ok(()) => (
            StatusCode::OK,
            Json(json!({
                "status": "success",
                "data": {
                    "status": "ok",
                    "timestamp": now,
                    "database": "ok"
                }
            })),
        ),
        Err(e) => {
            tracing::error!("Health check failed: {}", e);
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(json!({
                    "status": "error",
                    "message": "database unavailable"
                })),
            )
        }
    }
}
