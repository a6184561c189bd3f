use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use serde_json::json;
use std::sync::Arc;

use crate::domain::translation::ResponseCaches;
use crate::infrastructure::db::{check_connection, DbPool};

/// State for the readiness check
#[derive(Clone)]
pub struct HealthState {
    pub pool: Arc<DbPool>,
    pub caches: ResponseCaches,
}

pub async fn health() -> impl IntoResponse {
    (StatusCode::OK, "OK")
}

pub async fn health_ready(State(state): State<HealthState>) -> impl IntoResponse {
    let translation_entries = state.caches.translation.size().await;
    let speech_entries = state.caches.speech.size().await;
    let caches = json!({
        "translation": translation_entries,
        "speech": speech_entries
    });

    match check_connection(&state.pool).await {
        Ok(_) => (
            StatusCode::OK,
            Json(json!({
                "status": "ready",
                "database": "connected",
                "caches": caches
            })),
        ),
        Err(e) => {
            tracing::warn!(error = %e, "Readiness check failed");
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(json!({
                    "status": "not_ready",
                    "database": "disconnected",
                    "caches": caches
                })),
            )
        }
    }
}
