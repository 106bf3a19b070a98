//! Health check handler.

use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;

use crate::dto::response::HealthResponse;
use crate::state::AppState;

/// GET /health
pub async fn health(State(state): State<AppState>) -> (StatusCode, Json<HealthResponse>) {
    let database = match &state.database {
        Some(db) => status_of(db.health_check().await),
        None => "in_memory",
    };
    let cache = status_of(state.cache.health_check().await);

    let healthy = database != "unavailable" && cache != "unavailable";
    let status = if healthy {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    (
        status,
        Json(HealthResponse {
            status: if healthy { "ok" } else { "degraded" }.to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            database: database.to_string(),
            cache: cache.to_string(),
        }),
    )
}

fn status_of(check: gatehouse_core::AppResult<bool>) -> &'static str {
    match check {
        Ok(true) => "connected",
        Ok(false) | Err(_) => "unavailable",
    }
}
