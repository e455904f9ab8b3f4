use crate::api::AppState;
use crate::api::dto::HealthResponse;
use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};

/// Liveness probe: returns 200 OK as long as the server is running.
pub async fn livez() -> impl IntoResponse {
    StatusCode::OK
}

/// Readiness probe: checks connectivity to the remote token store.
pub async fn readyz(State(state): State<AppState>) -> impl IntoResponse {
    let mut status_code = StatusCode::OK;
    let store_status = if let Err(e) = state.health_service.check_token_store().await {
        tracing::warn!(error = %e, component = "token_store", "Readiness probe failed");
        status_code = StatusCode::SERVICE_UNAVAILABLE;
        "error"
    } else {
        "ok"
    };

    let response = HealthResponse {
        status: if status_code == StatusCode::OK { "ok" } else { "error" }.to_string(),
        token_store: store_status.to_string(),
    };

    (status_code, Json(response))
}
