use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Missing credentials: {0}")]
    MissingCredentials(&'static str),
    #[error("Token refresh rejected by upstream ({status}): {message}")]
    RefreshRejected { status: u16, message: String },
    #[error("Malformed upstream response: {0}")]
    MalformedUpstream(&'static str),
    #[error("Rate limited by upstream")]
    RateLimited { retry_after_secs: Option<u64> },
    #[error("Upstream error ({status})")]
    Upstream { status: u16, body: serde_json::Value },
    #[error("Token store unavailable: {0}")]
    StoreUnavailable(String),
    #[error("Upstream request failed")]
    Transport(#[from] reqwest::Error),
    #[error("Internal server error")]
    Internal,
}

pub type Result<T> = std::result::Result<T, AppError>;

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, body) = match self {
            Self::MissingCredentials(what) => {
                tracing::error!(what, "Required configuration absent");
                (StatusCode::INTERNAL_SERVER_ERROR, json!({ "error": format!("Missing credentials: {what}") }))
            }
            Self::RefreshRejected { status, message } => {
                tracing::warn!(status, message = %message, "Upstream rejected token refresh");
                (upstream_status(status), json!({ "error": message }))
            }
            Self::MalformedUpstream(what) => {
                tracing::error!(what, "Unusable upstream response body");
                (StatusCode::BAD_GATEWAY, json!({ "error": format!("Malformed upstream response: {what}") }))
            }
            Self::RateLimited { retry_after_secs } => {
                tracing::warn!(retry_after_secs, "Upstream rate limit hit");
                (
                    StatusCode::TOO_MANY_REQUESTS,
                    json!({ "error": "Rate limited by upstream", "retryAfter": retry_after_secs }),
                )
            }
            Self::Upstream { status, body } => {
                tracing::warn!(status, "Upstream error forwarded");
                (upstream_status(status), json!({ "error": body }))
            }
            Self::StoreUnavailable(msg) => {
                tracing::error!(message = %msg, "Token store unavailable");
                (StatusCode::SERVICE_UNAVAILABLE, json!({ "error": "Token store unavailable" }))
            }
            Self::Transport(e) => {
                // The error is logged without its URL: token store paths embed secrets.
                tracing::error!(error = %e.without_url(), "Upstream request failed");
                (StatusCode::BAD_GATEWAY, json!({ "error": "Upstream request failed" }))
            }
            Self::Internal => {
                tracing::error!("Internal server error occurred");
                (StatusCode::INTERNAL_SERVER_ERROR, json!({ "error": "Internal server error" }))
            }
        };

        (status, Json(body)).into_response()
    }
}

fn upstream_status(status: u16) -> StatusCode {
    StatusCode::from_u16(status).unwrap_or(StatusCode::BAD_GATEWAY)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn refresh_rejected_forwards_upstream_status() {
        let response = AppError::RefreshRejected { status: 400, message: "invalid_grant".into() }.into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn upstream_passthrough_keeps_status() {
        let response =
            AppError::Upstream { status: 403, body: json!({"message": "forbidden"}) }.into_response();
        assert_eq!(response.status(), StatusCode::FORBIDDEN);
    }

    #[test]
    fn bogus_upstream_status_maps_to_bad_gateway() {
        let response = AppError::Upstream { status: 42, body: json!(null) }.into_response();
        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
    }

    #[test]
    fn rate_limited_maps_to_429() {
        let response = AppError::RateLimited { retry_after_secs: Some(21) }.into_response();
        assert_eq!(response.status(), StatusCode::TOO_MANY_REQUESTS);
    }

    #[test]
    fn missing_credentials_maps_to_500() {
        let response = AppError::MissingCredentials("client id").into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn malformed_upstream_maps_to_502() {
        let response = AppError::MalformedUpstream("no access token").into_response();
        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
    }
}
