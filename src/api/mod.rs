use crate::config::{Config, CorsConfig};
use crate::services::health_service::HealthService;
use crate::services::now_playing_service::NowPlayingService;
use crate::services::photo_service::PhotoService;
use crate::services::repo_service::RepoService;
use axum::body::Body;
use axum::http::{HeaderValue, Method, Request, header};
use axum::{Router, routing::get};
use std::path::Path;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::request_id::{PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::services::{ServeDir, ServeFile};
use tower_http::trace::TraceLayer;

pub mod dto;
pub mod github;
pub mod health;
pub mod middleware;
pub mod spotify;
pub mod unsplash;

#[derive(Clone, Debug)]
pub struct AppState {
    pub now_playing_service: NowPlayingService,
    pub repo_service: RepoService,
    pub photo_service: PhotoService,
    pub health_service: HealthService,
}

/// Configures and returns the application router.
pub fn app_router(config: &Config, state: AppState) -> Router {
    // Static assets at the root; unmatched paths get the 404 page.
    let public_dir = Path::new(&config.server.public_dir);
    let static_files =
        ServeDir::new(public_dir).not_found_service(ServeFile::new(public_dir.join("404.html")));

    Router::new()
        .route("/livez", get(health::livez))
        .route("/readyz", get(health::readyz))
        .route("/spotify/now-playing", get(spotify::now_playing))
        .route("/github/repos", get(github::repos))
        .route("/github/{repo}/readme", get(github::readme))
        .route("/unsplash/collections", get(unsplash::collections))
        .route("/unsplash/collections/{id}/photos", get(unsplash::photos))
        .fallback_service(static_files)
        .layer(cors_layer(&config.cors))
        .layer(PropagateRequestIdLayer::new(axum::http::HeaderName::from_static("x-request-id")))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(move |request: &Request<Body>| {
                    let request_id = request
                        .extensions()
                        .get::<tower_http::request_id::RequestId>()
                        .map(|id| id.header_value().to_str().unwrap_or_default())
                        .unwrap_or_default()
                        .to_string();

                    tracing::info_span!(
                        "request",
                        "request_id" = %request_id,
                        "http.request.method" = %request.method(),
                        "url.path" = %request.uri().path(),
                        "http.response.status_code" = tracing::field::Empty,
                    )
                })
                .on_response(
                    |response: &axum::http::Response<_>, latency: std::time::Duration, _span: &tracing::Span| {
                        let status = response.status();
                        tracing::Span::current().record("http.response.status_code", status.as_u16());

                        tracing::info!(
                            latency_ms = %latency.as_millis(),
                            status = %status.as_u16(),
                            "request completed"
                        );
                    },
                )
                .on_failure(|error, _latency, _span: &tracing::Span| {
                    tracing::error!(error = %error, "request failed");
                }),
        )
        .layer(SetRequestIdLayer::new(
            axum::http::HeaderName::from_static("x-request-id"),
            middleware::MakeRequestUuidOrHeader,
        ))
        .with_state(state)
}

/// Strict CORS for the frontend: only the configured origins, or any origin
/// when none are configured.
fn cors_layer(config: &CorsConfig) -> CorsLayer {
    let origins: Vec<HeaderValue> =
        config.allowed_origins.iter().filter_map(|origin| origin.parse().ok()).collect();
    let allow_origin =
        if origins.is_empty() { AllowOrigin::any() } else { AllowOrigin::list(origins) };

    CorsLayer::new()
        .allow_origin(allow_origin)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION])
}
