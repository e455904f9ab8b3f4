#![forbid(unsafe_code)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![warn(clippy::unwrap_used)]
#![warn(clippy::todo)]
#![warn(clippy::panic)]
#![warn(clippy::dbg_macro)]
#![warn(clippy::print_stdout)]
#![warn(clippy::print_stderr)]
#![warn(clippy::clone_on_ref_ptr)]
#![warn(unreachable_pub)]
#![warn(missing_debug_implementations)]
#![warn(unused_qualifications)]
#![deny(unused_must_use)]

use std::net::SocketAddr;
use std::time::Duration;
use vitrine_server::adapters::github::GithubClient;
use vitrine_server::adapters::kv::TokenStore;
use vitrine_server::adapters::spotify::SpotifyClient;
use vitrine_server::adapters::unsplash::UnsplashClient;
use vitrine_server::api::{self, AppState};
use vitrine_server::config::Config;
use vitrine_server::services::health_service::HealthService;
use vitrine_server::services::now_playing_service::NowPlayingService;
use vitrine_server::services::photo_service::PhotoService;
use vitrine_server::services::repo_service::RepoService;
use vitrine_server::services::token_service::TokenService;
use vitrine_server::telemetry;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::load();
    telemetry::init_telemetry(&config.telemetry);

    // Phase 1: Shared infrastructure. One HTTP client carries the bounded
    // timeout for every outbound call.
    let http = reqwest::Client::builder()
        .user_agent(concat!("vitrine-server/", env!("CARGO_PKG_VERSION")))
        .timeout(Duration::from_secs(config.upstream_timeout_secs))
        .build()?;
    let token_store = TokenStore::new(http.clone(), &config.token_store)?;

    // Phase 2: Component wiring.
    let spotify = SpotifyClient::new(http.clone(), &config.spotify);
    let tokens = TokenService::new(spotify.clone(), token_store.clone(), &config.spotify);
    let state = AppState {
        now_playing_service: NowPlayingService::new(spotify, tokens),
        repo_service: RepoService::new(GithubClient::new(http.clone(), &config.github), &config.github),
        photo_service: PhotoService::new(UnsplashClient::new(http, &config.unsplash), &config.unsplash),
        health_service: HealthService::new(token_store, &config.token_store),
    };

    // Phase 3: Runtime.
    let router = api::app_router(&config, state);
    let addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port).parse()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!(address = %addr, "listening");

    axum::serve(listener, router.into_make_service())
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c().await.expect("failed to install ctrl-c handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {}
        () = terminate => {}
    }

    tracing::info!("Shutdown signal received");
}
