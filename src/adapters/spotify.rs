use crate::adapters::upstream_error;
use crate::config::SpotifyConfig;
use crate::domain::now_playing::PlaybackState;
use crate::error::{AppError, Result};
use serde::Deserialize;

const TOKEN_PATH: &str = "/api/token";
const NOW_PLAYING_PATH: &str = "/v1/me/player/currently-playing";

/// Client for the Spotify authorization server and Web API.
#[derive(Clone)]
pub struct SpotifyClient {
    http: reqwest::Client,
    accounts_url: String,
    api_url: String,
    client_id: String,
    client_secret: String,
}

impl std::fmt::Debug for SpotifyClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SpotifyClient")
            .field("accounts_url", &self.accounts_url)
            .field("api_url", &self.api_url)
            .field("client_id", &self.client_id)
            .field("client_secret", &"[REDACTED]")
            .finish()
    }
}

/// A successful token grant from the refresh-token flow.
#[derive(Debug, Clone)]
pub struct TokenGrant {
    pub access_token: String,
    pub expires_in: Option<u64>,
    /// Present when the upstream rotated the refresh token.
    pub refresh_token: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RawGrant {
    access_token: Option<String>,
    expires_in: Option<u64>,
    refresh_token: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RefreshErrorBody {
    error_description: Option<String>,
    error: Option<String>,
}

/// Outcome of a currently-playing fetch that the consumer must branch on.
/// Rate limits and other upstream failures surface as errors instead.
#[derive(Debug)]
pub enum PlaybackFetch {
    Playing(Box<PlaybackState>),
    NotPlaying,
    Unauthorized,
}

impl SpotifyClient {
    #[must_use]
    pub fn new(http: reqwest::Client, config: &SpotifyConfig) -> Self {
        Self {
            http,
            accounts_url: config.accounts_url.clone(),
            api_url: config.api_url.clone(),
            client_id: config.client_id.clone(),
            client_secret: config.client_secret.clone(),
        }
    }

    /// Exchanges a refresh token for a new access token (refresh-token grant,
    /// client credentials via HTTP Basic).
    pub async fn refresh_access_token(&self, refresh_token: &str) -> Result<TokenGrant> {
        let response = self
            .http
            .post(format!("{}{TOKEN_PATH}", self.accounts_url))
            .basic_auth(&self.client_id, Some(&self.client_secret))
            .form(&[("grant_type", "refresh_token"), ("refresh_token", refresh_token)])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let message = response
                .json::<RefreshErrorBody>()
                .await
                .ok()
                .and_then(|body| body.error_description.or(body.error))
                .unwrap_or_else(|| status.to_string());
            return Err(AppError::RefreshRejected { status: status.as_u16(), message });
        }

        let raw: RawGrant =
            response.json().await.map_err(|_| AppError::MalformedUpstream("token grant body"))?;
        let access_token = match raw.access_token {
            Some(token) if !token.is_empty() => token,
            _ => return Err(AppError::MalformedUpstream("grant without access token")),
        };

        Ok(TokenGrant { access_token, expires_in: raw.expires_in, refresh_token: raw.refresh_token })
    }

    /// Fetches the currently-playing state with a bearer token.
    pub async fn currently_playing(&self, access_token: &str) -> Result<PlaybackFetch> {
        let response = self
            .http
            .get(format!("{}{NOW_PLAYING_PATH}", self.api_url))
            .bearer_auth(access_token)
            .send()
            .await?;

        match response.status().as_u16() {
            204 => Ok(PlaybackFetch::NotPlaying),
            401 => Ok(PlaybackFetch::Unauthorized),
            429 => {
                let retry_after_secs = response
                    .headers()
                    .get("retry-after")
                    .and_then(|v| v.to_str().ok())
                    .and_then(|v| v.parse().ok());
                Err(AppError::RateLimited { retry_after_secs })
            }
            200..=299 => {
                let state: PlaybackState =
                    response.json().await.map_err(|_| AppError::MalformedUpstream("playback payload"))?;
                Ok(PlaybackFetch::Playing(Box::new(state)))
            }
            code => Err(upstream_error(code, response).await),
        }
    }
}
