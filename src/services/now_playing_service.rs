use crate::adapters::spotify::{PlaybackFetch, SpotifyClient};
use crate::domain::now_playing::NowPlaying;
use crate::error::{AppError, Result};
use crate::services::token_service::TokenService;

/// Fetches and simplifies the currently-playing state for the frontend.
#[derive(Clone, Debug)]
pub struct NowPlayingService {
    spotify: SpotifyClient,
    tokens: TokenService,
}

impl NowPlayingService {
    #[must_use]
    pub const fn new(spotify: SpotifyClient, tokens: TokenService) -> Self {
        Self { spotify, tokens }
    }

    /// `None` means nothing is playing. A 401 from the upstream invalidates
    /// the cached token and retries exactly once with a fresh one.
    #[tracing::instrument(skip(self), err(level = "warn"))]
    pub async fn current_track(&self) -> Result<Option<NowPlaying>> {
        let token = self.tokens.get_valid_access_token().await?;
        match self.spotify.currently_playing(&token).await? {
            PlaybackFetch::Playing(state) => Ok(NowPlaying::project(*state)),
            PlaybackFetch::NotPlaying => Ok(None),
            PlaybackFetch::Unauthorized => {
                tracing::info!("Upstream rejected the access token, retrying once with a fresh one");
                self.tokens.invalidate_access_token();
                let fresh = self.tokens.get_valid_access_token().await?;
                match self.spotify.currently_playing(&fresh).await? {
                    PlaybackFetch::Playing(state) => Ok(NowPlaying::project(*state)),
                    PlaybackFetch::NotPlaying => Ok(None),
                    PlaybackFetch::Unauthorized => Err(AppError::Upstream {
                        status: 401,
                        body: serde_json::json!({ "message": "Access token rejected after refresh" }),
                    }),
                }
            }
        }
    }
}
