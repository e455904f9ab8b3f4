use crate::api::AppState;
use crate::api::dto::{NowPlayingMeta, NowPlayingResponse};
use crate::error::Result;
use axum::{Json, extract::State, response::IntoResponse};

/// `GET /spotify/now-playing`
///
/// Nothing playing is a 200 with a null payload, not an error.
pub async fn now_playing(State(state): State<AppState>) -> Result<impl IntoResponse> {
    let track = state.now_playing_service.current_track().await?;
    let message = track.is_none().then_some("Not currently playing");

    Ok(Json(NowPlayingResponse { meta: NowPlayingMeta { authenticated: true }, now_playing: track, message }))
}
