use crate::api::AppState;
use crate::api::dto::{CacheQuery, ReposResponse, SourceMeta};
use crate::error::Result;
use axum::{
    Json,
    extract::{Path, Query, State},
    response::IntoResponse,
};

/// `GET /github/repos` — the cached, blacklist-filtered repo listing.
/// `?no_cache=1` bypasses the cache.
pub async fn repos(State(state): State<AppState>, Query(query): Query<CacheQuery>) -> Result<impl IntoResponse> {
    let repos = state.repo_service.list_repos(query.bypass()).await?;
    let meta = SourceMeta { source: "github", authenticated: state.repo_service.is_authenticated() };

    Ok(Json(ReposResponse { meta, repos }))
}

/// `GET /github/{repo}/readme` — raw README content, passed through.
pub async fn readme(State(state): State<AppState>, Path(repo): Path<String>) -> Result<impl IntoResponse> {
    Ok(state.repo_service.readme(&repo).await?)
}
