use crate::api::AppState;
use crate::api::dto::{CacheQuery, CachedMeta, CollectionsResponse, PhotosQuery, PhotosResponse};
use crate::error::Result;
use axum::{
    Json,
    extract::{Path, Query, State},
    response::IntoResponse,
};

const DEFAULT_PER_PAGE: u32 = 30;

/// `GET /unsplash/collections` — the user's collections, cached.
pub async fn collections(
    State(state): State<AppState>,
    Query(query): Query<CacheQuery>,
) -> Result<impl IntoResponse> {
    let (collections, cached) = state.photo_service.collections(query.bypass()).await?;

    Ok(Json(CollectionsResponse { meta: CachedMeta { source: "unsplash", cached }, collections }))
}

/// `GET /unsplash/collections/{id}/photos` — one collection's photos, cached
/// per collection.
pub async fn photos(
    State(state): State<AppState>,
    Path(collection_id): Path<String>,
    Query(query): Query<PhotosQuery>,
) -> Result<impl IntoResponse> {
    let per_page = query.per_page.unwrap_or(DEFAULT_PER_PAGE);
    let (photos, cached) = state.photo_service.collection_photos(&collection_id, per_page, query.bypass()).await?;

    Ok(Json(PhotosResponse { meta: CachedMeta { source: "unsplash", cached }, photos }))
}
