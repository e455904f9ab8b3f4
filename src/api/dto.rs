use crate::adapters::github::Repo;
use crate::domain::now_playing::NowPlaying;
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize)]
pub struct NowPlayingMeta {
    pub authenticated: bool,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NowPlayingResponse {
    pub meta: NowPlayingMeta,
    pub now_playing: Option<NowPlaying>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<&'static str>,
}

#[derive(Debug, Serialize)]
pub struct SourceMeta {
    pub source: &'static str,
    pub authenticated: bool,
}

#[derive(Debug, Serialize)]
pub struct ReposResponse {
    pub meta: SourceMeta,
    pub repos: Vec<Repo>,
}

#[derive(Debug, Serialize)]
pub struct CachedMeta {
    pub source: &'static str,
    pub cached: bool,
}

#[derive(Debug, Serialize)]
pub struct CollectionsResponse {
    pub meta: CachedMeta,
    pub collections: serde_json::Value,
}

#[derive(Debug, Serialize)]
pub struct PhotosResponse {
    pub meta: CachedMeta,
    pub photos: serde_json::Value,
}

#[derive(Debug, Deserialize)]
pub struct CacheQuery {
    pub no_cache: Option<String>,
}

impl CacheQuery {
    #[must_use]
    pub fn bypass(&self) -> bool {
        self.no_cache.as_deref() == Some("1")
    }
}

#[derive(Debug, Deserialize)]
pub struct PhotosQuery {
    pub no_cache: Option<String>,
    pub per_page: Option<u32>,
}

impl PhotosQuery {
    #[must_use]
    pub fn bypass(&self) -> bool {
        self.no_cache.as_deref() == Some("1")
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthResponse {
    pub status: String,
    pub token_store: String,
}
