use crate::adapters::unsplash::UnsplashClient;
use crate::config::UnsplashConfig;
use crate::error::Result;
use crate::services::ttl::{TtlCell, TtlMap};
use std::sync::Arc;
use std::time::Duration;

/// Proxies Unsplash collections and photos with TTL caches.
#[derive(Clone, Debug)]
pub struct PhotoService {
    unsplash: UnsplashClient,
    collections: Arc<TtlCell<serde_json::Value>>,
    // Keyed by collection id; a listing is cached whole per collection.
    photos: Arc<TtlMap<serde_json::Value>>,
}

impl PhotoService {
    #[must_use]
    pub fn new(unsplash: UnsplashClient, config: &UnsplashConfig) -> Self {
        let ttl = Duration::from_secs(config.cache_ttl_secs);
        Self { unsplash, collections: Arc::new(TtlCell::new(ttl)), photos: Arc::new(TtlMap::new(ttl)) }
    }

    /// Returns the collection listing and whether it came from the cache.
    pub async fn collections(&self, bypass_cache: bool) -> Result<(serde_json::Value, bool)> {
        if !bypass_cache {
            if let Some(cached) = self.collections.get() {
                return Ok((cached, true));
            }
        }

        let listing = self.unsplash.list_collections().await?;
        self.collections.put(listing.clone());
        Ok((listing, false))
    }

    /// Returns one collection's photos and whether they came from the cache.
    pub async fn collection_photos(
        &self,
        collection_id: &str,
        per_page: u32,
        bypass_cache: bool,
    ) -> Result<(serde_json::Value, bool)> {
        if !bypass_cache {
            if let Some(cached) = self.photos.get(collection_id) {
                return Ok((cached, true));
            }
        }

        let photos = self.unsplash.collection_photos(collection_id, per_page).await?;
        self.photos.put(collection_id.to_string(), photos.clone());
        Ok((photos, false))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn service(server: &MockServer) -> PhotoService {
        let config = UnsplashConfig {
            username: "lensman".into(),
            access_key: "key-1".into(),
            api_url: server.uri(),
            cache_ttl_secs: 120,
        };
        PhotoService::new(UnsplashClient::new(reqwest::Client::new(), &config), &config)
    }

    #[tokio::test]
    async fn collections_are_cached_after_first_fetch() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/users/lensman/collections"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([{ "id": "c1" }])))
            .expect(1)
            .mount(&server)
            .await;

        let photos = service(&server);
        let (_, cached) = photos.collections(false).await.expect("first");
        assert!(!cached);
        let (listing, cached) = photos.collections(false).await.expect("second");
        assert!(cached);
        assert_eq!(listing[0]["id"], "c1");
    }

    #[tokio::test]
    async fn photo_caches_are_per_collection() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/collections/c1/photos"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([{ "id": "p1" }])))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/collections/c2/photos"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([{ "id": "p2" }])))
            .expect(1)
            .mount(&server)
            .await;

        let photos = service(&server);
        let (first, cached) = photos.collection_photos("c1", 30, false).await.expect("c1");
        assert!(!cached);
        assert_eq!(first[0]["id"], "p1");
        // c2 is a miss of its own; c1 is now a hit.
        let (_, cached) = photos.collection_photos("c2", 30, false).await.expect("c2");
        assert!(!cached);
        let (_, cached) = photos.collection_photos("c1", 30, false).await.expect("c1 again");
        assert!(cached);
    }

    #[tokio::test]
    async fn bypass_refetches_collections() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/users/lensman/collections"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([])))
            .expect(2)
            .mount(&server)
            .await;

        let photos = service(&server);
        photos.collections(false).await.expect("first");
        let (_, cached) = photos.collections(true).await.expect("bypass");
        assert!(!cached);
    }
}
