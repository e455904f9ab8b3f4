use crate::adapters::upstream_error;
use crate::config::UnsplashConfig;
use crate::error::{AppError, Result};

/// Client for the Unsplash API, bound to one user.
#[derive(Clone)]
pub struct UnsplashClient {
    http: reqwest::Client,
    api_url: String,
    username: String,
    access_key: String,
}

impl std::fmt::Debug for UnsplashClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UnsplashClient")
            .field("api_url", &self.api_url)
            .field("username", &self.username)
            .field("access_key", &"[REDACTED]")
            .finish()
    }
}

impl UnsplashClient {
    #[must_use]
    pub fn new(http: reqwest::Client, config: &UnsplashConfig) -> Self {
        Self {
            http,
            api_url: config.api_url.clone(),
            username: config.username.clone(),
            access_key: config.access_key.clone(),
        }
    }

    /// Lists the user's collections; the payload is forwarded untouched.
    pub async fn list_collections(&self) -> Result<serde_json::Value> {
        self.fetch(&format!("{}/users/{}/collections", self.api_url, self.username), &[]).await
    }

    /// Lists photos of one collection; the payload is forwarded untouched.
    pub async fn collection_photos(&self, collection_id: &str, per_page: u32) -> Result<serde_json::Value> {
        self.fetch(
            &format!("{}/collections/{collection_id}/photos", self.api_url),
            &[("per_page", per_page.to_string())],
        )
        .await
    }

    async fn fetch(&self, url: &str, query: &[(&str, String)]) -> Result<serde_json::Value> {
        let response = self
            .http
            .get(url)
            .query(query)
            .header("authorization", format!("Client-ID {}", self.access_key))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(upstream_error(status.as_u16(), response).await);
        }

        response.json().await.map_err(|_| AppError::MalformedUpstream("unsplash body"))
    }
}
