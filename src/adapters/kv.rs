use crate::config::TokenStoreConfig;
use crate::error::{AppError, Result};
use serde::Deserialize;
use url::Url;

/// Client for the remote key-value token store (Upstash-style REST API).
///
/// `GET {base}/get/{key}` returns `{"result": string|null}`;
/// `POST {base}/set/{key}/{value}` persists a value. Both carry bearer auth.
#[derive(Clone)]
pub struct TokenStore {
    http: reqwest::Client,
    base: Url,
    bearer: String,
}

impl std::fmt::Debug for TokenStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenStore").field("base", &self.base.as_str()).field("bearer", &"[REDACTED]").finish()
    }
}

#[derive(Debug, Deserialize)]
struct GetReply {
    result: Option<String>,
}

impl TokenStore {
    /// Builds a store client over a shared HTTP client.
    ///
    /// # Errors
    /// Returns an error if the configured base URL is invalid.
    pub fn new(http: reqwest::Client, config: &TokenStoreConfig) -> anyhow::Result<Self> {
        let base = Url::parse(&config.url)?;
        Ok(Self { http, base, bearer: config.token.clone() })
    }

    /// Reads a key; `None` when the key is absent.
    pub async fn get(&self, key: &str) -> Result<Option<String>> {
        let url = self.endpoint(&["get", key])?;
        let response = self.http.get(url).bearer_auth(&self.bearer).send().await.map_err(store_err)?;

        if !response.status().is_success() {
            return Err(AppError::StoreUnavailable(format!("get returned {}", response.status())));
        }

        let reply: GetReply = response.json().await.map_err(store_err)?;
        Ok(reply.result)
    }

    /// Writes a key. Non-2xx replies are errors; callers decide whether a
    /// failed write is fatal.
    pub async fn set(&self, key: &str, value: &str) -> Result<()> {
        let url = self.endpoint(&["set", key, value])?;
        let response = self.http.post(url).bearer_auth(&self.bearer).send().await.map_err(store_err)?;

        if !response.status().is_success() {
            return Err(AppError::StoreUnavailable(format!("set returned {}", response.status())));
        }

        Ok(())
    }

    /// Key and value land in path segments, so `Url` percent-encodes them.
    fn endpoint(&self, segments: &[&str]) -> Result<Url> {
        let mut url = self.base.clone();
        url.path_segments_mut()
            .map_err(|()| AppError::StoreUnavailable("store base URL cannot be a base".into()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }
}

/// Store errors are reported without the request URL: a `set` URL embeds the
/// stored secret in its path.
fn store_err(e: reqwest::Error) -> AppError {
    AppError::StoreUnavailable(e.without_url().to_string())
}
