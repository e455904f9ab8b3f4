use crate::adapters::kv::TokenStore;
use crate::adapters::spotify::SpotifyClient;
use crate::config::SpotifyConfig;
use crate::domain::token::TokenRecord;
use crate::error::{AppError, Result};
use std::sync::{Arc, RwLock};
use std::time::{SystemTime, UNIX_EPOCH};
use tokio::sync::Mutex;

const REFRESH_TOKEN_KEY: &str = "spotify:refresh_token";
const ACCESS_TOKEN_KEY: &str = "spotify:access_token";
const ACCESS_EXPIRES_AT_KEY: &str = "spotify:access_expires_at";

/// Applied when the grant omits `expires_in`.
const DEFAULT_EXPIRES_IN_SECS: u64 = 3600;

/// Produces currently-valid access tokens for the upstream music API.
///
/// Resolution is three-tiered: in-process cache, then the remote store shared
/// across process instances, then a network refresh. The remote store is the
/// durable source of truth; the in-process cache only ever sits above it.
#[derive(Clone)]
pub struct TokenService {
    spotify: SpotifyClient,
    store: TokenStore,
    fallback_refresh_token: Option<String>,
    expiry_buffer_ms: i64,
    cached: Arc<RwLock<Option<TokenRecord>>>,
    // Single-flight gate: overlapping callers that miss the cache queue here,
    // and all but the first are served by the re-check after acquisition.
    refresh_gate: Arc<Mutex<()>>,
}

impl std::fmt::Debug for TokenService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenService")
            .field("spotify", &self.spotify)
            .field("store", &self.store)
            .field("expiry_buffer_ms", &self.expiry_buffer_ms)
            .finish()
    }
}

impl TokenService {
    #[must_use]
    pub fn new(spotify: SpotifyClient, store: TokenStore, config: &SpotifyConfig) -> Self {
        Self {
            spotify,
            store,
            fallback_refresh_token: config.fallback_refresh_token.clone(),
            expiry_buffer_ms: config.expiry_buffer_ms,
            cached: Arc::new(RwLock::new(None)),
            refresh_gate: Arc::new(Mutex::new(())),
        }
    }

    /// Returns an access token valid for at least the expiry buffer.
    #[tracing::instrument(skip(self), err(level = "warn"))]
    pub async fn get_valid_access_token(&self) -> Result<String> {
        if let Some(token) = self.fresh_cached_token() {
            return Ok(token);
        }

        let _flight = self.refresh_gate.lock().await;

        // A queued caller may find the slot already filled by the flight it
        // waited on; that settles it without a second upstream request.
        if let Some(token) = self.fresh_cached_token() {
            return Ok(token);
        }

        if let Some(record) = self.load_from_store().await {
            if record.is_fresh(now_ms(), self.expiry_buffer_ms) {
                let token = record.access_token.clone();
                self.cache(record);
                return Ok(token);
            }
        }

        let record = self.refresh().await?;
        Ok(record.access_token)
    }

    /// Drops the in-process token so the next call re-resolves from the
    /// remote store or a refresh. The remote store is left untouched.
    pub fn invalidate_access_token(&self) {
        self.cached.write().expect("token cache lock poisoned").take();
        tracing::debug!("In-process access token invalidated");
    }

    fn fresh_cached_token(&self) -> Option<String> {
        let cached = self.cached.read().expect("token cache lock poisoned");
        cached
            .as_ref()
            .filter(|record| record.is_fresh(now_ms(), self.expiry_buffer_ms))
            .map(|record| record.access_token.clone())
    }

    fn cache(&self, record: TokenRecord) {
        *self.cached.write().expect("token cache lock poisoned") = Some(record);
    }

    async fn load_from_store(&self) -> Option<TokenRecord> {
        let access_token = self.read_store_key(ACCESS_TOKEN_KEY).await?;
        let expires_at_ms = self.read_store_key(ACCESS_EXPIRES_AT_KEY).await?.parse().ok()?;
        Some(TokenRecord { access_token, expires_at_ms, refresh_token: None })
    }

    #[tracing::instrument(skip(self), err(level = "warn"))]
    async fn refresh(&self) -> Result<TokenRecord> {
        // The store's refresh token wins; the configured one is only a seed
        // for the very first refresh before the store has been written.
        let refresh_token = match self.read_store_key(REFRESH_TOKEN_KEY).await {
            Some(token) => token,
            None => self
                .fallback_refresh_token
                .clone()
                .ok_or(AppError::MissingCredentials("spotify refresh token"))?,
        };

        let grant = self.spotify.refresh_access_token(&refresh_token).await?;
        let expires_in = grant.expires_in.unwrap_or(DEFAULT_EXPIRES_IN_SECS);
        let record = TokenRecord {
            access_token: grant.access_token,
            expires_at_ms: now_ms() + (expires_in * 1000) as i64,
            refresh_token: grant.refresh_token,
        };

        self.cache(record.clone());
        self.persist(&record).await;

        tracing::info!(expires_in, rotated = record.refresh_token.is_some(), "Access token refreshed");
        Ok(record)
    }

    /// Best-effort persistence: a failed write costs cross-process reuse,
    /// never the current request.
    async fn persist(&self, record: &TokenRecord) {
        self.write_store_key(ACCESS_TOKEN_KEY, &record.access_token).await;
        self.write_store_key(ACCESS_EXPIRES_AT_KEY, &record.expires_at_ms.to_string()).await;
        if let Some(rotated) = &record.refresh_token {
            self.write_store_key(REFRESH_TOKEN_KEY, rotated).await;
        }
    }

    async fn read_store_key(&self, key: &str) -> Option<String> {
        match self.store.get(key).await {
            Ok(value) => value,
            Err(e) => {
                tracing::warn!(key, error = %e, "Token store read failed, treating as miss");
                None
            }
        }
    }

    async fn write_store_key(&self, key: &str, value: &str) {
        if let Err(e) = self.store.set(key, value).await {
            tracing::warn!(key, error = %e, "Token store write failed");
        }
    }
}

fn now_ms() -> i64 {
    SystemTime::now().duration_since(UNIX_EPOCH).unwrap_or_default().as_millis() as i64
}
