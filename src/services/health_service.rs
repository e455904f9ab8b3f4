use crate::adapters::kv::TokenStore;
use crate::config::TokenStoreConfig;
use std::time::Duration;
use tokio::time::timeout;

/// Key probed by the readiness check; the store has no ping operation, so a
/// successful `get` on any key proves reachability.
const PROBE_KEY: &str = "healthz";

#[derive(Clone, Debug)]
pub struct HealthService {
    store: TokenStore,
    probe_timeout: Duration,
}

impl HealthService {
    #[must_use]
    pub fn new(store: TokenStore, config: &TokenStoreConfig) -> Self {
        Self { store, probe_timeout: Duration::from_millis(config.probe_timeout_ms) }
    }

    /// Checks remote token store connectivity.
    ///
    /// # Errors
    /// Returns a string describing the failure if the store is unreachable.
    pub async fn check_token_store(&self) -> Result<(), String> {
        match timeout(self.probe_timeout, self.store.get(PROBE_KEY)).await {
            Ok(Ok(_)) => Ok(()),
            Ok(Err(e)) => Err(format!("Token store check failed: {e}")),
            Err(_) => Err("Token store check timed out".to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn service(server: &MockServer, probe_timeout_ms: u64) -> HealthService {
        let config = TokenStoreConfig { url: server.uri(), token: "store-secret".into(), probe_timeout_ms };
        let store = TokenStore::new(reqwest::Client::new(), &config).expect("valid mock uri");
        HealthService::new(store, &config)
    }

    #[tokio::test]
    async fn reachable_store_is_healthy() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/get/healthz"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({ "result": null })))
            .mount(&server)
            .await;

        service(&server, 2_000).check_token_store().await.expect("healthy");
    }

    #[tokio::test]
    async fn failing_store_is_unhealthy() {
        let server = MockServer::start().await;
        Mock::given(method("GET")).respond_with(ResponseTemplate::new(500)).mount(&server).await;

        let err = service(&server, 2_000).check_token_store().await.expect_err("unhealthy");
        assert!(err.contains("check failed"));
    }

    #[tokio::test]
    async fn slow_store_times_out() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(serde_json::json!({ "result": null }))
                    .set_delay(Duration::from_millis(200)),
            )
            .mount(&server)
            .await;

        let err = service(&server, 20).check_token_store().await.expect_err("timed out");
        assert!(err.contains("timed out"));
    }
}
