use crate::adapters::github::{GithubClient, Repo};
use crate::config::GithubConfig;
use crate::error::Result;
use crate::services::ttl::TtlCell;
use std::sync::Arc;
use std::time::Duration;

/// Repositories never shown to the frontend.
const HIDDEN_REPO_IDS: [u64; 5] = [870_897_038, 732_342_842, 1_047_632_816, 689_259_000, 1_063_993_915];

/// Proxies the GitHub repo listing with a short TTL cache and a blacklist.
#[derive(Clone, Debug)]
pub struct RepoService {
    github: GithubClient,
    cache: Arc<TtlCell<Vec<Repo>>>,
}

impl RepoService {
    #[must_use]
    pub fn new(github: GithubClient, config: &GithubConfig) -> Self {
        Self { github, cache: Arc::new(TtlCell::new(Duration::from_secs(config.cache_ttl_secs))) }
    }

    #[must_use]
    pub const fn is_authenticated(&self) -> bool {
        self.github.is_authenticated()
    }

    /// Lists repositories, filtered and cached. `bypass_cache` forces a
    /// fresh upstream fetch (and still refills the cache).
    pub async fn list_repos(&self, bypass_cache: bool) -> Result<Vec<Repo>> {
        if !bypass_cache {
            if let Some(repos) = self.cache.get() {
                return Ok(repos);
            }
        }

        let repos = filter_hidden(self.github.list_repos().await?);
        self.cache.put(repos.clone());
        Ok(repos)
    }

    /// READMEs are fetched uncached; they are rarely requested twice.
    pub async fn readme(&self, repo: &str) -> Result<String> {
        self.github.readme(repo).await
    }
}

fn filter_hidden(repos: Vec<Repo>) -> Vec<Repo> {
    repos.into_iter().filter(|repo| !HIDDEN_REPO_IDS.contains(&repo.id)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn service(server: &MockServer, token: Option<&str>) -> RepoService {
        let config = GithubConfig {
            username: "octocat".into(),
            token: token.map(str::to_string),
            api_url: server.uri(),
            cache_ttl_secs: 60,
        };
        RepoService::new(GithubClient::new(reqwest::Client::new(), &config), &config)
    }

    fn listing() -> serde_json::Value {
        serde_json::json!([
            { "id": 1, "name": "site" },
            { "id": 870_897_038u64, "name": "hidden" },
            { "id": 2, "name": "dotfiles" }
        ])
    }

    #[tokio::test]
    async fn blacklisted_repos_are_filtered() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/users/octocat/repos"))
            .respond_with(ResponseTemplate::new(200).set_body_json(listing()))
            .mount(&server)
            .await;

        let repos = service(&server, None).list_repos(false).await.expect("listing ok");
        assert_eq!(repos.iter().map(|r| r.id).collect::<Vec<_>>(), vec![1, 2]);
    }

    #[tokio::test]
    async fn second_call_is_served_from_cache() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/users/octocat/repos"))
            .respond_with(ResponseTemplate::new(200).set_body_json(listing()))
            .expect(1)
            .mount(&server)
            .await;

        let repos = service(&server, None);
        repos.list_repos(false).await.expect("first");
        repos.list_repos(false).await.expect("cached");
    }

    #[tokio::test]
    async fn bypass_skips_the_cache_and_refills_it() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/users/octocat/repos"))
            .respond_with(ResponseTemplate::new(200).set_body_json(listing()))
            .expect(2)
            .mount(&server)
            .await;

        let repos = service(&server, None);
        repos.list_repos(false).await.expect("first");
        repos.list_repos(true).await.expect("bypass");
        repos.list_repos(false).await.expect("cached again");
    }

    #[tokio::test]
    async fn authenticated_reflects_token_presence() {
        let server = MockServer::start().await;
        assert!(service(&server, Some("ghp-1")).is_authenticated());
        assert!(!service(&server, None).is_authenticated());
    }
}
