use crate::adapters::upstream_error;
use crate::config::GithubConfig;
use crate::error::{AppError, Result};
use serde::{Deserialize, Serialize};

const ACCEPT_JSON: &str = "application/vnd.github+json";
const ACCEPT_RAW: &str = "application/vnd.github.raw+json";
const API_VERSION: &str = "2022-11-28";

/// Client for the GitHub REST API, bound to one user.
#[derive(Clone)]
pub struct GithubClient {
    http: reqwest::Client,
    api_url: String,
    username: String,
    token: Option<String>,
}

impl std::fmt::Debug for GithubClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GithubClient")
            .field("api_url", &self.api_url)
            .field("username", &self.username)
            .field("token", &self.token.as_ref().map(|_| "[REDACTED]"))
            .finish()
    }
}

/// A repository payload forwarded as-is, with the id pulled out for filtering.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Repo {
    pub id: u64,
    #[serde(flatten)]
    pub fields: serde_json::Map<String, serde_json::Value>,
}

impl GithubClient {
    #[must_use]
    pub fn new(http: reqwest::Client, config: &GithubConfig) -> Self {
        Self {
            http,
            api_url: config.api_url.clone(),
            username: config.username.clone(),
            token: config.token.clone(),
        }
    }

    #[must_use]
    pub const fn is_authenticated(&self) -> bool {
        self.token.is_some()
    }

    /// Lists the user's repositories, most recently pushed first.
    pub async fn list_repos(&self) -> Result<Vec<Repo>> {
        let request = self
            .http
            .get(format!("{}/users/{}/repos", self.api_url, self.username))
            .query(&[("sort", "pushed"), ("type", "all")]);
        let response = self.authorize(request).header("accept", ACCEPT_JSON).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(upstream_error(status.as_u16(), response).await);
        }

        let payload: serde_json::Value =
            response.json().await.map_err(|_| AppError::MalformedUpstream("repo listing body"))?;
        match payload {
            serde_json::Value::Array(_) => serde_json::from_value(payload)
                .map_err(|_| AppError::MalformedUpstream("repo listing entries")),
            _ => Ok(Vec::new()),
        }
    }

    /// Fetches a repository's README as raw content.
    pub async fn readme(&self, repo: &str) -> Result<String> {
        let request = self
            .http
            .get(format!("{}/repos/{}/{repo}/contents/README.md", self.api_url, self.username));
        let response = self.authorize(request).header("accept", ACCEPT_RAW).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(upstream_error(status.as_u16(), response).await);
        }

        Ok(response.text().await?)
    }

    fn authorize(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        let request = request.header("x-github-api-version", API_VERSION);
        match &self.token {
            Some(token) => request.header("authorization", format!("token {token}")),
            None => request,
        }
    }
}
