use crate::errors::TrafficError;
use crate::models::{MetricKind, MetricRecord, TrafficResponse};
use async_trait::async_trait;
use reqwest::{header, Client};
use secrecy::{ExposeSecret, SecretString};
use tracing::debug;

pub const DEFAULT_API_BASE: &str = "https://api.github.com";

/// Anything that can hand over one traffic series for a repository.
#[async_trait]
pub trait TrafficSource: Send + Sync {
    async fn fetch(&self, kind: MetricKind, repo: &str) -> Result<Vec<MetricRecord>, TrafficError>;
}

/// Traffic API client authenticated with a username and access token.
pub struct GithubClient {
    client: Client,
    api_base: String,
    owner: String,
    username: String,
    token: SecretString,
}

impl GithubClient {
    pub fn new(
        api_base: impl Into<String>,
        owner: impl Into<String>,
        username: impl Into<String>,
        token: SecretString,
    ) -> Result<Self, TrafficError> {
        let mut headers = header::HeaderMap::new();
        headers.insert(
            header::ACCEPT,
            header::HeaderValue::from_static("application/vnd.github+json"),
        );

        let client = Client::builder()
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .default_headers(headers)
            .build()?;

        Ok(Self {
            client,
            api_base: api_base.into().trim_end_matches('/').to_string(),
            owner: owner.into(),
            username: username.into(),
            token,
        })
    }

    fn url(&self, kind: MetricKind, repo: &str) -> String {
        format!(
            "{}/repos/{}/{}/traffic/{}",
            self.api_base,
            self.owner,
            repo,
            kind.resource()
        )
    }
}

#[async_trait]
impl TrafficSource for GithubClient {
    async fn fetch(&self, kind: MetricKind, repo: &str) -> Result<Vec<MetricRecord>, TrafficError> {
        let url = self.url(kind, repo);
        debug!("GET {url}");

        let response = self
            .client
            .get(&url)
            .basic_auth(&self.username, Some(self.token.expose_secret()))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "unreadable error body".to_string());
            return Err(TrafficError::Upstream { status, body });
        }

        let bytes = response.bytes().await?;
        let payload: TrafficResponse = serde_json::from_slice(&bytes)?;
        debug!(
            "{repo} {kind}: {} records, upstream total {}/{}",
            payload.records.len(),
            payload.count,
            payload.uniques
        );
        Ok(payload.records)
    }
}
