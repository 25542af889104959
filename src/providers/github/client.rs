use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION, USER_AGENT};
use serde::de::DeserializeOwned;
use std::sync::Arc;
use tokio::sync::Semaphore;
use url::Url;

use crate::auth::Token;
use crate::error::{DeployLensError, Result};

use super::types::{Deployment, DeploymentStatus};

/// Upper bound on in-flight API requests, matching GitHub's tolerance for
/// bursts of secondary requests.
const MAX_CONCURRENT_REQUESTS: usize = 10;

/// GitHub REST API client for deployment data.
#[derive(Clone)]
pub struct GitHubClient {
    /// HTTP client
    client: reqwest::Client,
    /// Base URL for the GitHub API
    base_url: Url,
    /// Repository owner
    owner: String,
    /// Repository name
    repo: String,
    semaphore: Arc<Semaphore>,
}

impl GitHubClient {
    /// Create a new GitHub API client.
    ///
    /// # Arguments
    ///
    /// * `base_url` - GitHub API base URL (e.g., "https://api.github.com")
    /// * `owner` - Repository owner/organization
    /// * `repo` - Repository name
    /// * `token` - Bearer token authenticating every request
    ///
    /// # Errors
    ///
    /// Returns an error if the base URL is invalid or the HTTP client cannot
    /// be constructed.
    pub fn new(base_url: &str, owner: String, repo: String, token: &Token) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(USER_AGENT, HeaderValue::from_static("deploylens/0.3"));
        headers.insert(
            ACCEPT,
            HeaderValue::from_static("application/vnd.github+json"),
        );
        headers.insert(
            AUTHORIZATION,
            HeaderValue::from_str(&format!("Bearer {}", token.as_str()))
                .map_err(|e| DeployLensError::Config(format!("Invalid token value: {e}")))?,
        );

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .build()
            .map_err(|e| DeployLensError::Config(format!("Failed to create HTTP client: {e}")))?;

        let mut base_url = Url::parse(base_url)
            .map_err(|e| DeployLensError::Config(format!("Invalid base URL: {e}")))?;

        // A trailing slash keeps Url::join appending instead of replacing
        // the last path segment on GitHub Enterprise style base URLs.
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }

        Ok(Self {
            client,
            base_url,
            owner,
            repo,
            semaphore: Arc::new(Semaphore::new(MAX_CONCURRENT_REQUESTS)),
        })
    }

    /// Fetch one page of deployments for an environment.
    ///
    /// Returns the page exactly as ordered by the API (most recent first).
    pub async fn list_deployments(
        &self,
        environment: &str,
        per_page: usize,
        page: usize,
    ) -> Result<Vec<Deployment>> {
        let mut url = self.endpoint("deployments")?;
        url.query_pairs_mut()
            .append_pair("environment", environment)
            .append_pair("per_page", &per_page.to_string())
            .append_pair("page", &page.to_string());

        self.get(url).await
    }

    /// Fetch all recorded statuses for a deployment, most recent first.
    pub async fn list_deployment_statuses(
        &self,
        deployment_id: u64,
    ) -> Result<Vec<DeploymentStatus>> {
        let url = self.endpoint(&format!("deployments/{deployment_id}/statuses"))?;

        self.get(url).await
    }

    fn endpoint(&self, path: &str) -> Result<Url> {
        self.base_url
            .join(&format!("repos/{}/{}/{}", self.owner, self.repo, path))
            .map_err(|e| DeployLensError::Config(format!("Invalid API endpoint: {e}")))
    }

    /// Execute a GET request, surfacing non-2xx responses as API errors.
    /// No retries: a failed request fails the whole batch it belongs to.
    async fn get<T>(&self, url: Url) -> Result<T>
    where
        T: DeserializeOwned,
    {
        // One permit per request keeps concurrent batches within bounds.
        let _permit = self.semaphore.acquire().await.unwrap();

        let response = self.client.get(url).send().await?;

        let status = response.status();
        if !status.is_success() {
            let message = response
                .text()
                .await
                .unwrap_or_else(|_| "Unable to read error response".to_string());
            return Err(DeployLensError::Api {
                status: status.as_u16(),
                message,
            });
        }

        Ok(response.json().await?)
    }
}
