use chrono::{DateTime, Utc};
use log::info;
use std::sync::Arc;

use crate::auth::Token;
use crate::error::{DeployLensError, Result};
use crate::output::PhaseProgress;
use crate::stats::{self, DeploymentStats, GroupStats, LatencyReport};

use super::client::GitHubClient;
use super::types::Deployment;

/// Records fetched per page; the API caps pages at 100 entries.
const PER_PAGE: usize = 100;

/// Provider for collecting deployment latency statistics from GitHub.
pub struct GitHubProvider {
    /// GitHub API client
    client: Arc<GitHubClient>,
    /// Repository owner
    owner: String,
    /// Repository name
    repo: String,
}

impl GitHubProvider {
    /// Create a new GitHub deployments provider.
    ///
    /// # Arguments
    ///
    /// * `base_url` - GitHub API base URL
    /// * `owner` - Repository owner/organization
    /// * `repo` - Repository name
    /// * `token` - Bearer token authenticating every request
    ///
    /// # Errors
    ///
    /// Returns an error if the API client cannot be constructed.
    pub fn new(base_url: &str, owner: String, repo: String, token: &Token) -> Result<Self> {
        let client = GitHubClient::new(base_url, owner.clone(), repo.clone(), token)?;

        Ok(Self {
            client: Arc::new(client),
            owner,
            repo,
        })
    }

    /// Fetches `pages` pages of deployments for an environment concurrently.
    ///
    /// All page requests are issued at once and awaited jointly; the result
    /// concatenates pages in page-number order no matter which response
    /// arrives first. The page count is fixed: a short or empty page does
    /// not stop the batch early, so request volume is always `pages`.
    ///
    /// # Errors
    ///
    /// Fails as a whole if any single page request fails; no partial
    /// results are returned.
    pub async fn fetch_deployments(
        &self,
        environment: &str,
        pages: usize,
    ) -> Result<Vec<Deployment>> {
        if pages == 0 {
            return Err(DeployLensError::Config(
                "pages must be at least 1".to_owned(),
            ));
        }

        info!("Fetching {pages} pages of deployments for {environment}...");

        let requests = (1..=pages)
            .map(|page| self.client.list_deployments(environment, PER_PAGE, page));

        let pages = futures::future::try_join_all(requests).await?;

        Ok(pages.into_iter().flatten().collect())
    }

    /// Resolves the latency of one deployment in whole seconds.
    ///
    /// Takes the first status with state `success` in the order the API
    /// returns them; a deployment with no success status resolves to
    /// `Ok(None)` rather than an error.
    pub async fn resolve_duration(&self, deployment: &Deployment) -> Result<Option<i64>> {
        let statuses = self
            .client
            .list_deployment_statuses(deployment.id)
            .await?;

        Ok(statuses
            .iter()
            .find(|status| status.is_success())
            .map(|status| stats::duration_secs(deployment.created_at, status.created_at)))
    }

    /// Aggregates latency statistics over a group of deployments.
    ///
    /// Status lookups for all deployments run concurrently and are awaited
    /// jointly; the first failed lookup fails the whole aggregation.
    /// Deployments without a success status count toward `total` but are
    /// excluded from avg/min/max.
    pub async fn aggregate(&self, deployments: &[Deployment]) -> Result<DeploymentStats> {
        let resolutions = deployments
            .iter()
            .map(|deployment| self.resolve_duration(deployment));

        let durations: Vec<i64> = futures::future::try_join_all(resolutions)
            .await?
            .into_iter()
            .flatten()
            .collect();

        Ok(DeploymentStats::from_durations(deployments.len(), &durations))
    }

    /// Collects the full latency report for an environment.
    ///
    /// Fetches deployments, splits them by the optional cutoff instant and
    /// aggregates each group. Progress is displayed in three phases:
    /// 1. Fetching deployment pages
    /// 2. Resolving success statuses
    /// 3. Computing statistics
    ///
    /// # Errors
    ///
    /// Returns an error if any API request fails; there is no partial or
    /// degraded report for a group whose batch failed.
    pub async fn collect_report(
        &self,
        environment: &str,
        pages: usize,
        cutoff: Option<DateTime<Utc>>,
    ) -> Result<LatencyReport> {
        info!(
            "Starting latency collection for repository: {}/{}",
            self.owner, self.repo
        );

        let progress = PhaseProgress::start_phase_1(pages);

        let deployments = self.fetch_deployments(environment, pages).await?;
        let total_deployments = deployments.len();

        info!("Fetched {total_deployments} deployments for {environment}");

        let progress = progress.finish_phase_1_start_phase_2(total_deployments);

        let mut groups = Vec::new();
        for group in stats::group_by_cutoff(deployments, cutoff) {
            let group_stats = self.aggregate(&group.deployments).await?;
            groups.push(GroupStats {
                label: group.label.map(str::to_owned),
                stats: group_stats,
            });
        }

        let progress = progress.finish_phase_2_start_phase_3();

        let report = LatencyReport {
            provider: "GitHub".to_string(),
            repository: format!("{}/{}", self.owner, self.repo),
            environment: environment.to_string(),
            collected_at: Utc::now(),
            cutoff,
            total_deployments,
            groups,
        };

        progress.finish_phase_3();

        Ok(report)
    }
}
