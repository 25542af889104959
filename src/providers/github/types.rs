use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// GitHub deployment record.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Deployment {
    /// Unique identifier for the deployment
    pub id: u64,
    /// SHA of the deployed commit
    pub sha: String,
    /// Git ref the deployment was created from
    #[serde(rename = "ref")]
    pub ref_: Option<String>,
    /// Environment the deployment targets
    pub environment: String,
    /// When the deployment was created
    pub created_at: DateTime<Utc>,
}

/// State transition recorded against a deployment.
///
/// GitHub returns statuses most-recent-first. `state` is an open-ended set
/// (`pending`, `in_progress`, `success`, `failure`, ...); only `success` is
/// meaningful for latency.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DeploymentStatus {
    /// State of the deployment at this transition
    pub state: String,
    /// When the status was created
    pub created_at: DateTime<Utc>,
}

impl DeploymentStatus {
    pub fn is_success(&self) -> bool {
        self.state == "success"
    }
}
