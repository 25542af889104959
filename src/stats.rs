use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::providers::github::Deployment;

/// Top-level report produced by a single run.
#[derive(Debug, Serialize)]
pub struct LatencyReport {
    pub provider: String,
    pub repository: String,
    pub environment: String,
    pub collected_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cutoff: Option<DateTime<Utc>>,
    pub total_deployments: usize,
    pub groups: Vec<GroupStats>,
}

/// Statistics for one deployment group, labeled when a cutoff split the input.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct GroupStats {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(flatten)]
    pub stats: DeploymentStats,
}

/// Aggregate latency statistics over one group of deployments.
///
/// `total` counts every deployment in the group, including those that never
/// reached a `success` status. `durations` is `None` when no deployment in
/// the group has a resolvable duration; avg/min/max are only defined over
/// deployments that do.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct DeploymentStats {
    pub total: usize,
    // A flattened `None` serializes to no fields at all.
    #[serde(flatten)]
    pub durations: Option<DurationSummary>,
}

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
pub struct DurationSummary {
    pub avg_duration_secs: i64,
    pub min_duration_secs: i64,
    pub max_duration_secs: i64,
}

impl DeploymentStats {
    /// Summarizes the resolved durations of a group of `total` deployments.
    ///
    /// The average is rounded to the nearest whole second, halves away from
    /// zero, matching `duration_secs`.
    pub fn from_durations(total: usize, durations: &[i64]) -> Self {
        let durations = match (
            durations.iter().min(),
            durations.iter().max(),
        ) {
            (Some(&min), Some(&max)) => {
                let sum: i64 = durations.iter().sum();
                #[allow(clippy::cast_precision_loss)]
                let avg = (sum as f64 / durations.len() as f64).round() as i64;
                Some(DurationSummary {
                    avg_duration_secs: avg,
                    min_duration_secs: min,
                    max_duration_secs: max,
                })
            }
            _ => None,
        };

        Self { total, durations }
    }
}

/// Elapsed whole seconds from `start` to `end`, rounded to the nearest
/// second with halves away from zero.
pub fn duration_secs(start: DateTime<Utc>, end: DateTime<Utc>) -> i64 {
    #[allow(clippy::cast_precision_loss)]
    let millis = (end - start).num_milliseconds() as f64;
    (millis / 1000.0).round() as i64
}

/// A subset of the fetched deployments that is aggregated as one unit.
#[derive(Debug, PartialEq)]
pub struct DeploymentGroup {
    pub label: Option<&'static str>,
    pub deployments: Vec<Deployment>,
}

/// Splits deployments into groups by the cutoff instant.
///
/// With a cutoff, deployments created strictly before it form the `old`
/// group and the rest the `new` group, both preserving input order. Without
/// one, the whole input is a single unlabeled group; no-cutoff is not a
/// special code path anywhere downstream.
pub fn group_by_cutoff(
    deployments: Vec<Deployment>,
    cutoff: Option<DateTime<Utc>>,
) -> Vec<DeploymentGroup> {
    match cutoff {
        None => vec![DeploymentGroup {
            label: None,
            deployments,
        }],
        Some(cutoff) => {
            let (old, new): (Vec<_>, Vec<_>) = deployments
                .into_iter()
                .partition(|deployment| deployment.created_at < cutoff);

            vec![
                DeploymentGroup {
                    label: Some("old"),
                    deployments: old,
                },
                DeploymentGroup {
                    label: Some("new"),
                    deployments: new,
                },
            ]
        }
    }
}
