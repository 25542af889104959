use std::fmt::Write;

use crate::stats::{GroupStats, LatencyReport};

/// Prints a human-readable latency summary to stdout.
///
/// One header line with the fetch total, then one line per group:
///
/// ```text
/// Fetched 312 deployments for production:
/// - 118 old deployments: avg 74 secs, min/max: 21/402 secs
/// - 194 new deployments: avg 49 secs, min/max: 18/230 secs
/// ```
///
/// A group without a single successful deployment reports that explicitly
/// instead of avg/min/max.
pub fn print_summary(report: &LatencyReport) {
    print!("{}", render_summary(report));
}

fn render_summary(report: &LatencyReport) -> String {
    let mut output = String::new();

    let _ = writeln!(
        output,
        "Fetched {} deployments for {}:",
        report.total_deployments, report.environment
    );

    for group in &report.groups {
        let _ = writeln!(output, "{}", render_group_line(group));
    }

    output
}

fn render_group_line(group: &GroupStats) -> String {
    let label = group
        .label
        .as_ref()
        .map(|label| format!("{label} "))
        .unwrap_or_default();

    match &group.stats.durations {
        Some(summary) => format!(
            "- {} {label}deployments: avg {} secs, min/max: {}/{} secs",
            group.stats.total,
            summary.avg_duration_secs,
            summary.min_duration_secs,
            summary.max_duration_secs
        ),
        None => format!(
            "- {} {label}deployments: no successful deployments",
            group.stats.total
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stats::{DeploymentStats, DurationSummary};
    use chrono::Utc;

    fn group(label: Option<&str>, total: usize, durations: Option<(i64, i64, i64)>) -> GroupStats {
        GroupStats {
            label: label.map(str::to_owned),
            stats: DeploymentStats {
                total,
                durations: durations.map(|(avg, min, max)| DurationSummary {
                    avg_duration_secs: avg,
                    min_duration_secs: min,
                    max_duration_secs: max,
                }),
            },
        }
    }

    mod render_group_line {
        use super::*;

        #[test]
        fn renders_unlabeled_group() {
            let line = render_group_line(&group(None, 12, Some((42, 10, 97))));
            assert_eq!(line, "- 12 deployments: avg 42 secs, min/max: 10/97 secs");
        }

        #[test]
        fn renders_labeled_group() {
            let line = render_group_line(&group(Some("old"), 3, Some((10, 10, 10))));
            assert_eq!(line, "- 3 old deployments: avg 10 secs, min/max: 10/10 secs");
        }

        #[test]
        fn renders_explicit_sentinel_without_successful_deployments() {
            let line = render_group_line(&group(Some("new"), 4, None));
            assert_eq!(line, "- 4 new deployments: no successful deployments");
        }
    }

    mod render_summary {
        use super::*;

        #[test]
        fn renders_header_and_one_line_per_group() {
            let report = LatencyReport {
                provider: "GitHub".to_owned(),
                repository: "octo/app".to_owned(),
                environment: "production".to_owned(),
                collected_at: Utc::now(),
                cutoff: None,
                total_deployments: 5,
                groups: vec![
                    group(Some("old"), 2, Some((15, 10, 20))),
                    group(Some("new"), 3, None),
                ],
            };

            let rendered = render_summary(&report);

            assert_eq!(
                rendered,
                "Fetched 5 deployments for production:\n\
                 - 2 old deployments: avg 15 secs, min/max: 10/20 secs\n\
                 - 3 new deployments: no successful deployments\n"
            );
        }
    }
}
