use anyhow::Result;
use chrono::{DateTime, Utc};
use clap::{Parser, Subcommand};
use log::info;
use std::path::PathBuf;

use crate::auth;
use crate::config::Config;
use crate::output;
use crate::providers::github::GitHubProvider;
use crate::stats::LatencyReport;

#[derive(Parser)]
#[command(name = "deploylens")]
#[command(author, version, about = "Deployment Latency Tool", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Write the JSON report to a file instead of stdout
    #[arg(short, long, global = true)]
    output: Option<PathBuf>,

    /// Path to a deploylens.toml config file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Emit the report as JSON instead of the human summary
    #[arg(short, long, global = true, default_value_t = false)]
    json: bool,

    /// Pretty-print JSON output
    #[arg(short, long, global = true, default_value_t = false)]
    pretty: bool,
}

#[derive(Subcommand)]
enum Commands {
    Github {
        /// Repository owner/organization
        owner: String,

        /// Repository name
        repo: String,

        /// Deployment environment (e.g., "production")
        environment: String,

        /// RFC 3339 cutoff instant splitting results into old/new groups
        #[arg(short = 'C', long)]
        cutoff: Option<DateTime<Utc>>,

        /// GitHub token; falls back to the config file, then `gh auth token`
        #[arg(short, long, env = "GITHUB_TOKEN")]
        token: Option<String>,

        /// GitHub API base URL
        #[arg(short, long)]
        url: Option<String>,

        /// Number of deployment pages to fetch (100 records each)
        #[arg(long)]
        pages: Option<usize>,
    },
}

impl Cli {
    #[allow(clippy::too_many_arguments)]
    async fn execute_github(
        &self,
        owner: &str,
        repo: &str,
        environment: &str,
        cutoff: Option<DateTime<Utc>>,
        token: Option<&str>,
        url: Option<&str>,
        pages: Option<usize>,
    ) -> Result<()> {
        info!("Collecting deployment latency for repository: {owner}/{repo}");

        let config = Config::load(self.config.as_deref())?;

        let token = auth::resolve_token(token, config.github.token.as_deref()).await?;
        let base_url = url.unwrap_or(&config.github.base_url);
        let pages = pages.unwrap_or(config.github.pages);

        let provider = GitHubProvider::new(base_url, owner.to_owned(), repo.to_owned(), &token)?;

        let report = provider.collect_report(environment, pages, cutoff).await?;

        self.emit(&report, &config)?;

        Ok(())
    }

    fn emit(&self, report: &LatencyReport, config: &Config) -> Result<()> {
        let as_json = self.json || config.output.json || self.output.is_some();

        if !as_json {
            output::print_summary(report);
            return Ok(());
        }

        let json_output = if self.pretty || config.output.pretty {
            serde_json::to_string_pretty(report)?
        } else {
            serde_json::to_string(report)?
        };

        if let Some(output_path) = &self.output {
            std::fs::write(output_path, json_output)?;
            info!("Report written to: {}", output_path.display());
        } else {
            println!("{json_output}");
        }

        Ok(())
    }

    pub async fn execute(&self) -> Result<()> {
        match &self.command {
            Commands::Github {
                owner,
                repo,
                environment,
                cutoff,
                token,
                url,
                pages,
            } => {
                self.execute_github(
                    owner,
                    repo,
                    environment,
                    *cutoff,
                    token.as_deref(),
                    url.as_deref(),
                    *pages,
                )
                .await
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn parse(args: &[&str]) -> Result<Cli, clap::Error> {
        Cli::try_parse_from(args)
    }

    #[test]
    fn parses_positional_owner_repo_environment() {
        let cli = parse(&["deploylens", "github", "octo", "app", "production"]).unwrap();
        let Commands::Github {
            owner,
            repo,
            environment,
            cutoff,
            pages,
            ..
        } = cli.command;
        assert_eq!(owner, "octo");
        assert_eq!(repo, "app");
        assert_eq!(environment, "production");
        assert_eq!(cutoff, None);
        assert_eq!(pages, None);
    }

    #[test]
    fn parses_rfc3339_cutoff() {
        let cli = parse(&[
            "deploylens",
            "github",
            "octo",
            "app",
            "production",
            "--cutoff",
            "2024-03-01T01:00:00Z",
        ])
        .unwrap();
        let Commands::Github { cutoff, .. } = cli.command;
        assert_eq!(
            cutoff,
            Some(Utc.with_ymd_and_hms(2024, 3, 1, 1, 0, 0).unwrap())
        );
    }

    #[test]
    fn rejects_a_malformed_cutoff() {
        let result = parse(&[
            "deploylens",
            "github",
            "octo",
            "app",
            "production",
            "--cutoff",
            "yesterday",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn missing_required_arguments_fail_before_any_network_use() {
        assert!(parse(&["deploylens", "github", "octo", "app"]).is_err());
        assert!(parse(&["deploylens", "github"]).is_err());
    }

    #[test]
    fn parses_pages_override() {
        let cli = parse(&[
            "deploylens",
            "github",
            "octo",
            "app",
            "production",
            "--pages",
            "2",
        ])
        .unwrap();
        let Commands::Github { pages, .. } = cli.command;
        assert_eq!(pages, Some(2));
    }
}
