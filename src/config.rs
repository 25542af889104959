use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{DeployLensError, Result};

/// Configuration file structure for DeployLens.
///
/// Allows users to save common settings and reuse them across runs. Loaded
/// from an explicit `--config` path, `deploylens.toml` in the current
/// directory, or `deploylens/config.toml` in the user config directory;
/// command-line flags always win over file values.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(rename_all = "kebab-case", default)]
pub struct Config {
    /// Default GitHub configuration
    pub github: GitHubConfig,

    /// Output format preferences
    pub output: OutputConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "kebab-case", default)]
pub struct GitHubConfig {
    /// GitHub personal access token
    pub token: Option<String>,

    /// GitHub API base URL
    pub base_url: String,

    /// Number of deployment pages fetched per run (100 records each)
    pub pages: usize,
}

impl Default for GitHubConfig {
    fn default() -> Self {
        Self {
            token: None,
            base_url: default_base_url(),
            pages: default_pages(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(rename_all = "kebab-case", default)]
pub struct OutputConfig {
    /// Emit the report as JSON instead of the human summary
    pub json: bool,

    /// Pretty-print JSON output
    pub pretty: bool,
}

fn default_base_url() -> String {
    "https://api.github.com".to_owned()
}

const fn default_pages() -> usize {
    5
}

impl Config {
    /// Loads configuration, falling back to defaults when no file exists.
    ///
    /// An explicitly supplied path must exist; the well-known locations are
    /// optional.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        if let Some(path) = explicit {
            if !path.exists() {
                return Err(DeployLensError::Config(format!(
                    "config file not found: {}",
                    path.display()
                )));
            }
            return Self::from_file(path);
        }

        for path in Self::well_known_paths() {
            if path.exists() {
                return Self::from_file(&path);
            }
        }

        Ok(Self::default())
    }

    fn from_file(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        toml::from_str(&contents).map_err(|e| {
            DeployLensError::Config(format!("failed to parse {}: {e}", path.display()))
        })
    }

    fn well_known_paths() -> Vec<PathBuf> {
        let mut paths = vec![PathBuf::from("deploylens.toml")];
        if let Some(config_dir) = dirs::config_dir() {
            paths.push(config_dir.join("deploylens").join("config.toml"));
        }
        paths
    }
}
