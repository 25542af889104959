use std::fmt;

use tokio::process::Command;

use crate::error::{DeployLensError, Result};

/// An opaque bearer token for the GitHub API.
#[derive(Clone)]
pub struct Token(String);

impl Token {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for Token {
    fn from(value: &str) -> Self {
        Self(value.to_owned())
    }
}

impl From<String> for Token {
    fn from(value: String) -> Self {
        Self(value)
    }
}

// Never print the token itself, not even in debug logs.
impl fmt::Debug for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Token(***)")
    }
}

/// Resolves the GitHub token to authenticate with.
///
/// Precedence: the explicit value (CLI flag or `GITHUB_TOKEN`), then the
/// config file, then whatever `gh auth token` prints for a logged-in
/// GitHub CLI.
pub async fn resolve_token(explicit: Option<&str>, from_config: Option<&str>) -> Result<Token> {
    if let Some(token) = explicit {
        return Ok(Token::from(token));
    }

    if let Some(token) = from_config {
        return Ok(Token::from(token));
    }

    from_gh_cli().await
}

async fn from_gh_cli() -> Result<Token> {
    let output = Command::new("gh")
        .args(["auth", "token"])
        .output()
        .await
        .map_err(|e| DeployLensError::Auth(format!("failed to invoke 'gh auth token': {e}")))?;

    if !output.status.success() {
        return Err(DeployLensError::Auth(
            "'gh auth token' exited with an error; pass --token or set GITHUB_TOKEN".to_owned(),
        ));
    }

    let token = String::from_utf8_lossy(&output.stdout).trim().to_owned();
    if token.is_empty() {
        return Err(DeployLensError::Auth(
            "no GitHub token available; pass --token or set GITHUB_TOKEN".to_owned(),
        ));
    }

    Ok(Token::from(token))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn token_exposes_inner_value() {
        let token = Token::from("abc123");
        assert_eq!(token.as_str(), "abc123");
    }

    #[test]
    fn token_debug_output_is_redacted() {
        let token = Token::from("super-secret");
        let debug = format!("{token:?}");
        assert!(!debug.contains("super-secret"));
        assert_eq!(debug, "Token(***)");
    }

    #[tokio::test]
    async fn resolve_token_prefers_explicit_value() {
        let token = resolve_token(Some("explicit"), Some("from-config"))
            .await
            .unwrap();
        assert_eq!(token.as_str(), "explicit");
    }

    #[tokio::test]
    async fn resolve_token_falls_back_to_config_value() {
        let token = resolve_token(None, Some("from-config")).await.unwrap();
        assert_eq!(token.as_str(), "from-config");
    }
}
