// Configuration module: gathers everything the GitHub client needs from the
// process environment. The defaults match the club's data repository so the
// tool works out of the box on league night; each value can be overridden
// with an environment variable for testing or for other repositories.

use anyhow::{bail, Context, Result};
use std::path::PathBuf;

/// Environment variable holding the personal access token.
pub const TOKEN_ENV: &str = "GITHUB_PERSONAL_ACCESS_TOKEN";
/// Override for the destination repository (`owner/name`).
pub const REPO_ENV: &str = "LADDER_REPO";
/// Override for the destination branch.
pub const BRANCH_ENV: &str = "LADDER_BRANCH";
/// Override for the API base URL (useful against a test server or GHE).
pub const API_URL_ENV: &str = "GITHUB_API_URL";

const DEFAULT_REPO: &str = "badgerminton/badgerminton-data";
const DEFAULT_BRANCH: &str = "main";
const DEFAULT_API_URL: &str = "https://api.github.com";

/// Resolved configuration for one run. The token is required; everything
/// else falls back to the defaults above.
#[derive(Debug, Clone)]
pub struct Config {
    pub token: String,
    pub repo: String,
    pub branch: String,
    pub api_url: String,
}

impl Config {
    /// Build a Config from the environment. The token comes from
    /// `GITHUB_PERSONAL_ACCESS_TOKEN` or, failing that, a token file in the
    /// user's home directory. A missing token is an error here rather than
    /// an opaque 401 from the API later.
    pub fn from_env() -> Result<Self> {
        let token = match std::env::var(TOKEN_ENV) {
            Ok(t) if !t.is_empty() => t,
            _ => load_token_file().with_context(|| {
                format!(
                    "no GitHub token: set {} or create {}",
                    TOKEN_ENV,
                    token_file_path().display()
                )
            })?,
        };

        Ok(Config {
            token,
            repo: std::env::var(REPO_ENV).unwrap_or_else(|_| DEFAULT_REPO.into()),
            branch: std::env::var(BRANCH_ENV).unwrap_or_else(|_| DEFAULT_BRANCH.into()),
            api_url: std::env::var(API_URL_ENV).unwrap_or_else(|_| DEFAULT_API_URL.into()),
        })
    }
}

/// Location of the fallback token file (`~/.ladder_token`).
pub fn token_file_path() -> PathBuf {
    let dir = dirs::home_dir().unwrap_or_else(|| PathBuf::from("."));
    dir.join(".ladder_token")
}

/// Read the token file, trimming the trailing newline editors like to add.
fn load_token_file() -> Result<String> {
    let path = token_file_path();
    let data = std::fs::read_to_string(&path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    let token = data.trim().to_string();
    if token.is_empty() {
        bail!("token file {} is empty", path.display());
    }
    Ok(token)
}
