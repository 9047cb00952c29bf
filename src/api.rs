// API client module: contains a small blocking HTTP client that talks to
// the GitHub REST v3 API. It is intentionally small and synchronous; the
// only endpoints it knows are the ones the uploader needs (repository
// lookup plus the contents get/create/update trio).

use anyhow::{Context, Result};
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use reqwest::blocking::Client;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION, USER_AGENT};
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::config::Config;

/// GitHub asks clients to send this media type on every v3 request.
const GITHUB_ACCEPT: &str = "application/vnd.github+json";

/// Simple API client that holds a reqwest blocking client, the API base URL
/// and the personal access token used for authenticated calls.
#[derive(Clone)]
pub struct GithubClient {
    client: Client,
    api_url: String,
    token: String,
}

/// Repository metadata, as much of it as the uploader cares about.
#[derive(Deserialize, Debug)]
pub struct Repo {
    pub full_name: String,
    pub default_branch: String,
}

/// An existing remote file. `sha` is the concurrency token the update
/// endpoint demands back.
#[derive(Deserialize, Debug, Clone)]
pub struct RemoteFile {
    pub name: String,
    pub path: String,
    pub sha: String,
    #[serde(default)]
    pub size: u64,
}

/// One entry of a directory listing.
#[derive(Deserialize, Debug)]
pub struct DirEntry {
    pub name: String,
    pub path: String,
    #[serde(rename = "type")]
    pub entry_type: String,
}

/// Outcome of a contents lookup. The contents endpoint returns an object
/// for a file and an array for a directory; a 404 means nothing is there.
/// Anything else (auth, network, rate limit) is reported as an error by
/// `get_contents`, never folded into one of these.
#[derive(Debug)]
pub enum ContentLookup {
    File(RemoteFile),
    Directory(Vec<DirEntry>),
    Missing,
}

/// Body of a contents PUT. GitHub wants the bytes base64 encoded, and the
/// current blob sha only when replacing an existing file.
#[derive(Serialize, Debug)]
struct WriteRequest<'a> {
    message: &'a str,
    content: String,
    branch: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    sha: Option<&'a str>,
}

/// The slice of the PUT response we report back to the user.
#[derive(Deserialize, Debug)]
pub struct WriteResponse {
    pub commit: CommitSummary,
}

#[derive(Deserialize, Debug)]
pub struct CommitSummary {
    pub sha: String,
}

impl GithubClient {
    /// Create a client from the resolved configuration.
    pub fn new(config: &Config) -> Result<Self> {
        let client = Client::builder()
            .build()
            .context("Failed to build HTTP client")?;
        Ok(GithubClient {
            client,
            api_url: config.api_url.clone(),
            token: config.token.clone(),
        })
    }

    /// Headers every request carries: bearer auth, the GitHub media type,
    /// and a User-Agent (GitHub rejects requests without one).
    fn headers(&self) -> HeaderMap {
        let mut headers = HeaderMap::new();
        let val = format!("Bearer {}", self.token);
        headers.insert(AUTHORIZATION, HeaderValue::from_str(&val).unwrap());
        headers.insert(ACCEPT, HeaderValue::from_static(GITHUB_ACCEPT));
        headers.insert(USER_AGENT, HeaderValue::from_static("ladder-cli"));
        headers
    }

    /// Fetch repository metadata. Doubles as the auth check: a bad token or
    /// a wrong repo name fails here, before anything is written.
    pub fn get_repo(&self, repo: &str) -> Result<Repo> {
        let url = format!("{}/repos/{}", self.api_url, repo);
        let res = self
            .client
            .get(&url)
            .headers(self.headers())
            .send()
            .context("Failed to send repository request")?;
        if !res.status().is_success() {
            let status = res.status();
            let txt = res.text().unwrap_or_else(|_| "".into());
            anyhow::bail!("Repository lookup failed: {} - {}", status, txt);
        }
        let repo: Repo = res.json().context("Parsing repository response json")?;
        Ok(repo)
    }

    /// Look up `path` on `branch`. Only a 404 becomes `Missing`; any other
    /// failure surfaces so the caller never mistakes an outage for an
    /// absent file.
    pub fn get_contents(&self, repo: &str, path: &str, branch: &str) -> Result<ContentLookup> {
        let url = format!("{}/repos/{}/contents/{}", self.api_url, repo, path);
        let res = self
            .client
            .get(&url)
            .headers(self.headers())
            .query(&[("ref", branch)])
            .send()
            .context("Failed to send contents request")?;
        if res.status() == StatusCode::NOT_FOUND {
            return Ok(ContentLookup::Missing);
        }
        if !res.status().is_success() {
            let status = res.status();
            let txt = res.text().unwrap_or_else(|_| "".into());
            anyhow::bail!("Contents lookup failed: {} - {}", status, txt);
        }
        let body: Value = res.json().context("Parsing contents response json")?;
        parse_contents(body)
    }

    /// Create a new file at `path` on `branch`.
    pub fn create_file(
        &self,
        repo: &str,
        path: &str,
        message: &str,
        content: &[u8],
        branch: &str,
    ) -> Result<WriteResponse> {
        self.put_contents(repo, path, message, content, branch, None)
    }

    /// Replace the file at `path`, handing back the sha fetched just before
    /// so the host can reject a stale write.
    pub fn update_file(
        &self,
        repo: &str,
        path: &str,
        message: &str,
        content: &[u8],
        sha: &str,
        branch: &str,
    ) -> Result<WriteResponse> {
        self.put_contents(repo, path, message, content, branch, Some(sha))
    }

    fn put_contents(
        &self,
        repo: &str,
        path: &str,
        message: &str,
        content: &[u8],
        branch: &str,
        sha: Option<&str>,
    ) -> Result<WriteResponse> {
        let url = format!("{}/repos/{}/contents/{}", self.api_url, repo, path);
        let body = WriteRequest {
            message,
            content: BASE64.encode(content),
            branch,
            sha,
        };
        let res = self
            .client
            .put(&url)
            .headers(self.headers())
            .json(&body)
            .send()
            .context("Failed to send contents write request")?;
        if !res.status().is_success() {
            let status = res.status();
            let txt = res.text().unwrap_or_else(|_| "".into());
            anyhow::bail!("Contents write failed: {} - {}", status, txt);
        }
        let resp: WriteResponse = res.json().context("Parsing contents write response json")?;
        Ok(resp)
    }
}

/// Classify a successful contents response body: an array is a directory
/// listing, an object is a single file.
fn parse_contents(body: Value) -> Result<ContentLookup> {
    if body.is_array() {
        let entries: Vec<DirEntry> =
            serde_json::from_value(body).context("Parsing directory listing")?;
        return Ok(ContentLookup::Directory(entries));
    }
    let file: RemoteFile = serde_json::from_value(body).context("Parsing file metadata")?;
    Ok(ContentLookup::File(file))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn parse_contents_single_file() {
        let body = json!({
            "name": "data.csv",
            "path": "data.csv",
            "sha": "abc123",
            "size": 8,
            "type": "file"
        });
        match parse_contents(body).unwrap() {
            ContentLookup::File(f) => {
                assert_eq!(f.path, "data.csv");
                assert_eq!(f.sha, "abc123");
                assert_eq!(f.size, 8);
            }
            other => panic!("expected file, got {:?}", other),
        }
    }

    #[test]
    fn parse_contents_directory_listing() {
        let body = json!([
            {"name": "week1.json", "path": "results/week1.json", "sha": "aaa", "type": "file"},
            {"name": "week2.json", "path": "results/week2.json", "sha": "bbb", "type": "file"}
        ]);
        match parse_contents(body).unwrap() {
            ContentLookup::Directory(entries) => {
                assert_eq!(entries.len(), 2);
                assert_eq!(entries[0].entry_type, "file");
                assert_eq!(entries[1].path, "results/week2.json");
            }
            other => panic!("expected directory, got {:?}", other),
        }
    }

    #[test]
    fn parse_contents_rejects_malformed_body() {
        let body = json!({"message": "Bad credentials"});
        assert!(parse_contents(body).is_err());
    }

    #[test]
    fn write_request_create_omits_sha() {
        let req = WriteRequest {
            message: "weekly results",
            content: BASE64.encode(b"a,b\n1,2\n"),
            branch: "main",
            sha: None,
        };
        let v = serde_json::to_value(&req).unwrap();
        assert_eq!(v["message"], "weekly results");
        assert_eq!(v["branch"], "main");
        assert_eq!(v["content"], "YSxiCjEsMgo=");
        assert!(v.get("sha").is_none());
    }

    #[test]
    fn write_request_update_carries_sha() {
        let req = WriteRequest {
            message: "weekly results",
            content: BASE64.encode(b"a,b\n1,2\n"),
            branch: "main",
            sha: Some("abc123"),
        };
        let v = serde_json::to_value(&req).unwrap();
        assert_eq!(v["sha"], "abc123");
    }

    #[test]
    fn write_response_extracts_commit_sha() {
        let body = json!({
            "content": {"name": "data.csv", "path": "data.csv", "sha": "def456"},
            "commit": {"sha": "0123abcd", "message": "weekly results"}
        });
        let resp: WriteResponse = serde_json::from_value(body).unwrap();
        assert_eq!(resp.commit.sha, "0123abcd");
    }
}
