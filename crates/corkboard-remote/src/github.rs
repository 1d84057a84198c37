//! GitHub REST implementation of the [`Mirror`] contract.
//!
//! Reads go through the git data API (recursive tree listing + blob fetch);
//! writes go through the contents API as an upsert-style PUT. A 404 on the
//! tree listing means the repository or branch does not exist yet and is
//! treated as an empty mirror, not an error.

use std::time::Duration;

use async_trait::async_trait;
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use chrono::{DateTime, Utc};
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION};
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use corkboard_shared::record::{self, path_stamp};
use corkboard_shared::{Message, RepositoryConfig};

use crate::error::RemoteError;
use crate::Mirror;

const GITHUB_API_BASE: &str = "https://api.github.com";

/// Remote writes are bounded so a slow mirror cannot stall a post
/// indefinitely.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Authenticated GitHub API client.
pub struct GithubClient {
    http: reqwest::Client,
    api_base: String,
}

#[derive(Deserialize)]
struct TreeResponse {
    tree: Vec<TreeEntry>,
}

#[derive(Deserialize)]
struct TreeEntry {
    path: String,
    sha: String,
}

#[derive(Deserialize)]
struct BlobResponse {
    content: String,
}

#[derive(Serialize)]
struct PutFileRequest {
    message: String,
    content: String,
    branch: String,
}

#[derive(Deserialize)]
struct PutFileResponse {
    content: Option<PutFileContent>,
}

#[derive(Deserialize)]
struct PutFileContent {
    html_url: Option<String>,
}

impl GithubClient {
    /// Build a client authenticated with a personal access token.
    pub fn new(token: &str) -> Result<Self, RemoteError> {
        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, HeaderValue::from_str(&format!("token {token}"))?);
        headers.insert(
            ACCEPT,
            HeaderValue::from_static("application/vnd.github.v3+json"),
        );

        let http = reqwest::Client::builder()
            .user_agent(concat!("corkboard/", env!("CARGO_PKG_VERSION")))
            .default_headers(headers)
            .timeout(REQUEST_TIMEOUT)
            .build()?;

        Ok(Self {
            http,
            api_base: GITHUB_API_BASE.to_string(),
        })
    }

    /// Point the client at a different API base URL (test servers,
    /// GitHub Enterprise).
    pub fn with_api_base(mut self, api_base: impl Into<String>) -> Self {
        self.api_base = api_base.into();
        self
    }

    async fn try_list(&self, repo: &RepositoryConfig) -> Result<Vec<Message>, RemoteError> {
        let tree_url = format!(
            "{}/repos/{}/{}/git/trees/{}?recursive=1",
            self.api_base, repo.owner, repo.name, repo.branch
        );

        let response = self.http.get(&tree_url).send().await?;
        if response.status() == StatusCode::NOT_FOUND {
            debug!(repo = %repo.slug(), branch = %repo.branch, "remote tree not found");
            return Ok(Vec::new());
        }
        let tree: TreeResponse = response.error_for_status()?.json().await?;

        let mut messages = Vec::new();
        for entry in tree
            .tree
            .iter()
            .filter(|e| is_message_entry(&e.path, &repo.message_path))
        {
            match self.fetch_message(repo, entry).await {
                Ok(message) => messages.push(message),
                // A single unreadable blob is skipped; transport failures
                // abort the whole listing and degrade to empty at the
                // Mirror boundary.
                Err(RemoteError::Http(e)) => return Err(RemoteError::Http(e)),
                Err(e) => {
                    warn!(path = %entry.path, error = %e, "skipping malformed remote record");
                }
            }
        }

        Ok(messages)
    }

    async fn fetch_message(
        &self,
        repo: &RepositoryConfig,
        entry: &TreeEntry,
    ) -> Result<Message, RemoteError> {
        let blob_url = format!(
            "{}/repos/{}/{}/git/blobs/{}",
            self.api_base, repo.owner, repo.name, entry.sha
        );

        let blob: BlobResponse = self
            .http
            .get(&blob_url)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        let mut message = decode_blob_payload(&blob.content)?;
        message.repository = repo.slug();
        message.remote_key = Some(entry.path.clone());
        Ok(message)
    }

    async fn try_store(
        &self,
        message: &Message,
        repo: &RepositoryConfig,
    ) -> Result<Option<String>, RemoteError> {
        let file_path = message_file_path(&repo.message_path, &message.timestamp);
        let url = format!(
            "{}/repos/{}/{}/contents/{}",
            self.api_base, repo.owner, repo.name, file_path
        );

        let body = PutFileRequest {
            message: format!("Add message from {}", message.author),
            content: BASE64.encode(record::encode(message)?),
            branch: repo.branch.clone(),
        };

        let response: PutFileResponse = self
            .http
            .put(&url)
            .json(&body)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        Ok(response.content.and_then(|c| c.html_url))
    }
}

#[async_trait]
impl Mirror for GithubClient {
    async fn list_messages(&self, repo: &RepositoryConfig) -> Vec<Message> {
        match self.try_list(repo).await {
            Ok(messages) => messages,
            Err(e) => {
                warn!(repo = %repo.slug(), error = %e, "failed to list remote messages");
                Vec::new()
            }
        }
    }

    async fn store_message(&self, message: &Message, repo: &RepositoryConfig) -> Option<String> {
        match self.try_store(message, repo).await {
            Ok(url) => url,
            Err(e) => {
                warn!(repo = %repo.slug(), error = %e, "failed to mirror message");
                None
            }
        }
    }
}

/// Whether a tree entry holds a message record.
fn is_message_entry(path: &str, message_path: &str) -> bool {
    path.starts_with(message_path) && path.ends_with(".json")
}

/// Deterministic remote path for a message.
///
/// Two messages in the same second collide on the same path and the second
/// upsert overwrites the first remotely; the local store keeps both rows.
fn message_file_path(message_path: &str, timestamp: &DateTime<Utc>) -> String {
    format!("{}/{}.json", message_path, path_stamp(timestamp))
}

/// Decode a base64 blob payload (GitHub inserts line breaks) into a message.
fn decode_blob_payload(payload: &str) -> Result<Message, RemoteError> {
    let cleaned: String = payload.chars().filter(|c| !c.is_whitespace()).collect();
    let bytes = BASE64.decode(cleaned)?;
    let text = String::from_utf8(bytes)?;
    Ok(record::decode(&text)?)
}
