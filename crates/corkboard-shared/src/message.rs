//! The central message entity.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Sentinel repository tag meaning "local-only, no remote mirror".
pub const LOCAL_REPOSITORY: &str = "local";

/// Display name used when the author is absent or blank.
pub const DEFAULT_AUTHOR: &str = "Anonymous";

/// A single board message.
///
/// `id` is assigned by the local store on first insert and is `None` before
/// that. `reference_url` points at the remote-stored artifact and is only set
/// after a successful remote write. `remote_key` records the remote tree path
/// an imported message came from, so re-running an import can skip rows that
/// already exist locally.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Message {
    pub id: Option<i64>,
    pub content: String,
    pub author: String,
    pub timestamp: DateTime<Utc>,
    pub repository: String,
    pub reference_url: Option<String>,
    pub remote_key: Option<String>,
}

impl Message {
    /// Build an unpersisted message with resolved author and repository tags.
    pub fn new(
        content: impl Into<String>,
        author: Option<&str>,
        repository: Option<&str>,
        timestamp: DateTime<Utc>,
    ) -> Self {
        Self {
            id: None,
            content: content.into(),
            author: resolve_author(author),
            timestamp,
            repository: resolve_repository(repository),
            reference_url: None,
            remote_key: None,
        }
    }
}

/// Trim the supplied author, falling back to [`DEFAULT_AUTHOR`] when absent
/// or blank.
pub fn resolve_author(author: Option<&str>) -> String {
    match author.map(str::trim) {
        Some(a) if !a.is_empty() => a.to_string(),
        _ => DEFAULT_AUTHOR.to_string(),
    }
}

/// Trim the supplied repository tag, falling back to [`LOCAL_REPOSITORY`].
pub fn resolve_repository(repository: Option<&str>) -> String {
    match repository.map(str::trim) {
        Some(r) if !r.is_empty() => r.to_string(),
        _ => LOCAL_REPOSITORY.to_string(),
    }
}
