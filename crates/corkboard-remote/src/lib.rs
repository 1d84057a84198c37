//! # corkboard-remote
//!
//! Best-effort bridge to a remote tree-structured content store addressed by
//! `owner/name/branch/path`. The [`Mirror`] trait is the boundary contract
//! the coordinator consumes; [`GithubClient`] implements it against the
//! GitHub REST API.
//!
//! Nothing in this crate is fatal to a caller: transport failures are logged
//! and degrade to an empty list or a missing reference URL, so a remote
//! outage can never take down local functionality.

pub mod github;

mod error;

use async_trait::async_trait;

use corkboard_shared::{Message, RepositoryConfig};

pub use error::RemoteError;
pub use github::GithubClient;

/// Boundary contract for a remote message mirror.
///
/// Both operations are total: implementations absorb their own transport
/// failures and report degraded results instead of errors.
#[async_trait]
pub trait Mirror: Send + Sync {
    /// Fetch and decode every message stored under the configured path.
    ///
    /// An absent repository or branch yields an empty list, as does any
    /// transport failure.
    async fn list_messages(&self, repo: &RepositoryConfig) -> Vec<Message>;

    /// Write one message to the remote store.
    ///
    /// Returns the remote-provided reference URL on success, `None` on any
    /// failure.
    async fn store_message(&self, message: &Message, repo: &RepositoryConfig) -> Option<String>;
}
