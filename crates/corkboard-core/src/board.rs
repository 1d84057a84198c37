//! Dual-write coordinator.
//!
//! Every post is committed to the local store first; that insert is the only
//! fatal step. A remote mirror write is attempted afterwards, and only when
//! the message names a configured repository, so a remote outage degrades to
//! a missing reference URL instead of a failed post.
//!
//! Concurrency: store access is a scoped mutex acquisition released before
//! any mirror call awaits, so a slow remote cannot stall local reads or
//! writes. Repository configuration is re-read from disk on every operation,
//! making reconfiguration take effect without restart.

use std::sync::{Arc, Mutex, MutexGuard};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use corkboard_remote::Mirror;
use corkboard_shared::{Message, RepositoryConfig, LOCAL_REPOSITORY};
use corkboard_store::Database;

use crate::config::ConfigStore;
use crate::error::BoardError;

/// An inbound "post message" request.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct NewMessage {
    pub content: String,
    pub author: Option<String>,
    pub repository: Option<String>,
    /// Server clock when absent; supplied only by import-style callers.
    pub timestamp: Option<DateTime<Utc>>,
}

/// Outcome of one remote import run.
#[derive(Debug, Default, Clone, Serialize, PartialEq, Eq)]
pub struct ImportReport {
    /// Messages decoded from all configured remotes.
    pub fetched: usize,
    /// Rows actually inserted (fetched minus already-imported duplicates).
    pub inserted: usize,
}

/// The message board coordinator.
pub struct MessageBoard {
    store: Arc<Mutex<Database>>,
    mirror: Option<Arc<dyn Mirror>>,
    config: ConfigStore,
}

impl MessageBoard {
    pub fn new(
        store: Arc<Mutex<Database>>,
        mirror: Option<Arc<dyn Mirror>>,
        config: ConfigStore,
    ) -> Self {
        Self {
            store,
            mirror,
            config,
        }
    }

    /// Post a message: local commit (required), then remote mirror
    /// (best effort).
    pub async fn post(&self, new: NewMessage) -> Result<Message, BoardError> {
        let content = new.content.trim();
        if content.is_empty() {
            return Err(BoardError::InvalidRequest(
                "content must not be empty".into(),
            ));
        }

        let timestamp = new.timestamp.unwrap_or_else(Utc::now);
        let mut message = Message::new(
            content,
            new.author.as_deref(),
            new.repository.as_deref(),
            timestamp,
        );

        // Local commit is the durability source of truth; a failure here
        // aborts the whole operation.
        let id = self.store()?.insert_message(&message)?;
        message.id = Some(id);

        if let Some(repo) = self.mirror_target(&message.repository) {
            // The store lock is NOT held across this network call.
            if let Some(mirror) = &self.mirror {
                match mirror.store_message(&message, &repo).await {
                    Some(url) => {
                        if let Err(e) = self.store()?.set_reference_url(id, &url) {
                            warn!(id, error = %e, "mirrored but failed to record reference URL");
                        }
                        message.reference_url = Some(url);
                        info!(id, repo = %repo.slug(), "message mirrored");
                    }
                    None => {
                        // Already logged at the Mirror boundary; the local
                        // write stands.
                        debug!(id, repo = %repo.slug(), "mirror write failed, keeping local row");
                    }
                }
            }
        }

        Ok(message)
    }

    /// Most-recent messages from the local store only.
    pub async fn list(&self, limit: Option<i64>) -> Result<Vec<Message>, BoardError> {
        Ok(self.store()?.list_messages(limit.unwrap_or(0))?)
    }

    /// Pull every configured remote and batch-insert the results.
    ///
    /// Safe to re-run: rows already imported (matched by remote key) are
    /// skipped, and an absent remote repository contributes zero rows
    /// without failing the run.
    pub async fn import(&self) -> Result<ImportReport, BoardError> {
        let Some(mirror) = &self.mirror else {
            return Err(BoardError::InvalidConfig(
                "no remote credential configured".into(),
            ));
        };

        let mut report = ImportReport::default();
        for repo in self.config.repositories()? {
            let messages = mirror.list_messages(&repo).await;
            report.fetched += messages.len();
            if messages.is_empty() {
                continue;
            }
            let inserted = self.store()?.insert_messages(&messages)?;
            report.inserted += inserted;
            info!(
                repo = %repo.slug(),
                fetched = messages.len(),
                inserted,
                "imported remote messages"
            );
        }

        Ok(report)
    }

    /// Bump a reaction counter; returns the new count.
    pub async fn react(&self, message_id: i64, reaction: &str) -> Result<u64, BoardError> {
        let reaction = reaction.trim();
        if reaction.is_empty() {
            return Err(BoardError::InvalidRequest(
                "reaction type required".into(),
            ));
        }

        self.store()?
            .add_reaction(message_id, reaction)
            .map_err(|e| match e {
                corkboard_store::StoreError::NotFound => BoardError::NotFound(message_id),
                other => BoardError::Persistence(other),
            })
    }

    fn store(&self) -> Result<MutexGuard<'_, Database>, BoardError> {
        self.store.lock().map_err(|_| BoardError::LockPoisoned)
    }

    /// Resolve the mirror target for a repository tag: `"local"` never
    /// mirrors, anything else must match a configured `owner/name`.
    fn mirror_target(&self, repository: &str) -> Option<RepositoryConfig> {
        if repository == LOCAL_REPOSITORY {
            return None;
        }

        match self.config.repositories() {
            Ok(repos) => {
                let found = repos.into_iter().find(|r| r.slug() == repository);
                if found.is_none() {
                    debug!(repository, "no configured repository matches, skipping mirror");
                }
                found
            }
            Err(e) => {
                // A broken config file must not fail the (already durable)
                // post; it only disables mirroring.
                warn!(error = %e, "could not read repository configuration, skipping mirror");
                None
            }
        }
    }
}
