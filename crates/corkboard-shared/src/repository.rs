//! Remote repository mirror configuration.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::ConfigError;

fn default_branch() -> String {
    "main".to_string()
}

fn default_message_path() -> String {
    "messages".to_string()
}

/// One remote mirror target: a branch of a tree-structured content store
/// addressed by `owner/name`, with messages stored under `message_path`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RepositoryConfig {
    pub owner: String,
    pub name: String,
    #[serde(default = "default_branch")]
    pub branch: String,
    #[serde(default = "default_message_path")]
    pub message_path: String,
}

impl RepositoryConfig {
    /// Composite key matched against a message's `repository` tag.
    pub fn slug(&self) -> String {
        format!("{}/{}", self.owner, self.name)
    }
}

/// Parse and validate a repository configuration set.
///
/// Validation is atomic: any entry missing (or blank) `owner` or `name`
/// rejects the whole array.
pub fn parse_repositories(value: &Value) -> Result<Vec<RepositoryConfig>, ConfigError> {
    let entries = value.as_array().ok_or(ConfigError::NotAnArray)?;

    let mut repositories = Vec::with_capacity(entries.len());
    for (index, entry) in entries.iter().enumerate() {
        let owner = required_field(entry, index, "owner")?;
        let name = required_field(entry, index, "name")?;
        let branch = optional_field(entry, "branch").unwrap_or_else(default_branch);
        let message_path =
            optional_field(entry, "message_path").unwrap_or_else(default_message_path);

        repositories.push(RepositoryConfig {
            owner,
            name,
            branch,
            message_path,
        });
    }

    Ok(repositories)
}

fn required_field(entry: &Value, index: usize, field: &'static str) -> Result<String, ConfigError> {
    entry
        .get(field)
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .ok_or(ConfigError::MissingField { index, field })
}

fn optional_field(entry: &Value, field: &str) -> Option<String> {
    entry
        .get(field)
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}
