//! Validated key/value configuration persisted to a JSON file.
//!
//! Every read goes back to disk, so reconfiguration (via the CLI or another
//! process) takes effect without restarting the server. Writes are atomic:
//! the new document is written to a temp file and renamed over the old one,
//! so a failed validation or a crash never corrupts the prior configuration.

use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use serde_json::{Map, Value};
use tracing::debug;

use corkboard_shared::repository::parse_repositories;
use corkboard_shared::RepositoryConfig;

use crate::error::BoardError;

/// Reserved key holding the JSON array of remote repository definitions.
pub const REPOSITORIES_KEY: &str = "repositories";

/// Reserved key holding the remote API credential.
pub const GITHUB_TOKEN_KEY: &str = "github_token";

/// Handle on the durable configuration file. Cheap to clone; holds no cache.
#[derive(Debug, Clone)]
pub struct ConfigStore {
    path: PathBuf,
}

impl ConfigStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Open the configuration file in the platform config directory,
    /// e.g. `~/.config/corkboard/config.json` on Linux.
    pub fn open_default() -> Result<Self, BoardError> {
        let project_dirs = ProjectDirs::from("com", "corkboard", "corkboard")
            .ok_or_else(|| BoardError::InvalidConfig("no config directory available".into()))?;

        let config_dir = project_dirs.config_dir();
        std::fs::create_dir_all(config_dir)?;

        Ok(Self::new(config_dir.join("config.json")))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read one value. Absent key (or absent file) yields `None`.
    pub fn get(&self, key: &str) -> Result<Option<Value>, BoardError> {
        Ok(self.read_all()?.get(key).cloned())
    }

    /// Write one value.
    ///
    /// The reserved [`REPOSITORIES_KEY`] is validated before anything is
    /// persisted: the whole set is rejected if any entry is missing `owner`
    /// or `name`, and the prior configuration stays in effect.
    pub fn set(&self, key: &str, value: Value) -> Result<(), BoardError> {
        if key == REPOSITORIES_KEY {
            parse_repositories(&value)
                .map_err(|e| BoardError::InvalidConfig(e.to_string()))?;
        }

        let mut entries = self.read_all()?;
        entries.insert(key.to_string(), value);
        self.write_all(&entries)?;

        debug!(key, path = %self.path.display(), "configuration updated");
        Ok(())
    }

    /// Remove one key. Returns whether it existed.
    pub fn delete(&self, key: &str) -> Result<bool, BoardError> {
        let mut entries = self.read_all()?;
        let existed = entries.remove(key).is_some();
        if existed {
            self.write_all(&entries)?;
        }
        Ok(existed)
    }

    /// All persisted entries, for CLI listing.
    pub fn entries(&self) -> Result<Vec<(String, Value)>, BoardError> {
        Ok(self.read_all()?.into_iter().collect())
    }

    /// The validated remote repository definitions. Absent key means no
    /// mirrors are configured.
    pub fn repositories(&self) -> Result<Vec<RepositoryConfig>, BoardError> {
        match self.get(REPOSITORIES_KEY)? {
            Some(value) => parse_repositories(&value)
                .map_err(|e| BoardError::InvalidConfig(e.to_string())),
            None => Ok(Vec::new()),
        }
    }

    /// The remote API credential, if configured.
    pub fn github_token(&self) -> Result<Option<String>, BoardError> {
        Ok(self
            .get(GITHUB_TOKEN_KEY)?
            .and_then(|v| v.as_str().map(str::to_string))
            .filter(|t| !t.is_empty()))
    }

    fn read_all(&self) -> Result<Map<String, Value>, BoardError> {
        let raw = match std::fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Map::new()),
            Err(e) => return Err(e.into()),
        };

        match serde_json::from_str::<Value>(&raw)? {
            Value::Object(map) => Ok(map),
            _ => Err(BoardError::InvalidConfig(
                "configuration file must hold a JSON object".into(),
            )),
        }
    }

    fn write_all(&self, entries: &Map<String, Value>) -> Result<(), BoardError> {
        let tmp = self.path.with_extension("json.tmp");
        std::fs::write(&tmp, serde_json::to_string_pretty(entries)?)?;
        std::fs::rename(&tmp, &self.path)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn temp_store() -> (tempfile::TempDir, ConfigStore) {
        let dir = tempfile::tempdir().unwrap();
        let store = ConfigStore::new(dir.path().join("config.json"));
        (dir, store)
    }

    #[test]
    fn get_set_delete_round_trip() {
        let (_dir, store) = temp_store();

        assert!(store.get("github_token").unwrap().is_none());

        store.set("github_token", json!("ghp_abc")).unwrap();
        assert_eq!(store.github_token().unwrap().as_deref(), Some("ghp_abc"));

        assert!(store.delete("github_token").unwrap());
        assert!(!store.delete("github_token").unwrap());
        assert!(store.github_token().unwrap().is_none());
    }

    #[test]
    fn invalid_repository_set_leaves_prior_config_intact() {
        let (_dir, store) = temp_store();

        store
            .set(REPOSITORIES_KEY, json!([{"owner": "a", "name": "b"}]))
            .unwrap();

        let err = store
            .set(REPOSITORIES_KEY, json!([{"owner": "a"}]))
            .unwrap_err();
        assert!(matches!(err, BoardError::InvalidConfig(_)));

        // Prior value still in effect.
        let repos = store.repositories().unwrap();
        assert_eq!(repos.len(), 1);
        assert_eq!(repos[0].slug(), "a/b");
    }

    #[test]
    fn missing_file_reads_as_empty() {
        let (_dir, store) = temp_store();
        assert!(store.repositories().unwrap().is_empty());
        assert!(store.entries().unwrap().is_empty());
    }

    #[test]
    fn reads_reflect_external_writes() {
        let (_dir, store) = temp_store();
        store.set("github_token", json!("first")).unwrap();

        // Another handle on the same file sees the latest state: no caching.
        let other = ConfigStore::new(store.path().to_path_buf());
        other.set("github_token", json!("second")).unwrap();

        assert_eq!(store.github_token().unwrap().as_deref(), Some("second"));
    }
}
