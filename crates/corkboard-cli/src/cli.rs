//! CLI parser and command handlers for the configuration store.

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use serde_json::Value;

use corkboard_core::ConfigStore;

#[derive(Parser)]
#[command(name = "corkboard")]
#[command(about = "Message board configuration CLI", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Configuration file (falls back to CONFIG_PATH, then the platform
    /// config directory).
    #[arg(long)]
    pub config: Option<std::path::PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Manage the configuration store
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
}

#[derive(Subcommand)]
pub enum ConfigCommands {
    /// List all configuration entries
    List,
    /// Get one configuration value
    Get { key: String },
    /// Set a configuration value (JSON or plain string).
    /// The `repositories` key is validated before anything is written.
    Set { key: String, value: String },
    /// Delete a configuration key
    Delete { key: String },
}

/// Resolve the configuration store from `--config`, `CONFIG_PATH`, or the
/// platform default.
pub fn open_store(config: Option<std::path::PathBuf>) -> Result<ConfigStore> {
    if let Some(path) = config {
        return Ok(ConfigStore::new(path));
    }
    if let Ok(path) = std::env::var("CONFIG_PATH") {
        return Ok(ConfigStore::new(path));
    }
    ConfigStore::open_default().context("could not open the default configuration store")
}

pub fn run(store: &ConfigStore, command: ConfigCommands) -> Result<()> {
    match command {
        ConfigCommands::List => {
            for (key, value) in store.entries()? {
                println!("{key}={}", format_value(&value));
            }
        }
        ConfigCommands::Get { key } => match store.get(&key)? {
            Some(value) => println!("{}", format_value(&value)),
            None => bail!("configuration key '{key}' not found"),
        },
        ConfigCommands::Set { key, value } => {
            let parsed = parse_value(&value);
            store.set(&key, parsed.clone())?;
            println!("Set {key}={}", format_value(&parsed));
        }
        ConfigCommands::Delete { key } => {
            if store.delete(&key)? {
                println!("Deleted {key}");
            } else {
                bail!("configuration key '{key}' not found");
            }
        }
    }
    Ok(())
}

/// Interpret the supplied value as JSON when possible, otherwise store it as
/// a plain string (so tokens don't need quoting on the shell).
fn parse_value(raw: &str) -> Value {
    serde_json::from_str(raw).unwrap_or_else(|_| Value::String(raw.to_string()))
}

fn format_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => serde_json::to_string_pretty(other).unwrap_or_else(|_| other.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn plain_strings_are_stored_verbatim() {
        assert_eq!(parse_value("ghp_token"), json!("ghp_token"));
        assert_eq!(parse_value(r#"[{"owner":"a","name":"b"}]"#), json!([{"owner":"a","name":"b"}]));
    }

    #[test]
    fn set_rejects_invalid_repository_list() {
        let dir = tempfile::tempdir().unwrap();
        let store = ConfigStore::new(dir.path().join("config.json"));

        let err = run(
            &store,
            ConfigCommands::Set {
                key: "repositories".into(),
                value: r#"[{"owner":"a"}]"#.into(),
            },
        )
        .unwrap_err();
        assert!(err.to_string().contains("Invalid configuration"));

        run(
            &store,
            ConfigCommands::Set {
                key: "repositories".into(),
                value: r#"[{"owner":"a","name":"b"}]"#.into(),
            },
        )
        .unwrap();
        assert_eq!(store.repositories().unwrap().len(), 1);
    }

    #[test]
    fn get_missing_key_fails() {
        let dir = tempfile::tempdir().unwrap();
        let store = ConfigStore::new(dir.path().join("config.json"));
        assert!(run(&store, ConfigCommands::Get { key: "nope".into() }).is_err());
    }
}
