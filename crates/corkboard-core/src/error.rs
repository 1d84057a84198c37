use thiserror::Error;

use corkboard_store::StoreError;

/// Errors surfaced by the coordinator and the configuration store.
#[derive(Error, Debug)]
pub enum BoardError {
    /// Malformed or missing required input. Surfaced to the caller
    /// immediately, never retried.
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// A configuration write failed validation; the prior configuration
    /// remains in effect.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Local store failure. Fatal to the operation in progress.
    #[error("Persistence error: {0}")]
    Persistence(#[from] StoreError),

    /// The referenced message does not exist.
    #[error("Message {0} not found")]
    NotFound(i64),

    /// Configuration file I/O failure.
    #[error("Configuration I/O error: {0}")]
    ConfigIo(#[from] std::io::Error),

    /// Configuration file is not valid JSON.
    #[error("Configuration parse error: {0}")]
    ConfigJson(#[from] serde_json::Error),

    /// A store lock was poisoned by a panicking writer.
    #[error("Store lock poisoned")]
    LockPoisoned,
}
