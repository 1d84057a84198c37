use thiserror::Error;

/// Errors produced when decoding a stored message record.
#[derive(Error, Debug)]
pub enum RecordError {
    /// The record is not valid JSON.
    #[error("Malformed record JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// A required field is absent.
    #[error("Record missing required field `{0}`")]
    MissingField(&'static str),

    /// The timestamp field is present but not parseable as RFC 3339.
    #[error("Unparseable record timestamp: {0}")]
    BadTimestamp(#[from] chrono::ParseError),
}

/// Errors produced when validating a repository configuration set.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Repository configuration must be a JSON array")]
    NotAnArray,

    #[error("Repository entry {index} missing required field `{field}`")]
    MissingField { index: usize, field: &'static str },
}
