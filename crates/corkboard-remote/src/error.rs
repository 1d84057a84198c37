use thiserror::Error;

/// Errors internal to the remote client. These never cross the [`Mirror`]
/// boundary; they are logged and absorbed into degraded results.
///
/// [`Mirror`]: crate::Mirror
#[derive(Error, Debug)]
pub enum RemoteError {
    /// Transport or HTTP-status failure.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The credential could not be turned into a request header.
    #[error("Invalid credential: {0}")]
    Credential(#[from] reqwest::header::InvalidHeaderValue),

    /// Blob payload was not valid base64.
    #[error("Base64 decode error: {0}")]
    Base64(#[from] base64::DecodeError),

    /// Blob payload was not valid UTF-8.
    #[error("Blob is not UTF-8: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),

    /// Blob decoded but did not contain a valid message record.
    #[error(transparent)]
    Record(#[from] corkboard_shared::RecordError),
}
