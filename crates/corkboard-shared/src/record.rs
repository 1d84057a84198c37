//! JSON record codec for messages stored in a remote tree.
//!
//! A record is the canonical serialized form of a [`Message`]: what gets
//! committed to a remote repository and what an import decodes back. Decoding
//! never assigns an id; that is the local store's job.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::RecordError;
use crate::message::{resolve_author, resolve_repository, Message};

/// Wire shape of a stored message record.
#[derive(Debug, Serialize, Deserialize)]
pub struct MessageRecord {
    pub content: String,
    pub author: String,
    /// RFC 3339 timestamp.
    pub timestamp: String,
    pub repository: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reference_url: Option<String>,
}

/// Serialize a message to its canonical JSON record.
pub fn encode(message: &Message) -> Result<String, RecordError> {
    let record = MessageRecord {
        content: message.content.clone(),
        author: message.author.clone(),
        timestamp: message.timestamp.to_rfc3339(),
        repository: message.repository.clone(),
        reference_url: message.reference_url.clone(),
    };
    Ok(serde_json::to_string_pretty(&record)?)
}

// Lenient mirror of MessageRecord so a missing field surfaces as a typed
// RecordError instead of an opaque serde message.
#[derive(Deserialize)]
struct RawRecord {
    content: Option<String>,
    author: Option<String>,
    timestamp: Option<String>,
    repository: Option<String>,
    reference_url: Option<String>,
}

/// Decode a JSON record into an unpersisted [`Message`].
///
/// Fails when `content` or `timestamp` is missing, or when the timestamp is
/// not RFC 3339. Author and repository fall back to their sentinels.
pub fn decode(raw: &str) -> Result<Message, RecordError> {
    let record: RawRecord = serde_json::from_str(raw)?;

    let content = record
        .content
        .filter(|c| !c.trim().is_empty())
        .ok_or(RecordError::MissingField("content"))?;

    let timestamp_str = record
        .timestamp
        .ok_or(RecordError::MissingField("timestamp"))?;
    let timestamp: DateTime<Utc> =
        DateTime::parse_from_rfc3339(&timestamp_str)?.with_timezone(&Utc);

    Ok(Message {
        id: None,
        content,
        author: resolve_author(record.author.as_deref()),
        timestamp,
        repository: resolve_repository(record.repository.as_deref()),
        reference_url: record.reference_url,
        remote_key: None,
    })
}

/// Compact numeric timestamp used for remote file names: `YYYYMMDDHHMMSS`.
pub fn path_stamp(timestamp: &DateTime<Utc>) -> String {
    timestamp.format("%Y%m%d%H%M%S").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn sample() -> Message {
        Message {
            id: None,
            content: "hello".into(),
            author: "alice".into(),
            timestamp: Utc.with_ymd_and_hms(2024, 3, 9, 12, 30, 45).unwrap(),
            repository: "octo/board".into(),
            reference_url: None,
            remote_key: None,
        }
    }

    #[test]
    fn round_trip_preserves_fields() {
        let message = sample();
        let decoded = decode(&encode(&message).unwrap()).unwrap();

        assert_eq!(decoded.content, message.content);
        assert_eq!(decoded.author, message.author);
        assert_eq!(decoded.repository, message.repository);
        assert_eq!(
            decoded.timestamp.timestamp(),
            message.timestamp.timestamp()
        );
    }

    #[test]
    fn decode_rejects_missing_content() {
        let raw = r#"{"timestamp": "2024-03-09T12:30:45Z"}"#;
        assert!(matches!(
            decode(raw),
            Err(RecordError::MissingField("content"))
        ));
    }

    #[test]
    fn decode_rejects_missing_timestamp() {
        let raw = r#"{"content": "hi"}"#;
        assert!(matches!(
            decode(raw),
            Err(RecordError::MissingField("timestamp"))
        ));
    }

    #[test]
    fn decode_rejects_garbage_timestamp() {
        let raw = r#"{"content": "hi", "timestamp": "yesterday"}"#;
        assert!(matches!(decode(raw), Err(RecordError::BadTimestamp(_))));
    }

    #[test]
    fn decode_defaults_author_and_repository() {
        let raw = r#"{"content": "hi", "timestamp": "2024-03-09T12:30:45Z"}"#;
        let decoded = decode(raw).unwrap();
        assert_eq!(decoded.author, "Anonymous");
        assert_eq!(decoded.repository, "local");
        assert!(decoded.id.is_none());
    }

    #[test]
    fn path_stamp_is_compact() {
        assert_eq!(path_stamp(&sample().timestamp), "20240309123045");
    }
}
