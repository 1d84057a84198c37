//! Message persistence: insert, batch import, ordered retrieval.

use chrono::{DateTime, Utc};
use rusqlite::params;

use corkboard_shared::Message;

use crate::database::Database;
use crate::error::{Result, StoreError};

/// Number of messages returned when the caller supplies no usable limit.
pub const DEFAULT_LIST_LIMIT: i64 = 100;

impl Database {
    /// Insert a single message and return the store-assigned id.
    pub fn insert_message(&self, message: &Message) -> Result<i64> {
        check_invariants(message)?;

        self.conn().execute(
            "INSERT INTO messages (content, author, timestamp, reference_url, repository, remote_key)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                message.content,
                message.author,
                message.timestamp.to_rfc3339(),
                message.reference_url,
                message.repository,
                message.remote_key,
            ],
        )?;

        Ok(self.conn().last_insert_rowid())
    }

    /// All-or-nothing bulk insert used by the remote import path.
    ///
    /// Every record is validated before the transaction starts, so a failed
    /// batch can be retried safely. Rows whose `remote_key` already exists
    /// locally are skipped, making repeated imports idempotent. Returns the
    /// number of rows actually inserted.
    pub fn insert_messages(&mut self, messages: &[Message]) -> Result<usize> {
        for message in messages {
            check_invariants(message)?;
        }

        let tx = self.conn_mut().transaction()?;
        let mut inserted = 0usize;
        {
            let mut stmt = tx.prepare(
                "INSERT OR IGNORE INTO messages
                     (content, author, timestamp, reference_url, repository, remote_key)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            )?;

            for message in messages {
                inserted += stmt.execute(params![
                    message.content,
                    message.author,
                    message.timestamp.to_rfc3339(),
                    message.reference_url,
                    message.repository,
                    message.remote_key,
                ])?;
            }
        }
        tx.commit()?;

        Ok(inserted)
    }

    /// Return at most `limit` most-recent messages, newest first.
    ///
    /// Ordering is by timestamp descending with ties broken by id descending,
    /// so retrieval is deterministic. A non-positive limit falls back to
    /// [`DEFAULT_LIST_LIMIT`].
    pub fn list_messages(&self, limit: i64) -> Result<Vec<Message>> {
        let limit = if limit > 0 { limit } else { DEFAULT_LIST_LIMIT };

        let mut stmt = self.conn().prepare(
            "SELECT id, content, author, timestamp, reference_url, repository, remote_key
             FROM messages
             ORDER BY timestamp DESC, id DESC
             LIMIT ?1",
        )?;

        let rows = stmt.query_map(params![limit], row_to_message)?;

        let mut messages = Vec::new();
        for row in rows {
            messages.push(row?);
        }
        Ok(messages)
    }

    /// Attach a remote reference URL to an already-persisted message.
    ///
    /// Write-once: only a row whose reference is still NULL is updated.
    /// Returns whether a row was changed.
    pub fn set_reference_url(&self, id: i64, url: &str) -> Result<bool> {
        let affected = self.conn().execute(
            "UPDATE messages SET reference_url = ?2
             WHERE id = ?1 AND reference_url IS NULL",
            params![id, url],
        )?;
        Ok(affected > 0)
    }

    /// Fetch a single message by id.
    pub fn get_message(&self, id: i64) -> Result<Message> {
        self.conn()
            .query_row(
                "SELECT id, content, author, timestamp, reference_url, repository, remote_key
                 FROM messages WHERE id = ?1",
                params![id],
                row_to_message,
            )
            .map_err(|e| match e {
                rusqlite::Error::QueryReturnedNoRows => StoreError::NotFound,
                other => StoreError::Sqlite(other),
            })
    }
}

fn check_invariants(message: &Message) -> Result<()> {
    if message.content.trim().is_empty() {
        return Err(StoreError::InvalidMessage("content must not be empty"));
    }
    if message.author.trim().is_empty() {
        return Err(StoreError::InvalidMessage("author must not be blank"));
    }
    Ok(())
}

fn row_to_message(row: &rusqlite::Row<'_>) -> rusqlite::Result<Message> {
    let ts_str: String = row.get(3)?;
    let timestamp: DateTime<Utc> = DateTime::parse_from_rfc3339(&ts_str)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| {
            rusqlite::Error::FromSqlConversionFailure(3, rusqlite::types::Type::Text, Box::new(e))
        })?;

    Ok(Message {
        id: Some(row.get(0)?),
        content: row.get(1)?,
        author: row.get(2)?,
        timestamp,
        reference_url: row.get(4)?,
        repository: row.get(5)?,
        remote_key: row.get(6)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn open_temp() -> (tempfile::TempDir, Database) {
        let dir = tempfile::tempdir().unwrap();
        let db = Database::open_at(&dir.path().join("test.db")).unwrap();
        (dir, db)
    }

    fn message_at(content: &str, ts: DateTime<Utc>) -> Message {
        Message::new(content, Some("alice"), None, ts)
    }

    #[test]
    fn insert_assigns_monotonic_ids() {
        let (_dir, db) = open_temp();
        let now = Utc::now();

        let first = db.insert_message(&message_at("one", now)).unwrap();
        let second = db.insert_message(&message_at("two", now)).unwrap();

        assert_eq!(first, 1);
        assert_eq!(second, 2);
    }

    #[test]
    fn insert_rejects_empty_content() {
        let (_dir, db) = open_temp();
        let err = db.insert_message(&message_at("   ", Utc::now())).unwrap_err();
        assert!(matches!(err, StoreError::InvalidMessage(_)));
    }

    #[test]
    fn list_orders_newest_first() {
        let (_dir, db) = open_temp();
        let t1 = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let t2 = Utc.with_ymd_and_hms(2024, 1, 2, 0, 0, 0).unwrap();
        let t3 = Utc.with_ymd_and_hms(2024, 1, 3, 0, 0, 0).unwrap();

        db.insert_message(&message_at("first", t1)).unwrap();
        db.insert_message(&message_at("third", t3)).unwrap();
        db.insert_message(&message_at("second", t2)).unwrap();

        let listed = db.list_messages(3).unwrap();
        let contents: Vec<_> = listed.iter().map(|m| m.content.as_str()).collect();
        assert_eq!(contents, ["third", "second", "first"]);
    }

    #[test]
    fn same_timestamp_ties_break_by_id_descending() {
        let (_dir, db) = open_temp();
        let ts = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();

        db.insert_message(&message_at("older", ts)).unwrap();
        db.insert_message(&message_at("newer", ts)).unwrap();

        let listed = db.list_messages(2).unwrap();
        assert_eq!(listed[0].content, "newer");
        assert_eq!(listed[1].content, "older");
    }

    #[test]
    fn non_positive_limit_falls_back_to_default() {
        let (_dir, db) = open_temp();
        for i in 0..(DEFAULT_LIST_LIMIT + 5) {
            let ts = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap()
                + chrono::Duration::seconds(i);
            db.insert_message(&message_at(&format!("m{i}"), ts)).unwrap();
        }

        assert_eq!(db.list_messages(0).unwrap().len() as i64, DEFAULT_LIST_LIMIT);
        assert_eq!(db.list_messages(-5).unwrap().len() as i64, DEFAULT_LIST_LIMIT);
        assert_eq!(db.list_messages(3).unwrap().len(), 3);
    }

    #[test]
    fn batch_insert_skips_already_imported_rows() {
        let (_dir, mut db) = open_temp();
        let ts = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();

        let mut imported = message_at("from remote", ts);
        imported.repository = "octo/board".into();
        imported.remote_key = Some("messages/20240101000000.json".into());

        assert_eq!(db.insert_messages(&[imported.clone()]).unwrap(), 1);
        // Re-running the same import is a no-op.
        assert_eq!(db.insert_messages(&[imported]).unwrap(), 0);
        assert_eq!(db.list_messages(10).unwrap().len(), 1);
    }

    #[test]
    fn batch_insert_rejects_malformed_records_before_writing() {
        let (_dir, mut db) = open_temp();
        let ts = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();

        let batch = vec![message_at("ok", ts), message_at("  ", ts)];
        assert!(db.insert_messages(&batch).is_err());
        // Nothing from the rejected batch was committed.
        assert!(db.list_messages(10).unwrap().is_empty());
    }

    #[test]
    fn reference_url_is_write_once() {
        let (_dir, db) = open_temp();
        let id = db.insert_message(&message_at("hi", Utc::now())).unwrap();

        assert!(db.set_reference_url(id, "https://example.com/a").unwrap());
        assert!(!db.set_reference_url(id, "https://example.com/b").unwrap());

        let stored = db.get_message(id).unwrap();
        assert_eq!(stored.reference_url.as_deref(), Some("https://example.com/a"));
    }
}
