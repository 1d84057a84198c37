//! Per-message reaction counters.

use std::collections::HashMap;

use rusqlite::params;

use crate::database::Database;
use crate::error::{Result, StoreError};

impl Database {
    /// Increment the counter for one reaction on one message and return the
    /// new count. Fails with [`StoreError::NotFound`] for an unknown message.
    pub fn add_reaction(&self, message_id: i64, emoji: &str) -> Result<u64> {
        let exists: bool = self.conn().query_row(
            "SELECT EXISTS(SELECT 1 FROM messages WHERE id = ?1)",
            params![message_id],
            |row| row.get(0),
        )?;
        if !exists {
            return Err(StoreError::NotFound);
        }

        self.conn().execute(
            "INSERT INTO reactions (message_id, emoji, count) VALUES (?1, ?2, 1)
             ON CONFLICT(message_id, emoji) DO UPDATE SET count = count + 1",
            params![message_id, emoji],
        )?;

        let count: u64 = self.conn().query_row(
            "SELECT count FROM reactions WHERE message_id = ?1 AND emoji = ?2",
            params![message_id, emoji],
            |row| row.get(0),
        )?;
        Ok(count)
    }

    /// Return all reaction counters for a message.
    pub fn reactions_for(&self, message_id: i64) -> Result<HashMap<String, u64>> {
        let mut stmt = self.conn().prepare(
            "SELECT emoji, count FROM reactions WHERE message_id = ?1",
        )?;

        let rows = stmt.query_map(params![message_id], |row| {
            Ok((row.get::<_, String>(0)?, row.get::<_, u64>(1)?))
        })?;

        let mut reactions = HashMap::new();
        for row in rows {
            let (emoji, count) = row?;
            reactions.insert(emoji, count);
        }
        Ok(reactions)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use corkboard_shared::Message;

    #[test]
    fn reaction_counts_accumulate() {
        let dir = tempfile::tempdir().unwrap();
        let db = Database::open_at(&dir.path().join("test.db")).unwrap();

        let id = db
            .insert_message(&Message::new("hi", Some("alice"), None, Utc::now()))
            .unwrap();

        assert_eq!(db.add_reaction(id, "👍").unwrap(), 1);
        assert_eq!(db.add_reaction(id, "👍").unwrap(), 2);
        assert_eq!(db.add_reaction(id, "🎉").unwrap(), 1);

        let all = db.reactions_for(id).unwrap();
        assert_eq!(all.get("👍"), Some(&2));
        assert_eq!(all.get("🎉"), Some(&1));
    }

    #[test]
    fn reacting_to_unknown_message_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let db = Database::open_at(&dir.path().join("test.db")).unwrap();

        assert!(matches!(
            db.add_reaction(42, "👍"),
            Err(StoreError::NotFound)
        ));
    }
}
