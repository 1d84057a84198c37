//! v001 -- Initial schema creation.
//!
//! Creates the `messages` table with its ordering and routing indexes, and
//! the `reactions` counter table.

use rusqlite::Connection;

/// SQL executed when upgrading from version 0 to version 1.
const UP_SQL: &str = r#"
-- ----------------------------------------------------------------
-- Messages
-- ----------------------------------------------------------------
CREATE TABLE IF NOT EXISTS messages (
    id            INTEGER PRIMARY KEY AUTOINCREMENT,
    content       TEXT NOT NULL,
    author        TEXT NOT NULL DEFAULT 'Anonymous',
    timestamp     TEXT NOT NULL,                    -- RFC 3339
    reference_url TEXT,
    repository    TEXT NOT NULL DEFAULT 'local',
    remote_key    TEXT                              -- remote tree path for imported rows
);

CREATE INDEX IF NOT EXISTS idx_messages_timestamp ON messages(timestamp DESC);
CREATE INDEX IF NOT EXISTS idx_messages_repository ON messages(repository);

-- Imported rows are keyed by their remote path so a re-run of an import
-- skips rows that already exist locally.
CREATE UNIQUE INDEX IF NOT EXISTS idx_messages_remote_key
    ON messages(remote_key) WHERE remote_key IS NOT NULL;

-- ----------------------------------------------------------------
-- Reaction counters
-- ----------------------------------------------------------------
CREATE TABLE IF NOT EXISTS reactions (
    message_id INTEGER NOT NULL,
    emoji      TEXT NOT NULL,
    count      INTEGER NOT NULL DEFAULT 0,

    PRIMARY KEY (message_id, emoji),
    FOREIGN KEY (message_id) REFERENCES messages(id) ON DELETE CASCADE
);
"#;

/// Apply the initial migration.
pub fn up(conn: &Connection) -> Result<(), rusqlite::Error> {
    conn.execute_batch(UP_SQL)
}
