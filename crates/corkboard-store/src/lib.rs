//! # corkboard-store
//!
//! Durable local persistence for board messages, backed by SQLite.
//!
//! The crate exposes a synchronous [`Database`] handle that wraps a
//! `rusqlite::Connection` and provides typed helpers for inserting, batch
//! importing, and listing messages, plus the per-message reaction counters.

pub mod database;
pub mod messages;
pub mod migrations;
pub mod reactions;

mod error;

pub use database::Database;
pub use error::StoreError;
pub use messages::DEFAULT_LIST_LIMIT;
