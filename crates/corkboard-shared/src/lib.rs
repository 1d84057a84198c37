//! # corkboard-shared
//!
//! Domain types shared by every corkboard crate: the [`Message`] entity, its
//! JSON record codec, and the [`RepositoryConfig`] describing a remote mirror
//! target.

pub mod message;
pub mod record;
pub mod repository;

mod error;

pub use error::{ConfigError, RecordError};
pub use message::{Message, DEFAULT_AUTHOR, LOCAL_REPOSITORY};
pub use repository::RepositoryConfig;
