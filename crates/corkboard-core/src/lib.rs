//! # corkboard-core
//!
//! The orchestration layer of the board: the [`MessageBoard`] coordinator
//! that routes every write to the local store (always) and to a configured
//! remote mirror (best effort), and the [`ConfigStore`] holding remote
//! repository definitions and credentials.

pub mod board;
pub mod config;

mod error;

pub use board::{ImportReport, MessageBoard, NewMessage};
pub use config::{ConfigStore, GITHUB_TOKEN_KEY, REPOSITORIES_KEY};
pub use error::BoardError;
