use thiserror::Error;

use crate::profile::{MAX_NAME_LEN, MIN_NAME_LEN};

/// Recoverable failures surfaced by the game and profile commands
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SnakeError {
    #[error("username must be between {MIN_NAME_LEN} and {MAX_NAME_LEN} characters, got {len}")]
    InvalidName { len: usize },

    #[error("username '{0}' already exists")]
    DuplicateName(String),

    #[error("select a user before starting a game")]
    SelectionRequired,

    #[error("no user named '{0}'")]
    UnknownUser(String),

    #[error("failed to persist profiles: {0}")]
    PersistenceWriteFailed(String),
}

pub type Result<T> = std::result::Result<T, SnakeError>;
