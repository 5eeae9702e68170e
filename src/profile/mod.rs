//! Player profiles and their persisted high scores

mod store;
mod user;

pub use store::{ProfileStore, STORAGE_KEY};
pub use user::User;

/// Shortest accepted username, counted in characters after trimming
pub const MIN_NAME_LEN: usize = 3;
/// Longest accepted username
pub const MAX_NAME_LEN: usize = 20;
