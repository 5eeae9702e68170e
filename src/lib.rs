//! Grid Snake - a terminal Snake game with persistent player profiles
//!
//! This library provides:
//! - The round state machine and its tick schedule (game module)
//! - Player profiles and high scores over a key-value store (profile, storage)
//! - The command surface front-ends drive (session module)
//! - Drawing and the ratatui front-end (render, input, modes)

pub mod config;
pub mod error;
pub mod game;
pub mod input;
pub mod logging;
pub mod modes;
pub mod profile;
pub mod render;
pub mod session;
pub mod storage;

pub use error::{Result, SnakeError};
pub use session::GameSession;
