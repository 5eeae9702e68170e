//! Core game logic module for Snake
//!
//! This module contains the round state machine and its tick schedule, with no
//! I/O dependencies beyond the drawing trait in [`crate::render`].

pub mod config;
pub mod direction;
pub mod engine;
pub mod schedule;
pub mod state;

// Re-export commonly used types
pub use config::GameConfig;
pub use direction::Direction;
pub use engine::{GameEngine, GameOverReport, ScoreBoard, TickOutcome};
pub use schedule::{TickHandle, TickSchedule};
pub use state::{CollisionType, GameState, GameStatus, Position, Snake};
