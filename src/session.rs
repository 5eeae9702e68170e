//! Command surface tying one engine to one profile store
//!
//! Front-ends call these methods for every user intent and timer delivery,
//! then read back whatever they display.

use crate::error::{Result, SnakeError};
use crate::game::{Direction, GameConfig, GameEngine, GameStatus, TickHandle, TickOutcome};
use crate::profile::{ProfileStore, User};
use crate::storage::KeyValueStore;

pub struct GameSession<S: KeyValueStore> {
    engine: GameEngine,
    profiles: ProfileStore<S>,
}

impl<S: KeyValueStore> GameSession<S> {
    /// Wire an engine to the profile store, selecting the first stored user
    pub fn new(engine: GameEngine, mut profiles: ProfileStore<S>) -> Self {
        if let Some(first) = profiles.users().first().map(|u| u.name.clone()) {
            if let Err(err) = profiles.select_user(&first) {
                log::warn!("Could not restore default user: {}", err);
            }
        }
        Self { engine, profiles }
    }

    pub fn open(config: GameConfig, store: S) -> Self {
        Self::new(GameEngine::new(config), ProfileStore::open(store))
    }

    pub fn engine(&self) -> &GameEngine {
        &self.engine
    }

    pub fn profiles(&self) -> &ProfileStore<S> {
        &self.profiles
    }

    pub fn status(&self) -> GameStatus {
        self.engine.status()
    }

    pub fn score(&self) -> u32 {
        self.engine.state().score
    }

    /// Level shown to the player; mirrors the speed multiplier
    pub fn level(&self) -> u32 {
        self.engine.state().speed_multiplier
    }

    pub fn current_user(&self) -> Option<&User> {
        self.profiles.current_user()
    }

    pub fn high_score(&self) -> u32 {
        self.current_user().map(|u| u.high_score).unwrap_or(0)
    }

    pub fn leaderboard(&self) -> Vec<&User> {
        self.profiles.list_users_by_rank()
    }

    pub fn active_tick(&self) -> Option<TickHandle> {
        self.engine.active_tick()
    }

    pub fn start(&mut self) -> Result<GameStatus> {
        self.engine.start(&self.profiles)?;
        Ok(self.engine.status())
    }

    pub fn toggle_pause(&mut self) -> GameStatus {
        self.engine.toggle_pause()
    }

    pub fn reset(&mut self) -> GameStatus {
        self.engine.reset();
        self.engine.status()
    }

    pub fn steer(&mut self, direction: Direction) {
        self.engine.steer(direction);
    }

    pub fn on_timer(&mut self, handle: TickHandle) -> TickOutcome {
        self.engine.on_timer(handle, &mut self.profiles)
    }

    pub fn create_user(&mut self, name: &str) -> Result<User> {
        self.profiles.create_user(name)
    }

    /// Switching users abandons the round in progress
    pub fn select_user(&mut self, name: &str) -> Result<&User> {
        self.profiles.select_user(name)?;
        self.engine.reset();
        self.selected(name)
    }

    /// The profile panel flow: pick the named user, creating it if new
    pub fn select_or_create(&mut self, name: &str) -> Result<&User> {
        self.profiles.select_or_create(name)?;
        self.engine.reset();
        self.selected(name)
    }

    pub fn delete_user(&mut self, name: &str) -> Result<bool> {
        self.profiles.delete_user(name)
    }

    fn selected(&self, name: &str) -> Result<&User> {
        self.profiles
            .current_user()
            .ok_or_else(|| SnakeError::UnknownUser(name.trim().to_string()))
    }

    #[cfg(test)]
    pub(crate) fn engine_mut(&mut self) -> &mut GameEngine {
        &mut self.engine
    }
}
