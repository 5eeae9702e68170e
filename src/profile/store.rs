use chrono::Utc;

use super::{MAX_NAME_LEN, MIN_NAME_LEN, User};
use crate::error::{Result, SnakeError};
use crate::game::ScoreBoard;
use crate::storage::KeyValueStore;

/// Key under which the whole user list is stored
pub const STORAGE_KEY: &str = "snakeGameUsers";

/// Owns the user list and the current selection
///
/// Users are keyed by lowercased name and kept in creation order. Every
/// mutation is written through to the backing store before it becomes
/// visible; a rejected write leaves the in-memory list untouched.
pub struct ProfileStore<S: KeyValueStore> {
    store: S,
    users: Vec<User>,
    current: Option<String>,
}

impl<S: KeyValueStore> ProfileStore<S> {
    /// Load users from the store; missing or malformed data means no users
    pub fn open(store: S) -> Self {
        let users = match store.get(STORAGE_KEY) {
            Some(raw) => match serde_json::from_str::<Vec<User>>(&raw) {
                Ok(users) => dedupe(users),
                Err(err) => {
                    log::warn!("Ignoring malformed user list: {}", err);
                    Vec::new()
                }
            },
            None => Vec::new(),
        };
        log::info!("Loaded {} user profile(s)", users.len());

        Self {
            store,
            users,
            current: None,
        }
    }

    pub fn users(&self) -> &[User] {
        &self.users
    }

    pub fn user(&self, name: &str) -> Option<&User> {
        self.position(name).map(|index| &self.users[index])
    }

    pub fn current_user(&self) -> Option<&User> {
        self.current.as_deref().and_then(|key| self.user(key))
    }

    pub fn create_user(&mut self, name: &str) -> Result<User> {
        let name = name.trim();
        let len = name.chars().count();
        if !(MIN_NAME_LEN..=MAX_NAME_LEN).contains(&len) {
            return Err(SnakeError::InvalidName { len });
        }
        if self.position(name).is_some() {
            return Err(SnakeError::DuplicateName(name.to_string()));
        }

        let user = User::new(name, Utc::now());
        let mut users = self.users.clone();
        users.push(user.clone());
        self.commit(users)?;

        log::info!("Created user '{}'", user.name);
        Ok(user)
    }

    /// Make name the current user
    pub fn select_user(&mut self, name: &str) -> Result<&User> {
        let index = self
            .position(name)
            .ok_or_else(|| SnakeError::UnknownUser(name.trim().to_string()))?;
        let user = &self.users[index];
        self.current = Some(user.key());
        log::info!("Selected user '{}'", user.name);
        Ok(user)
    }

    /// Select an existing user matching name, creating it first if needed
    pub fn select_or_create(&mut self, name: &str) -> Result<&User> {
        if self.position(name).is_none() {
            self.create_user(name)?;
        }
        self.select_user(name)
    }

    /// Remove name if present. Returns false when there was no such user.
    pub fn delete_user(&mut self, name: &str) -> Result<bool> {
        let Some(index) = self.position(name) else {
            return Ok(false);
        };

        let mut users = self.users.clone();
        let removed = users.remove(index);
        self.commit(users)?;

        if self.current.as_deref() == Some(removed.key().as_str()) {
            self.current = None;
        }
        log::info!("Deleted user '{}'", removed.name);
        Ok(true)
    }

    /// Raise name's high score to score if it is strictly greater.
    /// Returns true if the stored value changed.
    pub fn update_high_score(&mut self, name: &str, score: u32) -> Result<bool> {
        let Some(index) = self.position(name) else {
            return Ok(false);
        };
        if score <= self.users[index].high_score {
            return Ok(false);
        }

        let mut users = self.users.clone();
        users[index].high_score = score;
        self.commit(users)?;

        log::info!("New high score for '{}': {}", self.users[index].name, score);
        Ok(true)
    }

    /// Users by high score, best first; ties keep creation order
    pub fn list_users_by_rank(&self) -> Vec<&User> {
        let mut ranked: Vec<&User> = self.users.iter().collect();
        ranked.sort_by(|a, b| b.high_score.cmp(&a.high_score));
        ranked
    }

    fn position(&self, name: &str) -> Option<usize> {
        let key = name.trim().to_lowercase();
        self.users.iter().position(|user| user.key() == key)
    }

    fn commit(&mut self, users: Vec<User>) -> Result<()> {
        let serialized = serde_json::to_string(&users)
            .map_err(|e| SnakeError::PersistenceWriteFailed(e.to_string()))?;
        self.store.set(STORAGE_KEY, &serialized).map_err(|e| {
            log::warn!("Profile write failed: {}", e);
            SnakeError::PersistenceWriteFailed(e.to_string())
        })?;
        self.users = users;
        Ok(())
    }
}

impl<S: KeyValueStore> ScoreBoard for ProfileStore<S> {
    fn has_current_player(&self) -> bool {
        self.current_user().is_some()
    }

    fn record_score(&mut self, score: u32) -> Result<bool> {
        let Some(name) = self.current_user().map(|user| user.name.clone()) else {
            return Ok(false);
        };
        self.update_high_score(&name, score)
    }
}

fn dedupe(users: Vec<User>) -> Vec<User> {
    let mut kept: Vec<User> = Vec::with_capacity(users.len());
    for user in users {
        if kept.iter().any(|existing| existing.key() == user.key()) {
            log::warn!("Dropping duplicate stored user '{}'", user.name);
            continue;
        }
        kept.push(user);
    }
    kept
}
