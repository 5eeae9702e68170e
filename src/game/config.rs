use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::config::Validate;

/// Configuration for the game
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Width of the game grid in cells
    pub grid_width: usize,
    /// Height of the game grid in cells
    pub grid_height: usize,
    /// Side of one grid cell in surface pixels
    pub cell_size: u32,
    /// Interval between ticks at the start of a round
    pub base_tick_ms: u64,
    /// Points for one food before the speed multiplier is applied
    pub food_points: u32,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            grid_width: 20,
            grid_height: 20,
            cell_size: 20,
            base_tick_ms: 500,
            food_points: 10,
        }
    }
}

impl GameConfig {
    /// Create a new configuration with custom grid size
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            grid_width: width,
            grid_height: height,
            ..Default::default()
        }
    }

    /// Create a small grid for testing
    pub fn small() -> Self {
        Self::new(10, 10)
    }

    pub fn base_tick_interval(&self) -> Duration {
        Duration::from_millis(self.base_tick_ms)
    }

    /// Surface size in pixels
    pub fn canvas_size(&self) -> (f64, f64) {
        (
            (self.grid_width as u32 * self.cell_size) as f64,
            (self.grid_height as u32 * self.cell_size) as f64,
        )
    }
}

impl Validate for GameConfig {
    fn validate(&self) -> Result<(), String> {
        if !(5..=100).contains(&self.grid_width) {
            return Err("Grid width must be between 5 and 100".to_string());
        }
        if !(5..=100).contains(&self.grid_height) {
            return Err("Grid height must be between 5 and 100".to_string());
        }
        if self.cell_size < 4 {
            return Err("Cell size must be at least 4 pixels".to_string());
        }
        if !(50..=5000).contains(&self.base_tick_ms) {
            return Err("Tick interval must be between 50ms and 5000ms".to_string());
        }
        if self.food_points == 0 {
            return Err("Food must be worth at least one point".to_string());
        }
        Ok(())
    }
}
