use super::{
    config::GameConfig,
    direction::Direction,
    schedule::{TickHandle, TickSchedule},
    state::{CollisionType, GameState, GameStatus, Position, Snake},
};
use crate::error::{Result, SnakeError};
use crate::render::{Color, Glow, Surface, TextStyle};
use rand::{Rng, SeedableRng, rngs::StdRng};
use std::time::Duration;

const BACKGROUND: Color = Color::BLACK;
const GRID_LINE: Color = Color::rgb(17, 17, 17);
const SNAKE_HEAD: Color = Color::rgb(0, 255, 0);
const SNAKE_BODY: Color = Color::rgb(0, 204, 0);
const FOOD: Color = Color::rgb(255, 0, 0);
const OVERLAY: Color = Color::rgba(0, 0, 0, 0.7);

/// Where finished rounds are reported
///
/// The engine only needs to know whether somebody is playing and where the
/// final score goes; the profile store implements this.
pub trait ScoreBoard {
    fn has_current_player(&self) -> bool;

    /// Record a finished round for the current player.
    /// Returns true if it raised the stored high score.
    fn record_score(&mut self, score: u32) -> Result<bool>;
}

/// Summary of a round that just ended
#[derive(Debug, Clone, PartialEq)]
pub struct GameOverReport {
    pub reason: CollisionType,
    pub final_score: u32,
    /// Outcome of reporting the score to the board
    pub high_score: Result<bool>,
}

/// What a single tick did
#[derive(Debug, Clone, PartialEq)]
pub enum TickOutcome {
    /// Not running, or the tick came from a cancelled schedule
    Ignored,
    Moved,
    AteFood { score: u32 },
    GameOver(GameOverReport),
}

/// The game engine that owns the round state and its tick schedule
pub struct GameEngine {
    config: GameConfig,
    state: GameState,
    schedule: TickSchedule,
    tick_interval: Duration,
    rng: StdRng,
}

impl GameEngine {
    /// Create a new game engine with the given configuration
    pub fn new(config: GameConfig) -> Self {
        Self::with_rng(config, StdRng::from_entropy())
    }

    /// Deterministic food placement, for tests and replays
    pub fn with_seed(config: GameConfig, seed: u64) -> Self {
        Self::with_rng(config, StdRng::seed_from_u64(seed))
    }

    fn with_rng(config: GameConfig, rng: StdRng) -> Self {
        let tick_interval = config.base_tick_interval();
        let state = GameState::new(
            Snake::new(Position::new(0, 0)),
            Position::new(0, 0),
            config.grid_width,
            config.grid_height,
        );
        let mut engine = Self {
            config,
            state,
            schedule: TickSchedule::new(),
            tick_interval,
            rng,
        };
        engine.state = engine.idle_state();
        engine
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn status(&self) -> GameStatus {
        self.state.status
    }

    /// The one tick task currently allowed to drive the engine
    pub fn active_tick(&self) -> Option<TickHandle> {
        self.schedule.active()
    }

    #[cfg(test)]
    pub(crate) fn state_mut(&mut self) -> &mut GameState {
        &mut self.state
    }

    /// Begin a new round. Returns Ok(false) if a round is already alive.
    pub fn start(&mut self, board: &impl ScoreBoard) -> Result<bool> {
        if !board.has_current_player() {
            return Err(SnakeError::SelectionRequired);
        }
        if matches!(self.state.status, GameStatus::Running | GameStatus::Paused) {
            return Ok(false);
        }

        let mut state = self.idle_state();
        state.direction = Some(Direction::Right);
        state.pending_direction = Some(Direction::Right);
        state.status = GameStatus::Running;
        self.state = state;

        self.tick_interval = self.config.base_tick_interval();
        let handle = self.schedule.schedule(self.tick_interval);
        log::info!(
            "Round started on {}x{} grid, tick #{} every {:?}",
            self.config.grid_width,
            self.config.grid_height,
            handle.id(),
            handle.interval()
        );
        Ok(true)
    }

    /// Queue a heading for the next tick; instant reversal is ignored
    pub fn steer(&mut self, direction: Direction) {
        if self.state.status != GameStatus::Running {
            return;
        }
        if let Some(active) = self.state.direction {
            if active.is_opposite(direction) {
                return;
            }
        }
        self.state.pending_direction = Some(direction);
    }

    /// Flip between Running and Paused; no-op otherwise
    pub fn toggle_pause(&mut self) -> GameStatus {
        match self.state.status {
            GameStatus::Running => {
                self.schedule.cancel();
                self.state.status = GameStatus::Paused;
                log::debug!("Round paused at score {}", self.state.score);
            }
            GameStatus::Paused => {
                self.schedule.schedule(self.tick_interval);
                self.state.status = GameStatus::Running;
                log::debug!("Round resumed");
            }
            GameStatus::Idle | GameStatus::Over => {}
        }
        self.state.status
    }

    /// Return to a fresh idle board from any state
    pub fn reset(&mut self) {
        self.schedule.cancel();
        self.tick_interval = self.config.base_tick_interval();
        self.state = self.idle_state();
    }

    /// Timer delivery: ticks only if `handle` is the active schedule
    pub fn on_timer(&mut self, handle: TickHandle, board: &mut impl ScoreBoard) -> TickOutcome {
        if !self.schedule.is_current(handle) {
            log::debug!("Dropping tick from stale schedule #{}", handle.id());
            return TickOutcome::Ignored;
        }
        self.tick(board)
    }

    /// Advance the round by one cell
    pub fn tick(&mut self, board: &mut impl ScoreBoard) -> TickOutcome {
        if self.state.status != GameStatus::Running {
            return TickOutcome::Ignored;
        }
        let Some(direction) = self.state.pending_direction.or(self.state.direction) else {
            return TickOutcome::Ignored;
        };
        self.state.direction = Some(direction);

        let new_head = self.state.snake.head().moved_in_direction(direction);

        if let Some(collision) = self.check_collision(new_head) {
            return TickOutcome::GameOver(self.finish_round(collision, board));
        }

        self.state.snake.push_head(new_head);
        self.state.steps += 1;

        if new_head != self.state.food {
            self.state.snake.retract_tail();
            return TickOutcome::Moved;
        }

        self.state.score += self.config.food_points * self.state.speed_multiplier;
        log::debug!(
            "Ate food at ({}, {}). Score: {}",
            new_head.x,
            new_head.y,
            self.state.score
        );

        match Self::spawn_food_avoid_snake(&mut self.rng, &self.config, &self.state.snake) {
            Some(food) => {
                self.state.food = food;
                TickOutcome::AteFood {
                    score: self.state.score,
                }
            }
            None => TickOutcome::GameOver(self.finish_round(CollisionType::BoardFull, board)),
        }
    }

    /// Draw the board, then the pause or game over overlay
    pub fn render(&self, surface: &mut impl Surface) {
        let (width, height) = surface.size();
        let cell_w = width / self.state.grid_width as f64;
        let cell_h = height / self.state.grid_height as f64;

        surface.clear(BACKGROUND);

        for col in 0..=self.state.grid_width {
            surface.fill_rect(col as f64 * cell_w, 0.0, 0.5, height, GRID_LINE);
        }
        for row in 0..=self.state.grid_height {
            surface.fill_rect(0.0, row as f64 * cell_h, width, 0.5, GRID_LINE);
        }

        for (index, segment) in self.state.snake.segments().enumerate() {
            if index == 0 {
                surface.set_glow(Some(Glow {
                    color: SNAKE_HEAD,
                    blur: 10.0,
                }));
            } else if index == 1 {
                surface.set_glow(None);
            }
            let color = if index == 0 { SNAKE_HEAD } else { SNAKE_BODY };
            surface.fill_rect(
                segment.x as f64 * cell_w + 1.0,
                segment.y as f64 * cell_h + 1.0,
                cell_w - 2.0,
                cell_h - 2.0,
                color,
            );
        }

        surface.set_glow(Some(Glow {
            color: FOOD,
            blur: 8.0,
        }));
        surface.draw_circle(
            self.state.food.x as f64 * cell_w + cell_w / 2.0,
            self.state.food.y as f64 * cell_h + cell_h / 2.0,
            cell_w.min(cell_h) / 2.0 - 1.0,
            FOOD,
        );
        surface.set_glow(None);

        match self.state.status {
            GameStatus::Paused => {
                surface.fill_rect(0.0, 0.0, width, height, OVERLAY);
                surface.draw_text(
                    "PAUSED",
                    width / 2.0,
                    height / 2.0,
                    TextStyle::new(Color::WHITE, 30.0).bold(),
                );
            }
            GameStatus::Over => {
                surface.fill_rect(0.0, 0.0, width, height, OVERLAY);
                surface.draw_text(
                    "GAME OVER",
                    width / 2.0,
                    height / 2.0 - 20.0,
                    TextStyle::new(FOOD, 40.0).bold(),
                );
                surface.draw_text(
                    &format!("Score: {}", self.state.score),
                    width / 2.0,
                    height / 2.0 + 20.0,
                    TextStyle::new(Color::WHITE, 20.0),
                );
            }
            GameStatus::Idle | GameStatus::Running => {}
        }
    }

    fn finish_round(
        &mut self,
        reason: CollisionType,
        board: &mut impl ScoreBoard,
    ) -> GameOverReport {
        self.state.status = GameStatus::Over;
        self.state.last_collision = Some(reason);
        self.schedule.cancel();

        let final_score = self.state.score;
        log::info!(
            "Round over ({:?}) after {} steps, score {}",
            reason,
            self.state.steps,
            final_score
        );

        let high_score = if board.has_current_player() {
            board.record_score(final_score)
        } else {
            Ok(false)
        };
        if let Err(err) = &high_score {
            log::warn!("Could not record final score {}: {}", final_score, err);
        }

        GameOverReport {
            reason,
            final_score,
            high_score,
        }
    }

    /// Check if the new head position causes a collision
    fn check_collision(&self, pos: Position) -> Option<CollisionType> {
        if !self.state.is_in_bounds(pos) {
            return Some(CollisionType::Wall);
        }
        if self.state.snake.occupies(pos) {
            return Some(CollisionType::SelfCollision);
        }
        None
    }

    fn idle_state(&mut self) -> GameState {
        let origin = Position::new(
            (self.config.grid_width / 2) as i32,
            (self.config.grid_height / 2) as i32,
        );
        let snake = Snake::new(origin);
        // a one-segment snake always leaves a free cell on a valid grid
        let food = Self::spawn_food_avoid_snake(&mut self.rng, &self.config, &snake)
            .unwrap_or(Position::new(0, 0));
        GameState::new(snake, food, self.config.grid_width, self.config.grid_height)
    }

    /// Spawn food at a random empty position; None when the snake fills the grid
    fn spawn_food_avoid_snake(
        rng: &mut StdRng,
        config: &GameConfig,
        snake: &Snake,
    ) -> Option<Position> {
        if snake.len() >= config.grid_width * config.grid_height {
            return None;
        }
        loop {
            let x = rng.gen_range(0..config.grid_width) as i32;
            let y = rng.gen_range(0..config.grid_height) as i32;
            let pos = Position::new(x, y);

            if !snake.occupies(pos) {
                return Some(pos);
            }
        }
    }
}
