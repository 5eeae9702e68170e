use anyhow::{Context, Result};
use crossterm::{
    event::{Event, EventStream, KeyEvent, KeyEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use futures::StreamExt;
use ratatui::{Terminal, backend::CrosstermBackend};
use std::io::{Stderr, stderr};
use std::time::Duration;
use tokio::time::{Instant, Interval, MissedTickBehavior, interval, interval_at};

use crate::error::SnakeError;
use crate::game::{TickHandle, TickOutcome};
use crate::input::{InputHandler, KeyAction, PanelAction};
use crate::profile::MAX_NAME_LEN;
use crate::render::{PanelView, Renderer};
use crate::session::GameSession;
use crate::storage::KeyValueStore;

/// Typed name and highlighted row of the profile popup
#[derive(Debug, Default)]
struct ProfilePanel {
    input: String,
    highlighted: usize,
}

/// Local clock mirroring the engine's active tick schedule
///
/// Rebuilt whenever the engine replaces or cancels its schedule, so at most
/// one interval is ever live and each delivery names the schedule it
/// belongs to.
struct TickTimer {
    handle: Option<TickHandle>,
    interval: Option<Interval>,
}

impl TickTimer {
    fn new() -> Self {
        Self {
            handle: None,
            interval: None,
        }
    }

    fn sync(&mut self, active: Option<TickHandle>) {
        if self.handle == active {
            return;
        }
        self.handle = active;
        self.interval = active.map(|handle| {
            let period = handle.interval();
            let mut timer = interval_at(Instant::now() + period, period);
            timer.set_missed_tick_behavior(MissedTickBehavior::Delay);
            timer
        });
    }

    async fn tick(&mut self) -> TickHandle {
        match (self.interval.as_mut(), self.handle) {
            (Some(timer), Some(handle)) => {
                timer.tick().await;
                handle
            }
            _ => std::future::pending().await,
        }
    }
}

pub struct PlayMode<S: KeyValueStore> {
    session: GameSession<S>,
    renderer: Renderer,
    input_handler: InputHandler,
    panel: Option<ProfilePanel>,
    message: Option<String>,
    should_quit: bool,
}

impl<S: KeyValueStore> PlayMode<S> {
    pub fn new(session: GameSession<S>) -> Self {
        // nobody to play as yet: start on the profile panel
        let panel = session
            .current_user()
            .is_none()
            .then(ProfilePanel::default);

        Self {
            session,
            renderer: Renderer::new(),
            input_handler: InputHandler::new(),
            panel,
            message: None,
            should_quit: false,
        }
    }

    pub async fn run(&mut self) -> Result<()> {
        // Setup terminal
        enable_raw_mode().context("Failed to enable raw mode")?;
        let mut stderr = stderr();
        execute!(stderr, EnterAlternateScreen).context("Failed to enter alternate screen")?;
        let backend = CrosstermBackend::new(stderr);
        let mut terminal = Terminal::new(backend).context("Failed to create terminal")?;
        terminal.hide_cursor().context("Failed to hide cursor")?;
        terminal.clear().context("Failed to clear terminal")?;

        // Run game loop with cleanup
        let result = self.run_game_loop(&mut terminal).await;

        // Cleanup terminal
        self.cleanup_terminal(&mut terminal)?;

        result
    }

    async fn run_game_loop(
        &mut self,
        terminal: &mut Terminal<CrosstermBackend<Stderr>>,
    ) -> Result<()> {
        let mut event_stream = EventStream::new();
        let mut tick_timer = TickTimer::new();

        // Render at 30 FPS (33ms per frame)
        let render_interval = Duration::from_millis(33);
        let mut render_timer = interval(render_interval);

        loop {
            tick_timer.sync(self.session.active_tick());

            tokio::select! {
                // Handle terminal events
                maybe_event = event_stream.next() => {
                    match maybe_event {
                        Some(Ok(event)) => self.handle_event(event),
                        Some(Err(err)) => log::warn!("Terminal event error: {}", err),
                        None => self.should_quit = true,
                    }
                }

                // Game logic tick from the engine's current schedule
                handle = tick_timer.tick() => {
                    let outcome = self.session.on_timer(handle);
                    self.on_tick_outcome(outcome);
                }

                // Render frame
                _ = render_timer.tick() => {
                    terminal.draw(|frame| {
                        let panel = self.panel.as_ref().map(|p| PanelView {
                            input: &p.input,
                            highlighted: p.highlighted,
                        });
                        self.renderer.render(frame, &self.session, panel, self.message.as_deref());
                    }).context("Failed to draw frame")?;
                }

                // Handle Ctrl+C
                _ = tokio::signal::ctrl_c() => {
                    self.should_quit = true;
                }
            }

            if self.should_quit {
                break;
            }
        }

        Ok(())
    }

    fn handle_event(&mut self, event: Event) {
        if let Event::Key(key) = event {
            // Only process key press events, not release
            if key.kind != KeyEventKind::Press {
                return;
            }
            self.handle_key(key);
        }
    }

    fn handle_key(&mut self, key: KeyEvent) {
        if self.panel.is_some() {
            let action = self.input_handler.handle_panel_key(key);
            self.handle_panel_action(action);
            return;
        }

        match self.input_handler.handle_key_event(key) {
            KeyAction::Steer(direction) => self.session.steer(direction),
            KeyAction::Start => match self.session.start() {
                Ok(_) => self.message = None,
                Err(SnakeError::SelectionRequired) => {
                    self.message = Some(SnakeError::SelectionRequired.to_string());
                    self.open_panel();
                }
                Err(err) => self.message = Some(err.to_string()),
            },
            KeyAction::TogglePause => {
                self.session.toggle_pause();
            }
            KeyAction::Reset => {
                self.session.reset();
                self.message = None;
            }
            KeyAction::OpenProfiles => self.open_panel(),
            KeyAction::Quit => self.should_quit = true,
            KeyAction::None => {}
        }
    }

    fn handle_panel_action(&mut self, action: PanelAction) {
        let user_count = self.session.leaderboard().len();
        let Some(panel) = self.panel.as_mut() else {
            return;
        };

        match action {
            PanelAction::Insert(c) => {
                if panel.input.chars().count() < MAX_NAME_LEN {
                    panel.input.push(c);
                }
            }
            PanelAction::Backspace => {
                panel.input.pop();
            }
            PanelAction::HighlightUp => {
                panel.highlighted = panel.highlighted.saturating_sub(1);
            }
            PanelAction::HighlightDown => {
                if panel.highlighted + 1 < user_count {
                    panel.highlighted += 1;
                }
            }
            PanelAction::Confirm => self.confirm_panel(),
            PanelAction::DeleteHighlighted => self.delete_highlighted(),
            PanelAction::Close => self.panel = None,
            PanelAction::Quit => self.should_quit = true,
            PanelAction::None => {}
        }
    }

    fn confirm_panel(&mut self) {
        let Some(panel) = self.panel.as_ref() else {
            return;
        };

        let result = if !panel.input.trim().is_empty() {
            let typed = panel.input.clone();
            self.session.select_or_create(&typed).map(|u| u.name.clone())
        } else {
            match self.highlighted_name() {
                Some(name) => self.session.select_user(&name).map(|u| u.name.clone()),
                None => return,
            }
        };

        match result {
            Ok(name) => {
                self.message = Some(format!("Playing as {}. Press Enter to start", name));
                self.panel = None;
            }
            Err(err) => self.message = Some(err.to_string()),
        }
    }

    fn delete_highlighted(&mut self) {
        let Some(name) = self.highlighted_name() else {
            return;
        };

        match self.session.delete_user(&name) {
            Ok(_) => {
                self.message = Some(format!("Removed {}", name));
                let remaining = self.session.leaderboard().len();
                if let Some(panel) = self.panel.as_mut() {
                    panel.highlighted = panel.highlighted.min(remaining.saturating_sub(1));
                }
            }
            Err(err) => self.message = Some(err.to_string()),
        }
    }

    fn highlighted_name(&self) -> Option<String> {
        let panel = self.panel.as_ref()?;
        self.session
            .leaderboard()
            .get(panel.highlighted)
            .map(|user| user.name.clone())
    }

    fn open_panel(&mut self) {
        if self.panel.is_none() {
            self.panel = Some(ProfilePanel::default());
        }
    }

    fn on_tick_outcome(&mut self, outcome: TickOutcome) {
        if let TickOutcome::GameOver(report) = outcome {
            self.message = Some(match report.high_score {
                Ok(true) => format!("New high score: {}!", report.final_score),
                Ok(false) => format!("Game over. Score: {}", report.final_score),
                Err(err) => format!("Score {} not saved: {}", report.final_score, err),
            });
        }
    }

    fn cleanup_terminal(
        &mut self,
        terminal: &mut Terminal<CrosstermBackend<Stderr>>,
    ) -> Result<()> {
        disable_raw_mode().context("Failed to disable raw mode")?;
        execute!(terminal.backend_mut(), LeaveAlternateScreen)
            .context("Failed to leave alternate screen")?;
        terminal.show_cursor().context("Failed to show cursor")?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::{GameConfig, GameEngine, GameStatus};
    use crate::profile::ProfileStore;
    use crate::storage::MemoryStore;
    use crossterm::event::{KeyCode, KeyModifiers};

    fn press(mode: &mut PlayMode<MemoryStore>, code: KeyCode) {
        mode.handle_key(KeyEvent::new(code, KeyModifiers::NONE));
    }

    fn type_name(mode: &mut PlayMode<MemoryStore>, name: &str) {
        for c in name.chars() {
            press(mode, KeyCode::Char(c));
        }
    }

    fn empty_mode() -> PlayMode<MemoryStore> {
        let engine = GameEngine::with_seed(GameConfig::default(), 4);
        PlayMode::new(GameSession::new(engine, ProfileStore::open(MemoryStore::new())))
    }

    #[test]
    fn test_opens_panel_without_users() {
        let mode = empty_mode();
        assert!(mode.panel.is_some());
    }

    #[test]
    fn test_create_player_then_start() {
        let mut mode = empty_mode();
        type_name(&mut mode, "Quinn");
        press(&mut mode, KeyCode::Enter);

        assert!(mode.panel.is_none());
        assert_eq!(mode.session.current_user().unwrap().name, "Quinn");

        press(&mut mode, KeyCode::Enter);
        assert_eq!(mode.session.status(), GameStatus::Running);

        press(&mut mode, KeyCode::Char(' '));
        assert_eq!(mode.session.status(), GameStatus::Paused);
    }

    #[test]
    fn test_invalid_name_keeps_panel_open() {
        let mut mode = empty_mode();
        type_name(&mut mode, "ab");
        press(&mut mode, KeyCode::Enter);

        assert!(mode.panel.is_some());
        assert!(mode.message.as_deref().unwrap().contains("between 3 and 20"));
    }

    #[test]
    fn test_start_without_selection_opens_panel() {
        let mut mode = empty_mode();
        press(&mut mode, KeyCode::Esc);
        assert!(mode.panel.is_none());

        press(&mut mode, KeyCode::Enter);
        assert!(mode.panel.is_some());
        assert_eq!(mode.session.status(), GameStatus::Idle);
    }

    #[test]
    fn test_delete_highlighted_user() {
        let mut mode = empty_mode();
        type_name(&mut mode, "Alice");
        press(&mut mode, KeyCode::Enter);
        press(&mut mode, KeyCode::Char('u'));
        assert!(mode.panel.is_some());

        press(&mut mode, KeyCode::Delete);
        assert!(mode.session.leaderboard().is_empty());
        assert!(mode.session.current_user().is_none());
    }

    #[test]
    fn test_game_over_message() {
        let mut mode = empty_mode();
        mode.on_tick_outcome(TickOutcome::GameOver(crate::game::GameOverReport {
            reason: crate::game::CollisionType::Wall,
            final_score: 40,
            high_score: Ok(true),
        }));
        assert_eq!(mode.message.as_deref(), Some("New high score: 40!"));
    }

    #[tokio::test]
    async fn test_tick_timer_follows_schedule() {
        let mut mode = empty_mode();
        type_name(&mut mode, "Alice");
        press(&mut mode, KeyCode::Enter);
        press(&mut mode, KeyCode::Enter);

        let mut timer = TickTimer::new();
        timer.sync(mode.session.active_tick());
        let first = timer.handle.unwrap();
        assert!(timer.interval.is_some());

        press(&mut mode, KeyCode::Char('r'));
        timer.sync(mode.session.active_tick());
        assert!(timer.handle.is_none());
        assert!(timer.interval.is_none());

        press(&mut mode, KeyCode::Enter);
        timer.sync(mode.session.active_tick());
        assert_ne!(timer.handle, Some(first));
    }
}
