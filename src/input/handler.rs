use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::game::Direction;

/// Intent while the board has focus
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeyAction {
    Steer(Direction),
    Start,
    TogglePause,
    Reset,
    OpenProfiles,
    Quit,
    None,
}

/// Intent while the profile panel has focus
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PanelAction {
    Insert(char),
    Backspace,
    /// Use the typed name, or the highlighted user when nothing is typed
    Confirm,
    HighlightUp,
    HighlightDown,
    DeleteHighlighted,
    Close,
    Quit,
    None,
}

pub struct InputHandler;

impl InputHandler {
    pub fn new() -> Self {
        Self
    }

    pub fn handle_key_event(&self, key: KeyEvent) -> KeyAction {
        if is_ctrl_c(&key) {
            return KeyAction::Quit;
        }

        match key.code {
            // Movement - Arrow keys
            KeyCode::Up => KeyAction::Steer(Direction::Up),
            KeyCode::Down => KeyAction::Steer(Direction::Down),
            KeyCode::Left => KeyAction::Steer(Direction::Left),
            KeyCode::Right => KeyAction::Steer(Direction::Right),

            // Movement - WASD
            KeyCode::Char('w') | KeyCode::Char('W') => KeyAction::Steer(Direction::Up),
            KeyCode::Char('s') | KeyCode::Char('S') => KeyAction::Steer(Direction::Down),
            KeyCode::Char('a') | KeyCode::Char('A') => KeyAction::Steer(Direction::Left),
            KeyCode::Char('d') | KeyCode::Char('D') => KeyAction::Steer(Direction::Right),

            // Controls
            KeyCode::Enter => KeyAction::Start,
            KeyCode::Char(' ') => KeyAction::TogglePause,
            KeyCode::Char('r') | KeyCode::Char('R') => KeyAction::Reset,
            KeyCode::Char('u') | KeyCode::Char('U') => KeyAction::OpenProfiles,
            KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => KeyAction::Quit,

            _ => KeyAction::None,
        }
    }

    pub fn handle_panel_key(&self, key: KeyEvent) -> PanelAction {
        if is_ctrl_c(&key) {
            return PanelAction::Quit;
        }

        match key.code {
            KeyCode::Char(c) if !c.is_control() => PanelAction::Insert(c),
            KeyCode::Backspace => PanelAction::Backspace,
            KeyCode::Enter => PanelAction::Confirm,
            KeyCode::Up => PanelAction::HighlightUp,
            KeyCode::Down => PanelAction::HighlightDown,
            KeyCode::Delete => PanelAction::DeleteHighlighted,
            KeyCode::Esc => PanelAction::Close,
            _ => PanelAction::None,
        }
    }
}

impl Default for InputHandler {
    fn default() -> Self {
        Self::new()
    }
}

fn is_ctrl_c(key: &KeyEvent) -> bool {
    key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c')
}
