use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Clear, Paragraph},
};

use super::terminal::GameCanvas;
use crate::game::GameStatus;
use crate::session::GameSession;
use crate::storage::KeyValueStore;

const LEADERBOARD_WIDTH: u16 = 30;

/// What the profile popup shows
pub struct PanelView<'a> {
    pub input: &'a str,
    pub highlighted: usize,
}

pub struct Renderer;

impl Renderer {
    pub fn new() -> Self {
        Self
    }

    pub fn render<S: KeyValueStore>(
        &self,
        frame: &mut Frame,
        session: &GameSession<S>,
        panel: Option<PanelView<'_>>,
        message: Option<&str>,
    ) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3), // Header
                Constraint::Min(0),    // Board and leaderboard
                Constraint::Length(4), // Footer
            ])
            .split(frame.area());

        frame.render_widget(self.render_stats(session), chunks[0]);

        let body = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Min(0), Constraint::Length(LEADERBOARD_WIDTH)])
            .split(chunks[1]);

        self.render_board(frame, body[0], session);
        frame.render_widget(self.render_leaderboard(session), body[1]);
        frame.render_widget(self.render_controls(message), chunks[2]);

        if let Some(panel) = panel {
            self.render_panel(frame, session, &panel);
        }
    }

    fn render_board<S: KeyValueStore>(
        &self,
        frame: &mut Frame,
        area: Rect,
        session: &GameSession<S>,
    ) {
        let config = session.engine().config();
        // two columns per grid cell keeps cells roughly square
        let outer = centered(
            (config.grid_width as u16).saturating_mul(2).saturating_add(2),
            (config.grid_height as u16).saturating_add(2),
            area,
        );

        let block = Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Double)
            .border_style(Style::default().fg(Color::White))
            .title(" Snake ");
        let inner = block.inner(outer);
        frame.render_widget(block, outer);
        frame.render_widget(GameCanvas::new(session.engine()), inner);
    }

    fn render_stats<S: KeyValueStore>(&self, session: &GameSession<S>) -> Paragraph<'_> {
        let player = session
            .current_user()
            .map(|u| u.name.clone())
            .unwrap_or_else(|| "Guest".to_string());
        let status = match session.status() {
            GameStatus::Idle => ("Ready", Color::Gray),
            GameStatus::Running => ("Playing", Color::Green),
            GameStatus::Paused => ("Paused", Color::Yellow),
            GameStatus::Over => ("Game over", Color::Red),
        };

        let text = vec![Line::from(vec![
            Span::styled("Player: ", Style::default().fg(Color::Yellow)),
            Span::styled(
                player,
                Style::default()
                    .fg(Color::Cyan)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::raw("    "),
            Span::styled("Score: ", Style::default().fg(Color::Yellow)),
            Span::styled(
                session.score().to_string(),
                Style::default()
                    .fg(Color::White)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::raw("    "),
            Span::styled("High: ", Style::default().fg(Color::Yellow)),
            Span::styled(session.high_score().to_string(), Style::default().fg(Color::White)),
            Span::raw("    "),
            Span::styled("Level: ", Style::default().fg(Color::Yellow)),
            Span::styled(session.level().to_string(), Style::default().fg(Color::White)),
            Span::raw("    "),
            Span::styled(status.0, Style::default().fg(status.1)),
        ])];

        Paragraph::new(text)
            .alignment(Alignment::Center)
            .block(Block::default().borders(Borders::BOTTOM))
    }

    fn render_leaderboard<S: KeyValueStore>(&self, session: &GameSession<S>) -> Paragraph<'_> {
        let ranked = session.leaderboard();
        let current = session.current_user().map(|u| u.key());

        let lines: Vec<Line> = if ranked.is_empty() {
            vec![Line::from(Span::styled(
                "No scores yet.",
                Style::default().fg(Color::DarkGray),
            ))]
        } else {
            ranked
                .iter()
                .enumerate()
                .map(|(index, user)| {
                    let rank = index + 1;
                    let (medal, color) = match rank {
                        1 => ("🥇", Color::Yellow),
                        2 => ("🥈", Color::White),
                        3 => ("🥉", Color::LightRed),
                        _ => ("  ", Color::Gray),
                    };
                    let mut name_style = Style::default().fg(color);
                    if current.as_deref() == Some(user.key().as_str()) {
                        name_style = name_style.add_modifier(Modifier::BOLD | Modifier::UNDERLINED);
                    }
                    Line::from(vec![
                        Span::styled(
                            format!("{} {:>2}. ", medal, rank),
                            Style::default().fg(color),
                        ),
                        Span::styled(format!("{:<16}", user.name), name_style),
                        Span::styled(format!("{:>5}", user.high_score), Style::default().fg(color)),
                    ])
                })
                .collect()
        };

        Paragraph::new(lines).block(
            Block::default()
                .borders(Borders::ALL)
                .border_type(BorderType::Rounded)
                .title(" Leaderboard "),
        )
    }

    fn render_panel<S: KeyValueStore>(
        &self,
        frame: &mut Frame,
        session: &GameSession<S>,
        panel: &PanelView<'_>,
    ) {
        let ranked = session.leaderboard();
        let height = (ranked.len() as u16).saturating_add(7).min(frame.area().height);
        let area = centered(40, height, frame.area());

        let mut lines = vec![
            Line::from(vec![
                Span::styled("Name: ", Style::default().fg(Color::Yellow)),
                Span::styled(panel.input.to_string(), Style::default().fg(Color::White)),
                Span::styled("_", Style::default().fg(Color::Gray)),
            ]),
            Line::from(""),
        ];
        if ranked.is_empty() {
            lines.push(Line::from(Span::styled(
                "No users yet. Type a name!",
                Style::default().fg(Color::DarkGray),
            )));
        }
        for (index, user) in ranked.iter().enumerate() {
            let style = if index == panel.highlighted && panel.input.is_empty() {
                Style::default().fg(Color::Black).bg(Color::Cyan)
            } else {
                Style::default().fg(Color::White)
            };
            lines.push(Line::from(Span::styled(
                format!(" {:<22} {:>6} ", user.name, user.high_score),
                style,
            )));
        }
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            "Enter pick  Del remove  Esc close",
            Style::default().fg(Color::Gray),
        )));

        frame.render_widget(Clear, area);
        frame.render_widget(
            Paragraph::new(lines).block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_type(BorderType::Double)
                    .border_style(Style::default().fg(Color::Cyan))
                    .title(" Players "),
            ),
            area,
        );
    }

    fn render_controls(&self, message: Option<&str>) -> Paragraph<'_> {
        let mut text = vec![Line::from(vec![
            Span::styled("↑↓←→", Style::default().fg(Color::Cyan)),
            Span::raw(" or "),
            Span::styled("WASD", Style::default().fg(Color::Cyan)),
            Span::raw(" to move | "),
            Span::styled("Enter", Style::default().fg(Color::Green)),
            Span::raw(" start | "),
            Span::styled("Space", Style::default().fg(Color::Yellow)),
            Span::raw(" pause | "),
            Span::styled("R", Style::default().fg(Color::Yellow)),
            Span::raw(" reset | "),
            Span::styled("U", Style::default().fg(Color::Cyan)),
            Span::raw(" players | "),
            Span::styled("Q", Style::default().fg(Color::Red)),
            Span::raw(" to quit"),
        ])];
        if let Some(message) = message {
            text.push(Line::from(Span::styled(
                message.to_string(),
                Style::default().fg(Color::LightYellow),
            )));
        }

        Paragraph::new(text)
            .alignment(Alignment::Center)
            .block(Block::default().borders(Borders::TOP))
    }
}

impl Default for Renderer {
    fn default() -> Self {
        Self::new()
    }
}

/// A width x height rect centred in area, shrunk to fit
fn centered(width: u16, height: u16, area: Rect) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect::new(
        area.x + (area.width - width) / 2,
        area.y + (area.height - height) / 2,
        width,
        height,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::{GameConfig, GameEngine};
    use crate::profile::ProfileStore;
    use crate::storage::MemoryStore;
    use ratatui::{Terminal, backend::TestBackend};

    fn screen_text(terminal: &Terminal<TestBackend>) -> String {
        let buffer = terminal.backend().buffer();
        let mut text = String::new();
        for y in 0..buffer.area.height {
            for x in 0..buffer.area.width {
                text.push_str(buffer[(x, y)].symbol());
            }
            text.push('\n');
        }
        text
    }

    fn session() -> GameSession<MemoryStore> {
        let engine = GameEngine::with_seed(GameConfig::default(), 2);
        let mut session = GameSession::new(engine, ProfileStore::open(MemoryStore::new()));
        session.create_user("Alice").unwrap();
        session.create_user("Bob").unwrap();
        session.select_user("Bob").unwrap();
        session
    }

    #[test]
    fn test_centered_shrinks_to_fit() {
        let area = Rect::new(0, 0, 10, 10);
        assert_eq!(centered(4, 2, area), Rect::new(3, 4, 4, 2));
        assert_eq!(centered(40, 40, area), area);
    }

    #[test]
    fn test_header_and_leaderboard() {
        let session = session();
        let mut terminal = Terminal::new(TestBackend::new(100, 32)).unwrap();
        terminal
            .draw(|frame| Renderer::new().render(frame, &session, None, Some("hello")))
            .unwrap();

        let text = screen_text(&terminal);
        assert!(text.contains("Player: Bob"));
        assert!(text.contains("Leaderboard"));
        assert!(text.contains("Alice"));
        assert!(text.contains("hello"));
        // both players ranked, so gold and silver are shown but not bronze
        assert!(text.contains("🥇"));
        assert!(text.contains("🥈"));
        assert!(!text.contains("🥉"));
    }

    #[test]
    fn test_profile_panel() {
        let session = session();
        let mut terminal = Terminal::new(TestBackend::new(100, 32)).unwrap();
        let panel = PanelView {
            input: "Car",
            highlighted: 0,
        };
        terminal
            .draw(|frame| Renderer::new().render(frame, &session, Some(panel), None))
            .unwrap();

        let text = screen_text(&terminal);
        assert!(text.contains("Players"));
        assert!(text.contains("Name: Car_"));
    }
}
