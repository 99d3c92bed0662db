use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Paragraph},
};

use crate::game::{GameState, Position};

/// Which interactive mode is drawing; decides the footer and game-over text
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View {
    Human,
    Playback,
}

/// Label/value pairs shown in the header
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StatusLine {
    fields: Vec<(&'static str, String)>,
}

impl StatusLine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn field(mut self, label: &'static str, value: impl ToString) -> Self {
        self.fields.push((label, value.to_string()));
        self
    }

    pub fn fields(&self) -> &[(&'static str, String)] {
        &self.fields
    }

    fn to_line(&self) -> Line<'_> {
        let mut spans = Vec::with_capacity(self.fields.len() * 3);
        for (i, (label, value)) in self.fields.iter().enumerate() {
            if i > 0 {
                spans.push(Span::raw("    "));
            }
            spans.push(Span::styled(format!("{}: ", label), Style::default().fg(Color::Yellow)));
            spans.push(Span::styled(
                value.as_str(),
                Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
            ));
        }
        Line::from(spans)
    }
}

pub struct Renderer {
    view: View,
}

impl Renderer {
    pub fn new(view: View) -> Self {
        Self { view }
    }

    pub fn render(&self, frame: &mut Frame, state: &GameState, status: &StatusLine) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3), // Header
                Constraint::Min(0),    // Game area
                Constraint::Length(3), // Footer
            ])
            .split(frame.area());

        frame.render_widget(
            Paragraph::new(vec![status.to_line()]).alignment(Alignment::Center),
            chunks[0],
        );

        // Center the game grid horizontally
        let game_area = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([
                Constraint::Percentage(10),
                Constraint::Percentage(80),
                Constraint::Percentage(10),
            ])
            .split(chunks[1])[1];

        if state.is_alive {
            frame.render_widget(self.render_grid(state), game_area);
        } else {
            frame.render_widget(self.render_game_over(state), game_area);
        }

        frame.render_widget(self.render_controls(), chunks[2]);
    }

    fn render_grid(&self, state: &GameState) -> Paragraph<'static> {
        let title = match self.view {
            View::Human => " Snake ",
            View::Playback => " Snake (trained agent) ",
        };

        Paragraph::new(grid_lines(state))
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_type(BorderType::Double)
                    .border_style(Style::default().fg(Color::White))
                    .title(title),
            )
            .alignment(Alignment::Center)
    }

    fn render_game_over(&self, state: &GameState) -> Paragraph<'static> {
        let mut text = vec![
            Line::from(""),
            Line::from(vec![Span::styled(
                "GAME OVER",
                Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
            )]),
            Line::from(""),
            Line::from(vec![
                Span::styled("Final Score: ", Style::default().fg(Color::Yellow)),
                Span::styled(
                    state.score.to_string(),
                    Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
                ),
            ]),
            Line::from(""),
        ];

        if self.view == View::Human {
            text.push(Line::from(vec![
                Span::styled("Press ", Style::default().fg(Color::Gray)),
                Span::styled("R", Style::default().fg(Color::Green).add_modifier(Modifier::BOLD)),
                Span::styled(" to restart or ", Style::default().fg(Color::Gray)),
                Span::styled("Q", Style::default().fg(Color::Red).add_modifier(Modifier::BOLD)),
                Span::styled(" to quit", Style::default().fg(Color::Gray)),
            ]));
        }

        Paragraph::new(text).alignment(Alignment::Center).block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Red)),
        )
    }

    fn render_controls(&self) -> Paragraph<'static> {
        let line = match self.view {
            View::Human => Line::from(vec![
                Span::styled("↑↓←→", Style::default().fg(Color::Cyan)),
                Span::raw(" or "),
                Span::styled("WASD", Style::default().fg(Color::Cyan)),
                Span::raw(" to move | "),
                Span::styled("Q", Style::default().fg(Color::Red)),
                Span::raw(" to quit"),
            ]),
            View::Playback => Line::from(vec![
                Span::raw("Agent is playing | "),
                Span::styled("Q", Style::default().fg(Color::Red)),
                Span::raw(" to quit"),
            ]),
        };

        Paragraph::new(vec![line]).alignment(Alignment::Center)
    }
}

impl Default for Renderer {
    fn default() -> Self {
        Self::new(View::Human)
    }
}

/// One styled line per grid row: head, body, food, empty
fn grid_lines(state: &GameState) -> Vec<Line<'static>> {
    let head = state.snake.head();

    (0..state.grid_height)
        .map(|y| {
            let spans: Vec<Span<'static>> = (0..state.grid_width)
                .map(|x| {
                    let pos = Position::new(x as i32, y as i32);
                    if pos == head {
                        Span::styled(
                            "■ ",
                            Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
                        )
                    } else if state.snake.body.contains(&pos) {
                        Span::styled("□ ", Style::default().fg(Color::Green))
                    } else if pos == state.food {
                        Span::styled(
                            "O ",
                            Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
                        )
                    } else {
                        Span::styled(". ", Style::default().fg(Color::DarkGray))
                    }
                })
                .collect();
            Line::from(spans)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::{Direction as Heading, Snake};
    use ratatui::{Terminal, backend::TestBackend};

    fn sample_state() -> GameState {
        GameState::new(
            Snake::new(Position::new(2, 1), Heading::Right, 2),
            Position::new(0, 3),
            4,
            4,
        )
    }

    #[test]
    fn test_grid_glyphs() {
        let lines = grid_lines(&sample_state());
        assert_eq!(lines.len(), 4);
        assert_eq!(lines[1].spans.len(), 4);

        assert_eq!(lines[1].spans[2].content, "■ ");
        assert_eq!(lines[1].spans[1].content, "□ ");
        assert_eq!(lines[3].spans[0].content, "O ");
        assert_eq!(lines[0].spans[0].content, ". ");
    }

    #[test]
    fn test_status_line_fields() {
        let status = StatusLine::new().field("Score", 3).field("Epsilon", "0.010");
        assert_eq!(status.fields().len(), 2);
        assert_eq!(status.fields()[1], ("Epsilon", "0.010".to_string()));

        let line = status.to_line();
        assert_eq!(line.spans[0].content, "Score: ");
        assert_eq!(line.spans[1].content, "3");
    }

    #[test]
    fn test_render_into_test_backend() {
        let mut terminal = Terminal::new(TestBackend::new(40, 12)).unwrap();
        let renderer = Renderer::new(View::Playback);
        let status = StatusLine::new().field("Score", 0);

        terminal
            .draw(|frame| renderer.render(frame, &sample_state(), &status))
            .unwrap();

        let rendered: String = terminal
            .backend()
            .buffer()
            .content
            .iter()
            .map(|cell| cell.symbol())
            .collect();
        assert!(rendered.contains("Score"));
        assert!(rendered.contains("quit"));
    }
}
