use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Clear, Paragraph, Wrap},
};

use crate::ui::{
    components::hints::{KeyHint, hints_to_spans},
    theme::Theme,
};

/// Calculates a centered rect of fixed size, clamped to `area`.
fn centered_box(width: u16, height: u16, area: Rect) -> Rect {
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(0),
            Constraint::Length(height.min(area.height)),
            Constraint::Min(0),
        ])
        .split(area);

    let horizontal = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Min(0),
            Constraint::Length(width.min(area.width)),
            Constraint::Min(0),
        ])
        .split(vertical[1]);

    horizontal[1]
}

/// Modal yes/no question drawn over the whole screen.
pub fn render(frame: &mut Frame<'_>, area: Rect, question: &str, subject: &str) {
    let theme = Theme::default();
    let card = centered_box(52, 7, area);
    frame.render_widget(Clear, card);

    let block = Block::default()
        .title(" Confirm ")
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(theme.error));
    let inner = block.inner(card);
    frame.render_widget(block, card);

    let hints = [KeyHint::new("y", "yes"), KeyHint::new("n", "no")];
    let lines = vec![
        Line::from(Span::styled(
            question,
            Style::default().fg(theme.text).add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled(subject, Style::default().fg(theme.dim))),
        Line::from(""),
        Line::from(hints_to_spans(&hints, &theme)),
    ];

    frame.render_widget(
        Paragraph::new(lines)
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true }),
        inner,
    );
}
