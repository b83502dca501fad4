use std::time::{Duration, Instant};

use ratatui::{
    Frame,
    layout::Rect,
    style::Style,
    text::Line,
    widgets::{Block, Borders, Clear, Paragraph},
};

use crate::ui::theme::Theme;

const TOAST_TTL: Duration = Duration::from_secs(4);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastLevel {
    Success,
    Warning,
    Error,
}

#[derive(Debug, Clone)]
pub struct ToastState {
    pub message: String,
    pub level: ToastLevel,
    expires_at: Instant,
}

impl ToastState {
    pub fn new(message: impl Into<String>, level: ToastLevel) -> Self {
        Self {
            message: message.into(),
            level,
            expires_at: Instant::now() + TOAST_TTL,
        }
    }

    pub fn expired(&self, now: Instant) -> bool {
        now >= self.expires_at
    }
}

pub fn render(frame: &mut Frame<'_>, area: Rect, toast: Option<&ToastState>) {
    let Some(toast) = toast else {
        return;
    };
    let theme = Theme::default();
    let width = (toast.message.chars().count() + 4).min(area.width as usize) as u16;
    let height = 3u16;
    let x = area.x + area.width.saturating_sub(width);
    let y = area
        .y
        .saturating_add(area.height.saturating_sub(height + 1));
    let rect = Rect { x, y, width, height };

    let style = match toast.level {
        ToastLevel::Success => Style::default().fg(theme.positive),
        ToastLevel::Warning => Style::default().fg(theme.accent),
        ToastLevel::Error => Style::default().fg(theme.error),
    };

    let block = Block::default().borders(Borders::ALL).border_style(style);
    let content = Paragraph::new(Line::from(toast.message.as_str())).style(style);
    frame.render_widget(Clear, rect);
    frame.render_widget(content.block(block), rect);
}
