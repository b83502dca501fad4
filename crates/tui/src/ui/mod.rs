pub mod components;
pub mod keymap;
pub mod screens;

mod terminal;
mod theme;

use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    text::Line,
    widgets::Paragraph,
};

use crate::controller::{CONFIRM_DELETE, Controller};

use components::{
    hints::{self, hint_separator, hints_to_spans},
    toast::ToastState,
};
pub use terminal::TerminalGuard;
use theme::Theme;

pub fn render<S>(frame: &mut Frame<'_>, controller: &Controller<S>, toast: Option<&ToastState>) {
    let area = frame.area();
    let theme = Theme::default();

    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(0),    // Form and table
            Constraint::Length(1), // Bottom bar
        ])
        .split(area);

    screens::expenses::render(frame, layout[0], controller);
    render_bottom_bar(frame, layout[1], controller, &theme);

    if let Some(id) = controller.pending_delete {
        let subject = controller
            .expenses
            .iter()
            .find(|expense| expense.id == id)
            .map(|expense| expense.to_string())
            .unwrap_or_else(|| format!("#{id}"));
        components::confirm::render(frame, area, CONFIRM_DELETE, &subject);
    }
    components::toast::render(frame, area, toast);
}

fn render_bottom_bar<S>(frame: &mut Frame<'_>, area: Rect, controller: &Controller<S>, theme: &Theme) {
    let mut parts = hints_to_spans(&hints::global(), theme);
    parts.push(hint_separator(theme));
    parts.extend(hints_to_spans(&hints::for_field(controller.form.focus), theme));
    parts.push(hint_separator(theme));
    parts.extend(hints_to_spans(&hints::quit(), theme));

    frame.render_widget(Paragraph::new(Line::from(parts)), area);
}
