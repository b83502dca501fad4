use engine::Money;
use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Cell, Paragraph, Row, Table, TableState},
};

use crate::{
    controller::{Controller, Field, FormInput},
    ui::theme::Theme,
};

const DATE_FORMAT: &str = "%Y-%m-%d";

pub fn render<S>(frame: &mut Frame<'_>, area: Rect, controller: &Controller<S>) {
    let theme = Theme::default();
    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(4), Constraint::Min(0)])
        .split(area);

    render_form(frame, layout[0], &controller.form, &theme);
    render_table(frame, layout[1], controller, &theme);
}

fn render_form(frame: &mut Frame<'_>, area: Rect, form: &FormInput, theme: &Theme) {
    let block = Block::default()
        .title(" Expense Tracker ")
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(theme.border));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(1), Constraint::Length(1)])
        .split(inner);

    let date = form.date.format(DATE_FORMAT).to_string();
    let category = format!("‹ {} ›", form.category);

    let first = [
        (Field::Date, date.as_str()),
        (Field::Category, category.as_str()),
    ];
    let second = [
        (Field::Amount, form.amount.as_str()),
        (Field::Description, form.description.as_str()),
    ];

    for (row, fields) in rows.iter().zip([first, second]) {
        let columns = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(40), Constraint::Percentage(60)])
            .split(*row);
        for (column, (field, value)) in columns.iter().zip(fields) {
            let line = field_line(field, value, form.focus == field, theme);
            frame.render_widget(Paragraph::new(line), *column);
        }
    }
}

fn field_line(field: Field, value: &str, focused: bool, theme: &Theme) -> Line<'static> {
    let label_style = if focused {
        Style::default().fg(theme.accent).add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(theme.dim)
    };
    let value_style = if focused {
        Style::default().fg(theme.accent)
    } else {
        Style::default().fg(theme.text)
    };
    let cursor = match field {
        Field::Amount | Field::Description if focused => "│",
        _ => "",
    };

    Line::from(vec![
        Span::styled(format!("{:<12}", field.label()), label_style),
        Span::styled(format!("{value}{cursor}"), value_style),
    ])
}

fn render_table<S>(frame: &mut Frame<'_>, area: Rect, controller: &Controller<S>, theme: &Theme) {
    let total: Money = controller.expenses.iter().map(|e| e.amount).sum();
    let block = Block::default()
        .title(" Expenses ")
        .title_bottom(Line::from(format!(" Total: {total} ")).alignment(Alignment::Right))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(theme.border));

    if controller.expenses.is_empty() {
        frame.render_widget(
            Paragraph::new(Line::from(Span::styled(
                "No expenses yet.",
                Style::default().fg(theme.dim),
            )))
            .alignment(Alignment::Center)
            .block(block),
            area,
        );
        return;
    }

    let header = Row::new(["ID", "Date", "Category", "Amount", "Description"])
        .style(Style::default().fg(theme.accent).add_modifier(Modifier::BOLD));

    let rows = controller.expenses.iter().map(|expense| {
        Row::new(vec![
            Cell::from(expense.id.to_string()),
            Cell::from(expense.date.format(DATE_FORMAT).to_string()),
            Cell::from(expense.category.label()),
            Cell::from(Line::from(expense.amount.to_string()).alignment(Alignment::Right)),
            Cell::from(expense.description.clone()),
        ])
    });

    let widths = [
        Constraint::Length(6),
        Constraint::Length(12),
        Constraint::Length(14),
        Constraint::Length(12),
        Constraint::Min(10),
    ];

    let table = Table::new(rows, widths)
        .header(header)
        .block(block)
        .column_spacing(2)
        .row_highlight_style(
            Style::default()
                .fg(theme.positive)
                .add_modifier(Modifier::BOLD | Modifier::REVERSED),
        )
        .highlight_symbol("» ");

    let mut state = TableState::default().with_selected(controller.selected);
    frame.render_stateful_widget(table, area, &mut state);
}
