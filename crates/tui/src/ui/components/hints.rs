use ratatui::{style::Style, text::Span};

use crate::ui::theme::Theme;

/// A keyboard hint consisting of a key and its action.
#[derive(Debug, Clone)]
pub struct KeyHint {
    pub key: &'static str,
    pub action: &'static str,
}

impl KeyHint {
    pub const fn new(key: &'static str, action: &'static str) -> Self {
        Self { key, action }
    }
}

/// Converts a list of key hints into styled spans for rendering.
pub fn hints_to_spans(hints: &[KeyHint], theme: &Theme) -> Vec<Span<'static>> {
    let mut spans = Vec::new();

    for (i, hint) in hints.iter().enumerate() {
        if i > 0 {
            spans.push(Span::raw("  "));
        }
        spans.push(Span::styled(hint.key, Style::default().fg(theme.accent)));
        spans.push(Span::raw(format!(" {}", hint.action)));
    }

    spans
}

/// Creates a separator span for dividing hint groups.
pub fn hint_separator(theme: &Theme) -> Span<'static> {
    Span::styled("  │  ", Style::default().fg(theme.border))
}

/// Hints that apply whatever field has focus.
pub fn global() -> Vec<KeyHint> {
    vec![
        KeyHint::new("Tab", "next field"),
        KeyHint::new("Enter", "add"),
        KeyHint::new("↑↓", "select"),
        KeyHint::new("Del", "delete"),
    ]
}

/// Hints for the focused field of the form.
pub fn for_field(field: crate::controller::Field) -> Vec<KeyHint> {
    use crate::controller::Field;

    match field {
        Field::Date => vec![
            KeyHint::new("←→", "day"),
            KeyHint::new("-+", "week"),
            KeyHint::new("t", "today"),
        ],
        Field::Category => vec![
            KeyHint::new("←→", "change"),
            KeyHint::new("Space", "next"),
        ],
        Field::Amount | Field::Description => vec![KeyHint::new("type", "edit")],
    }
}

pub fn quit() -> Vec<KeyHint> {
    vec![KeyHint::new("Ctrl+Q", "quit")]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::controller::Field;

    #[test]
    fn category_hints_list_every_cycling_key() {
        let keys: Vec<&str> = for_field(Field::Category).iter().map(|h| h.key).collect();
        assert_eq!(keys, vec!["←→", "Space"]);
    }

    #[test]
    fn date_hints_list_picker_keys() {
        let keys: Vec<&str> = for_field(Field::Date).iter().map(|h| h.key).collect();
        assert_eq!(keys, vec!["←→", "-+", "t"]);
    }
}
