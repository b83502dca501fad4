use ratatui::style::Color;

#[derive(Debug, Clone, Copy)]
pub struct Theme {
    pub text: Color,
    pub dim: Color,
    pub accent: Color,
    pub border: Color,
    pub positive: Color,
    pub error: Color,
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            text: Color::Rgb(220, 220, 220),
            dim: Color::Rgb(140, 140, 140),
            accent: Color::Rgb(42, 157, 143),
            border: Color::Rgb(176, 191, 198),
            positive: Color::Rgb(76, 175, 80),
            error: Color::Rgb(255, 16, 46),
        }
    }
}
