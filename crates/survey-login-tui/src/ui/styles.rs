use ratatui::style::{Color, Modifier, Style};

// Survey Site palette: teal brand, amber keys, coral errors
pub const TEAL: Color = Color::Rgb(38, 166, 154);
pub const AMBER: Color = Color::Rgb(255, 183, 77);
pub const CORAL: Color = Color::Rgb(239, 108, 96);
pub const SLATE: Color = Color::Rgb(120, 134, 148);
pub const INK: Color = Color::Rgb(22, 36, 44);
pub const SELECTION: Color = Color::Rgb(30, 72, 74);

pub fn brand_style() -> Style {
    Style::default().fg(TEAL).add_modifier(Modifier::BOLD)
}

pub fn heading_style() -> Style {
    Style::default()
        .fg(Color::White)
        .add_modifier(Modifier::BOLD | Modifier::UNDERLINED)
}

pub fn selected_style() -> Style {
    Style::default()
        .bg(SELECTION)
        .fg(Color::White)
        .add_modifier(Modifier::BOLD)
}

pub fn text_style() -> Style {
    Style::default().fg(Color::White)
}

pub fn muted_style() -> Style {
    Style::default().fg(SLATE)
}

pub fn error_style() -> Style {
    Style::default().fg(CORAL).add_modifier(Modifier::BOLD)
}

/// Status line text after a successful action
pub fn notice_style() -> Style {
    Style::default().fg(TEAL)
}

pub fn question_style() -> Style {
    Style::default().fg(AMBER)
}

pub fn answer_style() -> Style {
    Style::default().fg(Color::White).add_modifier(Modifier::ITALIC)
}

pub fn border_style(focused: bool) -> Style {
    if focused {
        Style::default().fg(TEAL)
    } else {
        Style::default().fg(SLATE)
    }
}

pub fn prompt_border_style(destructive: bool) -> Style {
    if destructive {
        Style::default().fg(CORAL)
    } else {
        Style::default().fg(AMBER)
    }
}

pub fn status_bar_style() -> Style {
    Style::default().bg(INK).fg(Color::White)
}

pub fn help_key_style() -> Style {
    Style::default().fg(AMBER).add_modifier(Modifier::BOLD)
}
