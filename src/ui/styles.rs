use ratatui::style::{Color, Modifier, Style};

/// Pending task text
pub fn default_style() -> Style {
    Style::default().fg(Color::White)
}

/// Highlighted row while browsing
pub fn selected_style() -> Style {
    Style::default().bg(Color::Blue).add_modifier(Modifier::BOLD)
}

/// Completed task text: struck through
pub fn completed_style() -> Style {
    Style::default()
        .fg(Color::Gray)
        .add_modifier(Modifier::CROSSED_OUT)
}

/// Row that just appeared
pub fn entering_style() -> Style {
    Style::default().fg(Color::DarkGray)
}

/// Row on its way out
pub fn leaving_style() -> Style {
    Style::default()
        .fg(Color::DarkGray)
        .add_modifier(Modifier::DIM | Modifier::ITALIC)
}

/// Edit / delete affordances
pub fn affordance_style() -> Style {
    Style::default().fg(Color::Yellow)
}

pub fn title_style() -> Style {
    Style::default()
        .fg(Color::LightMagenta)
        .add_modifier(Modifier::BOLD)
}

pub fn border_style() -> Style {
    Style::default().fg(Color::DarkGray)
}

/// Border of the focused pane
pub fn focused_border_style() -> Style {
    Style::default().fg(Color::LightCyan)
}

/// Active toolbar control
pub fn active_control_style() -> Style {
    Style::default()
        .fg(Color::Black)
        .bg(Color::Cyan)
        .add_modifier(Modifier::BOLD)
}

/// Toolbar control that can be used
pub fn control_style() -> Style {
    Style::default().fg(Color::White)
}

/// Toolbar control that is switched off
pub fn disabled_control_style() -> Style {
    Style::default()
        .fg(Color::DarkGray)
        .add_modifier(Modifier::DIM)
}

/// Overlay body, opaque so the list and blobs do not show through
pub fn modal_bg_style() -> Style {
    Style::default().bg(Color::Black).fg(Color::White)
}

pub fn modal_title_style() -> Style {
    Style::default()
        .fg(Color::Yellow)
        .add_modifier(Modifier::BOLD)
}

/// Hint bar at the top
pub fn hint_style() -> Style {
    Style::default().fg(Color::Gray).add_modifier(Modifier::ITALIC)
}

/// Validation messages
pub fn error_style() -> Style {
    Style::default()
        .fg(Color::Red)
        .add_modifier(Modifier::BOLD)
}

/// Informational message style
pub fn info_style() -> Style {
    Style::default().fg(Color::Green)
}
