use crate::domain::UiMode;
use crate::ui::styles::hint_style;
use ratatui::{layout::Rect, text::{Line, Span}, widgets::Paragraph, Frame};

/// Render the keybindings hint bar
pub fn render_keybindings(f: &mut Frame, mode: UiMode, area: Rect) {
    let paragraph = Paragraph::new(hint_line(mode)).style(hint_style());
    f.render_widget(paragraph, area);
}

fn hint_line(mode: UiMode) -> Line<'static> {
    let hints: &[&str] = match mode {
        UiMode::Input => &[
            " Enter add   ",
            "Tab list   ",
            "Ctrl+C quit",
        ],
        UiMode::Browse => &[
            " ↑/↓ select   ",
            "Space done   ",
            "e edit   ",
            "d delete   ",
            "1/2/3 all/completed/pending   ",
            "C clear completed   ",
            "X clear all   ",
            "Tab input   ",
            "q quit",
        ],
        UiMode::Editing => &[" Enter save   ", "Esc cancel"],
        UiMode::ConfirmClearAll => &[" y confirm   ", "n / Esc cancel"],
    };

    Line::from(hints.iter().map(|h| Span::raw(*h)).collect::<Vec<_>>())
}
