use crate::app::AppState;
use crate::domain::UiMode;
use crate::persistence::KeyValueStorage;
use crate::ui::{
    layout::create_modal_area,
    styles::{error_style, modal_bg_style, modal_title_style},
};
use ratatui::{
    layout::Rect,
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame,
};

const EDIT_MODAL_HEIGHT: u16 = 9;
const CONFIRM_MODAL_HEIGHT: u16 = 7;

/// Render the edit overlay
pub fn render_edit_modal<S: KeyValueStorage>(f: &mut Frame, app: &mut AppState<S>, area: Rect) {
    let Some(buffer) = app.edit.buffer() else {
        return;
    };

    let modal_area = create_modal_area(area, EDIT_MODAL_HEIGHT);

    // Clear the area behind the modal
    f.render_widget(Clear, modal_area);

    let mut lines = Vec::new();
    lines.push(Line::raw(""));
    lines.push(Line::from(vec![
        Span::raw(" > "),
        Span::styled(buffer.to_string(), modal_title_style()),
        Span::styled("█", modal_title_style()), // Cursor
    ]));
    lines.push(Line::raw(""));

    match &app.edit_error {
        Some(error) => lines.push(Line::from(Span::styled(format!(" {}", error), error_style()))),
        None => lines.push(Line::raw("")),
    }
    lines.push(Line::raw(""));

    lines.push(Line::from(vec![
        Span::styled(" [Enter]", modal_title_style()),
        Span::raw(" Save  "),
        Span::styled("[Esc]", modal_title_style()),
        Span::raw(" Cancel"),
    ]));

    let paragraph = Paragraph::new(lines)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(Span::styled(" Edit Task ", modal_title_style()))
                .title(
                    ratatui::widgets::block::Title::from(Span::styled(" ✕ ", modal_title_style()))
                        .alignment(ratatui::layout::Alignment::Right),
                )
                .style(modal_bg_style()),
        )
        .wrap(Wrap { trim: false });

    f.render_widget(paragraph, modal_area);
    app.hit_areas.overlay = Some(modal_area);
}

/// Render the clear-all confirmation
pub fn render_confirm_clear_modal<S: KeyValueStorage>(f: &mut Frame, app: &mut AppState<S>, area: Rect) {
    if app.ui_mode != UiMode::ConfirmClearAll {
        return;
    }

    let modal_area = create_modal_area(area, CONFIRM_MODAL_HEIGHT);

    // Clear the area behind the modal
    f.render_widget(Clear, modal_area);

    let lines = vec![
        Line::raw(""),
        Line::raw("  Are you sure you want to clear all tasks?"),
        Line::raw(""),
        Line::from(vec![
            Span::styled("  [y]", modal_title_style()),
            Span::raw(" Yes, clear everything  "),
            Span::styled("[n]", modal_title_style()),
            Span::raw(" Keep them"),
        ]),
    ];

    let paragraph = Paragraph::new(lines)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(Span::styled(" Clear All ", modal_title_style()))
                .style(modal_bg_style()),
        )
        .wrap(Wrap { trim: false });

    f.render_widget(paragraph, modal_area);
    app.hit_areas.overlay = Some(modal_area);
}

/// Whether a click at `(column, row)` lands on the overlay's close mark in its top-right corner
pub fn is_close_control(overlay: Rect, column: u16, row: u16) -> bool {
    row == overlay.y && column + 4 >= overlay.x + overlay.width && column < overlay.x + overlay.width
}
