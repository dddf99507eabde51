use crate::app::AppState;
use crate::domain::{toolbar_layout, Control, MessageKind, UiMode, CONTROL_GAP};
use crate::persistence::KeyValueStorage;
use crate::ui::styles::{
    active_control_style, border_style, control_style, disabled_control_style, error_style,
    focused_border_style, info_style, modal_title_style, title_style,
};
use ratatui::{
    layout::Rect,
    style::Style,
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

/// Render the new-task input box
pub fn render_input_bar<S: KeyValueStorage>(f: &mut Frame, app: &mut AppState<S>, area: Rect) {
    let focused = app.ui_mode == UiMode::Input;

    let line = Line::from(vec![
        Span::raw("> "),
        Span::raw(app.input.clone()),
        if focused {
            Span::styled("█", modal_title_style()) // Cursor
        } else {
            Span::raw("")
        },
    ]);

    let paragraph = Paragraph::new(line).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(if focused { focused_border_style() } else { border_style() })
            .title(Span::styled(" New task ", title_style())),
    );

    f.render_widget(paragraph, area);
    app.hit_areas.input = area;
}

/// Render the validation / status line under the input
pub fn render_message_line<S: KeyValueStorage>(f: &mut Frame, app: &AppState<S>, area: Rect) {
    let line = match &app.message {
        Some((MessageKind::Error, text)) => Line::from(Span::styled(format!(" {}", text), error_style())),
        Some((MessageKind::Info, text)) => Line::from(Span::styled(format!(" {}", text), info_style())),
        None => Line::raw(""),
    };
    f.render_widget(Paragraph::new(line), area);
}

/// Render the filter controls and the two clear controls
pub fn render_toolbar<S: KeyValueStorage>(f: &mut Frame, app: &mut AppState<S>, area: Rect) {
    let mut spans = Vec::new();

    for (control, _, _) in toolbar_layout() {
        if !spans.is_empty() {
            spans.push(Span::raw(" ".repeat(CONTROL_GAP as usize)));
        }
        spans.push(Span::styled(control.label(), control_style_for(app, control)));
    }

    f.render_widget(Paragraph::new(Line::from(spans)), area);
    app.hit_areas.toolbar = area;
}

fn control_style_for<S: KeyValueStorage>(app: &AppState<S>, control: Control) -> Style {
    match control {
        Control::Filter(filter) if filter == app.filter => active_control_style(),
        Control::ClearCompleted if !app.has_completed => disabled_control_style(),
        _ => control_style(),
    }
}
