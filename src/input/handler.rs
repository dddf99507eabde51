use crate::app::AppState;
use crate::domain::{hit_test, toolbar_hit, Control, Filter, RowTarget, UiMode};
use crate::persistence::KeyValueStorage;
use crate::ui::modal::is_close_control;
use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers, MouseButton, MouseEvent, MouseEventKind};
use ratatui::layout::Rect;
use std::time::Instant;

/// Handle keyboard input events. Returns `true` when the app should quit.
pub fn handle_key<S: KeyValueStorage>(app: &mut AppState<S>, key: KeyEvent, now: Instant) -> Result<bool> {
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        return Ok(true);
    }

    match app.ui_mode {
        UiMode::Input => handle_input_mode(app, key),
        UiMode::Browse => handle_browse_mode(app, key, now),
        UiMode::Editing => handle_editing_mode(app, key),
        UiMode::ConfirmClearAll => handle_confirm_mode(app, key),
    }
}

/// Handle keys while typing a new task
fn handle_input_mode<S: KeyValueStorage>(app: &mut AppState<S>, key: KeyEvent) -> Result<bool> {
    match key.code {
        KeyCode::Enter => app.submit_input()?,
        KeyCode::Tab | KeyCode::Esc => app.toggle_focus(),
        KeyCode::Down if app.input.is_empty() => app.toggle_focus(),
        KeyCode::Backspace => app.input_backspace(),
        KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => app.input_add_char(c),
        _ => {}
    }
    Ok(false)
}

/// Handle keys while moving through the list
fn handle_browse_mode<S: KeyValueStorage>(app: &mut AppState<S>, key: KeyEvent, now: Instant) -> Result<bool> {
    match key.code {
        KeyCode::Up | KeyCode::Char('k') => app.move_selection_up(),
        KeyCode::Down | KeyCode::Char('j') => app.move_selection_down(),

        // Toggle completion
        KeyCode::Char(' ') | KeyCode::Enter => app.toggle_selected()?,

        KeyCode::Char('e') | KeyCode::Char('E') => app.open_edit_selected()?,

        KeyCode::Char('d') | KeyCode::Char('D') | KeyCode::Delete => app.delete_selected(now),

        // Filters
        KeyCode::Char('1') => app.set_filter(Filter::All)?,
        KeyCode::Char('2') => app.set_filter(Filter::Completed)?,
        KeyCode::Char('3') => app.set_filter(Filter::Pending)?,

        KeyCode::Char('C') => app.activate(Control::ClearCompleted)?,
        KeyCode::Char('X') => app.activate(Control::ClearAll)?,

        // Back to the input line
        KeyCode::Tab | KeyCode::Char('a') | KeyCode::Char('i') => app.toggle_focus(),

        KeyCode::Char('q') | KeyCode::Char('Q') => return Ok(true),
        _ => {}
    }
    Ok(false)
}

/// Handle keys in the edit overlay
fn handle_editing_mode<S: KeyValueStorage>(app: &mut AppState<S>, key: KeyEvent) -> Result<bool> {
    match key.code {
        KeyCode::Enter => app.save_edit()?,
        KeyCode::Esc => app.close_edit(),
        KeyCode::Backspace => app.edit.backspace(),
        KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => app.edit.push_char(c),
        _ => {}
    }
    Ok(false)
}

/// Handle keys in the clear-all confirmation
fn handle_confirm_mode<S: KeyValueStorage>(app: &mut AppState<S>, key: KeyEvent) -> Result<bool> {
    match key.code {
        KeyCode::Char('y') | KeyCode::Char('Y') => app.confirm_clear_all()?,
        KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => app.cancel_clear_all(),
        _ => {}
    }
    Ok(false)
}

fn contains(rect: Rect, column: u16, row: u16) -> bool {
    column >= rect.x && column < rect.x + rect.width && row >= rect.y && row < rect.y + rect.height
}

/// Handle a mouse event using the regions recorded by the last draw
pub fn handle_mouse<S: KeyValueStorage>(app: &mut AppState<S>, mouse: MouseEvent, now: Instant) -> Result<()> {
    let (column, row) = (mouse.column, mouse.row);

    match mouse.kind {
        MouseEventKind::Down(MouseButton::Left) => {}
        MouseEventKind::ScrollUp if !app.ui_mode.is_modal() => {
            app.move_selection_up();
            return Ok(());
        }
        MouseEventKind::ScrollDown if !app.ui_mode.is_modal() => {
            app.move_selection_down();
            return Ok(());
        }
        _ => return Ok(()),
    }

    // Modal open: a click outside it (or on its close mark) dismisses it
    if let Some(overlay) = app.hit_areas.overlay {
        let dismiss = !contains(overlay, column, row) || is_close_control(overlay, column, row);
        if dismiss {
            match app.ui_mode {
                UiMode::Editing => app.close_edit(),
                UiMode::ConfirmClearAll => app.cancel_clear_all(),
                _ => {}
            }
        }
        return Ok(());
    }

    let areas = app.hit_areas;

    if contains(areas.toolbar, column, row) {
        if let Some(control) = toolbar_hit(column - areas.toolbar.x) {
            app.activate(control)?;
        }
        return Ok(());
    }

    if contains(areas.input, column, row) {
        app.ui_mode = UiMode::Input;
        return Ok(());
    }

    if contains(areas.list, column, row) {
        let index = areas.list_offset + (row - areas.list.y) as usize;
        let Some(id) = app.rows.get(index).map(|r| r.id) else {
            return Ok(());
        };

        app.selected_index = index;
        app.ui_mode = UiMode::Browse;
        match hit_test(column - areas.list.x, areas.list.width) {
            RowTarget::Body => app.toggle(id)?,
            RowTarget::Edit => app.open_edit(id)?,
            RowTarget::Delete => app.mark_for_removal(id, now),
        }
    }

    Ok(())
}
