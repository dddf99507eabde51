pub mod background_pane;
pub mod input_bar;
pub mod keybindings;
pub mod layout;
pub mod list_pane;
pub mod modal;
pub mod styles;

use crate::app::AppState;
use crate::domain::UiMode;
use crate::persistence::KeyValueStorage;
use background_pane::render_background_pane;
use input_bar::{render_input_bar, render_message_line, render_toolbar};
use keybindings::render_keybindings;
use layout::create_layout;
use list_pane::render_list_pane;
use modal::{render_confirm_clear_modal, render_edit_modal};
use ratatui::Frame;

/// Main render function - draws the entire UI
pub fn render<S: KeyValueStorage>(f: &mut Frame, app: &mut AppState<S>) {
    let size = f.size();
    let layout = create_layout(size);

    // Background goes first so everything else draws over it
    if let Some(background) = &app.background {
        render_background_pane(f, background, layout.background_area);
    }

    render_keybindings(f, app.ui_mode, layout.keybindings_area);

    render_input_bar(f, app, layout.input_area);
    render_message_line(f, app, layout.message_area);
    render_toolbar(f, app, layout.toolbar_area);
    render_list_pane(f, app, layout.list_area);

    app.hit_areas.overlay = None;
    match app.ui_mode {
        UiMode::Editing => render_edit_modal(f, app, size),
        UiMode::ConfirmClearAll => render_confirm_clear_modal(f, app, size),
        UiMode::Input | UiMode::Browse => {}
    }
}
