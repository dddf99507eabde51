use ratatui::layout::{Constraint, Direction, Layout, Rect};

const MODAL_MAX_WIDTH: u16 = 64;

/// Screen regions for one frame
pub struct MainLayout {
    /// Whole screen; the background is drawn here first
    pub background_area: Rect,
    pub keybindings_area: Rect,
    pub input_area: Rect,
    pub message_area: Rect,
    pub toolbar_area: Rect,
    pub list_area: Rect,
}

/// Split the screen: a one-row hint bar on top, then a centred column holding
/// the input box, message line, toolbar and task list
pub fn create_layout(area: Rect) -> MainLayout {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Min(0),
        ])
        .split(area);

    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage(15),
            Constraint::Percentage(70),
            Constraint::Percentage(15),
        ])
        .split(rows[1]);

    let column = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // Breathing room under the bar
            Constraint::Length(3), // Input box
            Constraint::Length(1), // Validation / status message
            Constraint::Length(1), // Toolbar
            Constraint::Min(0),    // Task list
        ])
        .split(columns[1]);

    MainLayout {
        background_area: area,
        keybindings_area: rows[0],
        input_area: column[1],
        message_area: column[2],
        toolbar_area: column[3],
        list_area: column[4],
    }
}

/// Overlay rectangle `height` rows tall, at most 64 columns wide, centred
/// horizontally and a little above the middle
pub fn create_modal_area(area: Rect, height: u16) -> Rect {
    let width = area.width.saturating_sub(4).min(MODAL_MAX_WIDTH);
    let height = height.min(area.height);
    let x = area.x + (area.width - width) / 2;
    let y = area.y + (area.height - height) / 3;
    Rect::new(x, y, width, height)
}
