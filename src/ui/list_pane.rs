use crate::app::AppState;
use crate::domain::{Row, RowPhase, UiMode, AFFORDANCE_WIDTH};
use crate::persistence::KeyValueStorage;
use crate::ui::styles::{
    affordance_style, border_style, completed_style, default_style, entering_style,
    focused_border_style, leaving_style, selected_style, title_style,
};
use ratatui::{
    layout::Rect,
    style::Style,
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState},
    Frame,
};
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

/// Render the task list, one line per visible row
pub fn render_list_pane<S: KeyValueStorage>(f: &mut Frame, app: &mut AppState<S>, area: Rect) {
    let focused = app.ui_mode == UiMode::Browse;
    let title = format!(" Tasks ({}) ", app.filter.label());

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(if focused { focused_border_style() } else { border_style() })
        .title(Span::styled(title, title_style()));
    let inner = block.inner(area);

    let items: Vec<ListItem> = if app.rows.is_empty() {
        vec![ListItem::new(Line::from(Span::styled(
            empty_hint(app),
            entering_style(),
        )))]
    } else {
        app.rows
            .iter()
            .map(|row| ListItem::new(create_row_line(row, inner.width)))
            .collect()
    };

    let list = List::new(items).block(block).highlight_style(selected_style());

    let mut state = ListState::default();
    if focused && !app.rows.is_empty() {
        state.select(Some(app.selected_index));
    }

    f.render_stateful_widget(list, area, &mut state);

    app.hit_areas.list = inner;
    app.hit_areas.list_offset = state.offset();
}

fn empty_hint<S: KeyValueStorage>(app: &AppState<S>) -> String {
    match app.filter {
        crate::domain::Filter::All => " Nothing to do. Type a task above and press Enter.".to_string(),
        other => format!(" No {} tasks.", other.as_str()),
    }
}

/// Build one row: `[✓] text ... ✎  ✗ `, padded so the affordances sit at the right edge
pub fn create_row_line(row: &Row, width: u16) -> Line<'static> {
    let marker = if row.completed { "[✓] " } else { "[ ] " };
    let body_width = width.saturating_sub(AFFORDANCE_WIDTH) as usize;
    let text_width = body_width.saturating_sub(marker.width());
    let text = fit(&row.text, text_width);

    let text_style = match row.phase {
        RowPhase::Leaving => leaving_style(),
        RowPhase::Entering => entering_style(),
        RowPhase::Settled if row.completed => completed_style(),
        RowPhase::Settled => default_style(),
    };
    let marker_style = if row.phase == RowPhase::Leaving { leaving_style() } else { Style::default() };

    Line::from(vec![
        Span::styled(marker.to_string(), marker_style),
        Span::styled(text, text_style),
        Span::styled(" ✎  ✗ ".to_string(), affordance_style()),
    ])
}

/// Truncate with an ellipsis or pad with spaces to exactly `width` terminal cells.
///
/// Wide characters (CJK, most emoji) take two cells, so this counts display
/// width and never characters. Control characters are shown as spaces.
fn fit(text: &str, width: usize) -> String {
    let text: String = text.chars().map(|c| if c.is_control() { ' ' } else { c }).collect();
    let text_width = text.width();
    if text_width <= width {
        return format!("{}{}", text, " ".repeat(width - text_width));
    }
    if width == 0 {
        return String::new();
    }

    let budget = width - 1;
    let mut out = String::new();
    let mut used = 0;
    for c in text.chars() {
        let w = c.width().unwrap_or(0);
        if used + w > budget {
            break;
        }
        out.push(c);
        used += w;
    }
    out.push('…');
    used += 1;
    // A wide character that did not fit leaves a one-cell gap
    out.push_str(&" ".repeat(width - used));
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{hit_test, RowTarget};

    fn row(text: &str, completed: bool, phase: RowPhase) -> Row {
        Row { id: 1, text: text.to_string(), completed, phase }
    }

    fn line_text(line: &Line) -> String {
        line.spans.iter().map(|s| s.content.as_ref()).collect()
    }

    #[test]
    fn test_row_line_puts_affordances_at_right_edge() {
        let line = create_row_line(&row("buy milk", false, RowPhase::Settled), 30);
        let text = line_text(&line);
        assert_eq!(text.chars().count(), 30);
        assert!(text.starts_with("[ ] buy milk"));
        assert!(text.ends_with(" ✎  ✗ "));
    }

    #[test]
    fn test_completed_row_is_struck_through() {
        let line = create_row_line(&row("done", true, RowPhase::Settled), 30);
        assert!(line_text(&line).starts_with("[✓] done"));
        assert_eq!(line.spans[1].style, completed_style());
    }

    #[test]
    fn test_leaving_row_style() {
        let line = create_row_line(&row("bye", false, RowPhase::Leaving), 30);
        assert_eq!(line.spans[1].style, leaving_style());
    }

    #[test]
    fn test_fit() {
        assert_eq!(fit("abc", 5), "abc  ");
        assert_eq!(fit("abcdef", 4), "abc…");
        assert_eq!(fit("abc", 0), "");
        assert_eq!(fit("a\tb", 4), "a b ");
    }

    #[test]
    fn test_fit_counts_wide_characters_as_two_cells() {
        assert_eq!(fit("牛奶", 6), "牛奶  ");
        assert_eq!(fit("買牛奶買", 6), "買牛… ");
        assert_eq!(fit("買牛奶買", 6).width(), 6);
        assert_eq!(fit("a買牛奶", 6), "a買牛…");
    }

    /// Column where `needle` starts, in terminal cells
    fn column_of(line: &Line, needle: &str) -> usize {
        let text = line_text(line);
        let byte = text.find(needle).unwrap();
        text[..byte].width()
    }

    #[test]
    fn test_wide_text_keeps_affordances_in_their_columns() {
        let width = 30;
        let line = create_row_line(&row("買牛奶買牛奶買牛奶買牛奶", false, RowPhase::Settled), width);
        assert_eq!(line.width(), width as usize);

        let edit = column_of(&line, "✎") as u16;
        let delete = column_of(&line, "✗") as u16;
        assert_eq!(hit_test(edit, width), RowTarget::Edit);
        assert_eq!(hit_test(delete, width), RowTarget::Delete);

        // Every column that shows text toggles
        let text_end = column_of(&line, "…") as u16;
        for column in 0..=text_end {
            assert_eq!(hit_test(column, width), RowTarget::Body);
        }
    }

    #[test]
    fn test_emoji_row_fills_exact_width() {
        let line = create_row_line(&row("ship it 🚀🚀", true, RowPhase::Settled), 24);
        assert_eq!(line.width(), 24);
        assert!(line_text(&line).ends_with(" ✎  ✗ "));
    }
}
